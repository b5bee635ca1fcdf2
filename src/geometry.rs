use crate::consts::{ HIT_EPSILON, PARALLEL_EPSILON };
use crate::vector::Vec3;
use crate::ray::Ray;
use crate::light::Material;

/// A primitive which rays can be tested against.
pub trait Intersectable {
    /// Returns the nearest ray parameter greater than `HIT_EPSILON` at which
    /// `ray` meets the surface, or `None` on a miss.
    fn intersect(&self, ray: &Ray) -> Option<f32>;

    /// Returns the outward unit normal at a point on the surface.
    fn normal_at(&self, at: Vec3) -> Vec3;

    fn material(&self) -> &Material;
}

/// A sphere with a center and a strictly positive radius.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Material) -> Sphere {
        debug_assert!(radius > 0.0, "Sphere radius must be positive.");

        Sphere { center, radius, material }
    }
}

impl Intersectable for Sphere {
    /// Checks whether a ray intersects a sphere.
    ///
    /// Solves `|O + tD - C|^2 = r^2` for `t`. Of the two roots, the nearer
    /// one is preferred; the farther one is used when the nearer lies at or
    /// behind the ray origin (the origin is on or inside the sphere).
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let sphere_to_ray = ray.origin - self.center;

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * sphere_to_ray.dot(&ray.direction);
        let c = sphere_to_ray.dot(&sphere_to_ray) - self.radius * self.radius;

        let discriminant = b * b - (4.0 * a * c);

        if discriminant < 0.0 {
            return None;
        }

        let sq = discriminant.sqrt();
        let t0 = (-b - sq) / (2.0 * a);
        let t1 = (-b + sq) / (2.0 * a);

        if t0 > HIT_EPSILON {
            Some(t0)
        } else if t1 > HIT_EPSILON {
            Some(t1)
        } else {
            None
        }
    }

    /// The normal always points away from the center, even for rays which
    /// start inside the sphere.
    fn normal_at(&self, at: Vec3) -> Vec3 {
        (at - self.center).normalize()
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

/// An infinite plane through `point`, facing along `normal`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
    pub material: Material,
}

impl Plane {
    /// Creates a plane. The normal is normalized here.
    pub fn new(point: Vec3, normal: Vec3, material: Material) -> Plane {
        Plane { point, normal: normal.normalize(), material }
    }
}

impl Intersectable for Plane {
    /// Intersects a ray with a plane.
    ///
    /// There is no back-face culling: a ray from either side can hit. Rays
    /// (nearly) parallel to the plane never do.
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let denom = self.normal.dot(&ray.direction);

        if denom.abs() <= PARALLEL_EPSILON {
            return None;
        }

        let t = (self.point - ray.origin).dot(&self.normal) / denom;

        if t >= HIT_EPSILON {
            Some(t)
        } else {
            None
        }
    }

    /// A plane has the same normal at every point, and it is never flipped
    /// toward the viewer.
    fn normal_at(&self, _at: Vec3) -> Vec3 {
        self.normal
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
use crate::feq;

#[test]
fn ray_hits_unit_sphere() {
    let s = Sphere::new(Vec3::zero(), 1.0, Default::default());
    let r = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

    let t = s.intersect(&r).expect("Ray should hit the sphere.");
    assert!(feq(t, 4.0));

    let n = s.normal_at(r.position(t));
    assert_eq!(n, Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_is_tangent_to_sphere() {
    let s = Sphere::new(Vec3::zero(), 1.0, Default::default());
    let r = Ray::new(Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

    let t = s.intersect(&r).expect("Tangent ray should hit the sphere.");
    assert!(feq(t, 5.0));
}

#[test]
fn ray_misses_sphere() {
    let s = Sphere::new(Vec3::zero(), 1.0, Default::default());
    let r = Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn ray_is_inside_sphere() {
    let s = Sphere::new(Vec3::zero(), 1.0, Default::default());
    let r = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, 1.0));

    // The near root is behind the origin, so the far one is reported.
    let t = s.intersect(&r).expect("Ray from inside should hit the sphere.");
    assert!(feq(t, 1.0));

    // The normal still points outward, along the ray.
    assert_eq!(s.normal_at(r.position(t)), Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn sphere_is_behind_ray() {
    let s = Sphere::new(Vec3::zero(), 1.0, Default::default());
    let r = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn ray_starting_on_sphere_skips_own_surface() {
    let s = Sphere::new(Vec3::zero(), 1.0, Default::default());

    // Leaving the surface outward: both roots are at or behind the origin.
    let out = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -1.0));
    assert_eq!(s.intersect(&out), None);

    // Entering the surface: the root at the origin is excluded.
    let inward = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0));
    let t = s.intersect(&inward).expect("Ray should cross the sphere.");
    assert!(feq(t, 2.0));
}

#[test]
fn ray_from_center_hits_at_radius() {
    let center = Vec3::new(1.0, -2.0, 3.0);
    let radius = 2.5;
    let s = Sphere::new(center, radius, Default::default());

    let directions = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-0.3, 0.8, -2.0),
        Vec3::new(5.0, -0.1, 0.2),
    ];

    for d in directions.iter() {
        let d = d.normalize();
        let r = Ray::new(center, d);

        let t = s.intersect(&r).expect("Ray from center should hit.");
        assert!(feq(t, radius));
        assert_eq!(r.position(t), center + d * radius);

        let n = s.normal_at(r.position(t));
        assert_eq!(n, d);
        assert!(feq(n.length(), 1.0));
    }
}

#[test]
fn ray_intersecting_plane_from_above() {
    let p = Plane::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0), Default::default());
    let r = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

    assert_eq!(p.intersect(&r), Some(1.0));
}

#[test]
fn ray_intersecting_plane_from_below() {
    let p = Plane::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0), Default::default());
    let r = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));

    assert_eq!(p.intersect(&r), Some(1.0));

    // No flipping toward the ray.
    assert_eq!(p.normal_at(r.position(1.0)), Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn ray_parallel_to_plane() {
    let p = Plane::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0), Default::default());

    let above = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
    let coplanar = Ray::new(Vec3::zero(), Vec3::new(1.0, 0.0, 1.0));

    assert_eq!(p.intersect(&above), None);
    assert_eq!(p.intersect(&coplanar), None);
}

#[test]
fn plane_behind_ray() {
    let p = Plane::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0), Default::default());
    let r = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));

    assert_eq!(p.intersect(&r), None);
}

#[test]
fn plane_normal_is_normalized() {
    let p = Plane::new(Vec3::zero(), Vec3::new(0.0, 0.0, 4.0), Default::default());

    assert_eq!(p.normal, Vec3::new(0.0, 0.0, 1.0));
    assert!(feq(p.normal_at(Vec3::new(3.0, -1.0, 0.0)).length(), 1.0));
}

#[test]
fn plane_hit_point_lies_on_plane() {
    let point = Vec3::new(0.5, -1.0, 2.0);
    let p = Plane::new(point, Vec3::new(1.0, 2.0, -0.5), Default::default());

    let rays = [
        Ray::new(Vec3::new(3.0, 4.0, 5.0), Vec3::new(-1.0, -1.0, 0.0)),
        Ray::new(Vec3::new(-7.0, 0.0, 1.0), Vec3::new(1.0, 0.1, 0.2)),
        Ray::new(Vec3::new(0.0, -5.0, 0.0), Vec3::new(0.0, 1.0, 0.3)),
    ];

    for r in rays.iter() {
        let t = p.intersect(r).expect("Ray should hit the plane.");
        let offset = (r.position(t) - point).dot(&p.normal);
        assert!(offset.abs() <= 1e-4);
    }
}
