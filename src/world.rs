use crate::consts::SHADOW_BIAS;
use crate::ray::Ray;
use crate::vector::Vec3;
use crate::color::Color;
use crate::light::{ PointLight, Material, lighting };
use crate::geometry::{ Intersectable, Sphere, Plane };
use crate::intersect::HitRecord;

/// A world with objects and lights.
///
/// Worlds collect all primitives as well as lights for rendering. Most logic
/// is performed within worlds for the ray tracer: nearest-hit search, shadow
/// feelers and shading.
///
/// A world is built once and only read while rendering, so it can be shared
/// between render threads without locking.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub spheres: Vec<Sphere>,
    pub planes: Vec<Plane>,
    pub lights: Vec<PointLight>,
    pub background: Color,
}

impl Default for World {
    fn default() -> World {
        World::empty()
    }
}

impl World {
    /// Creates an empty world with no objects, no lights and the default
    /// background.
    pub fn empty() -> World {
        World {
            spheres: Vec::new(),
            planes: Vec::new(),
            lights: Vec::new(),
            background: Color::rgb(80, 90, 110),
        }
    }

    /// Finds the nearest hit of a ray against all objects in a world.
    ///
    /// Spheres are searched before planes. A later primitive only replaces
    /// the current hit if it is strictly nearer, so on a tie the first
    /// primitive in that order wins.
    pub fn intersect(&self, r: &Ray) -> HitRecord {
        let mut rec = HitRecord::new();

        let spheres = self.spheres.iter().map(|s| s as &dyn Intersectable);
        let planes = self.planes.iter().map(|p| p as &dyn Intersectable);

        for obj in spheres.chain(planes) {
            if let Some(t) = obj.intersect(r) {
                if t < rec.t {
                    let point = r.position(t);

                    rec.t = t;
                    rec.point = point;
                    rec.normal = obj.normal_at(point);
                    rec.material = *obj.material();
                    rec.hit = true;
                }
            }
        }

        rec
    }

    /// Determines whether a point is shadowed from a light at `light_pos`.
    ///
    /// The feeler starts slightly toward the light so that the surface the
    /// point lies on does not occlude itself. Only hits nearer than the
    /// light count; anything past a point light cannot block it.
    pub fn is_shadowed(&self, p: Vec3, light_pos: Vec3) -> bool {
        let v = light_pos - p;
        let distance = v.length();
        let direction = v.normalize();

        let r = Ray::new(p + direction * SHADOW_BIAS, direction);
        let h = self.intersect(&r);

        h.hit && h.t < distance
    }

    /// Calculates the color for a hit: ambient, plus the diffuse and
    /// specular terms of every light the point can see.
    pub fn shade_hit(&self, r: &Ray, hit: &HitRecord) -> Color {
        let m: &Material = &hit.material;
        let eyev = (-r.direction).normalize();

        let mut result = m.ambient_color();
        for light in self.lights.iter() {
            if self.is_shadowed(hit.point, light.position) {
                continue;
            }

            result = result + lighting(m, light, hit.point, eyev, hit.normal);
        }

        result
    }

    /// Determines a color based on the intersection of a ray and the objects.
    ///
    /// If nothing is hit, the background color is returned unchanged.
    pub fn color_at(&self, r: &Ray) -> Color {
        match self.intersect(r).into_hit() {
            None => self.background,
            Some(hit) => self.shade_hit(r, &hit),
        }
    }

    /// Determines the shadow mask value seen along a ray.
    ///
    /// Black if the ray hits a point shadowed from the first light, white
    /// otherwise (including misses, and worlds without lights).
    pub fn shadow_mask_at(&self, r: &Ray) -> Color {
        let light = match self.lights.first() {
            Some(l) => l,
            None => return Color::white(),
        };

        match self.intersect(r).into_hit() {
            Some(hit) if self.is_shadowed(hit.point, light.position)
                => Color::black(),
            _ => Color::white(),
        }
    }
}

#[cfg(test)]
use crate::feq;

#[cfg(test)]
fn two_sphere_world() -> World {
    let mut w = World::empty();
    w.spheres = vec![
        Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0,
            Material::new(Color::rgb(200, 100, 50), 0.2, 0.8, 0.3, 32.0)),
        Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0,
            Material::new(Color::rgb(50, 100, 200), 0.2, 0.8, 0.3, 32.0)),
    ];
    w.lights = vec![
        PointLight::new(Vec3::new(0.0, 0.0, -10.0), Color::white(), 1.0),
    ];

    w
}

#[test]
fn intersect_returns_nearest_hit() {
    let w = two_sphere_world();
    let r = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

    let h = w.intersect(&r);
    assert!(h.hit);
    assert!(feq(h.t, 4.0));
    assert_eq!(h.point, Vec3::new(0.0, 0.0, -1.0));
    assert_eq!(h.normal, Vec3::new(0.0, 0.0, -1.0));
    assert_eq!(h.material.color, Color::rgb(200, 100, 50));

    // From the other side, the second sphere is nearer.
    let r = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
    let h = w.intersect(&r);
    assert!(feq(h.t, 4.0));
    assert_eq!(h.material.color, Color::rgb(50, 100, 200));
}

#[test]
fn intersect_tie_prefers_first_primitive() {
    let first = Material::new(Color::rgb(1, 2, 3), 0.1, 0.9, 0.3, 32.0);
    let second = Material::new(Color::rgb(4, 5, 6), 0.1, 0.9, 0.3, 32.0);

    let mut w = World::empty();
    w.spheres = vec![
        Sphere::new(Vec3::zero(), 1.0, first),
        Sphere::new(Vec3::zero(), 1.0, second),
    ];

    let r = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(w.intersect(&r).material, first);

    // Spheres are searched before planes.
    let mut w = World::empty();
    w.planes = vec![
        Plane::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -1.0), second),
    ];
    w.spheres = vec![Sphere::new(Vec3::zero(), 1.0, first)];

    assert_eq!(w.intersect(&r).material, first);
}

#[test]
fn intersect_plane_behind_sphere() {
    let plane_material = Material::new(Color::rgb(9, 9, 9), 0.1, 0.9, 0.3, 32.0);

    let mut w = World::empty();
    w.planes = vec![
        Plane::new(Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, -1.0),
            plane_material),
    ];
    w.spheres = vec![Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0,
        Default::default())];

    let r = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
    let h = w.intersect(&r);

    assert!(feq(h.t, 2.0));
    assert_eq!(h.material, plane_material);
    assert_eq!(h.normal, Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn intersect_miss() {
    let w = two_sphere_world();
    let r = Ray::new(Vec3::new(0.0, 5.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

    let h = w.intersect(&r);
    assert!(!h.hit);
    assert!(h.t.is_infinite());
}

#[test]
fn color_when_ray_misses() {
    let w = two_sphere_world();

    let rays = [
        Ray::new(Vec3::new(0.0, 5.0, -5.0), Vec3::new(0.0, 0.0, 1.0)),
        Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 1.0, 0.0)),
        Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0)),
    ];

    for r in rays.iter() {
        assert_eq!(w.color_at(r), Color::rgb(80, 90, 110));
        assert_eq!(w.shadow_mask_at(r), Color::white());
    }
}

#[test]
fn color_when_ray_hits_lit_side() {
    let w = two_sphere_world();
    let r = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

    // ambient (40, 20, 10) + diffuse (160, 80, 40) + specular (76, 76, 76)
    assert_eq!(w.color_at(&r), Color::rgb(255, 176, 126));
    assert_eq!(w.shadow_mask_at(&r), Color::white());
}

#[test]
fn shadowed_point_gets_only_ambient() {
    let w = two_sphere_world();

    // The second sphere's near side is hidden from the light by the first.
    let r = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 1.0));
    let h = w.intersect(&r);
    assert_eq!(h.material.color, Color::rgb(50, 100, 200));
    assert!(w.is_shadowed(h.point, w.lights[0].position));
    assert_eq!(w.color_at(&r), Color::rgb(10, 20, 40));
    assert_eq!(w.shadow_mask_at(&r), Color::black());
}

#[test]
fn no_shadow_when_nothing_between_point_and_light() {
    let w = two_sphere_world();

    assert!(!w.is_shadowed(Vec3::new(0.0, 10.0, 0.0), w.lights[0].position));
    assert!(!w.is_shadowed(Vec3::new(0.0, 0.0, -2.0), w.lights[0].position));
}

#[test]
fn no_shadow_when_object_behind_light() {
    let w = two_sphere_world();
    let light = Vec3::new(0.0, 0.0, 2.5);

    // The first sphere lies beyond the light as seen from this point.
    assert!(!w.is_shadowed(Vec3::new(0.0, 0.0, 3.5), light));
}

#[test]
fn no_shadow_when_object_behind_point() {
    let w = two_sphere_world();

    assert!(!w.is_shadowed(Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, -20.0)));
}

#[test]
fn surface_does_not_shadow_itself() {
    let w = two_sphere_world();
    let r = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
    let h = w.intersect(&r);

    assert!(!w.is_shadowed(h.point, w.lights[0].position));

    // A grazing light still sees the point it lights.
    let grazing = Vec3::new(10.0, 0.0, -1.0);
    assert!(!w.is_shadowed(h.point, grazing));
}

#[test]
fn shadow_persists_as_light_moves_away() {
    let w = two_sphere_world();
    let p = Vec3::new(0.0, 0.0, 3.9);
    let light = w.lights[0].position;
    let direction = (light - p).normalize();

    assert!(w.is_shadowed(p, light));
    for distance in [15.0f32, 20.0, 50.0, 1000.0].iter() {
        assert!(w.is_shadowed(p, p + direction * *distance));
    }
}

#[test]
fn shadow_mask_uses_first_light_only() {
    let mut w = two_sphere_world();
    w.lights.push(PointLight::new(Vec3::new(0.0, -20.0, 3.0), Color::white(), 1.0));

    let r = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(w.shadow_mask_at(&r), Color::black());

    w.lights.swap(0, 1);
    assert_eq!(w.shadow_mask_at(&r), Color::white());
}

#[test]
fn world_without_lights_is_ambient_only() {
    let mut w = two_sphere_world();
    w.lights.clear();

    let r = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(w.color_at(&r), Color::rgb(40, 20, 10));
    assert_eq!(w.shadow_mask_at(&r), Color::white());
}
