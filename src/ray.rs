use crate::vector::Vec3;

#[cfg(test)]
use crate::feq;

/// A ray with an origin and a unit-length direction.
///
/// The direction is normalized on construction; shading relies on this when
/// it takes the view direction as `-direction`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Ray { origin, direction: direction.normalize() }
    }

    pub fn position(&self, t: f32) -> Vec3 {
        self.origin + (t * self.direction)
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
                Vec3::new(2.0, 3.0, 4.0),
                Vec3::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Vec3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Vec3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Vec3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Vec3::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_direction_is_normalized() {
    let directions = [
        Vec3::new(0.0, 0.0, 7.0),
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(-0.001, 0.0002, 0.00003),
        Vec3::new(-40.0, 250.0, -9.5),
    ];

    for d in directions.iter() {
        let r = Ray::new(Vec3::zero(), *d);
        assert!(feq(r.direction.length(), 1.0));
    }
}
