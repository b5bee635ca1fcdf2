use crate::vector::Vec3;
use crate::light::Material;

/// The result of a nearest-hit query against a `World`.
///
/// The material is copied out of the primitive that was hit, so a record
/// stays valid independently of the world it came from. A fresh record has
/// `t` at infinity and `hit` unset; it only carries meaningful geometry once
/// `hit` is true.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitRecord {
    /// Ray parameter of the hit.
    pub t: f32,

    /// World-space point of the hit, `origin + t * direction`.
    pub point: Vec3,

    /// Outward unit normal of the surface at `point`.
    pub normal: Vec3,

    pub material: Material,
    pub hit: bool,
}

impl Default for HitRecord {
    fn default() -> HitRecord {
        HitRecord {
            t: f32::INFINITY,
            point: Vec3::zero(),
            normal: Vec3::zero(),
            material: Default::default(),
            hit: false,
        }
    }
}

impl HitRecord {
    /// Creates an empty record, which any real hit will be nearer than.
    pub fn new() -> HitRecord {
        Default::default()
    }

    /// Converts the record to an `Option`, discarding it on a miss.
    pub fn into_hit(self) -> Option<HitRecord> {
        if self.hit {
            Some(self)
        } else {
            None
        }
    }
}

#[test]
fn fresh_record_is_a_miss() {
    let rec = HitRecord::new();

    assert!(!rec.hit);
    assert!(rec.t.is_infinite() && rec.t > 0.0);
    assert_eq!(rec.into_hit(), None);
}
