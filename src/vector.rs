use std::ops::{ Add, Sub, Neg, Mul, Div };

use crate::feq;

/// A three-component vector, used both for points and directions.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PartialEq for Vec3 {
    fn eq(&self, other: &Vec3) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

/// Conversion from a 3-element array, as found in scene descriptions.
impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Vec3 {
        Vec3 { x: v[0], y: v[1], z: v[2] }
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> [f32; 3] {
        [v.x, v.y, v.z]
    }
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }

    pub fn zero() -> Vec3 {
        Vec3 { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Scales the vector to unit length.
    ///
    /// A zero-length vector has no direction and is returned unchanged.
    ///
    /// ```
    /// # use shadow_tracer::vector::Vec3;
    /// assert_eq!(Vec3::new(4.0, 0.0, 0.0).normalize(), Vec3::new(1.0, 0.0, 0.0));
    /// assert_eq!(Vec3::zero().normalize(), Vec3::zero());
    /// ```
    pub fn normalize(&self) -> Vec3 {
        let len = self.length();

        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            *self
        }
    }

    pub fn dot(&self, other: &Vec3) -> f32 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Implements scalar right-multiplication for a vector.
///
/// ```
/// use shadow_tracer::vector::Vec3;
///
/// let v = Vec3::new(1.0, 2.0, 3.0);
/// assert_eq!(v * 2.0, Vec3::new(2.0, 4.0, 6.0));
/// ```
impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, other: f32) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a vector.
///
/// ```
/// use shadow_tracer::vector::Vec3;
///
/// let v = Vec3::new(1.0, 2.0, 3.0);
/// assert_eq!(2.0 * v, Vec3::new(2.0, 4.0, 6.0));
/// ```
impl Mul<Vec3> for f32 {
    type Output = Vec3;

    fn mul(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self * other.x,
            y: self * other.y,
            z: self * other.z,
        }
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;

    fn div(self, other: f32) -> Self {
        Self {
            x: self.x / other,
            y: self.y / other,
            z: self.z / other,
        }
    }
}

/* Tests */

#[test]
fn add_vectors() {
    let a1 = Vec3::new(3.0, -2.0, 5.0);
    let a2 = Vec3::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Vec3::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_vectors() {
    let p1 = Vec3::new(3.0, 2.0, 1.0);
    let p2 = Vec3::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vec3::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_vector() {
    let a = Vec3::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Vec3::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_fraction() {
    let a = Vec3::new(1.0, -2.0, 3.0);

    assert_eq!(a * 0.5, Vec3::new(0.5, -1.0, 1.5));
}

#[test]
fn div_scalar() {
    let a = Vec3::new(1.0, -2.0, 3.0);

    assert_eq!(a / 2.0, Vec3::new(0.5, -1.0, 1.5));
}

#[test]
fn length_neg() {
    let v = Vec3::new(-1.0, -2.0, -3.0);

    assert!(feq(v.length(), 14.0f32.sqrt()));
}

#[test]
fn normalize_dirty() {
    let v = Vec3::new(1.0, 2.0, 3.0);
    let e = Vec3::new(
        1.0 / 14.0f32.sqrt(),
        2.0 / 14.0f32.sqrt(),
        3.0 / 14.0f32.sqrt(),
    );

    assert_eq!(v.normalize(), e);
    assert!(feq(v.normalize().length(), 1.0));
}

#[test]
fn normalize_zero_is_unchanged() {
    let v = Vec3::zero().normalize();

    assert_eq!(v.x, 0.0);
    assert_eq!(v.y, 0.0);
    assert_eq!(v.z, 0.0);
}

#[test]
fn dot_vectors() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Vec3::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Vec3::new(1.0, -2.0, 1.0));
}

#[test]
fn array_conversion() {
    let v: Vec3 = [1.5, -2.0, 0.25].into();
    let a: [f32; 3] = v.into();

    assert_eq!(v, Vec3::new(1.5, -2.0, 0.25));
    assert_eq!(a, [1.5, -2.0, 0.25]);
}
