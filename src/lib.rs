pub mod consts;

pub mod vector;
pub mod ray;
pub mod light;

pub mod geometry;
pub mod intersect;
pub mod world;
pub mod camera;
pub mod parallel;

pub mod color;
pub mod canvas;

pub mod eval;
pub mod scene;

use consts::FEQ_EPSILON;

pub fn feq(left: f32, right: f32) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
