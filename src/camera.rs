use log::info;

use crate::consts::PROGRESS_STEPS;
use crate::ray::Ray;
use crate::vector::Vec3;
use crate::world::World;
use crate::canvas::Canvas;
use crate::color::Color;

/// A pinhole camera for generating canvases.
///
/// The camera keeps an orthonormal basis built from an eye position, a target
/// to look at and a world-up vector. Primary rays all start at the eye.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    pub hsize: usize,

    /// The vertical size of the resultant canvas.
    pub vsize: usize,

    /// The vertical field of view, in radians.
    pub field_of_view: f32,

    pub eye: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,

    half_view: f32,
    aspect: f32,
}

/// The two images produced by a render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutput {
    /// The shaded image.
    pub image: Canvas,

    /// Black where the visible point is shadowed from the first light,
    /// white everywhere else.
    pub mask: Canvas,
}

impl RenderOutput {
    pub fn new(hsize: usize, vsize: usize) -> RenderOutput {
        RenderOutput {
            image: Canvas::new(hsize, vsize),
            mask: Canvas::new(hsize, vsize),
        }
    }
}

impl Camera {
    /// Creates a camera at `from` looking at `to`.
    ///
    /// `up` only needs to be roughly upward; the camera's own up vector is
    /// re-derived so the basis is orthogonal.
    pub fn new(hsize: usize, vsize: usize, field_of_view: f32, from: Vec3,
        to: Vec3, up: Vec3) -> Camera {
        let forward = (to - from).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();

        Camera {
            hsize,
            vsize,
            field_of_view,
            eye: from,
            forward,
            right,
            up,
            half_view: (field_of_view / 2.0).tan(),
            aspect: hsize as f32 / vsize as f32,
        }
    }

    /// Generates the primary ray through the center of pixel (`px`, `py`).
    ///
    /// Rows count downward from the top of the image, hence the flipped
    /// vertical offset.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        let u = (2.0 * (px as f32 + 0.5) / self.hsize as f32 - 1.0)
            * self.half_view * self.aspect;
        let v = (1.0 - 2.0 * (py as f32 + 0.5) / self.vsize as f32)
            * self.half_view;

        let direction = (self.forward + self.right * u + self.up * v).normalize();
        Ray::new(self.eye, direction)
    }

    /// Shades one row of pixels and its shadow mask.
    pub fn render_row(&self, w: &World, y: usize) -> Vec<(Color, Color)> {
        (0..self.hsize).map(|x| {
            let ray = self.ray_for_pixel(x, y);
            (w.color_at(&ray), w.shadow_mask_at(&ray))
        }).collect()
    }

    /// Renders the world into an image and a shadow mask, one row at a time.
    pub fn render(&self, w: &World) -> RenderOutput {
        let mut output = RenderOutput::new(self.hsize, self.vsize);
        let progress_every = self.progress_interval();

        for y in 0..self.vsize {
            for (x, (color, mask)) in self.render_row(w, y).iter().enumerate() {
                output.image.write_pixel(x, y, color);
                output.mask.write_pixel(x, y, mask);
            }

            if y % progress_every == 0 {
                info!("Progress: {}%", y * 100 / self.vsize);
            }
        }

        output
    }

    /// Number of rows between progress reports.
    pub fn progress_interval(&self) -> usize {
        (self.vsize / PROGRESS_STEPS).max(1)
    }
}

#[cfg(test)]
use crate::feq;

#[cfg(test)]
use crate::scene::{ Scene, SceneJson };

#[cfg(test)]
pub(crate) fn fixed_scene() -> Scene {
    use std::convert::TryFrom;

    Scene::try_from(SceneJson::fixed())
        .expect("Built-in scene should be valid.")
}

#[test]
fn camera_basis_is_orthonormal() {
    let c = Camera::new(800, 600, 60f32.to_radians(),
        Vec3::new(0.0, 3.0, 8.0),
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::new(0.0, 1.0, 0.0));

    assert!(feq(c.forward.length(), 1.0));
    assert!(feq(c.right.length(), 1.0));
    assert!(feq(c.up.length(), 1.0));

    assert!(feq(c.forward.dot(&c.right), 0.0));
    assert!(feq(c.forward.dot(&c.up), 0.0));
    assert!(feq(c.right.dot(&c.up), 0.0));

    // World-up was not perpendicular to forward, but still pulls the camera
    // upright.
    assert!(c.up.y > 0.9);
    assert_eq!(c.right, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn ray_through_center() {
    let c = Camera::new(201, 101, std::f32::consts::PI / 2.0,
        Vec3::zero(), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0));
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Vec3::zero());
    assert_eq!(r.direction, Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::new(2, 2, std::f32::consts::PI / 2.0,
        Vec3::zero(), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0));

    // Pixel centers sit at +-0.5 with tan(45) = 1.
    let r = c.ray_for_pixel(0, 0);
    assert_eq!(r.direction, Vec3::new(-0.5, 0.5, -1.0).normalize());

    let r = c.ray_for_pixel(1, 1);
    assert_eq!(r.direction, Vec3::new(0.5, -0.5, -1.0).normalize());
}

#[test]
fn ray_aspect_widens_horizontal_view() {
    let c = Camera::new(4, 2, std::f32::consts::PI / 2.0,
        Vec3::zero(), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0));

    // u = (2 * 3.5 / 4 - 1) * 1 * 2 = 1.5
    let r = c.ray_for_pixel(3, 0);
    assert_eq!(r.direction, Vec3::new(1.5, 0.5, -1.0).normalize());
}

#[test]
fn primary_rays_are_unit_length() {
    let scene = fixed_scene();
    let c = &scene.camera;

    for &(x, y) in [(0, 0), (799, 0), (0, 599), (799, 599), (400, 300)].iter() {
        assert!(feq(c.ray_for_pixel(x, y).direction.length(), 1.0));
    }
}

#[test]
fn pixel_aimed_at_center_sphere_hits_it() {
    let scene = fixed_scene();
    let r = scene.camera.ray_for_pixel(400, 347);

    let h = scene.world.intersect(&r);
    assert!(h.hit);
    assert_eq!(h.material.color, Color::rgb(220, 255, 200));

    let center = Vec3::new(0.0, 0.5, 2.0);
    assert!(((h.point - center).length() - 0.5).abs() < 1e-4);
    assert!(feq(h.normal.length(), 1.0));

    let color = scene.world.color_at(&r);
    assert_ne!(color, scene.world.background);
    assert!(color.brightness() > 0.0);
}

#[test]
fn image_center_passes_above_center_sphere() {
    let scene = fixed_scene();
    let r = scene.camera.ray_for_pixel(400, 300);

    // The central ray passes just above the middle sphere.
    assert!(!scene.world.intersect(&r).hit);
    assert_eq!(scene.world.color_at(&r), scene.world.background);
}

#[test]
fn corner_pixel_is_background() {
    let scene = fixed_scene();
    let r = scene.camera.ray_for_pixel(0, 0);

    assert_eq!(scene.world.color_at(&r), Color::rgb(80, 90, 110));
    assert_eq!(scene.world.shadow_mask_at(&r), Color::white());
}

#[test]
fn render_fixed_scene() {
    let scene = fixed_scene();
    let output = scene.camera.render(&scene.world);

    assert_eq!(output.image.width, 800);
    assert_eq!(output.image.height, 600);
    assert_eq!(output.image.read_pixel(0, 0), Some(Color::rgb(80, 90, 110)));
    assert_eq!(output.mask.read_pixel(0, 0), Some(Color::white()));

    // The mask is strictly binary.
    assert!(output.mask.pixels().iter()
        .all(|p| *p == Color::white() || *p == Color::black()));

    let shadowed = output.mask.pixels().iter()
        .filter(|p| **p == Color::black())
        .count();
    let ratio = shadowed as f32 / output.mask.pixel_count() as f32;
    assert!(ratio > 0.01 && ratio < 0.25, "mask ratio was {}", ratio);

    // Every shadowed mask pixel sees geometry, never background.
    for (img, mask) in output.image.pixels().iter().zip(output.mask.pixels()) {
        if *mask == Color::black() {
            assert_ne!(*img, scene.world.background);
        }
    }

    // The upper-left sphere sits in the shadow of its neighbour.
    assert_eq!(output.mask.read_pixel(335, 197), Some(Color::black()));
}

#[test]
fn render_is_deterministic() {
    let scene = fixed_scene();

    let mut first = Vec::new();
    scene.camera.render(&scene.world).image.write_ppm(&mut first).unwrap();

    let mut second = Vec::new();
    scene.camera.render(&scene.world).image.write_ppm(&mut second).unwrap();

    assert!(first == second);
}
