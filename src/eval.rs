use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::canvas::Canvas;

/// Summary statistics of a finished render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Metrics {
    /// Brightness threshold the dark pixels were counted against.
    pub threshold: f32,

    /// Number of image pixels darker than `threshold`.
    pub shadow_pixels: usize,

    /// `shadow_pixels` over the total pixel count, in `[0, 1]`.
    pub shadow_area_ratio: f32,

    pub render_time_ms: f64,
    pub pixels_per_second: f64,
}

/// Counts the dark pixels of a shaded image.
///
/// A pixel is dark when its brightness is strictly below `threshold`. Only
/// the image itself is consulted, not the shadow mask, so dark unshadowed
/// surfaces count too. Timing fields are left at zero; see
/// `Metrics::with_render_time`.
pub fn evaluate_image(image: &Canvas, threshold: f32) -> Metrics {
    let shadow_pixels = image.pixels().iter()
        .filter(|p| p.brightness() < threshold)
        .count();

    let total = image.pixel_count();
    let shadow_area_ratio = if total > 0 {
        shadow_pixels as f32 / total as f32
    } else {
        0.0
    };

    Metrics {
        threshold,
        shadow_pixels,
        shadow_area_ratio,
        ..Default::default()
    }
}

impl Metrics {
    /// Fills in the timing fields for a render of `pixel_count` pixels which
    /// took `elapsed`. Throughput is reported as zero for a zero duration.
    pub fn with_render_time(self, elapsed: Duration, pixel_count: usize) -> Metrics {
        let render_time_ms = elapsed.as_secs_f64() * 1000.0;
        let pixels_per_second = if render_time_ms > 0.0 {
            pixel_count as f64 / (render_time_ms / 1000.0)
        } else {
            0.0
        };

        Metrics { render_time_ms, pixels_per_second, ..self }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== SHADOW METRICS ===")?;
        writeln!(f, "Shadow pixels (brightness < {}): {}",
            self.threshold, self.shadow_pixels)?;
        writeln!(f, "Shadow area ratio: {} %", self.shadow_area_ratio * 100.0)?;
        writeln!(f, "Render time: {} ms", self.render_time_ms)?;
        write!(f, "Pixels per second: {}", self.pixels_per_second)
    }
}

#[cfg(test)]
use crate::color::Color;

#[test]
fn counts_pixels_strictly_below_threshold() {
    let mut image = Canvas::filled(4, 1, Color::white());

    // 153 / 255 is exactly 0.6; 152 / 255 is just below.
    image.write_pixel(0, 0, &Color::rgb(153, 153, 153));
    image.write_pixel(1, 0, &Color::rgb(152, 152, 152));
    image.write_pixel(2, 0, &Color::black());

    let m = evaluate_image(&image, 0.6);
    assert_eq!(m.shadow_pixels, 2);
    assert_eq!(m.shadow_area_ratio, 0.5);
    assert_eq!(m.threshold, 0.6);
}

#[test]
fn empty_image_has_no_shadow() {
    let m = evaluate_image(&Canvas::new(0, 0), 0.3);

    assert_eq!(m.shadow_pixels, 0);
    assert_eq!(m.shadow_area_ratio, 0.0);
}

#[test]
fn render_time_gives_throughput() {
    let m = evaluate_image(&Canvas::new(10, 10), 0.3)
        .with_render_time(Duration::from_millis(250), 100);

    assert!((m.render_time_ms - 250.0).abs() < 1e-9);
    assert!((m.pixels_per_second - 400.0).abs() < 1e-9);

    let m = m.with_render_time(Duration::from_secs(0), 100);
    assert_eq!(m.pixels_per_second, 0.0);
}

#[test]
fn display_report() {
    let m = Metrics {
        threshold: 0.3,
        shadow_pixels: 12,
        shadow_area_ratio: 0.25,
        render_time_ms: 2.0,
        pixels_per_second: 24000.0,
    };

    assert_eq!(m.to_string(), "=== SHADOW METRICS ===\n\
        Shadow pixels (brightness < 0.3): 12\n\
        Shadow area ratio: 25 %\n\
        Render time: 2 ms\n\
        Pixels per second: 24000");
}

#[test]
fn evaluate_fixed_scene_render() {
    let scene = crate::camera::fixed_scene();
    let output = scene.camera.render(&scene.world);

    let m = evaluate_image(&output.image, 0.30);

    let expected = output.image.pixels().iter()
        .filter(|p| (p.r as f32 + p.g as f32 + p.b as f32) / 765.0 < 0.30)
        .count();
    assert_eq!(m.shadow_pixels, expected);
    assert!(m.shadow_pixels > 0);
    assert_eq!(m.shadow_area_ratio, expected as f32 / (800.0 * 600.0));

    // The background alone is brighter than the threshold.
    assert!(m.shadow_area_ratio < 0.25);
}
