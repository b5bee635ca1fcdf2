use std::ops::{ Add, Mul };

/// A color.
///
/// Represented conventionally with red-green-blue (RGB) values. Each channel
/// is an 8-bit integer ranging from 0 to 255 inclusive, and every arithmetic
/// operation saturates to that range, so no channel can ever leave it.
///
/// # Examples
///
/// Adding two bright colors saturates rather than wrapping:
///
/// ```
/// # use shadow_tracer::color::Color;
/// let c = Color::rgb(200, 100, 0) + Color::rgb(100, 100, 100);
/// assert_eq!(c, Color::rgb(255, 200, 100));
/// ```
///
/// Scaling truncates toward zero and clamps:
///
/// ```
/// # use shadow_tracer::color::Color;
/// assert_eq!(Color::rgb(255, 220, 200) * 0.2, Color::rgb(51, 44, 40));
/// assert_eq!(Color::rgb(200, 10, 0) * 2.0, Color::rgb(255, 20, 0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Conversion from a 3-element array, as found in scene descriptions.
impl From<[u8; 3]> for Color {
    fn from(v: [u8; 3]) -> Color {
        Color { r: v[0], g: v[1], b: v[2] }
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> [u8; 3] {
        [c.r, c.g, c.b]
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// The color black.
    pub fn black() -> Color {
        Color { r: 0, g: 0, b: 0 }
    }

    /// The color white.
    pub fn white() -> Color {
        Color { r: 255, g: 255, b: 255 }
    }

    /// Projects the color onto a single brightness value in `[0, 1]`.
    ///
    /// Brightness is the mean of the three channels over the channel maximum,
    /// i.e. `(r + g + b) / (3 * 255)`.
    pub fn brightness(&self) -> f32 {
        let sum = self.r as u32 + self.g as u32 + self.b as u32;
        sum as f32 / (3.0 * 255.0)
    }
}

// Truncates toward zero, then clamps to [0, 255]. NaN maps to 0.
fn scale_channel(channel: u8, factor: f32) -> u8 {
    let scaled = (channel as f32 * factor) as i32;
    scaled.clamp(0, 255) as u8
}

/// Adds two colors together.
///
/// Components are added individually, saturating at 255.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
        }
    }
}

/// Multiplies a color by a scalar.
///
/// Each component is multiplied by the scalar, truncated and clamped.
impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, other: f32) -> Self::Output {
        Color {
            r: scale_channel(self.r, other),
            g: scale_channel(self.g, other),
            b: scale_channel(self.b, other),
        }
    }
}

/// Multiplies a scalar by a color.
impl Mul<Color> for f32 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

#[test]
fn add_colors_saturates() {
    let c1 = Color::rgb(250, 10, 128);
    let c2 = Color::rgb(10, 20, 128);

    assert_eq!(c1 + c2, Color::rgb(255, 30, 255));
}

#[test]
fn multiply_color_truncates() {
    let c = Color::rgb(255, 255, 230);

    assert_eq!(c * 0.3, Color::rgb(76, 76, 69));
    assert_eq!(0.3 * c, c * 0.3);
}

#[test]
fn multiply_color_clamps() {
    let c = Color::rgb(100, 200, 1);

    assert_eq!(c * 3.0, Color::rgb(255, 255, 3));
    assert_eq!(c * -1.0, Color::black());
    assert_eq!(c * f32::NAN, Color::black());
    assert_eq!(c * f32::INFINITY, Color::rgb(255, 255, 255));
}

#[test]
fn scaling_stays_in_range() {
    let factors = [-1e9, -2.5, -0.0, 0.0, 0.001, 0.5, 1.0, 1.7, 255.0, 1e9];

    for channel in [0u8, 1, 17, 128, 254, 255].iter() {
        for factor in factors.iter() {
            let c = Color::rgb(*channel, *channel, *channel) * *factor;
            let expected = (*channel as f32 * *factor).max(0.0).min(255.0) as u8;

            assert_eq!(c.r, expected);
        }
    }
}

#[test]
fn brightness_range() {
    assert_eq!(Color::black().brightness(), 0.0);
    assert_eq!(Color::white().brightness(), 1.0);

    for v in (0..=255u8).step_by(5) {
        let b = Color::rgb(v, 255 - v, v / 2).brightness();
        assert!(b >= 0.0 && b <= 1.0);
    }
}

#[test]
fn brightness_of_background() {
    let bg = Color::rgb(80, 90, 110);

    assert!((bg.brightness() - 280.0 / 765.0).abs() < 1e-6);
}
