use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

use crate::color::Color;

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray tracer. The `Camera`
/// generates rays which are cast into a `World`, and the resulting colors are
/// written here, one per pixel, in row-major order.
///
/// Once rendering finishes, the `Canvas` can be saved as a plain-text PPM.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas::filled(width, height, Color::black())
    }

    /// Creates a new canvas with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Color) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![color; width * height]
        }
    }

    /// Writes the canvas as a plain-text (P3) PPM.
    ///
    /// The header is followed by one `r g b` triplet per line, top row first.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Write PPM header, as well as metadata
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        for pixel in self.pixels.iter() {
            writeln!(out, "{} {} {}", pixel.r, pixel.g, pixel.b)?;
        }

        out.flush()
    }

    /// Saves a canvas to a PPM file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in row-column
    /// order, where `y` is the row of the pixel, and `x` is the column. Rows
    /// and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use shadow_tracer::color::Color;
    /// # use shadow_tracer::canvas::Canvas;
    /// let purple = Color::rgb(255, 0, 255);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// Returns `None` if the location is out-of-bounds. See `write_pixel`.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// All pixels, row-major, top row first.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }
}

#[test]
fn out_of_bounds_write_is_ignored() {
    let mut canvas = Canvas::new(2, 2);
    let before = canvas.clone();

    canvas.write_pixel(2, 0, &Color::white());
    canvas.write_pixel(0, 2, &Color::white());
    canvas.write_pixel(usize::MAX, usize::MAX, &Color::white());

    assert_eq!(canvas, before);
    assert_eq!(canvas.read_pixel(2, 0), None);
}

#[test]
fn filled_canvas() {
    let canvas = Canvas::filled(3, 2, Color::rgb(80, 90, 110));

    assert_eq!(canvas.pixel_count(), 6);
    assert!(canvas.pixels().iter().all(|p| *p == Color::rgb(80, 90, 110)));
}

#[test]
fn ppm_header_and_pixels() {
    let mut canvas = Canvas::new(3, 2);
    canvas.write_pixel(0, 0, &Color::rgb(255, 0, 0));
    canvas.write_pixel(2, 0, &Color::rgb(1, 2, 3));
    canvas.write_pixel(1, 1, &Color::rgb(0, 128, 255));

    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();

    let expected = "P3\n3 2\n255\n\
        255 0 0\n0 0 0\n1 2 3\n\
        0 0 0\n0 128 255\n0 0 0\n";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn save_to_file() {
    let mut canvas = Canvas::new(2, 1);
    canvas.write_pixel(1, 0, &Color::white());

    let path = std::env::temp_dir()
        .join(format!("shadow-tracer-canvas-{}.ppm", std::process::id()));
    canvas.save(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(contents, "P3\n2 1\n255\n0 0 0\n255 255 255\n");
}
