use crate::color::Color;
use crate::vector::Vec3;

/// A point light.
///
/// A very simple light source. Provides a color, a position where light is
/// produced from, and a scalar intensity applied to everything it lights.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> PointLight {
        PointLight {
            position: Vec3::zero(),
            color: Color::white(),
            intensity: 1.0,
        }
    }
}

impl PointLight {
    pub fn new(position: Vec3, color: Color, intensity: f32) -> PointLight {
        PointLight { position, color, intensity }
    }
}

/// A material record.
///
/// Materials use attributes from the Blinn-Phong reflection model; ambient,
/// diffuse, specular and shininess. All four are expected to be non-negative.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,

    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            color: Color::white(),

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.3,
            shininess: 32.0,
        }
    }
}

impl Material {
    pub fn new(color: Color, ambient: f32, diffuse: f32, specular: f32,
        shininess: f32) -> Material {
        Material { color, ambient, diffuse, specular, shininess }
    }

    /// The light a surface gives off regardless of any light source.
    pub fn ambient_color(&self) -> Color {
        self.color * self.ambient
    }
}

/// Calculates the contribution of one unoccluded light at a surface point.
///
/// Takes a material, a single light, a point, the eye vector (pointing from
/// the point toward the viewer) and the surface normal. Ambient light is not
/// included; callers add it once per hit, not once per light.
///
/// Each term saturates as it is built, so the order of operations matters:
/// diffuse and specular are clamped separately, summed, and only then scaled
/// by the light's intensity.
pub fn lighting(m: &Material, light: &PointLight, point: Vec3, eyev: Vec3,
    normalv: Vec3) -> Color {
    // Find direction to light source
    let lightv = (light.position - point).normalize();

    // Lambertian term, zero for the side of the surface facing away
    let diffuse_factor = normalv.dot(&lightv).max(0.0);
    let diffuse = m.color * (m.diffuse * diffuse_factor);

    // Specular lobe around the half-vector between light and eye
    let halfv = (lightv + eyev).normalize();
    let specular_factor = normalv.dot(&halfv).max(0.0).powf(m.shininess);
    let specular = light.color * (m.specular * specular_factor);

    (diffuse + specular) * light.intensity
}

#[test]
fn eye_between_light_and_surface() {
    let m: Material = Default::default();
    let position = Vec3::zero();

    let eyev = Vec3::new(0.0, 0.0, -1.0);
    let normalv = Vec3::new(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Vec3::new(0.0, 0.0, -10.0),
        Color::white(),
        1.0,
    );

    // 229 diffuse + 76 specular saturates.
    let res = lighting(&m, &light, position, eyev, normalv);
    assert_eq!(res, Color::white());
}

#[test]
fn light_behind_surface() {
    let m: Material = Default::default();
    let position = Vec3::zero();

    let eyev = Vec3::new(0.0, 0.0, -1.0);
    let normalv = Vec3::new(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Vec3::new(0.0, 0.0, 10.0),
        Color::white(),
        1.0,
    );

    // The half-vector degenerates to zero and contributes nothing.
    let res = lighting(&m, &light, position, eyev, normalv);
    assert_eq!(res, Color::black());
}

#[test]
fn light_offset_45_diffuse_only() {
    let m = Material {
        color: Color::rgb(100, 100, 100),
        ambient: 0.0,
        diffuse: 0.5,
        specular: 0.0,
        shininess: 32.0,
    };

    let eyev = Vec3::new(0.0, 0.0, -1.0);
    let normalv = Vec3::new(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Vec3::new(0.0, 10.0, -10.0),
        Color::white(),
        1.0,
    );

    // 100 * 0.5 * cos(45) = 35.35
    let res = lighting(&m, &light, Vec3::zero(), eyev, normalv);
    assert_eq!(res, Color::rgb(35, 35, 35));
}

#[test]
fn intensity_scales_after_truncation() {
    let m = Material {
        color: Color::rgb(100, 100, 100),
        ambient: 0.0,
        diffuse: 0.5,
        specular: 0.0,
        shininess: 32.0,
    };

    let eyev = Vec3::new(0.0, 0.0, -1.0);
    let normalv = Vec3::new(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Vec3::new(0.0, 10.0, -10.0),
        Color::white(),
        2.0,
    );

    let res = lighting(&m, &light, Vec3::zero(), eyev, normalv);
    assert_eq!(res, Color::rgb(70, 70, 70));
}

#[test]
fn specular_uses_light_color() {
    let m = Material {
        color: Color::black(),
        ambient: 0.0,
        diffuse: 0.0,
        specular: 0.5,
        shininess: 8.0,
    };

    let eyev = Vec3::new(0.0, 0.0, -1.0);
    let normalv = Vec3::new(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Vec3::new(0.0, 0.0, -10.0),
        Color::rgb(200, 100, 50),
        1.0,
    );

    let res = lighting(&m, &light, Vec3::zero(), eyev, normalv);
    assert_eq!(res, Color::rgb(100, 50, 25));
}

#[test]
fn ambient_color_scales_material() {
    let m = Material::new(Color::rgb(255, 220, 200), 0.2, 0.8, 0.3, 32.0);

    assert_eq!(m.ambient_color(), Color::rgb(51, 44, 40));
}
