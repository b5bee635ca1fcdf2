use std::convert::TryFrom;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{ bail, Context, Result };
use log::debug;
use serde::{ Serialize, Deserialize };

use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, FIELD_OF_VIEW_DEGREES };
use crate::vector::Vec3;
use crate::color::Color;
use crate::light::{ Material, PointLight };
use crate::geometry::{ Sphere, Plane };
use crate::world::World;
use crate::camera::Camera;

/// A world together with the camera that views it.
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

/// Builds a scene from its description, rejecting degenerate input.
impl TryFrom<SceneJson> for Scene {
    type Error = anyhow::Error;

    fn try_from(scene_json: SceneJson) -> Result<Scene> {
        if scene_json.canvas_width == 0 || scene_json.canvas_height == 0 {
            bail!("Canvas must be at least 1x1, got {}x{}.",
                scene_json.canvas_width, scene_json.canvas_height);
        }

        let fov = scene_json.field_of_view;
        if !(fov > 0.0 && fov < 180.0) {
            bail!("Field of view must be between 0 and 180 degrees, got {}.", fov);
        }

        let from: Vec3 = scene_json.camera_from.into();
        let to: Vec3 = scene_json.camera_to.into();
        let up: Vec3 = scene_json.camera_up.into();
        if (to - from).cross(&up).length() == 0.0 {
            bail!("Camera direction must be non-zero and not parallel to up.");
        }

        // Create the camera.
        let camera = Camera::new(
            scene_json.canvas_width,
            scene_json.canvas_height,
            fov.to_radians(),
            from,
            to,
            up,
        );

        // Create the world.
        let mut world = World::empty();
        world.background = scene_json.background.into();

        world.lights = scene_json.lights.into_iter()
            .map(|l| PointLight::new(l.position.into(), l.color.into(), l.intensity))
            .collect();

        for (i, s) in scene_json.spheres.into_iter().enumerate() {
            if !(s.radius > 0.0 && s.radius.is_finite()) {
                bail!("Sphere {} has non-positive radius {}.", i, s.radius);
            }

            let material = Material::try_from(s.material)
                .with_context(|| format!("Invalid material on sphere {}.", i))?;
            world.spheres.push(Sphere::new(s.center.into(), s.radius, material));
        }

        for (i, p) in scene_json.planes.into_iter().enumerate() {
            let normal: Vec3 = p.normal.into();
            if normal.length() == 0.0 {
                bail!("Plane {} has a zero-length normal.", i);
            }

            let material = Material::try_from(p.material)
                .with_context(|| format!("Invalid material on plane {}.", i))?;
            world.planes.push(Plane::new(p.point.into(), normal, material));
        }

        debug!("Built scene with {} spheres, {} planes and {} lights.",
            world.spheres.len(), world.planes.len(), world.lights.len());

        Ok(Scene { world, camera })
    }
}

/// A serializable scene description.
///
/// Vectors are `[x, y, z]` arrays and colors `[r, g, b]` arrays of bytes.
/// The field of view is vertical and given in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneJson {
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub field_of_view: f32,

    pub camera_from: [f32; 3],
    pub camera_to: [f32; 3],
    pub camera_up: [f32; 3],

    #[serde(default = "default_background")]
    pub background: [u8; 3],

    #[serde(default)]
    pub lights: Vec<LightJson>,
    #[serde(default)]
    pub spheres: Vec<SphereJson>,
    #[serde(default)]
    pub planes: Vec<PlaneJson>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightJson {
    pub position: [f32; 3],
    pub color: [u8; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereJson {
    pub center: [f32; 3],
    pub radius: f32,
    #[serde(default)]
    pub material: MaterialJson,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneJson {
    pub point: [f32; 3],
    pub normal: [f32; 3],
    #[serde(default)]
    pub material: MaterialJson,
}

/// Material coefficients. Omitted fields take `Material::default()` values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialJson {
    pub color: [u8; 3],
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

fn default_background() -> [u8; 3] {
    World::empty().background.into()
}

fn default_intensity() -> f32 {
    1.0
}

impl Default for MaterialJson {
    fn default() -> MaterialJson {
        Material::default().into()
    }
}

impl From<Material> for MaterialJson {
    fn from(m: Material) -> MaterialJson {
        MaterialJson {
            color: m.color.into(),
            ambient: m.ambient,
            diffuse: m.diffuse,
            specular: m.specular,
            shininess: m.shininess,
        }
    }
}

impl TryFrom<MaterialJson> for Material {
    type Error = anyhow::Error;

    fn try_from(m: MaterialJson) -> Result<Material> {
        let coefficients = [m.ambient, m.diffuse, m.specular, m.shininess];
        if coefficients.iter().any(|c| !(*c >= 0.0)) {
            bail!("Material coefficients must be non-negative, got {:?}.",
                coefficients);
        }

        Ok(Material::new(m.color.into(), m.ambient, m.diffuse, m.specular,
            m.shininess))
    }
}

impl SceneJson {
    /// The built-in scene: five small spheres lit by one point light.
    pub fn fixed() -> SceneJson {
        let sphere = |center: [f32; 3], color: Color| SphereJson {
            center,
            radius: 0.5,
            material: Material::new(color, 0.2, 0.8, 0.3, 32.0).into(),
        };

        SceneJson {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            field_of_view: FIELD_OF_VIEW_DEGREES,

            camera_from: [0.0, 3.0, 8.0],
            camera_to: [0.0, 0.5, 0.0],
            camera_up: [0.0, 1.0, 0.0],

            background: [80, 90, 110],

            lights: vec![
                LightJson {
                    position: [3.0, 1.0, 3.0],
                    color: [255, 255, 230],
                    intensity: 1.0,
                },
            ],
            spheres: vec![
                sphere([-1.5, 1.0, 1.5], Color::rgb(255, 220, 200)),
                sphere([1.5, 0.0, 2.5], Color::rgb(200, 220, 255)),
                sphere([0.0, 0.5, 2.0], Color::rgb(220, 255, 200)),
                sphere([-0.8, 2.3, 1.5], Color::rgb(255, 180, 180)),
                sphere([0.8, 1.8, 2.0], Color::rgb(180, 255, 180)),
            ],
            planes: Vec::new(),
        }
    }

    /// Reads a scene description from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SceneJson> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open scene file {}.", path.display()))?;

        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse scene file {}.", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[test]
fn fixed_scene_matches_description() {
    let scene = Scene::try_from(SceneJson::fixed()).unwrap();

    assert_eq!(scene.world.spheres.len(), 5);
    assert!(scene.world.planes.is_empty());
    assert_eq!(scene.world.background, Color::rgb(80, 90, 110));

    assert_eq!(scene.world.lights, vec![
        PointLight::new(Vec3::new(3.0, 1.0, 3.0), Color::rgb(255, 255, 230), 1.0),
    ]);

    let third = &scene.world.spheres[2];
    assert_eq!(third.center, Vec3::new(0.0, 0.5, 2.0));
    assert_eq!(third.radius, 0.5);
    assert_eq!(third.material,
        Material::new(Color::rgb(220, 255, 200), 0.2, 0.8, 0.3, 32.0));

    assert_eq!(scene.camera.hsize, 800);
    assert_eq!(scene.camera.vsize, 600);
    assert_eq!(scene.camera.eye, Vec3::new(0.0, 3.0, 8.0));
    assert!((scene.camera.field_of_view - std::f32::consts::PI / 3.0).abs() < 1e-6);
}

#[test]
fn scene_json_survives_serialization() {
    let fixed = SceneJson::fixed();
    let text = fixed.to_json_pretty().unwrap();

    let parsed: SceneJson = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, fixed);
}

#[test]
fn scene_json_defaults() {
    let text = r#"{
        "canvas_width": 4,
        "canvas_height": 3,
        "field_of_view": 90.0,
        "camera_from": [0.0, 0.0, -5.0],
        "camera_to": [0.0, 0.0, 0.0],
        "camera_up": [0.0, 1.0, 0.0],
        "lights": [ { "position": [1.0, 2.0, 3.0], "color": [255, 255, 255] } ],
        "spheres": [ { "center": [0.0, 0.0, 0.0], "radius": 1.0,
                       "material": { "color": [10, 20, 30] } } ],
        "planes": [ { "point": [0.0, -1.0, 0.0], "normal": [0.0, 2.0, 0.0] } ]
    }"#;

    let scene_json: SceneJson = serde_json::from_str(text).unwrap();
    let scene = Scene::try_from(scene_json).unwrap();

    assert_eq!(scene.world.background, Color::rgb(80, 90, 110));
    assert_eq!(scene.world.lights[0].intensity, 1.0);
    assert_eq!(scene.world.spheres[0].material, Material {
        color: Color::rgb(10, 20, 30),
        ..Default::default()
    });
    assert_eq!(scene.world.planes[0].material, Material::default());
    assert_eq!(scene.world.planes[0].normal, Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn degenerate_scenes_are_rejected() {
    let mut bad_radius = SceneJson::fixed();
    bad_radius.spheres[1].radius = 0.0;
    assert!(Scene::try_from(bad_radius).is_err());

    let mut bad_size = SceneJson::fixed();
    bad_size.canvas_height = 0;
    assert!(Scene::try_from(bad_size).is_err());

    let mut bad_fov = SceneJson::fixed();
    bad_fov.field_of_view = 180.0;
    assert!(Scene::try_from(bad_fov).is_err());

    let mut bad_camera = SceneJson::fixed();
    bad_camera.camera_up = [0.0, -2.5, -8.0];
    assert!(Scene::try_from(bad_camera).is_err());

    let mut bad_plane = SceneJson::fixed();
    bad_plane.planes.push(PlaneJson {
        point: [0.0, 0.0, 0.0],
        normal: [0.0, 0.0, 0.0],
        material: Default::default(),
    });
    assert!(Scene::try_from(bad_plane).is_err());

    let mut bad_material = SceneJson::fixed();
    bad_material.spheres[0].material.diffuse = -0.5;
    assert!(Scene::try_from(bad_material).is_err());
}

#[test]
fn load_reports_missing_file() {
    let err = SceneJson::load("/nonexistent/shadow-tracer/scene.json")
        .unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to open scene file"));
}

#[test]
fn load_reads_scene_file() {
    let path = std::env::temp_dir()
        .join(format!("shadow-tracer-scene-{}.json", std::process::id()));
    std::fs::write(&path, SceneJson::fixed().to_json_pretty().unwrap()).unwrap();

    let loaded = SceneJson::load(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.unwrap(), SceneJson::fixed());
}
