// Image parameters for the built-in scene
pub const CANVAS_WIDTH: usize = 800;
pub const CANVAS_HEIGHT: usize = 600;
pub const FIELD_OF_VIEW_DEGREES: f32 = 60.0;

// Output files
pub const OUT_FILE: &str = "rtcase2.ppm";
pub const MASK_OUT_FILE: &str = "rtcase2_shadowmask.ppm";

// Floating point comparisons
pub const FEQ_EPSILON: f32 = 0.0001;

// Smallest ray parameter accepted as a hit.
pub const HIT_EPSILON: f32 = 1e-3;

// Below this, a ray is considered parallel to a plane.
pub const PARALLEL_EPSILON: f32 = 1e-6;

// Offset of a shadow feeler's origin along the light direction.
pub const SHADOW_BIAS: f32 = 1e-4;

// Evaluation
pub const SHADOW_THRESHOLD: f32 = 0.30;

// Number of progress reports per render.
pub const PROGRESS_STEPS: usize = 10;
