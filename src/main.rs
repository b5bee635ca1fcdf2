use std::convert::TryFrom;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{ Context, Result };
use clap::Parser;
use log::info;

use shadow_tracer::consts::{ OUT_FILE, MASK_OUT_FILE, SHADOW_THRESHOLD };
use shadow_tracer::camera::RenderOutput;
use shadow_tracer::eval::evaluate_image;
use shadow_tracer::parallel::parallel_render;
use shadow_tracer::scene::{ Scene, SceneJson };

/// Renders a small sphere scene with hard shadows, writes the image and its
/// shadow mask as PPM files, and reports shadow coverage.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Opt {
    /// JSON scene description to render instead of the built-in scene.
    #[clap(long)]
    scene: Option<PathBuf>,

    /// Print the built-in scene description as JSON and exit.
    #[clap(long)]
    dump_scene: bool,

    /// Path of the shaded image.
    #[clap(long, default_value = OUT_FILE)]
    output: PathBuf,

    /// Path of the shadow mask image.
    #[clap(long, default_value = MASK_OUT_FILE)]
    mask_output: PathBuf,

    /// Brightness below which a pixel counts as shadow.
    #[clap(long, default_value_t = SHADOW_THRESHOLD)]
    threshold: f32,

    /// Number of render threads. One renders on the main thread.
    #[clap(long, default_value_t = 1)]
    threads: usize,

    /// Also print the metrics as JSON.
    #[clap(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let opts = Opt::parse();

    if opts.dump_scene {
        println!("{}", SceneJson::fixed().to_json_pretty()?);
        return Ok(());
    }

    let scene_json = match opts.scene {
        Some(ref path) => SceneJson::load(path)?,
        None => SceneJson::fixed(),
    };
    let scene = Scene::try_from(scene_json).context("Invalid scene.")?;

    let (width, height) = (scene.camera.hsize, scene.camera.vsize);
    info!("Image: {} x {}", width, height);

    let start = Instant::now();
    let output: RenderOutput = if opts.threads > 1 {
        parallel_render(&scene.world, &scene.camera, opts.threads)?
    } else {
        scene.camera.render(&scene.world)
    };
    let elapsed = start.elapsed();

    output.image.save(&opts.output)
        .with_context(|| format!("Failed to write {}.", opts.output.display()))?;
    info!("Saved: {}", opts.output.display());

    output.mask.save(&opts.mask_output)
        .with_context(|| format!("Failed to write {}.", opts.mask_output.display()))?;
    info!("Saved: {}", opts.mask_output.display());

    let metrics = evaluate_image(&output.image, opts.threshold)
        .with_render_time(elapsed, width * height);

    println!("\n{}", metrics);
    if opts.json {
        println!("{}", serde_json::to_string(&metrics)?);
    }

    Ok(())
}
