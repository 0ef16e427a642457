use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use umbra_core::{load_description, IntegratorKind, SamplerConfig, TextureCache};
use umbra_renderer::{build_scene, make_sampler, RenderContext, Worker, DEFAULT_BLOCK_SIZE};

/// Render a JSON scene description to a PNG image.
#[derive(Parser, Debug)]
#[command(name = "umbra", version)]
struct Args {
    /// Scene description file
    scene: PathBuf,

    /// Output image
    #[arg(short, long, default_value = "out.png")]
    output: PathBuf,

    /// Worker threads (0 uses every core)
    #[arg(short = 'j', long = "threads", default_value_t = 0)]
    threads: usize,

    /// Rows per render block
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: u32,

    /// Samples per pixel; switches to the random sampler
    #[arg(long)]
    spp: Option<u32>,

    /// Random sampler seed; switches to the random sampler
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scene's integrator
    #[arg(long, value_enum)]
    integrator: Option<IntegratorArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IntegratorArg {
    Direct,
    Path,
}

impl From<IntegratorArg> for IntegratorKind {
    fn from(arg: IntegratorArg) -> Self {
        match arg {
            IntegratorArg::Direct => IntegratorKind::Direct,
            IntegratorArg::Path => IntegratorKind::Path,
        }
    }
}

/// Apply `--spp` and `--seed` on top of the scene's sampler.
fn sampler_config(scene: SamplerConfig, spp: Option<u32>, seed: Option<u64>) -> SamplerConfig {
    if spp.is_none() && seed.is_none() {
        return scene;
    }
    let scene_seed = match scene {
        SamplerConfig::Random { seed, .. } => seed,
        SamplerConfig::Deterministic => 0,
    };
    SamplerConfig::Random {
        samples_per_pixel: spp.unwrap_or(scene.samples_per_pixel()),
        seed: seed.unwrap_or(scene_seed),
    }
}

fn run(args: &Args) -> Result<()> {
    let mut description = load_description(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    if let Some(integrator) = args.integrator {
        description.render_options.integrator = integrator.into();
    }
    description.sampler = sampler_config(description.sampler, args.spp, args.seed);
    description.sampler.validate().context("Invalid sampler settings")?;

    // Image texture paths are relative to the scene file
    let base_dir = args.scene.parent().map(PathBuf::from).unwrap_or_default();
    let mut textures = TextureCache::with_base_dir(base_dir);
    let scene = build_scene(&description, &mut textures).context("Failed to build scene")?;

    let options = description.render_options.clone();
    let context = RenderContext::new(scene, options).context("Invalid render options")?;
    let sampler = make_sampler(&description.sampler);

    log::info!(
        "Rendering {} at {}x{}, {:?} integrator, {} spp",
        args.scene.display(),
        description.render_options.width,
        description.render_options.height,
        description.render_options.integrator,
        sampler.samples_per_pixel()
    );

    // Report every tenth of the image
    let reported = AtomicU32::new(0);
    let progress = |done: u32, height: u32| {
        let tenth = done * 10 / height.max(1);
        if reported.fetch_max(tenth, Ordering::Relaxed) < tenth {
            log::info!("{}% ({done}/{height} rows)", tenth * 10);
        }
    };

    let start = Instant::now();
    let image = Worker::new(&context, args.block_size)?
        .with_threads(args.threads)
        .with_progress(&progress)
        .run(sampler.as_ref())?;
    log::info!("Render finished in {:.2?}", start.elapsed());

    image::save_buffer(
        &args.output,
        image.as_bytes(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Wrote {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_overrides() {
        let scene = SamplerConfig::Deterministic;
        assert_eq!(sampler_config(scene, None, None), scene);
        assert_eq!(
            sampler_config(scene, Some(8), None),
            SamplerConfig::Random {
                samples_per_pixel: 8,
                seed: 0
            }
        );

        let random = SamplerConfig::Random {
            samples_per_pixel: 4,
            seed: 9,
        };
        assert_eq!(
            sampler_config(random, None, Some(2)),
            SamplerConfig::Random {
                samples_per_pixel: 4,
                seed: 2
            }
        );
    }

    #[test]
    fn test_parse_arguments() {
        let args = Args::try_parse_from(["umbra", "scene.json", "-j", "3", "--integrator", "direct"]).unwrap();
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.threads, 3);
        assert_eq!(args.block_size, DEFAULT_BLOCK_SIZE);
        assert!(matches!(args.integrator, Some(IntegratorArg::Direct)));
    }
}
