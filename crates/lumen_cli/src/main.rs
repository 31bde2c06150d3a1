use anyhow::{bail, Context, Result};
use lumen_scene::load_scene;
use std::path::PathBuf;
use std::time::Instant;

const USAGE: &str = "usage: lumen <scene.json> [output.png] [--single-threaded] [--no-bsp]";

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Options {
    scene: PathBuf,
    output: PathBuf,
    single_threaded: bool,
    no_bsp: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options> {
    let mut positional = Vec::new();
    let mut single_threaded = false;
    let mut no_bsp = false;

    for arg in args {
        match arg.as_str() {
            "--single-threaded" => single_threaded = true,
            "--no-bsp" => no_bsp = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            _ => positional.push(PathBuf::from(&arg)),
        }
    }

    let mut positional = positional.into_iter();
    let Some(scene) = positional.next() else {
        bail!("missing scene file\n{USAGE}");
    };
    let output = positional.next().unwrap_or_else(|| PathBuf::from("image.png"));
    if positional.next().is_some() {
        bail!("too many arguments\n{USAGE}");
    }

    Ok(Options {
        scene,
        output,
        single_threaded,
        no_bsp,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("Lumen {}", env!("CARGO_PKG_VERSION"));

    let options = parse_args(std::env::args().skip(1))?;

    let mut loaded = load_scene(&options.scene)
        .with_context(|| format!("Failed to load scene {}", options.scene.display()))?;

    if options.single_threaded {
        loaded.camera.settings.use_multithreading = false;
    }
    if options.no_bsp {
        loaded.scene.acceleration.use_bsp = false;
    }

    let settings = loaded.camera.settings;
    log::info!(
        "Rendering {}x{}, {}, BSP {}, {} reflections",
        loaded.image.width,
        loaded.image.height,
        if settings.use_multithreading {
            "multithreaded"
        } else {
            "single-threaded"
        },
        if loaded.scene.acceleration.use_bsp { "on" } else { "off" },
        settings.max_reflections
    );

    let start = Instant::now();
    loaded.camera.render(&mut loaded.image, &mut loaded.scene);
    let elapsed = start.elapsed().as_secs_f64();

    let pixels = loaded.image.pixels.len() as f64;
    log::info!(
        "Total time: {:.3} seconds ({:.0} pixels/s)",
        elapsed,
        if elapsed > 0.0 { pixels / elapsed } else { pixels }
    );

    loaded
        .image
        .write_file(&options.output)
        .with_context(|| format!("Failed to write {}", options.output.display()))?;
    log::info!("Wrote {}", options.output.display());

    Ok(())
}
