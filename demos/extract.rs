//! Command-line driver for sky_colors
//!
//! Runs the extraction pipeline on a capture file and prints the result,
//! optionally dumping diagnostic images for auditing a deployment.

use sky_colors::render::{annotate_region, render_palette, render_swatch};
use sky_colors::{
    constants::render as render_dims, extract_sky_color_with_diagnostics, image_loader,
    PipelineConfig,
};
use std::{
    env,
    path::{Path, PathBuf},
    process,
};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();
}

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut diagnostics_dir: Option<PathBuf> = None;
    let mut json_output = false;
    let mut image_path_arg: Option<String> = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    process::exit(1);
                }
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--diagnostics" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --diagnostics requires a directory");
                    process::exit(1);
                }
                diagnostics_dir = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--json" => json_output = true,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image_path_arg.is_none() {
                    image_path_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let image_path_str = match image_path_arg {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };
    let image_path = Path::new(&image_path_str);

    let config = match config_path {
        Some(path) => match PipelineConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    let image = match image_loader::load_image(image_path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            process::exit(1);
        }
    };

    let (result, diagnostics) = match extract_sky_color_with_diagnostics(&image, &config) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            if e.is_retryable() {
                eprintln!("A later capture may succeed.");
            }
            process::exit(1);
        }
    };

    if json_output {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing result: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Dominant sky color: {} (RGB {:?})", result.hex, result.rgb);
        println!("Average sky color:  {} (RGB {:?})", result.average_hex, result.average_rgb);
        println!(
            "Derived from {} samples, {} clusters, {} iterations{}",
            result.sample_count,
            diagnostics.clustering.clusters.len(),
            result.iterations,
            if result.converged { "" } else { " (hit iteration cap)" }
        );
    }

    if let Some(dir) = diagnostics_dir {
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Error creating '{}': {}", dir.display(), e);
            process::exit(1);
        }

        let swatch =
            render_swatch(result.rgb, render_dims::SWATCH_WIDTH, render_dims::SWATCH_HEIGHT);
        let palette = render_palette(
            &diagnostics.clustering,
            render_dims::PALETTE_WIDTH,
            render_dims::PALETTE_HEIGHT,
        );
        let annotated = annotate_region(&image, &diagnostics.region);

        for (name, artifact) in [
            ("swatch.png", swatch),
            ("palette.png", palette),
            ("annotated.png", annotated),
        ] {
            let path = dir.join(name);
            if let Err(e) = artifact.save(&path) {
                eprintln!("Error writing '{}': {}", path.display(), e);
                process::exit(1);
            }
            println!("Wrote {}", path.display());
        }
    }
}

fn print_help(program: &str) {
    println!("Usage: {} [OPTIONS] <image>", program);
    println!();
    println!("Extract the dominant sky color from a webcam capture.");
    println!();
    println!("Options:");
    println!("  --config <file>       Pipeline configuration JSON (defaults otherwise)");
    println!("  --json                Print the full result as JSON");
    println!("  --diagnostics <dir>   Write swatch/palette/annotated images");
    println!("  -h, --help            Show this help");
}
