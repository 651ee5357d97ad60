//! Command line front end for the Photoalbum image core.
//!
//! Stands in for the application's UI layer: it hands a file path and a
//! display surface size to the core, and reports or dumps the result.

mod cmdline;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use photoalbum_core::decode::{
    calculate_in_sample_size, probe_bounds, BitmapDecoder, DecoderConfig,
};
use photoalbum_core::filter::filtered_copy;

use crate::cmdline::{Args, Command, Surface};

fn main() {
    let args = Args::parse();

    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .module("photoalbum_core")
        .verbosity(args.verbosity())
        .init()
    {
        eprintln!("Error: {e}");
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = DecoderConfig {
        log_level: args.level_filter(),
        ..Default::default()
    };

    match args.command {
        Command::Probe { file, surface } => cmd_probe(&file, surface),
        Command::Decode {
            file,
            surface,
            contrast,
            brightness,
            filter,
            output,
        } => cmd_decode(
            &file,
            surface,
            contrast,
            brightness,
            DecoderConfig {
                resize_filter: filter.into(),
                ..config
            },
            output.as_deref(),
        ),
    }
}

fn cmd_probe(file: &Path, surface: Surface) -> Result<()> {
    let bounds = probe_bounds(file)?;
    let measured = bounds.oriented_dimensions();
    let sample = calculate_in_sample_size(
        measured.width,
        measured.height,
        surface.width,
        surface.height,
    );

    println!("File: {}", file.display());
    println!(
        "Natural size: {}x{}",
        bounds.dimensions.width, bounds.dimensions.height
    );
    println!("Orientation: {:?}", bounds.orientation);
    println!(
        "Sample size for {}x{}: {}",
        surface.width,
        surface.height,
        sample.get()
    );
    Ok(())
}

fn cmd_decode(
    file: &Path,
    surface: Surface,
    contrast: f32,
    brightness: f32,
    config: DecoderConfig,
    output: Option<&Path>,
) -> Result<()> {
    let decoder = BitmapDecoder::new(config);
    let bitmap = decoder
        .try_decode_sampled_bitmap(file, surface.width, surface.height)
        .with_context(|| format!("image could not be loaded: {}", file.display()))?;

    let bitmap = if contrast != 1.0 || brightness != 0.0 {
        info!("applying contrast {contrast}, brightness {brightness}");
        filtered_copy(&bitmap, contrast, brightness)
    } else {
        bitmap
    };

    println!("Decoded {}x{}", bitmap.width, bitmap.height);

    if let Some(output) = output {
        let image = bitmap
            .into_rgba_image()
            .ok_or_else(|| anyhow!("bitmap buffer does not match its dimensions"))?;
        image
            .save_with_format(output, image::ImageFormat::Png)
            .with_context(|| format!("writing {}", output.display()))?;
        println!("Wrote {}", output.display());
    }
    Ok(())
}
