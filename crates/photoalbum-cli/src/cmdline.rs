use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use photoalbum_core::decode::FilterType;

#[derive(Debug, Parser)]
#[command(
    name = "photoalbum",
    version,
    about = "Load photos for the collage editor"
)]
pub struct Args {
    /// Increase log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show an image's natural size, orientation and sample size
    Probe {
        /// Image file
        #[arg(value_names = ["FILE"])]
        file: PathBuf,

        #[command(flatten)]
        surface: Surface,
    },

    /// Decode an image upright for a display surface
    Decode {
        /// Image file
        #[arg(value_names = ["FILE"])]
        file: PathBuf,

        #[command(flatten)]
        surface: Surface,

        /// Contrast multiplier for R, G and B (1.0 = unchanged)
        #[arg(long, value_names = ["FLOAT"], default_value_t = 1.0)]
        contrast: f32,

        /// Brightness offset in 0-255 units (0 = unchanged)
        #[arg(long, value_names = ["FLOAT"], default_value_t = 0.0, allow_hyphen_values = true)]
        brightness: f32,

        /// Filter used when reducing by the sample size
        #[arg(long, value_enum, default_value_t = Filter::Bilinear)]
        filter: Filter,

        /// Write the decoded bitmap to this PNG file
        #[arg(short, long, value_names = ["PATH"])]
        output: Option<PathBuf>,
    },
}

/// Pixel size of the surface the image is destined for
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct Surface {
    /// Requested width in pixels
    #[arg(long, value_names = ["PIXELS"], default_value_t = 1080)]
    pub width: u32,

    /// Requested height in pixels
    #[arg(long, value_names = ["PIXELS"], default_value_t = 1920)]
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    Nearest,
    Bilinear,
    Lanczos3,
}

impl From<Filter> for FilterType {
    fn from(value: Filter) -> Self {
        match value {
            Filter::Nearest => FilterType::Nearest,
            Filter::Bilinear => FilterType::Bilinear,
            Filter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Args {
    /// stderrlog verbosity: 0 = errors only, 1 = warnings (default), up to 4 = trace
    pub fn verbosity(&self) -> usize {
        if self.quiet {
            0
        } else {
            (1 + usize::from(self.verbose)).min(4)
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        match self.verbosity() {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
