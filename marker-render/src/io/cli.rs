use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Places the marker symbols of a JSON scene and writes the result as JSON (and SVG)
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Scene with canvas, features and symbol layers
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,
    #[arg(short, long, value_name = "FOLDER")]
    pub output_folder: PathBuf,
    /// Render configuration, defaults are used when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    /// Outline the bounding box of every placed marker in the SVG
    #[arg(long)]
    pub draw_bboxes: bool,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
}
