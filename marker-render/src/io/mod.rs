use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use serde::{Deserialize, Serialize};
use ::svg::Document;

use crate::EPOCH;
use crate::config::MarkerRenderConfig;
use crate::io::ext_repr::{ExtLayerResult, ExtScene};

pub mod cli;
pub mod export;
pub mod ext_repr;
pub mod import;
pub mod svg;

/// Everything written to the JSON output: the input scene, the placed markers and the config used
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RenderOutput {
    #[serde(flatten)]
    pub scene: ExtScene,
    pub results: Vec<ExtLayerResult>,
    pub config: MarkerRenderConfig,
}

pub fn read_scene(path: &Path) -> Result<ExtScene> {
    let file = File::open(path).with_context(|| format!("could not open scene file: {path:?}"))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("could not parse scene file: {path:?}"))
}

pub fn read_config(path: &Path) -> Result<MarkerRenderConfig> {
    let file = File::open(path).with_context(|| format!("could not open config file: {path:?}"))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).context("incorrect config file format")
}

pub fn write_json(json: &impl Serialize, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("could not open output file: {path:?}"))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, json)
        .with_context(|| format!("could not write output file: {path:?}"))?;
    info!("[IO] json written to file://{}", canonical(path));
    Ok(())
}

pub fn write_svg(document: &Document, path: &Path) -> Result<()> {
    ::svg::save(path, document).with_context(|| format!("could not write svg file: {path:?}"))?;
    info!("[IO] svg written to file://{}", canonical(path));
    Ok(())
}

fn canonical(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                min,
                sec,
                thread_name,
            );

            out.finish(format_args!("{prefix:<27}{message}"))
        })
        // Add blanket level filter -
        .level(level_filter)
        .chain(std::io::stdout())
        .apply()?;
    info!("[IO] time: {}", jiff::Timestamp::now());
    Ok(())
}
