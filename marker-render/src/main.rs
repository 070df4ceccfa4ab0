use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use itertools::Itertools;
use log::{info, warn};
use marker_render::config::MarkerRenderConfig;
use marker_render::io;
use marker_render::io::RenderOutput;
use marker_render::io::cli::Cli;
use marker_render::io::export::export_layer;
use marker_render::io::import::Importer;
use marker_render::io::svg::scene_to_svg;
use marker_render::render::render_scene;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let mut config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            MarkerRenderConfig::default()
        }
        Some(config_file) => io::read_config(&config_file)?,
    };
    config.svg_draw_options.draw_bboxes |= args.draw_bboxes;

    info!("[MAIN] Successfully parsed MarkerRenderConfig: {config:?}");

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no valid name")?
        .to_owned();

    if !args.output_folder.exists() {
        fs::create_dir_all(&args.output_folder).with_context(|| {
            format!("could not create output folder: {:?}", args.output_folder)
        })?;
    }

    let ext_scene = io::read_scene(&args.input_file)?;
    let importer = Importer::new(config.layer_defaults);
    let scene = importer.import_scene(&ext_scene)?;
    info!(
        "[MAIN] Imported scene {:?}: {} feature(s), {} layer(s)",
        ext_scene.name,
        scene.features.len(),
        scene.layers.len()
    );

    let placed = render_scene(&scene);

    {
        let output = RenderOutput {
            results: scene
                .layers
                .iter()
                .zip(&placed)
                .map(|(layer, markers)| export_layer(layer, &scene.features, markers))
                .collect_vec(),
            scene: ext_scene,
            config,
        };
        let json_path = args.output_folder.join(format!("markers_{input_stem}.json"));
        io::write_json(&output, Path::new(&json_path))?;
    }

    if config.write_svg {
        let svg_path = args.output_folder.join(format!("markers_{input_stem}.svg"));
        let svg = scene_to_svg(&scene, &placed, config.svg_draw_options);
        io::write_svg(&svg, Path::new(&svg_path))?;
    }

    Ok(())
}
