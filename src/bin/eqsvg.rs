//! Command-line interface for eqsvg
//! This binary parses equation documents, exports round-trip SVG (or PNG) artifacts and
//! imports artifacts back into document text.
//!
//! Usage:
//!   eqsvg parse `<path>` [--format json|summary]      - Show the parse result
//!   eqsvg labels `<path>`                             - List equation labels and line ranges
//!   eqsvg export `<path>` [--out-dir `<dir>`] [--format svg|png] [--inline]
//!                                                     - Render and export every equation
//!   eqsvg import `<path>`                             - Print the document held by an artifact or project
//!
//! Global options:
//!   --config `<file>`        Layer a TOML configuration file over the defaults
//!   --color-mode css|native  Override the color resolution mode
//!
//! Configuration layers, lowest to highest: built-in defaults, `./eqsvg.toml` when it
//! exists, the `--config` file, then `--color-mode`.
//!
//! Logging is controlled by RUST_LOG (default: warn).

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use eqsvg::eqsvg::color::ColorMode;
use eqsvg::eqsvg::document::{DisplayMode, ParsedDocument};
use eqsvg::eqsvg::export::{export_equation, ExportFormat};
use eqsvg::eqsvg::loader::DocumentLoader;
use eqsvg::eqsvg::raster::RasterOptions;
use eqsvg::eqsvg::render::{render_document, CommandEngine, RenderEvent};
use eqsvg_config::{EqsvgConfig, Loader, PROJECT_CONFIG_FILE};

fn cli() -> Command {
    let path_arg = || {
        Arg::new("path")
            .help("Path to a document, .svg artifact or .json project")
            .required(true)
            .index(1)
    };

    Command::new("eqsvg")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Edit LaTeX equation documents and export self-describing SVG")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("color-mode")
                .long("color-mode")
                .global(true)
                .value_parser(["css", "native"])
                .help("Color resolution mode"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a document and print the result")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["json", "summary"])
                        .default_value("summary"),
                ),
        )
        .subcommand(
            Command::new("labels")
                .about("List equation labels with their line ranges")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("export")
                .about("Render every equation and write one artifact per equation")
                .arg(path_arg())
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .short('o')
                        .help("Output directory (default from configuration)"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["svg", "png"])
                        .default_value("svg"),
                )
                .arg(
                    Arg::new("inline")
                        .long("inline")
                        .help("Typeset in inline mode instead of block mode")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Print the document text held by an artifact or project")
                .arg(path_arg()),
        )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches);
    let loader = DocumentLoader::with_mode(ColorMode::from(config.color.mode));

    match matches.subcommand() {
        Some(("parse", sub)) => handle_parse_command(&loader, path(sub), format(sub)),
        Some(("labels", sub)) => handle_labels_command(&loader, path(sub)),
        Some(("export", sub)) => handle_export_command(&loader, &config, sub).await,
        Some(("import", sub)) => handle_import_command(&loader, path(sub)),
        _ => unreachable!(),
    }
}

fn path(matches: &ArgMatches) -> &Path {
    Path::new(
        matches
            .get_one::<String>("path")
            .expect("path is a required argument"),
    )
}

fn format(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("format")
        .expect("format has a default value")
}

fn load_config(matches: &ArgMatches) -> EqsvgConfig {
    let mut loader = Loader::new().with_optional_file(PROJECT_CONFIG_FILE);
    if let Some(file) = matches.get_one::<String>("config") {
        loader = loader.with_file(file);
    }
    if let Some(mode) = matches.get_one::<String>("color-mode") {
        loader = loader
            .set_override("color.mode", mode.as_str())
            .unwrap_or_else(|e| fail(&format!("Invalid color mode: {}", e)));
    }
    loader
        .build()
        .unwrap_or_else(|e| fail(&format!("Configuration error: {}", e)))
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn load(loader: &DocumentLoader, path: &Path) -> ParsedDocument {
    loader
        .load_and_parse(path, &[])
        .unwrap_or_else(|e| fail(&e.to_string()))
}

/// Handle the parse command
fn handle_parse_command(loader: &DocumentLoader, path: &Path, format: &str) {
    let doc = load(loader, path);
    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&doc)
                .unwrap_or_else(|e| fail(&format!("Error formatting document: {}", e)));
            println!("{}", json);
        }
        _ => {
            if let Some(color) = &doc.frontmatter.color {
                println!("color: {}", color);
            }
            for (name, value) in &doc.frontmatter.presets {
                println!("define.{}: {}", name, value);
            }
            for equation in &doc.equations {
                println!();
                println!("[{}] {}", equation.label, equation.id);
                if let Some(color) = &equation.color {
                    println!("  color: {}", color);
                }
                for line in equation.latex.lines() {
                    println!("  {}", line);
                }
            }
        }
    }
}

/// Handle the labels command
fn handle_labels_command(loader: &DocumentLoader, path: &Path) {
    let doc = load(loader, path);
    for equation in &doc.equations {
        println!(
            "{}\t{}-{}",
            equation.label,
            equation.start_line + 1,
            equation.end_line + 1
        );
    }
}

/// Handle the import command
fn handle_import_command(loader: &DocumentLoader, path: &Path) {
    let text = loader
        .load_text(path)
        .unwrap_or_else(|e| fail(&e.to_string()));
    print!("{}", text);
}

/// Handle the export command
async fn handle_export_command(loader: &DocumentLoader, config: &EqsvgConfig, matches: &ArgMatches) {
    let mut doc = load(loader, path(matches));
    let export_format = ExportFormat::parse(format(matches)).unwrap_or_default();
    let display_mode = if matches.get_flag("inline") {
        DisplayMode::Inline
    } else {
        DisplayMode::from(config.render.display_mode)
    };
    let out_dir = matches
        .get_one::<String>("out-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.export.output_dir.clone());

    let engine = CommandEngine::from_config(&config.engine);
    let mut failures = 0;
    for event in render_document(engine, &doc, display_mode).await {
        match event {
            RenderEvent::Rendered { id, svg, .. } => {
                doc.apply_render(&id, svg);
            }
            RenderEvent::Failed { id, error, .. } => {
                let label = doc.find(&id).map(|eq| eq.label.as_str()).unwrap_or("?");
                eprintln!("{}: {}", label, error);
                failures += 1;
            }
        }
    }

    fs::create_dir_all(&out_dir).unwrap_or_else(|e| {
        fail(&format!("Cannot create {}: {}", out_dir.display(), e))
    });

    let raster = RasterOptions {
        pixel_density: config.export.pixel_density,
    };
    for equation in doc.equations.iter().filter(|eq| eq.rendered_svg.is_some()) {
        match export_equation(equation, display_mode, export_format, raster) {
            Ok(artifact) => {
                let target = out_dir.join(&artifact.file_name);
                if let Err(e) = fs::write(&target, &artifact.bytes) {
                    eprintln!("{}: cannot write {}: {}", equation.label, target.display(), e);
                    failures += 1;
                } else {
                    println!("{}", target.display());
                }
            }
            Err(e) => {
                eprintln!("{}: {}", equation.label, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        process::exit(1);
    }
}
