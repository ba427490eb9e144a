//! Scrawl CLI: inspect and maintain the scrawls stored in a document file.
//!
//! The document is the MessagePack file written by [`Document::write`].

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use scrawl_core::seed::seed_layer;
use scrawl_core::{CanvasStore, Document, Layer, LayerId, Master, PEN_RATIO_PARAMETER, ScrawlConfig};
use scrawl_editor::export_layer;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SEED_COUNT: usize = 2000;
const DEFAULT_DESCENDER: f64 = -200.0;
const MASTER_ID: &str = "master";

/// Scrawl: freehand pixel sketches behind glyph outlines
#[derive(Parser)]
#[command(name = "scrawl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file overriding pixel size, pen size, and overlay opacity
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a document with one master and one layer per glyph
    New {
        document: PathBuf,

        /// Units per em
        #[arg(long, default_value_t = 1000.0)]
        unit_size: f64,

        /// Master descender, in outline units
        #[arg(long, default_value_t = DEFAULT_DESCENDER, allow_negative_numbers = true)]
        descender: f64,

        /// Vertical pixel ratio stored on the master
        #[arg(long)]
        pen_ratio: Option<f64>,

        /// Glyph as NAME=ADVANCE; the layer id is the glyph name
        #[arg(short, long = "glyph", value_parser = parse_glyph, required = true)]
        glyphs: Vec<(String, f64)>,
    },

    /// List layers and their scrawls
    Info { document: PathBuf },

    /// Remove the scrawl from one or more layers
    Delete {
        document: PathBuf,

        #[arg(required = true)]
        layers: Vec<String>,
    },

    /// Write a layer's scrawl as a PNG beside the document and use it as the
    /// layer's background image
    Export { document: PathBuf, layer: String },

    /// Scatter random one-pixel dots over a layer's scrawl
    Seed {
        document: PathBuf,
        layer: String,

        /// Number of dots
        #[arg(short = 'n', long, default_value_t = DEFAULT_SEED_COUNT)]
        count: usize,

        /// Random seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    run(cli)
}

/// Initialize logging based on verbosity flag. `RUST_LOG` still applies.
fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ScrawlConfig::default(),
    };

    match cli.command {
        Commands::New {
            document,
            unit_size,
            descender,
            pen_ratio,
            glyphs,
        } => {
            let mut doc = new_document(unit_size, descender, pen_ratio, &glyphs);
            doc.write(&document)
                .with_context(|| format!("Failed to write {}", document.display()))?;
            log::info!("created {} with {} layers", document.display(), glyphs.len());
        }

        Commands::Info { document } => {
            let doc = open(&document)?;
            for line in describe(&doc) {
                println!("{line}");
            }
        }

        Commands::Delete { document, layers } => {
            let mut doc = open(&document)?;
            for name in &layers {
                let id = layer_id(&doc, name)?;
                CanvasStore::delete(&mut doc, id);
            }
            doc.save().context("Failed to save document")?;
            log::info!("deleted scrawl on {} layers", layers.len());
        }

        Commands::Export { document, layer } => {
            let mut doc = open(&document)?;
            let id = layer_id(&doc, &layer)?;
            let path = export_layer(&mut doc, id)
                .with_context(|| format!("Failed to export layer {layer:?}"))?;
            doc.save().context("Failed to save document")?;
            println!("{}", path.display());
        }

        Commands::Seed {
            document,
            layer,
            count,
            seed,
        } => {
            let mut doc = open(&document)?;
            let id = layer_id(&doc, &layer)?;
            let Some(painted) = seed_layer(&mut doc, id, count, seed, &config)? else {
                bail!("layer {layer:?} has no metrics");
            };
            doc.save().context("Failed to save document")?;
            log::info!("painted {painted} dots on layer {layer}");
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<ScrawlConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ScrawlConfig = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))
}

fn open(path: &Path) -> Result<Document> {
    Document::read(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn layer_id(doc: &Document, name: &str) -> Result<LayerId> {
    LayerId::get(name)
        .filter(|id| doc.layer(*id).is_some())
        .with_context(|| format!("No layer {name:?} in document"))
}

/// Parse `NAME=ADVANCE`.
fn parse_glyph(arg: &str) -> Result<(String, f64), String> {
    let (name, width) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=ADVANCE, got {arg:?}"))?;
    if name.is_empty() {
        return Err("glyph name is empty".to_string());
    }
    let width: f64 = width
        .parse()
        .map_err(|e| format!("invalid advance {width:?}: {e}"))?;
    Ok((name.to_string(), width))
}

fn new_document(
    unit_size: f64,
    descender: f64,
    pen_ratio: Option<f64>,
    glyphs: &[(String, f64)],
) -> Document {
    let mut master = Master::new(MASTER_ID, descender);
    if let Some(ratio) = pen_ratio {
        master
            .custom_parameters
            .insert(PEN_RATIO_PARAMETER.to_string(), ratio.to_string());
    }
    let mut doc = Document::new(unit_size);
    doc.add_master(master);
    for (name, width) in glyphs {
        doc.add_layer(Layer::new(name, name, MASTER_ID, *width));
    }
    doc
}

/// One line per layer.
fn describe(doc: &Document) -> Vec<String> {
    doc.layers
        .iter()
        .map(|layer| {
            let id = layer.id;
            let head = format!("{id}\tglyph {}", layer.glyph);
            match CanvasStore::load(doc, id, doc.pixel_ratio(id)) {
                Some(record) => {
                    let (w, h) = record.bitmap.dimensions();
                    let r = record.rect;
                    format!(
                        "{head}\t{w}x{h} px\trect ({}, {}, {}, {})\tunit {}\tpen {}\tink {:.1}%",
                        r.x,
                        r.y,
                        r.width,
                        r.height,
                        record.pixel_size,
                        record.pen_size,
                        record.bitmap.ink_coverage() * 100.0
                    )
                }
                None if CanvasStore::has_record(doc, id) => format!("{head}\tunreadable scrawl"),
                None => format!("{head}\tno scrawl"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run_args(args: &[&str]) -> Result<()> {
        run(Cli::try_parse_from(std::iter::once("scrawl").chain(args.iter().copied()))?)
    }

    #[test]
    fn glyph_argument_parsing() {
        assert_eq!(parse_glyph("a=600"), Ok(("a".to_string(), 600.0)));
        assert!(parse_glyph("a").is_err());
        assert!(parse_glyph("=600").is_err());
        assert!(parse_glyph("a=wide").is_err());
    }

    #[test]
    fn new_seed_info_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.scrawl");
        let doc = path.to_str().unwrap();

        run_args(&["new", doc, "-g", "cli-a=600", "-g", "cli-b=500"]).unwrap();
        run_args(&["seed", doc, "cli-a", "-n", "40", "--seed", "3"]).unwrap();

        let lines = describe(&Document::read(&path).unwrap());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("cli-a\tglyph cli-a\t160x140 px"));
        assert_eq!(lines[1], "cli-b\tglyph cli-b\tno scrawl");

        run_args(&["delete", doc, "cli-a"]).unwrap();
        let lines = describe(&Document::read(&path).unwrap());
        assert_eq!(lines[0], "cli-a\tglyph cli-a\tno scrawl");
    }

    #[test]
    fn export_writes_background_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Sans.scrawl");
        let doc = path.to_str().unwrap();

        run_args(&["new", doc, "-g", "cli-x=600"]).unwrap();
        assert!(run_args(&["export", doc, "cli-x"]).is_err());

        run_args(&["seed", doc, "cli-x", "-n", "5"]).unwrap();
        run_args(&["export", doc, "cli-x"]).unwrap();
        let png = dir.path().join("Sans-cli-x-cli-x.png");
        assert!(png.exists());
        let reread = Document::read(&path).unwrap();
        let layer = reread.layer(LayerId::intern("cli-x")).unwrap();
        assert_eq!(layer.background_image.as_ref().map(|b| &b.path), Some(&png));
    }

    #[test]
    fn unknown_layer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.scrawl");
        let doc = path.to_str().unwrap();
        run_args(&["new", doc, "-g", "cli-y=600"]).unwrap();
        let err = run_args(&["delete", doc, "nope"]).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn pen_ratio_is_stored_on_master() {
        let doc = new_document(1000.0, -250.0, Some(2.0), &[("cli-r".to_string(), 500.0)]);
        let id = LayerId::intern("cli-r");
        assert_eq!(doc.pixel_ratio(id), 2.0);
        assert_eq!(doc.metrics(id).unwrap().descender, Some(-250.0));
    }

    #[test]
    fn config_with_non_positive_pixel_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.scrawl");
        let doc = path.to_str().unwrap();
        run_args(&["new", doc, "-g", "cli-z=600"]).unwrap();

        for pixel_size in ["0", "-10"] {
            let config = dir.path().join("bad.json");
            fs::write(&config, format!(r#"{{ "pixel_size": {pixel_size} }}"#)).unwrap();
            let err = load_config(&config).unwrap_err();
            assert!(format!("{err:#}").contains("pixel_size"));

            let config = config.to_str().unwrap();
            assert!(run_args(&["--config", config, "seed", doc, "cli-z", "-n", "3"]).is_err());
        }
        let lines = describe(&Document::read(&path).unwrap());
        assert_eq!(lines, vec!["cli-z\tglyph cli-z\tno scrawl".to_string()]);
    }

    #[test]
    fn config_file_overrides_pixel_size() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("scrawl.json");
        fs::write(&config, r#"{ "pixel_size": 20.0 }"#).unwrap();
        let loaded = load_config(&config).unwrap();
        assert_eq!(loaded.pixel_size, 20.0);
        assert_eq!(loaded.pen_pixels, ScrawlConfig::default().pen_pixels);
    }
}
