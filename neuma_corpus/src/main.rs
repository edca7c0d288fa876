// Neuma corpus analyzer: CLI entry point.
//
// Analyzes an exported transcription corpus (or reuses the cached analysis)
// and writes the viewer's data bundle.
//
// Usage:
//   cargo run -p neuma_corpus --bin analyze -- [--config neuma.json]
//     [--corpus DIR] [--cache FILE] [--output FILE] [--glyphs DIR]
//     [--manifest FILE] [--refresh] [--sequential]
//
// Logging is controlled by NEUMA_LOG (e.g. NEUMA_LOG=neuma_corpus=debug).

use clap::Parser;
use neuma_corpus::assets::{load_glyphs, load_manifests};
use neuma_corpus::logging::init_tracing;
use neuma_corpus::{CorpusConfig, build_export, load_or_analyze, write_export};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "analyze", about = "Extract neume patterns from a transcription corpus")]
struct Args {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Corpus root (one source directory or a directory of sources).
    #[arg(long)]
    corpus: Option<PathBuf>,
    #[arg(long)]
    cache: Option<PathBuf>,
    /// Where to write the viewer export.
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    glyphs: Option<PathBuf>,
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Ignore the cache and re-analyze the corpus.
    #[arg(long)]
    refresh: bool,
    /// Analyze sources one at a time.
    #[arg(long)]
    sequential: bool,
}

impl Args {
    fn apply(self, config: &mut CorpusConfig) {
        if let Some(p) = self.corpus {
            config.corpus_path = p;
        }
        if let Some(p) = self.cache {
            config.cache_file = p;
        }
        if let Some(p) = self.output {
            config.output_file = p;
        }
        if let Some(p) = self.glyphs {
            config.glyph_dir = p;
        }
        if let Some(p) = self.manifest {
            config.manifest_file = p;
        }
        if self.sequential {
            config.parallel = false;
        }
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();
    let refresh = args.refresh;

    let mut config = match &args.config {
        Some(path) => match CorpusConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => CorpusConfig::default(),
    };
    args.apply(&mut config);

    println!("=== Neuma Pattern Analysis ===");
    println!("Corpus: {}", config.corpus_path.display());
    println!("Output: {}", config.output_file.display());
    println!();

    println!("[1/3] Analyzing corpus...");
    let result = match load_or_analyze(&config, refresh) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("  Error: {e}");
            std::process::exit(1);
        }
    };
    println!(
        "  {} sources, {} occurrences.",
        result.source_count(),
        result.total_occurrences()
    );

    println!("[2/3] Loading glyphs and manifests...");
    let glyphs = load_glyphs(&config.glyph_dir);
    let manifests = load_manifests(&config.manifest_file);
    println!("  {} glyphs, {} manifests.", glyphs.len(), manifests.len());

    println!("[3/3] Writing export to {}...", config.output_file.display());
    let export = build_export(result, glyphs, manifests);
    if let Err(e) = write_export(&export, &config.output_file) {
        eprintln!("  Error: {e}");
        std::process::exit(1);
    }
    println!(
        "  {} distinct patterns, max {} occurrences per source.",
        export.stats.len(),
        export.overall_max
    );

    println!();
    for (name, table) in export.data.sources() {
        let occurrences: usize = table.values().map(Vec::len).sum();
        println!("{name}: {} patterns, {occurrences} occurrences", table.len());
    }
}
