pub mod cli;
pub mod error;
pub mod model;
pub mod parser;
pub mod processor;
pub mod syntax;
pub mod writer;

pub use error::FormatError;
pub use model::ScriptFile;
pub use syntax::{SyntaxLookup, SyntaxTable};

use anyhow::Context;
use clap::Parser;
use log::{LevelFilter, info};

/// Read one decoded script document against a syntax table.
pub fn read_script(bytes: &[u8], lookup: &dyn SyntaxLookup) -> Result<ScriptFile, FormatError> {
    let root = parser::load_from_xml(bytes)?;
    processor::run(&root, lookup)
}

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // 1. ── Load ───────────────────────────────────────────────────────
    let table_json = std::fs::read_to_string(&args.syntax)
        .with_context(|| format!("Reading {}", args.syntax.display()))?;
    let table = SyntaxTable::from_json(&table_json).with_context(|| "Parsing syntax table")?;
    info!("syntax table: {} commands", table.len());

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;

    // 2. ── Decode ─────────────────────────────────────────────────────
    let script = read_script(&bytes, &table)
        .with_context(|| format!("Decoding {}", args.input.display()))?;
    info!(
        "{}: {} variables, {} commands",
        script.name,
        script.variables.len(),
        script.commands.len()
    );

    // 3. ── Write outputs ──────────────────────────────────────────────
    if args.listing {
        print!("{}", writer::listing::render(&script));
    }
    if let Some(out) = &args.out {
        std::fs::create_dir_all(out).with_context(|| format!("Creating {}", out.display()))?;
        let json = writer::json::emit(&script, out).with_context(|| "Writing JSON dump")?;
        let listing = writer::listing::emit(&script, out).with_context(|| "Writing listing")?;
        info!("wrote {} and {}", json.display(), listing.display());
    }

    Ok(())
}
