//! ibs-extract CLI entry point
//!
//! Decodes per-chromosome allele-frequency files into long-format TSV rows.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use ibs_extract::core::{DecodeMode, DecoderConfig, PathInputSet, RecordEmitter, LINE_COUNT_KEY, MODE_KEY};
use ibs_extract::formats;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Decoding mode (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum ModeArg {
    /// Emit genotype tokens verbatim
    #[default]
    #[value(name = "raw")]
    Raw,
    /// Emit allele indicators plus per-variant minor allele frequency
    #[value(name = "cov")]
    Cov,
}

impl From<ModeArg> for DecodeMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Raw => DecodeMode::Raw,
            ModeArg::Cov => DecodeMode::Coverage,
        }
    }
}

#[derive(Parser)]
#[command(name = "ibs-extract")]
#[command(about = "Decode allele-frequency matrices into (sample, position, value) rows")]
#[command(version)]
#[command(author = "ibs-extract Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode .af files into TSV rows
    Decode {
        /// Line-count manifest ("<file> <count>" per line)
        #[arg(short = 'l', long = "line-count")]
        line_count: PathBuf,
        /// Input files or directories, consumed in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output file (optional, stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Decoding mode
        #[arg(short = 'm', long, default_value = "raw")]
        mode: ModeArg,
    },
    /// Write the line-count manifest for per-chromosome matrices
    Count {
        /// Matrix files (chrN.merge.mat.tsv.gz)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output file (optional, stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
}

/// Expand directories into their regular files, sorted by name
fn expand_inputs(inputs: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .collect();
            files.sort();
            paths.extend(files);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

fn open_output(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    Ok(writer)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Decode { line_count, inputs, output, mode } => {
            let manifest = std::fs::read_to_string(&line_count)
                .with_context(|| format!("Failed to read line counts from {}", line_count.display()))?;

            let mut attrs = HashMap::new();
            attrs.insert(LINE_COUNT_KEY.to_string(), manifest);
            attrs.insert(MODE_KEY.to_string(), DecodeMode::from(mode).as_str().to_string());
            let config = DecoderConfig::from_attributes(&attrs)?;

            let paths = expand_inputs(&inputs)?;
            eprintln!("Decoding {} input files (mode: {})", paths.len(), config.mode.as_str());

            let mut emitter = RecordEmitter::new(PathInputSet::new(paths), config);
            let stats = formats::write_tsv(&mut emitter, open_output(output.as_deref())?)?;

            eprintln!("\n=== Extraction Statistics ===");
            eprintln!("Total rows:      {}", stats.total);
            eprintln!("Sample rows:     {}", stats.samples);
            eprintln!("Aggregate rows:  {}", stats.aggregates);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Count { files, output, threads } => {
            eprintln!("Counting lines in {} files", files.len());
            let entries = formats::build_manifest(&files, threads)?;
            formats::write_manifest(&entries, open_output(output.as_deref())?)?;

            let total: u64 = entries.iter().map(|e| e.count).sum();
            eprintln!("Total lines:     {}", total);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
