mod settings;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use record_parser::{
    extract_company, extract_job, CompanyIntelligenceRecord, Extraction, JobPostingRecord,
};
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "record_parser",
    about = "Turn LLM-written job postings and company reports into JSON records"
)]
struct Cli {
    /// Pretty-print JSON (single-record commands)
    #[arg(long, global = true)]
    pretty: bool,
    /// Emit {record, notices} instead of the bare record
    #[arg(long, global = true)]
    notices: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform one job posting
    Job {
        /// Posting text file, or - for stdin
        input: PathBuf,
        /// URL the posting was found at
        #[arg(long)]
        url: String,
        /// Site or board the posting came from
        #[arg(long)]
        site: String,
    },
    /// Transform one company-intelligence report
    Company {
        /// Report text file, or - for stdin
        input: PathBuf,
        /// URL visited while researching (repeatable, in order)
        #[arg(long = "visited")]
        visited: Vec<String>,
    },
    /// Transform a JSONL file of tagged jobs and reports
    Batch {
        /// Input JSONL, or - for stdin
        input: PathBuf,
        /// Output JSONL (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// One line of batch input.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum BatchItem {
    Job {
        text: String,
        #[serde(default)]
        job_url: String,
        #[serde(default)]
        source_site: String,
    },
    Company {
        text: String,
        #[serde(default)]
        visited_urls: Vec<String>,
    },
}

enum Transformed {
    Job(Extraction<JobPostingRecord>),
    Company(Extraction<CompanyIntelligenceRecord>),
}

impl Transformed {
    fn from_item(item: &BatchItem) -> Self {
        match item {
            BatchItem::Job {
                text,
                job_url,
                source_site,
            } => Self::Job(extract_job(text, job_url, source_site)),
            BatchItem::Company { text, visited_urls } => {
                Self::Company(extract_company(text, visited_urls))
            }
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            Self::Job(ex) => ex.is_complete(),
            Self::Company(ex) => ex.is_complete(),
        }
    }

    fn to_json(&self, include_notices: bool) -> serde_json::Result<Value> {
        match self {
            Self::Job(ex) => render(ex, include_notices),
            Self::Company(ex) => render(ex, include_notices),
        }
    }
}

fn render<R: Serialize>(ex: &Extraction<R>, include_notices: bool) -> serde_json::Result<Value> {
    if include_notices {
        serde_json::to_value(ex)
    } else {
        serde_json::to_value(&ex.record)
    }
}

fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let loaded = Settings::load();
    let mut settings = loaded.as_ref().cloned().unwrap_or_default();
    init_tracing(&settings.log_level);
    if let Err(e) = &loaded {
        warn!(error = %e, "ignoring invalid settings, using defaults");
    }

    let cli = Cli::parse();
    settings.pretty |= cli.pretty;
    settings.include_notices |= cli.notices;

    match cli.command {
        Commands::Job { input, url, site } => {
            let text = read_input(&input)?;
            let ex = extract_job(&text, &url, &site);
            print_json(&render(&ex, settings.include_notices)?, settings.pretty)
        }
        Commands::Company { input, visited } => {
            let text = read_input(&input)?;
            let ex = extract_company(&text, &visited);
            print_json(&render(&ex, settings.include_notices)?, settings.pretty)
        }
        Commands::Batch { input, output } => {
            let t0 = Instant::now();
            let counts = run_batch(&input, output.as_deref(), &settings)?;
            eprintln!(
                "Wrote {} records ({} incomplete), skipped {} lines.",
                counts.records, counts.incomplete, counts.skipped
            );
            let elapsed = t0.elapsed();
            if elapsed.as_secs() >= 1 {
                eprintln!("Done in {}", format_duration(elapsed));
            }
            Ok(())
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    let mut text = String::new();
    if path == Path::new("-") {
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
    } else {
        text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
    }
    Ok(text)
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

#[derive(Debug, Default)]
struct BatchCounts {
    records: usize,
    incomplete: usize,
    skipped: usize,
}

fn run_batch(input: &Path, output: Option<&Path>, settings: &Settings) -> Result<BatchCounts> {
    let reader: Box<dyn BufRead> = if input == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
        Box::new(BufReader::new(file))
    };
    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", i + 1))?;
        if !line.trim().is_empty() {
            lines.push((i + 1, line));
        }
    }
    info!(lines = lines.len(), chunk_size = settings.chunk_size, "starting batch");

    let pb = ProgressBar::new(lines.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = BatchCounts::default();
    for chunk in lines.chunks(settings.chunk_size) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|(n, line)| {
                let parsed = serde_json::from_str::<BatchItem>(line);
                (*n, parsed.map(|item| Transformed::from_item(&item)))
            })
            .collect();

        for (n, result) in results {
            match result {
                Ok(transformed) => {
                    counts.records += 1;
                    if !transformed.is_complete() {
                        counts.incomplete += 1;
                    }
                    let json = transformed.to_json(settings.include_notices)?;
                    serde_json::to_writer(&mut writer, &json)
                        .with_context(|| format!("writing record for line {}", n))?;
                    writer.write_all(b"\n")?;
                }
                Err(e) => {
                    pb.suspend(|| warn!(line = n, error = %e, "skipping malformed line"));
                    counts.skipped += 1;
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    writer.flush().context("flushing output")?;
    Ok(counts)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
