//! PDF Optimize CLI tool
//!
//! A command-line tool for shrinking PDFs and splitting them into parts.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use pdf_optimize::config::{
    DEFAULT_GHOSTSCRIPT, DEFAULT_PAGES_PER_FILE, GHOSTSCRIPT_ENV, MAX_PAGES_PER_FILE,
};
use pdf_optimize::ghostscript::{ghostscript_available, GhostscriptOptions, Preset};
use pdf_optimize::pdf::extract_metadata;
use pdf_optimize::{spawn_job, Job, JobReport, Mode};

/// PDF Optimize - Shrink PDFs with lopdf or Ghostscript and split them into parts
#[derive(Parser)]
#[command(name = "pdf-optimize")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Rewrite a PDF in-process, writing report_optimized.pdf next to it
    pdf-optimize optimize report.pdf

    # Recompress a large scan with Ghostscript, replacing the original
    pdf-optimize gs scan.pdf --in-place

    # Smaller images with a custom Ghostscript install
    pdf-optimize gs scan.pdf -o small.pdf --preset screen --gs-path /opt/gs/bin/gs

    # Split into files of 20 pages each (book_part1.pdf, book_part2.pdf, ...)
    pdf-optimize split book.pdf --pages 20 -o parts/")]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a PDF in-process (prune unused objects, compress streams)
    Optimize {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path (defaults to <name>_optimized.pdf next to the input)
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Overwrite the input file with the result
        #[arg(long)]
        in_place: bool,

        /// Replace the output file if it already exists
        #[arg(short, long)]
        force: bool,

        /// Write the result even if it is larger than the input
        #[arg(long)]
        no_keep_smaller: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Recompress a PDF with Ghostscript's pdfwrite device
    Gs {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path (defaults to <name>_optimized.pdf next to the input)
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Overwrite the input file with the result
        #[arg(long)]
        in_place: bool,

        /// Replace the output file if it already exists
        #[arg(short, long)]
        force: bool,

        /// Write the result even if it is larger than the input
        #[arg(long)]
        no_keep_smaller: bool,

        /// Ghostscript executable
        #[arg(long, env = GHOSTSCRIPT_ENV, default_value = DEFAULT_GHOSTSCRIPT)]
        gs_path: String,

        /// Ghostscript quality preset (-dPDFSETTINGS)
        #[arg(long, value_enum, default_value_t = Preset::Ebook)]
        preset: Preset,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Split a PDF into files with a fixed number of pages
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Output directory, or a .pdf path whose directory receives the parts
        /// (defaults to the input's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pages per output file
        #[arg(short, long, default_value_t = DEFAULT_PAGES_PER_FILE as u32,
              value_parser = clap::value_parser!(u32).range(1..=MAX_PAGES_PER_FILE as i64))]
        pages: u32,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,

        /// Ghostscript executable to look for
        #[arg(long, env = GHOSTSCRIPT_ENV, default_value = DEFAULT_GHOSTSCRIPT)]
        gs_path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    let result = match cli.command {
        Commands::Optimize { input, output, in_place, force, no_keep_smaller, open } => {
            let job = build_job(input, Mode::Optimize, output, in_place, force, no_keep_smaller);
            cmd_run(job, open)
        }
        Commands::Gs { input, output, in_place, force, no_keep_smaller, gs_path, preset, open } => {
            let mode = Mode::Ghostscript(GhostscriptOptions { program: gs_path, preset });
            let job = build_job(input, mode, output, in_place, force, no_keep_smaller);
            cmd_run(job, open)
        }
        Commands::Split { input, output, pages } => {
            let mut job = Job::new(input, Mode::Split { pages_per_file: pages as usize });
            job.output = output;
            cmd_run(job, false)
        }
        Commands::Info { input, gs_path } => {
            cmd_info(&input, &gs_path)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn build_job(
    input: PathBuf,
    mode: Mode,
    output: Option<PathBuf>,
    in_place: bool,
    force: bool,
    no_keep_smaller: bool,
) -> Job {
    let job = Job::new(input, mode)
        .modify_original(in_place)
        .overwrite_existing(force)
        .keep_smaller(!no_keep_smaller);

    match output {
        Some(output) => job.with_output(output),
        None => job.with_default_output(),
    }
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Run a job on the worker thread, drawing its progress until it finishes
fn cmd_run(job: Job, open: bool) -> Result<()> {
    // Validate up front so nothing is printed for a job that cannot start
    job.validate()?;

    if job.modify_original {
        log::warn!("Overwriting {}; keep a backup if the original matters", job.input.display());
    }

    let input = job.input.clone();
    let handle = spawn_job(job).context("Failed to start worker thread")?;

    let mut last = None;
    for update in handle.progress().iter() {
        if last != Some(update) {
            eprint!("\r{}... {:>3}%", update.phase, update.percent);
            let _ = std::io::stderr().flush();
            last = Some(update);
        }
    }
    if last.is_some() {
        eprintln!();
    }

    let report = handle
        .join()
        .with_context(|| format!("Failed to process {}", input.display()))?;

    print_report(&report);

    if open {
        if let Some(first) = report.outputs.first() {
            open_file(first)?;
        }
    }

    Ok(())
}

fn print_report(report: &JobReport) {
    if report.split {
        eprintln!("Split complete: {}", report.summary());
        return;
    }

    for output in &report.outputs {
        eprintln!("Output: {}", output.display());
    }
    eprintln!("Size: {}", report.summary());
    if report.kept_original {
        eprintln!("Note: the rewrite was larger than the input, so the original content was kept");
    }
}

/// Show information about a PDF
fn cmd_info(input: &Path, gs_path: &str) -> Result<()> {
    let metadata = extract_metadata(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Version: {}", metadata.version);
    println!("Pages: {}", metadata.page_count);
    println!("Size: {} KB", metadata.file_size / 1024);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    let options = GhostscriptOptions { program: gs_path.to_string(), ..Default::default() };
    let status = if ghostscript_available(&options) { "available" } else { "not found" };
    println!("Ghostscript ({}): {}", gs_path, status);

    Ok(())
}
