//! Validated optimize/split jobs and their background runner
//!
//! A [`Job`] bundles everything the user chose: which file, where the result
//! goes, whether the original may be overwritten and which engine to use.
//! [`Job::run`] does the work on the calling thread; [`spawn_job`] runs it on
//! a single worker thread and streams [`Progress`] back over a channel.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use crate::config::MAX_PAGES_PER_FILE;
use crate::error::{Error, Result};
use crate::ghostscript::{optimize_with_ghostscript, GhostscriptOptions};
use crate::paths::{default_output_path, is_pdf_path, same_file, split_output_dir};
use crate::pdf::{optimize_pdf, split_pdf};

/// Which engine processes the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// In-process rewrite with lopdf
    Optimize,
    /// External Ghostscript pdfwrite pass
    Ghostscript(GhostscriptOptions),
    /// Split into parts of a fixed page count
    Split { pages_per_file: usize },
}

impl Mode {
    fn phase(&self) -> Phase {
        match self {
            Mode::Optimize => Phase::Optimizing,
            Mode::Ghostscript(_) => Phase::Ghostscript,
            Mode::Split { .. } => Phase::Splitting,
        }
    }
}

/// Stage a running job is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Optimizing,
    Ghostscript,
    Splitting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Optimizing => "Optimizing",
            Phase::Ghostscript => "Running Ghostscript",
            Phase::Splitting => "Splitting",
        };
        f.write_str(label)
    }
}

/// Progress update sent while a job runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub phase: Phase,
    /// 0..=100
    pub percent: u8,
}

/// A single optimize or split request
#[derive(Debug, Clone)]
pub struct Job {
    /// PDF to process
    pub input: PathBuf,
    /// Output file (or, when splitting, a file or directory whose directory
    /// receives the parts)
    pub output: Option<PathBuf>,
    /// Write the result back over the input
    pub modify_original: bool,
    /// Replace an existing output file other than the input
    pub overwrite_existing: bool,
    /// Keep the input bytes when the rewrite comes out larger
    pub keep_smaller: bool,
    pub mode: Mode,
}

impl Job {
    pub fn new(input: PathBuf, mode: Mode) -> Self {
        Self {
            input,
            output: None,
            modify_original: false,
            overwrite_existing: false,
            keep_smaller: true,
            mode,
        }
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    /// Fill in `<stem>_optimized.pdf` next to the input if no output is set
    pub fn with_default_output(mut self) -> Self {
        if self.output.is_none() {
            self.output = Some(default_output_path(&self.input));
        }
        self
    }

    pub fn modify_original(mut self, yes: bool) -> Self {
        self.modify_original = yes;
        self
    }

    pub fn overwrite_existing(mut self, yes: bool) -> Self {
        self.overwrite_existing = yes;
        self
    }

    pub fn keep_smaller(mut self, yes: bool) -> Self {
        self.keep_smaller = yes;
        self
    }

    /// Where the result is written: the input itself when modifying the
    /// original, otherwise the configured output
    pub fn resolved_output(&self) -> Option<PathBuf> {
        if self.modify_original {
            return Some(self.input.clone());
        }
        self.output
            .as_ref()
            .filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty())
            .cloned()
    }

    /// Check the request before anything touches the filesystem
    pub fn validate(&self) -> Result<()> {
        if !self.input.is_file() {
            return Err(Error::FileNotFound(self.input.clone()));
        }
        if !is_pdf_path(&self.input) {
            return Err(Error::NotPdf(self.input.clone()));
        }

        if let Mode::Split { pages_per_file } = self.mode {
            if pages_per_file == 0 || pages_per_file > MAX_PAGES_PER_FILE {
                return Err(Error::InvalidPagesPerFile(pages_per_file));
            }
            return Ok(());
        }

        let output = self.resolved_output().ok_or(Error::OutputPathMissing)?;
        if output.exists() && !same_file(&self.input, &output) && !self.overwrite_existing {
            return Err(Error::OutputExists(output));
        }

        Ok(())
    }

    /// Validate and run the job on the current thread
    pub fn run(&self, progress: &mut dyn FnMut(Progress)) -> Result<JobReport> {
        self.validate()?;

        let phase = self.mode.phase();
        let mut report_pct = |percent: u8| progress(Progress { phase, percent });

        match &self.mode {
            Mode::Split { pages_per_file } => self.run_split(*pages_per_file, &mut report_pct),
            Mode::Optimize => self.run_rewrite(Engine::Lopdf, &mut report_pct),
            Mode::Ghostscript(options) => self.run_rewrite(Engine::Ghostscript(options), &mut report_pct),
        }
    }

    fn run_split(&self, pages_per_file: usize, progress: &mut dyn FnMut(u8)) -> Result<JobReport> {
        let before_bytes = fs::metadata(&self.input)?.len();
        let output_dir = match self.resolved_output() {
            Some(output) => split_output_dir(&output),
            None => split_output_dir(&self.input),
        };

        let outputs = split_pdf(&self.input, pages_per_file, &output_dir, progress)?;
        let after_bytes = total_size(&outputs)?;

        Ok(JobReport {
            outputs,
            before_bytes,
            after_bytes,
            kept_original: false,
            split: true,
        })
    }

    fn run_rewrite(&self, engine: Engine<'_>, progress: &mut dyn FnMut(u8)) -> Result<JobReport> {
        let output = self.resolved_output().ok_or(Error::OutputPathMissing)?;
        let before_bytes = fs::metadata(&self.input)?.len();

        if !same_file(&self.input, &output) {
            let (after_bytes, kept_original) =
                self.rewrite(engine, &self.input, &output, before_bytes, progress)?;
            return Ok(JobReport {
                outputs: vec![output],
                before_bytes,
                after_bytes,
                kept_original,
                split: false,
            });
        }

        // Processing straight from the file being replaced would truncate it
        // before it is read, so work from a temp copy instead.
        let temp = tempfile::Builder::new()
            .prefix("pdf-optimize-")
            .suffix(".pdf")
            .tempfile()?
            .into_temp_path();
        fs::copy(&self.input, &temp)?;
        log::debug!("Copied original to {}", temp.display());

        match self.rewrite(engine, &temp, &output, before_bytes, progress) {
            Ok((after_bytes, kept_original)) => {
                if let Err(e) = temp.close() {
                    log::debug!("Could not remove temp copy: {}", e);
                }
                Ok(JobReport {
                    outputs: vec![output],
                    before_bytes,
                    after_bytes,
                    kept_original,
                    split: false,
                })
            }
            Err(e) => {
                log::warn!("Restoring original after failure: {}", e);
                match fs::copy(&temp, &output) {
                    Ok(_) => Err(e),
                    Err(restore) => {
                        // The temp copy is now the only intact original
                        let preserved = temp.keep().map_err(|persist| Error::Io(persist.error))?;
                        log::error!(
                            "Could not restore {}: {}; original kept at {}",
                            output.display(),
                            restore,
                            preserved.display()
                        );
                        Err(Error::OriginalPreserved {
                            path: preserved,
                            cause: format!("{}; restore failed: {}", e, restore),
                        })
                    }
                }
            }
        }
    }

    /// Rewrite `source` into `output`, falling back to the source bytes when
    /// the rewrite grew and `keep_smaller` is set
    ///
    /// Returns the final output size and whether the source bytes were kept.
    fn rewrite(
        &self,
        engine: Engine<'_>,
        source: &Path,
        output: &Path,
        before_bytes: u64,
        progress: &mut dyn FnMut(u8),
    ) -> Result<(u64, bool)> {
        match engine {
            Engine::Lopdf => {
                optimize_pdf(source, output, progress)?;
            }
            Engine::Ghostscript(options) => {
                progress(0);
                optimize_with_ghostscript(source, output, options)?;
                progress(100);
            }
        }

        let after_bytes = fs::metadata(output)?.len();
        if self.keep_smaller && after_bytes > before_bytes {
            log::info!(
                "Rewrite grew the file ({} -> {} bytes), keeping the original bytes",
                before_bytes,
                after_bytes
            );
            fs::copy(source, output)?;
            return Ok((before_bytes, true));
        }

        Ok((after_bytes, false))
    }
}

/// Engine for a single-file rewrite
#[derive(Clone, Copy)]
enum Engine<'a> {
    Lopdf,
    Ghostscript(&'a GhostscriptOptions),
}

fn total_size(paths: &[PathBuf]) -> Result<u64> {
    paths
        .iter()
        .map(|p| -> Result<u64> { Ok(fs::metadata(p)?.len()) })
        .sum()
}

/// Outcome of a finished job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    /// Files written, in order
    pub outputs: Vec<PathBuf>,
    /// Input size in bytes
    pub before_bytes: u64,
    /// Output size in bytes (sum of all parts when splitting)
    pub after_bytes: u64,
    /// The rewrite was larger, so the output holds the input bytes
    pub kept_original: bool,
    /// Whether this was a split job
    pub split: bool,
}

impl JobReport {
    /// Size reduction in percent; negative if the output grew
    pub fn reduction_percent(&self) -> f64 {
        if self.before_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.after_bytes as f64 / self.before_bytes as f64) * 100.0
    }

    /// One-line human-readable result
    pub fn summary(&self) -> String {
        if self.split {
            return match self.outputs.first() {
                Some(first) => format!(
                    "{} files written, first: {}",
                    self.outputs.len(),
                    first.display()
                ),
                None => "No files written".to_string(),
            };
        }
        format!(
            "{} KB -> {} KB ({:.1}% reduction)",
            self.before_bytes / 1024,
            self.after_bytes / 1024,
            self.reduction_percent()
        )
    }
}

/// Handle to a job running on its worker thread
pub struct JobHandle {
    progress: Receiver<Progress>,
    worker: JoinHandle<Result<JobReport>>,
}

impl JobHandle {
    /// Progress updates; iteration ends when the job finishes
    pub fn progress(&self) -> &Receiver<Progress> {
        &self.progress
    }

    /// Wait for the job and return its result
    pub fn join(self) -> Result<JobReport> {
        self.worker
            .join()
            .map_err(|_| Error::General("Job thread panicked".to_string()))?
    }
}

/// Run `job` on a background thread
pub fn spawn_job(job: Job) -> Result<JobHandle> {
    let (tx, rx) = mpsc::channel();
    let worker = thread::Builder::new()
        .name("pdf-optimize-job".to_string())
        .spawn(move || {
            job.run(&mut |update| {
                // Receiver may be gone if the caller stopped listening
                let _ = tx.send(update);
            })
        })?;

    Ok(JobHandle { progress: rx, worker })
}
