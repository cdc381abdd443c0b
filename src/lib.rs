//! PDF Optimize Library
//!
//! A cross-platform library for shrinking PDF files and splitting them into parts.
//! This library provides functionality to:
//! - Rewrite a PDF in-process with lopdf (prune, renumber, compress)
//! - Recompress a PDF through the Ghostscript `pdfwrite` device
//! - Split a PDF into files of a fixed page count
//! - Run any of the above as a validated background job with progress
//!
//! # Example
//!
//! ```no_run
//! use pdf_optimize::job::{Job, Mode};
//! use std::path::PathBuf;
//!
//! let job = Job::new(PathBuf::from("report.pdf"), Mode::Optimize)
//!     .with_output(PathBuf::from("report_small.pdf"));
//!
//! let report = job.run(&mut |_| {}).expect("Failed to optimize PDF");
//! println!("{}", report.summary());
//! ```

pub mod config;
pub mod error;
pub mod ghostscript;
pub mod job;
pub mod paths;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};
pub use job::{spawn_job, Job, JobHandle, JobReport, Mode, Progress};
