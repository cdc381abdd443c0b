//! PDF recompression through the Ghostscript `pdfwrite` device
//!
//! Ghostscript is not bundled. The executable is looked up on `PATH` unless an
//! explicit program is configured.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::DEFAULT_GHOSTSCRIPT;
use crate::error::{Error, Result};

/// Quality profile passed as `-dPDFSETTINGS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Preset {
    /// 72 dpi images, smallest output
    Screen,
    /// 150 dpi images
    #[default]
    Ebook,
    /// 300 dpi images
    Printer,
    /// 300 dpi, color preserving
    Prepress,
    /// Ghostscript's general-purpose profile
    Default,
}

impl Preset {
    /// Setting name without the leading slash
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Screen => "screen",
            Preset::Ebook => "ebook",
            Preset::Printer => "printer",
            Preset::Prepress => "prepress",
            Preset::Default => "default",
        }
    }
}

/// How to invoke Ghostscript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostscriptOptions {
    /// Executable name or path
    pub program: String,
    /// Quality profile
    pub preset: Preset,
}

impl Default for GhostscriptOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_GHOSTSCRIPT.to_string(),
            preset: Preset::default(),
        }
    }
}

/// Arguments for a single pdfwrite pass from `input` to `output`
pub fn build_args(input: &Path, output: &Path, preset: Preset) -> Vec<OsString> {
    let mut output_arg = OsString::from("-sOutputFile=");
    output_arg.push(output.as_os_str());

    vec![
        OsString::from("-dNOPAUSE"),
        OsString::from("-dBATCH"),
        OsString::from("-dSAFER"),
        OsString::from("-sDEVICE=pdfwrite"),
        OsString::from(format!("-dPDFSETTINGS=/{}", preset.as_str())),
        output_arg,
        input.as_os_str().to_os_string(),
    ]
}

fn command(program: &str) -> Command {
    let mut cmd = Command::new(program);
    cmd.stdin(Stdio::null());

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    cmd
}

/// Rewrite `input` to `output` with Ghostscript
///
/// Waits for the process to finish. A non-zero exit status is reported with
/// whatever Ghostscript wrote to stderr.
pub fn optimize_with_ghostscript(
    input: &Path,
    output: &Path,
    options: &GhostscriptOptions,
) -> Result<()> {
    if !input.exists() {
        return Err(Error::FileNotFound(input.to_path_buf()));
    }

    let args = build_args(input, output, options.preset);
    log::debug!("Running {} {:?}", options.program, args);

    let result = command(&options.program)
        .args(&args)
        .output()
        .map_err(|source| Error::GhostscriptLaunch {
            program: options.program.clone(),
            source,
        })?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
        return Err(Error::GhostscriptFailed {
            code: result.status.code(),
            stderr,
        });
    }

    log::info!("Ghostscript wrote {}", output.display());
    Ok(())
}

/// Check whether the configured Ghostscript can be executed
pub fn ghostscript_available(options: &GhostscriptOptions) -> bool {
    command(&options.program)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_fixed_flags() {
        let args = build_args(Path::new("in.pdf"), Path::new("out.pdf"), Preset::Ebook);
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-dNOPAUSE",
                "-dBATCH",
                "-dSAFER",
                "-sDEVICE=pdfwrite",
                "-dPDFSETTINGS=/ebook",
                "-sOutputFile=out.pdf",
                "in.pdf",
            ]
        );
    }

    #[test]
    fn test_build_args_preset() {
        let args = build_args(Path::new("a.pdf"), Path::new("b.pdf"), Preset::Screen);
        assert_eq!(args[4], OsString::from("-dPDFSETTINGS=/screen"));
    }

    #[test]
    fn test_paths_with_spaces_stay_single_arguments() {
        let args = build_args(Path::new("my file.pdf"), Path::new("out dir/x.pdf"), Preset::Ebook);
        assert_eq!(args.len(), 7);
        assert_eq!(args[5], OsString::from("-sOutputFile=out dir/x.pdf"));
        assert_eq!(args[6], OsString::from("my file.pdf"));
    }

    #[test]
    fn test_missing_input_rejected_before_launch() {
        let options = GhostscriptOptions {
            program: "definitely-not-ghostscript".to_string(),
            preset: Preset::Ebook,
        };
        let result = optimize_with_ghostscript(Path::new("nonexistent.pdf"), Path::new("out.pdf"), &options);
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let options = GhostscriptOptions {
            program: "definitely-not-ghostscript".to_string(),
            preset: Preset::Ebook,
        };
        assert!(!ghostscript_available(&options));

        // Any existing file will do as the input; the launch fails first
        let input = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let result = optimize_with_ghostscript(&input, Path::new("out.pdf"), &options);
        assert!(matches!(result.unwrap_err(), Error::GhostscriptLaunch { .. }));
    }
}
