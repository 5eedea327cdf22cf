//! Pretty-printing of the generated module through an external formatter.

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::config::FormatterConfig;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{program} produced non-UTF-8 output")]
    Encoding { program: String },
}

/// Formats generated source text.
///
/// Kept as a trait so the pipeline can run without a formatter installed.
pub trait Formatter {
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// Pipes source through `black` on stdin/stdout.
#[derive(Debug, Clone)]
pub struct BlackFormatter {
    program: String,
    line_length: u16,
    preview: bool,
}

impl BlackFormatter {
    pub fn from_config(config: &FormatterConfig) -> Self {
        Self {
            program: config.program.clone(),
            line_length: config.line_length,
            preview: config.preview,
        }
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "--line-length".to_string(),
            self.line_length.to_string(),
        ];
        if self.preview {
            args.push("--preview".to_string());
        }
        args.push("-".to_string());
        args
    }
}

impl Formatter for BlackFormatter {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let spawn_err = |source: std::io::Error| FormatError::Spawn {
            program: self.program.clone(),
            source,
        };

        debug!(program = %self.program, args = ?self.args(), "running formatter");
        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(spawn_err)?;
        }
        let output = child.wait_with_output().map_err(spawn_err)?;

        if !output.status.success() {
            return Err(FormatError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| FormatError::Encoding {
            program: self.program.clone(),
        })
    }
}

/// Leaves source untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unformatted;

impl Formatter for Unformatted {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        Ok(source.to_string())
    }
}
