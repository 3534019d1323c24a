//! Boundary to the external layout converter.
//!
//! The converter is an opaque executable invoked with a single file path.
//! It turns a `.layout` into a `.layout.json` or back, and reports through
//! its exit code and stdout. The editor never interprets the binary format;
//! it only classifies exit codes and carries stdout through verbatim.
//!
//! Invocation is blocking. The [`Converter`] trait is the seam that lets
//! tests script converter replies without spawning processes.

#[cfg(test)]
#[path = "converter_test.rs"]
mod converter_test;

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::consts::{
    CONVERTER_CONVERSION_ERROR, CONVERTER_FILE_ERROR, CONVERTER_GAMEPATH_ERROR, CONVERTER_JSON_ERROR,
    CONVERTER_MIN_REPORT_LEN, CONVERTER_SUCCESS,
};

/// Argument used to probe the converter. It is never a real file, so a
/// healthy install answers with a file error.
const PROBE_ARG: &str = "test";

/// Captured result of one converter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
}

impl ConverterOutput {
    #[must_use]
    pub fn status(&self) -> ConverterStatus {
        ConverterStatus::from_code(self.code)
    }

    /// Whether stdout is long enough to describe a change that was written.
    #[must_use]
    pub fn reports_changes(&self) -> bool {
        self.stdout.len() >= CONVERTER_MIN_REPORT_LEN
    }
}

/// Meaning of a converter exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterStatus {
    Success,
    /// The input document is malformed.
    MalformedInput,
    ConversionFailed,
    FileError,
    /// The game installation could not be located.
    GameNotFound,
    Other(Option<i32>),
}

impl ConverterStatus {
    #[must_use]
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(CONVERTER_SUCCESS) => Self::Success,
            Some(CONVERTER_JSON_ERROR) => Self::MalformedInput,
            Some(CONVERTER_CONVERSION_ERROR) => Self::ConversionFailed,
            Some(CONVERTER_FILE_ERROR) => Self::FileError,
            Some(CONVERTER_GAMEPATH_ERROR) => Self::GameNotFound,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("cannot find converter `{program}`")]
    NotFound { program: String },
    #[error("failed to run converter `{program}`: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("game installation not found:\n{stdout}")]
    GameNotFound { stdout: String },
    #[error("converter failed (exit code {code:?}):\n{stdout}")]
    Failed { code: Option<i32>, stdout: String },
}

/// Something that can run the converter on a path.
pub trait Converter {
    /// Human-readable name of the converter, for diagnostics.
    fn program(&self) -> String;

    /// Run the converter on `path` and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the converter could not be started.
    fn run(&self, path: &Path) -> io::Result<ConverterOutput>;

    /// Run the converter and map a spawn failure to [`ConverterError`].
    ///
    /// # Errors
    ///
    /// [`ConverterError::NotFound`] when the executable is missing,
    /// [`ConverterError::Spawn`] for any other start failure.
    fn invoke(&self, path: &Path) -> Result<ConverterOutput, ConverterError> {
        debug!(program = %self.program(), path = %path.display(), "running converter");
        let output = self.run(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConverterError::NotFound { program: self.program() }
            } else {
                ConverterError::Spawn { program: self.program(), source }
            }
        })?;
        info!(code = ?output.code, "converter finished");
        Ok(output)
    }

    /// Check that the converter runs and can find the game.
    ///
    /// # Errors
    ///
    /// [`ConverterError::GameNotFound`] on exit code 4; [`ConverterError::Failed`]
    /// for any code other than the expected file error.
    fn probe(&self) -> Result<(), ConverterError> {
        let output = self.invoke(Path::new(PROBE_ARG))?;
        match output.status() {
            ConverterStatus::FileError => Ok(()),
            ConverterStatus::GameNotFound => Err(ConverterError::GameNotFound { stdout: output.stdout }),
            _ => Err(ConverterError::Failed { code: output.code, stdout: output.stdout }),
        }
    }

    /// Convert a binary `.layout` into its JSON twin.
    ///
    /// # Errors
    ///
    /// Any non-zero exit is [`ConverterError::Failed`] with stdout attached.
    fn import(&self, layout: &Path) -> Result<ImportOutcome, ConverterError> {
        let output = self.invoke(layout)?;
        if output.status() != ConverterStatus::Success {
            return Err(ConverterError::Failed { code: output.code, stdout: output.stdout });
        }
        let outcome = if !output.reports_changes() {
            ImportOutcome::Unchanged
        } else if output.stdout.contains("Created") {
            ImportOutcome::Created
        } else {
            ImportOutcome::Updated
        };
        Ok(outcome)
    }
}

/// Result of converting `.layout` to `.layout.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Runs the converter as a child process.
#[derive(Debug, Clone)]
pub struct ProcessConverter {
    program: PathBuf,
}

impl ProcessConverter {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

impl Converter for ProcessConverter {
    fn program(&self) -> String {
        self.program.display().to_string()
    }

    fn run(&self, path: &Path) -> io::Result<ConverterOutput> {
        let output = Command::new(&self.program).arg(path).output()?;
        Ok(ConverterOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
