//! Headless editing session: one level, one converter, a stream of events.
//!
//! [`open_level`] converts the binary layout if its JSON twin is stale and
//! loads the result. [`Session::run`] then feeds text event lines through
//! [`EditorContext::handle`] and performs saves as they are requested,
//! writing user-facing messages to the supplied writer.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::converter::{Converter, ConverterError, ImportOutcome};
use crate::discovery::{DiscoveryError, Level};
use crate::engine::{Action, EditorContext};
use crate::input::InputEvent;
use crate::layout::{self, LayoutDocument, LoadError, SaveError, SaveOutcome};
use crate::raster::{PixmapSurface, RasterError};
use crate::render;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("there was a problem converting {layout}: {source}")]
    Import { layout: String, source: ConverterError },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Counters for one [`Session::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events: usize,
    pub skipped_lines: usize,
    pub renders: usize,
    pub saves: usize,
    pub failed_saves: usize,
    pub quit: bool,
}

pub struct Session<'c> {
    pub ctx: EditorContext,
    level: Level,
    document: LayoutDocument,
    converter: &'c dyn Converter,
}

/// Bring `level` up to date and load it into a new session.
///
/// # Errors
///
/// [`SessionError::Import`] if conversion of a stale layout fails,
/// [`SessionError::Load`] if the JSON cannot be loaded.
pub fn open_level<'c>(
    level: Level,
    converter: &'c dyn Converter,
    viewport: (u32, u32),
    out: &mut impl Write,
) -> Result<Session<'c>, SessionError> {
    if level.needs_import()? {
        let layout = level.layout_path();
        match converter.import(&layout) {
            Ok(ImportOutcome::Created) => writeln!(out, "Created {}!", level.json_path().display())?,
            Ok(ImportOutcome::Updated) => writeln!(out, "Updated {}!", level.json_path().display())?,
            Ok(ImportOutcome::Unchanged) => debug!(level = level.name(), "import reported no changes"),
            Err(source) => {
                return Err(SessionError::Import { layout: layout.display().to_string(), source });
            }
        }
    }

    let (scene, document) = layout::load_scene(&level.json_path())?;
    writeln!(out, "Layout Loaded Successfully!")?;
    Ok(Session {
        ctx: EditorContext::new(scene, viewport.0, viewport.1),
        level,
        document,
        converter,
    })
}

impl Session<'_> {
    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Save the current scene through the converter.
    ///
    /// # Errors
    ///
    /// The [`SaveError`] from the codec; the scene is left untouched.
    pub fn save(&self) -> Result<SaveOutcome, SaveError> {
        layout::save_scene(&self.ctx.scene, &self.document, &self.level.json_path(), self.converter)
    }

    fn report_save(&self, outcome: &SaveOutcome, out: &mut impl Write) -> io::Result<()> {
        match outcome {
            SaveOutcome::NoChanges { .. } => writeln!(out, "No changes to apply.")?,
            SaveOutcome::Applied { backup_created, stdout } => {
                write!(out, "{stdout}")?;
                if !stdout.ends_with('\n') {
                    writeln!(out)?;
                }
                if *backup_created {
                    writeln!(out, "Created backup {}", self.level.backup_path().display())?;
                }
                writeln!(out, "Applied changes to {}!", self.level.layout_path().display())?;
            }
        }
        writeln!(out, "Done!")
    }

    /// Feed event lines until end of input or a quit event.
    ///
    /// Blank lines and lines starting with `#` are ignored. Lines that do not
    /// parse are reported and skipped. Save failures are reported and the
    /// session continues.
    ///
    /// # Errors
    ///
    /// [`SessionError::Io`] if reading input or writing output fails.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<RunSummary, SessionError> {
        let mut summary = RunSummary::default();
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let event: InputEvent = match trimmed.parse() {
                Ok(event) => event,
                Err(e) => {
                    warn!(line = index + 1, error = %e, "skipping event line");
                    writeln!(out, "line {}: {e}", index + 1)?;
                    summary.skipped_lines += 1;
                    continue;
                }
            };
            summary.events += 1;

            for action in self.ctx.handle(event) {
                match action {
                    Action::RenderNeeded => summary.renders += 1,
                    Action::SaveRequested => {
                        writeln!(out, "Saving changes to {}...", self.level.json_path().display())?;
                        match self.save() {
                            Ok(outcome) => {
                                self.report_save(&outcome, out)?;
                                summary.saves += 1;
                            }
                            Err(e) => {
                                writeln!(out, "Error: {e}")?;
                                summary.failed_saves += 1;
                            }
                        }
                    }
                    Action::Quit => summary.quit = true,
                }
            }
            if summary.quit {
                break;
            }
        }
        info!(events = summary.events, saves = summary.saves, "session finished");
        Ok(summary)
    }

    /// Render the current state and write it as a PNG.
    ///
    /// # Errors
    ///
    /// [`SessionError::Raster`] if the surface cannot be allocated or written.
    pub fn snapshot(&self, width: u32, height: u32, path: &Path) -> Result<(), SessionError> {
        let mut surface = PixmapSurface::new(width, height)?;
        let Ok(frame) = render::draw(&mut surface, &self.ctx.scene, &self.ctx.camera, &self.ctx.ui, &self.ctx.input);
        debug!(shapes = frame.hitboxes.len(), path = %path.display(), "writing snapshot");
        surface.save_png(path)?;
        Ok(())
    }
}
