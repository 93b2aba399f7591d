//! Editing session: one loaded negative, its controls, and the current render.
//!
//! The session owns the decoded original and never modifies it. Every
//! control change takes a fresh [`ParameterSet`] snapshot and renders again
//! from the original, so adjustments never compound.
//!
//! Renders are stamped with a generation number. A result is committed only
//! when its generation is the latest one requested; anything older is
//! dropped. The synchronous `set_control` path always commits; callers that
//! split [`Session::begin_render`] from [`Session::commit`] get
//! last-write-wins.

use crate::buffer::PixelBuffer;
use crate::config::LimitsConfig;
use crate::controls::{Control, ControlState};
use crate::engine;
use crate::imaging::{BackendError, ImageBackend};
use crate::loader::{self, LoadError, LoadedNegative, SourceInfo};
use crate::params::ParameterSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// A requested render: the parameters to use and the generation they belong to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTicket {
    pub generation: u64,
    pub params: ParameterSet,
}

#[derive(Debug)]
pub struct Session {
    source: SourceInfo,
    original: PixelBuffer,
    controls: ControlState,
    params: ParameterSet,
    rendered: PixelBuffer,
    requested: u64,
    committed: u64,
}

impl Session {
    /// Load `path` and render it once with `controls`.
    ///
    /// Fails without creating a session if any loader check fails.
    pub fn open(
        path: &Path,
        limits: &LimitsConfig,
        controls: ControlState,
        backend: &dyn ImageBackend,
    ) -> Result<Self, SessionError> {
        let loaded = loader::load_negative(path, limits, backend).inspect_err(|e| {
            warn!(path = %e.path().display(), "load rejected: {e}");
        })?;
        Ok(Self::new(loaded, controls))
    }

    /// Start a session from an already decoded negative.
    pub fn new(loaded: LoadedNegative, controls: ControlState) -> Self {
        let params = controls.snapshot();
        let rendered = engine::transform(&loaded.pixels, &params);
        Self {
            source: loaded.info,
            original: loaded.pixels,
            controls,
            params,
            rendered,
            requested: 0,
            committed: 0,
        }
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    /// Parameters of the committed render.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn rendered(&self) -> &PixelBuffer {
        &self.rendered
    }

    /// Generation of the committed render. `0` is the initial render.
    pub fn generation(&self) -> u64 {
        self.committed
    }

    /// Change one control and re-render from the original.
    pub fn set_control(&mut self, control: Control, raw: impl Into<String>) -> &PixelBuffer {
        self.controls.set(control, raw);
        self.rerender()
    }

    /// Return every control to neutral and re-render.
    pub fn reset_controls(&mut self) -> &PixelBuffer {
        self.controls.reset();
        self.rerender()
    }

    fn rerender(&mut self) -> &PixelBuffer {
        let ticket = self.begin_render();
        let buffer = self.render(&ticket);
        self.commit(ticket, buffer);
        &self.rendered
    }

    /// Snapshot the controls and reserve the next generation.
    pub fn begin_render(&mut self) -> RenderTicket {
        self.requested += 1;
        RenderTicket {
            generation: self.requested,
            params: self.controls.snapshot(),
        }
    }

    /// Render `ticket` against the original. Does not touch session state.
    pub fn render(&self, ticket: &RenderTicket) -> PixelBuffer {
        engine::transform(&self.original, &ticket.params)
    }

    /// Install `buffer` as the current render if `ticket` is still the
    /// latest request. Returns `false` when the result was stale and dropped.
    pub fn commit(&mut self, ticket: RenderTicket, buffer: PixelBuffer) -> bool {
        if ticket.generation != self.requested {
            warn!(
                generation = ticket.generation,
                latest = self.requested,
                "discarding stale render"
            );
            return false;
        }
        self.params = ticket.params;
        self.rendered = buffer;
        self.committed = ticket.generation;
        true
    }

    /// Encode the current render to `path`.
    pub fn export(&self, path: &Path, backend: &dyn ImageBackend) -> Result<(), SessionError> {
        backend
            .encode(&self.rendered, path)
            .map_err(|source| SessionError::Export {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            "exported {} ({}x{})",
            path.display(),
            self.rendered.width(),
            self.rendered.height()
        );
        Ok(())
    }
}
