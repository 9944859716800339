use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while applying a patch to a preimage.
///
/// Matches the taxonomy of the engine: `ApplyFail` means the patch simply
/// does not apply to this source (bad data, not a bug); `InternalBug` means
/// an invariant the applier assumes was violated; `OutOfMemory` covers any
/// fallible allocation site; `DecodeError` covers inflate/delta-decoder
/// rejections.
#[derive(Error, Debug)]
pub enum Error {
    /// The patch does not apply. Carries a stable, human-readable reason.
    #[error("patch does not apply: {reason}")]
    ApplyFail {
        reason: String,
        /// Target line number for hunk-placement failures, if applicable.
        line: Option<usize>,
    },

    /// An invariant the applier relies on (but does not re-verify) was
    /// violated. Indicates a programming error upstream, not bad patch data.
    #[error("internal invariant violated: {0}")]
    InternalBug(&'static str),

    /// A fallible allocation failed.
    #[error("out of memory")]
    OutOfMemory,

    /// The inflate primitive or delta decoder rejected its input.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// The preimage reader could not find the requested path. Surfaced
    /// distinctly from `ApplyFail` at the collaborator boundary (see
    /// `PreimageReader`), then re-classified by the driver.
    #[error("preimage not found: {}", .0.display())]
    PreimageNotFound(PathBuf),

    /// The preimage reader failed for a reason other than "not found".
    #[error("preimage read failed: {0}")]
    PreimageIo(String),
}

impl Error {
    pub(crate) fn apply_fail(reason: impl Into<String>) -> Self {
        Error::ApplyFail {
            reason: reason.into(),
            line: None,
        }
    }

    pub(crate) fn apply_fail_at(reason: impl Into<String>, line: usize) -> Self {
        Error::ApplyFail {
            reason: reason.into(),
            line: Some(line),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
