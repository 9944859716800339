use std::path::PathBuf;

use log::debug;

use crate::binary::{apply_binary_patch_with_capacity, DeltaDecoder, Inflate};
use crate::collab::{ApplyLocation, PreimageReader, ReadError};
use crate::delta::{Delta, DeltaStatus, Mode};
use crate::error::{Error, Result};
use crate::hunk::apply_hunk;
use crate::image::Image;

/// Tuning knobs for a driver invocation. `location` carries no behavior in
/// the core itself (spec §6.3 — it affects collaborators, not the
/// transform); `inflate_capacity_hint` seeds the output buffer the binary
/// applier's inflate step allocates, the way the teacher's `Bspatch`
/// builder exposes a `buffer_size`/`delta_min` knob for its own copy and
/// delta buffers.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub location: ApplyLocation,
    pub inflate_capacity_hint: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            location: ApplyLocation::default(),
            inflate_capacity_hint: 32 * 1024,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, location: ApplyLocation) -> Self {
        self.location = location;
        self
    }

    pub fn inflate_capacity_hint(mut self, hint: usize) -> Self {
        self.inflate_capacity_hint = hint;
        self
    }
}

/// Result of applying one delta: the new path (`None` for a deletion), the
/// new mode, and the new file's bytes.
pub type ApplyOutput = (Option<String>, Mode, Vec<u8>);

/// Entry point (spec §4.4): apply one [`Delta`] to `src`, producing the
/// new path/mode/bytes triple, or an error if the patch does not apply.
///
/// Hunks are applied strictly left-to-right on a single `Image` built from
/// `src`; binary patches dispatch to the binary applier; a delta with no
/// hunks and no binary flag is a pure metadata change (new bytes == src).
pub fn apply_patch<'a>(
    src: &'a [u8],
    delta: &Delta<'a>,
    inflate: &dyn Inflate,
    decoder: &dyn DeltaDecoder,
    options: &Options,
) -> Result<ApplyOutput> {
    let (new_path, new_mode) = target_metadata(delta);

    let new_bytes = if delta.flags.binary {
        let binary = delta
            .binary
            .as_ref()
            .ok_or_else(|| Error::apply_fail("patch does not contain binary data"))?;
        apply_binary_patch_with_capacity(
            src,
            binary,
            inflate,
            decoder,
            options.inflate_capacity_hint,
        )?
    } else if !delta.hunks.is_empty() {
        let mut image = Image::from_bytes(src);
        for (i, hunk) in delta.hunks.iter().enumerate() {
            debug!("apply_patch: applying hunk {}/{}", i + 1, delta.hunks.len());
            apply_hunk(&mut image, hunk)?;
        }
        image.to_bytes()
    } else {
        src.to_vec()
    };

    if delta.status == DeltaStatus::Deleted && !new_bytes.is_empty() {
        return Err(Error::apply_fail("removal patch leaves file contents"));
    }

    Ok((new_path, new_mode, new_bytes))
}

/// Read a preimage through a [`PreimageReader`] (spec §6.1), surfacing
/// `ReadError::NotFound` as the distinct `Error::PreimageNotFound` variant
/// rather than folding it into `ApplyFail` itself — that re-classification
/// happens one layer up, at the driver boundary (see
/// `apply_patch_from_reader`), since a missing preimage is a patch-level
/// failure only in the context of a particular apply invocation.
pub fn read_preimage(reader: &dyn PreimageReader, path: &str) -> Result<Vec<u8>> {
    reader.read(path).map_err(|e| match e {
        ReadError::NotFound => Error::PreimageNotFound(PathBuf::from(path)),
        ReadError::Io(msg) => Error::PreimageIo(msg),
    })
}

/// Convenience entry point that reads the preimage through `reader` before
/// delegating to [`apply_patch`]. A missing preimage is re-classified from
/// `Error::PreimageNotFound` into `Error::ApplyFail` here, per spec §6.1:
/// "NotFound must be surfaced to the core as a distinct variant so it can
/// be re-classified as ApplyFail (a missing preimage is a patch-level
/// failure, not a transport failure)".
pub fn apply_patch_from_reader<'a>(
    reader: &dyn PreimageReader,
    delta: &Delta<'a>,
    inflate: &dyn Inflate,
    decoder: &dyn DeltaDecoder,
    options: &Options,
) -> Result<ApplyOutput> {
    let src = read_preimage(reader, delta.old_path()).map_err(|err| match err {
        Error::PreimageNotFound(path) => {
            Error::apply_fail(format!("preimage not found: {}", path.display()))
        }
        other => other,
    })?;
    apply_patch(&src, delta, inflate, decoder, options)
}

fn target_metadata(delta: &Delta<'_>) -> (Option<String>, Mode) {
    if delta.status == DeltaStatus::Deleted {
        return (None, Mode(0));
    }
    let mode = if delta.new_file.mode.is_zero() {
        Mode::REGULAR
    } else {
        delta.new_file.mode
    };
    (Some(delta.new_file.path.clone()), mode)
}

/// One operation in an ordered multi-file batch (spec §4.5).
#[derive(Debug, Clone)]
pub enum BatchOp {
    Remove(String),
    Add {
        path: String,
        mode: Mode,
        bytes: Vec<u8>,
    },
}

/// Per-delta status plus its already-computed `apply_patch` output, used
/// only to build the ordering in [`order_batch`].
pub struct BatchItem {
    pub status: DeltaStatus,
    pub old_path: String,
    pub output: ApplyOutput,
}

/// Express the ordering guarantee of spec §4.5: every deletion/rename in
/// the old-path space is emitted before any addition in the new-path
/// space, preventing a rename `A -> B` from colliding with a pre-existing
/// `B` in the postimage. Does not touch a filesystem or index itself.
pub fn order_batch(items: Vec<BatchItem>) -> Vec<BatchOp> {
    let mut removals = Vec::new();
    let mut additions = Vec::new();

    for item in items {
        let needs_removal = matches!(item.status, DeltaStatus::Deleted | DeltaStatus::Renamed);
        if needs_removal {
            removals.push(BatchOp::Remove(item.old_path));
        }
        if let (Some(path), mode, bytes) = item.output {
            additions.push(BatchOp::Add { path, mode, bytes });
        }
    }

    removals.extend(additions);
    removals
}
