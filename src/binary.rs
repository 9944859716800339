use std::io::Read;

use flate2::read::ZlibDecoder;
use log::{debug, warn};

use crate::error::{Error, Result};

/// What a [`BinaryFile`]'s compressed payload represents once inflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFileType {
    /// The inflated payload *is* the new contents.
    Literal,
    /// The inflated payload is an opcode stream for the delta decoder.
    Delta,
    /// No data recorded for this side.
    None,
}

/// One side (forward or reverse) of a binary patch.
#[derive(Debug, Clone)]
pub struct BinaryFile {
    pub kind: BinaryFileType,
    /// Deflate-compressed payload bytes. Empty means identity (see
    /// `apply_bdelta`).
    pub data: Vec<u8>,
    /// Declared inflated size; must match exactly after inflate.
    pub inflated_len: usize,
}

impl BinaryFile {
    pub fn empty() -> Self {
        BinaryFile {
            kind: BinaryFileType::None,
            data: Vec::new(),
            inflated_len: 0,
        }
    }

    fn datalen(&self) -> usize {
        self.data.len()
    }
}

/// Two embedded compressed deltas: `new_file` (forward, source → target)
/// and `old_file` (reverse, target → source).
#[derive(Debug, Clone)]
pub struct BinaryPatch {
    /// Whether a binary patch was present at all, as opposed to merely
    /// being flagged binary with no payload.
    pub contains_data: bool,
    pub new_file: BinaryFile,
    pub old_file: BinaryFile,
}

/// Inflate primitive, consumed by the binary applier (spec §6.1). Must
/// exactly consume its input and produce the number of bytes it returns;
/// length-checking against `BinaryFile::inflated_len` is the applier's job,
/// not the primitive's.
pub trait Inflate {
    fn inflate(&self, compressed: &[u8]) -> std::result::Result<Vec<u8>, String> {
        self.inflate_with_capacity(compressed, 0)
    }

    /// Same contract as `inflate`, but pre-reserves `capacity_hint` bytes in
    /// the output buffer (see `Options::inflate_capacity_hint`) to cut down
    /// on reallocation when the caller has a rough size estimate.
    fn inflate_with_capacity(
        &self,
        compressed: &[u8],
        capacity_hint: usize,
    ) -> std::result::Result<Vec<u8>, String>;
}

/// Default zlib-compatible inflate, backed by `flate2`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZlibInflate;

impl Inflate for ZlibInflate {
    fn inflate_with_capacity(
        &self,
        compressed: &[u8],
        capacity_hint: usize,
    ) -> std::result::Result<Vec<u8>, String> {
        let mut decoder = ZlibDecoder::new(compressed);
        let mut out = Vec::with_capacity(capacity_hint);
        decoder.read_to_end(&mut out).map_err(|e| e.to_string())?;
        Ok(out)
    }
}

/// Classical copy/insert delta decoder, consumed by the binary applier
/// (spec §6.1). Given a base buffer and an opcode stream, produces the
/// target buffer.
pub trait DeltaDecoder {
    fn apply_delta(&self, base: &[u8], instructions: &[u8]) -> std::result::Result<Vec<u8>, String>;
}

/// Apply one side of a binary patch to `src`.
///
/// - `datalen == 0` is identity: returns `src` unchanged.
/// - Otherwise inflates `bf.data`; the inflated length must equal
///   `bf.inflated_len` exactly.
/// - `Literal` payloads are returned as-is; `Delta` payloads are fed to the
///   delta decoder together with `src` as the base.
pub fn apply_bdelta(
    src: &[u8],
    bf: &BinaryFile,
    inflate: &dyn Inflate,
    decoder: &dyn DeltaDecoder,
) -> Result<Vec<u8>> {
    apply_bdelta_with_capacity(src, bf, inflate, decoder, bf.inflated_len)
}

/// Same as `apply_bdelta`, but lets the caller seed the inflate output
/// buffer's capacity (see `Options::inflate_capacity_hint`).
pub fn apply_bdelta_with_capacity(
    src: &[u8],
    bf: &BinaryFile,
    inflate: &dyn Inflate,
    decoder: &dyn DeltaDecoder,
    capacity_hint: usize,
) -> Result<Vec<u8>> {
    if bf.datalen() == 0 {
        return Ok(src.to_vec());
    }

    let inflated = inflate
        .inflate_with_capacity(&bf.data, capacity_hint)
        .map_err(Error::DecodeError)?;
    if inflated.len() != bf.inflated_len {
        return Err(Error::apply_fail(
            "inflated delta does not match expected length",
        ));
    }

    match bf.kind {
        BinaryFileType::Literal => Ok(inflated),
        BinaryFileType::Delta => decoder
            .apply_delta(src, &inflated)
            .map_err(Error::DecodeError),
        BinaryFileType::None => Err(Error::apply_fail("unknown binary delta type")),
    }
}

/// Full binary-patch algorithm (spec §4.3): apply the forward delta, then
/// verify by applying the reverse delta and comparing against `src`.
pub fn apply_binary_patch(
    src: &[u8],
    patch: &BinaryPatch,
    inflate: &dyn Inflate,
    decoder: &dyn DeltaDecoder,
) -> Result<Vec<u8>> {
    apply_binary_patch_with_capacity(src, patch, inflate, decoder, 0)
}

/// Same as `apply_binary_patch`, but `capacity_hint` floors the inflate
/// output buffers' pre-reserved capacity (see
/// `Options::inflate_capacity_hint`); each side still prefers its own
/// declared `inflated_len` when that is larger.
pub fn apply_binary_patch_with_capacity(
    src: &[u8],
    patch: &BinaryPatch,
    inflate: &dyn Inflate,
    decoder: &dyn DeltaDecoder,
    capacity_hint: usize,
) -> Result<Vec<u8>> {
    if !patch.contains_data {
        return Err(Error::apply_fail("patch does not contain binary data"));
    }

    if patch.new_file.datalen() == 0 && patch.old_file.datalen() == 0 {
        debug!("apply_binary_patch: both sides empty, no-op");
        return Ok(Vec::new());
    }

    let forward_hint = capacity_hint.max(patch.new_file.inflated_len);
    let reverse_hint = capacity_hint.max(patch.old_file.inflated_len);
    let forward = apply_bdelta_with_capacity(src, &patch.new_file, inflate, decoder, forward_hint)?;
    let reverse =
        apply_bdelta_with_capacity(&forward, &patch.old_file, inflate, decoder, reverse_hint)?;

    if reverse != src {
        warn!("apply_binary_patch: reverse-check failed, rejecting patch");
        return Err(Error::apply_fail("binary patch did not apply cleanly"));
    }

    Ok(forward)
}
