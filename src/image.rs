use crate::error::{Error, Result};

/// A contiguous run of bytes belonging to a [`Image`].
///
/// Lines borrowed from an input buffer carry no allocation; lines produced
/// by splicing (e.g. a hunk's addition lines, which are themselves borrowed
/// from the *patch's* backing buffer) are copied into an owned allocation so
/// the image does not need to track which buffer everything came from.
#[derive(Debug, Clone)]
enum LineBytes<'a> {
    Borrowed(&'a [u8]),
    Owned(Box<[u8]>),
}

#[derive(Debug, Clone)]
pub struct Line<'a> {
    bytes: LineBytes<'a>,
}

impl<'a> Line<'a> {
    fn borrowed(bytes: &'a [u8]) -> Self {
        Line {
            bytes: LineBytes::Borrowed(bytes),
        }
    }

    /// Build an image line from any byte source, borrowing when possible.
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Line::borrowed(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.bytes {
            LineBytes::Borrowed(b) => b,
            LineBytes::Owned(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_owned_line<'b>(&self) -> Line<'b> {
        Line {
            bytes: LineBytes::Owned(self.as_bytes().to_vec().into_boxed_slice()),
        }
    }
}

impl<'a> PartialEq for Line<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// A line-indexed, mutable view of a byte buffer.
///
/// Concatenating every line's bytes in order always reconstructs the
/// image's current logical contents (see `to_bytes`); splicing is the only
/// mutation and is atomic with respect to allocation failure.
#[derive(Debug, Clone, Default)]
pub struct Image<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> Image<'a> {
    /// Split `src` on `'\n'` boundaries. Each produced line includes its
    /// trailing `'\n'` when one is present; the final line may lack one.
    /// Zero-length input yields an empty image. No allocation: every line
    /// borrows `src`.
    pub fn from_bytes(src: &'a [u8]) -> Self {
        if src.is_empty() {
            return Image { lines: Vec::new() };
        }

        let mut lines = Vec::new();
        let mut start = 0;
        for (i, &b) in src.iter().enumerate() {
            if b == b'\n' {
                lines.push(Line::borrowed(&src[start..=i]));
                start = i + 1;
            }
        }
        if start < src.len() {
            lines.push(Line::borrowed(&src[start..]));
        }
        Image { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Fetch line `i`. Fails with `InternalBug` if `i >= len()`: callers are
    /// expected to bounds-check against `len()` beforehand (this guards
    /// applier bugs, not patch data).
    pub fn get(&self, i: usize) -> Result<&Line<'a>> {
        self.lines
            .get(i)
            .ok_or(Error::InternalBug("image line index out of range"))
    }

    /// Lines starting at `at`, for the purpose of equality-checking a
    /// hunk's preimage. Returns fewer than `count` lines if `at + count`
    /// runs past the end of the image.
    pub fn slice(&self, at: usize, count: usize) -> &[Line<'a>] {
        let end = (at + count).min(self.lines.len());
        if at >= self.lines.len() {
            &[]
        } else {
            &self.lines[at..end]
        }
    }

    /// Remove `remove_count` lines starting at `at`, then insert
    /// `insert_lines` at `at`. Atomic: if the insert allocation fails, the
    /// image is left unchanged (in practice, `Vec` operations here only
    /// fail by aborting, but the explicit reserve keeps the contract
    /// honest and surfaces `OutOfMemory` rather than aborting in contexts
    /// that can catch it).
    pub fn splice<'b>(&mut self, at: usize, remove_count: usize, insert_lines: &[Line<'b>]) -> Result<()>
    where
        'b: 'a,
    {
        if at > self.lines.len() || at + remove_count > self.lines.len() {
            return Err(Error::InternalBug("splice range out of bounds"));
        }

        let mut owned: Vec<Line<'a>> = Vec::new();
        owned
            .try_reserve(insert_lines.len())
            .map_err(|_| Error::OutOfMemory)?;
        owned.extend(insert_lines.iter().map(|l| l.to_owned_line()));

        self.lines.splice(at..at + remove_count, owned);
        Ok(())
    }

    /// Concatenate all line bytes into a single buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let total: usize = self.lines.iter().map(Line::len).sum();
        let mut out = Vec::with_capacity(total);
        for line in &self.lines {
            out.extend_from_slice(line.as_bytes());
        }
        out
    }
}
