use log::{debug, trace};

use crate::error::{Error, Result};
use crate::image::{Image, Line};

/// Where a hunk line came from, relative to the edit it describes.
///
/// The `*EOFNL` variants mark a line that is the final line of its side and
/// is missing its trailing newline ("No newline at end of file" in unified
/// diff terms); they classify into preimage/postimage exactly like their
/// non-EOFNL counterpart (see `TaggedLine::sides`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    Context,
    Addition,
    Deletion,
    ContextEOFNL,
    AddEOFNL,
    DelEOFNL,
}

impl LineOrigin {
    fn in_preimage(self) -> bool {
        matches!(
            self,
            LineOrigin::Context
                | LineOrigin::Deletion
                | LineOrigin::ContextEOFNL
                | LineOrigin::DelEOFNL
        )
    }

    fn in_postimage(self) -> bool {
        matches!(
            self,
            LineOrigin::Context
                | LineOrigin::Addition
                | LineOrigin::ContextEOFNL
                | LineOrigin::AddEOFNL
        )
    }
}

/// One line inside a hunk, tagged with where it came from.
#[derive(Debug, Clone)]
pub struct TaggedLine<'a> {
    pub origin: LineOrigin,
    pub line: Line<'a>,
}

impl<'a> TaggedLine<'a> {
    pub fn new(origin: LineOrigin, line: Line<'a>) -> Self {
        TaggedLine { origin, line }
    }
}

/// A single localized textual edit, as parsed upstream from a diff.
///
/// `old_start`/`new_start` are 1-based; 0 means "empty side" (a pure
/// insertion has `old_start == 0`, a pure deletion has `new_start == 0`
/// for the side being removed — see `apply_hunk`'s anchor computation).
/// The applier assumes, but does not re-verify, that
/// `context + deletion count == old_count` and
/// `context + addition count == new_count`.
#[derive(Debug, Clone)]
pub struct Hunk<'a> {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<TaggedLine<'a>>,
}

impl<'a> Hunk<'a> {
    /// Build the preimage (lines expected at the anchor) and postimage
    /// (lines left behind) sequences from this hunk's tagged lines.
    fn sides(&self) -> (Vec<Line<'a>>, Vec<Line<'a>>) {
        let mut pre = Vec::new();
        let mut post = Vec::new();
        for tl in &self.lines {
            if tl.origin.in_preimage() {
                pre.push(tl.line.clone());
            }
            if tl.origin.in_postimage() {
                post.push(tl.line.clone());
            }
        }
        (pre, post)
    }
}

/// Apply one hunk to `image` in place.
///
/// Locates the hunk's preimage at the single anchor position derived from
/// `hunk.new_start` (no fuzzy or offset search — see spec's strict
/// positional match), then splices in the postimage. Returns
/// `Error::ApplyFail` carrying the hunk's target line number if the
/// preimage does not match at that position.
pub fn apply_hunk<'a>(image: &mut Image<'a>, hunk: &Hunk<'a>) -> Result<()> {
    let (preimage, postimage) = hunk.sides();

    // Convert 1-based new_start to a 0-based anchor; new_start == 0 means
    // "insert at top".
    let anchor = hunk.new_start.saturating_sub(1);
    let anchor = anchor.min(image.len());

    trace!(
        "apply_hunk: anchor={} preimage_len={} postimage_len={}",
        anchor,
        preimage.len(),
        postimage.len()
    );

    let candidate = image.slice(anchor, preimage.len());
    if candidate.len() != preimage.len() || !lines_equal(candidate, &preimage) {
        debug!("apply_hunk: preimage mismatch at line {}", hunk.new_start);
        return Err(Error::apply_fail_at(
            "hunk preimage does not match at anchor",
            hunk.new_start,
        ));
    }

    image.splice(anchor, preimage.len(), &postimage)?;
    Ok(())
}

fn lines_equal(a: &[Line<'_>], b: &[Line<'_>]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tl(origin: LineOrigin, bytes: &'static [u8]) -> TaggedLine<'static> {
        TaggedLine::new(origin, Line::from_slice(bytes))
    }

    #[test]
    fn scenario_a_simple_replacement() {
        let src = b"a\nb\nc\n";
        let mut image = Image::from_bytes(src);
        let hunk = Hunk {
            old_start: 1,
            old_count: 1,
            new_start: 1,
            new_count: 1,
            lines: vec![
                tl(LineOrigin::Context, b"a\n"),
                tl(LineOrigin::Deletion, b"b\n"),
                tl(LineOrigin::Addition, b"B\n"),
                tl(LineOrigin::Context, b"c\n"),
            ],
        };
        apply_hunk(&mut image, &hunk).unwrap();
        assert_eq!(image.to_bytes(), b"a\nB\nc\n");
    }

    #[test]
    fn scenario_b_insertion_at_top() {
        let src = b"x\n";
        let mut image = Image::from_bytes(src);
        let hunk = Hunk {
            old_start: 0,
            old_count: 0,
            new_start: 0,
            new_count: 1,
            lines: vec![tl(LineOrigin::Addition, b"hello\n")],
        };
        apply_hunk(&mut image, &hunk).unwrap();
        assert_eq!(image.to_bytes(), b"hello\nx\n");
    }

    #[test]
    fn scenario_c_deletion_no_trailing_newline() {
        let src = b"one\ntwo";
        let mut image = Image::from_bytes(src);
        let hunk = Hunk {
            old_start: 1,
            old_count: 2,
            new_start: 1,
            new_count: 0,
            lines: vec![
                tl(LineOrigin::Context, b"one\n"),
                tl(LineOrigin::DelEOFNL, b"two"),
            ],
        };
        apply_hunk(&mut image, &hunk).unwrap();
        assert_eq!(image.to_bytes(), b"one\n");
    }

    #[test]
    fn scenario_d_mismatch_rejects() {
        let src = b"a\nb\nc\n";
        let mut image = Image::from_bytes(src);
        let hunk = Hunk {
            old_start: 1,
            old_count: 1,
            new_start: 1,
            new_count: 1,
            lines: vec![
                tl(LineOrigin::Context, b"a\n"),
                tl(LineOrigin::Deletion, b"X\n"),
                tl(LineOrigin::Addition, b"Y\n"),
                tl(LineOrigin::Context, b"c\n"),
            ],
        };
        let err = apply_hunk(&mut image, &hunk).unwrap_err();
        match err {
            Error::ApplyFail { line: Some(1), .. } => {}
            other => panic!("unexpected error: {:?}", other),
        }
        // source unchanged
        assert_eq!(image.to_bytes(), src.to_vec());
    }

    #[test]
    fn exact_positioning_shifted_source_fails() {
        let src = b"z\na\nb\nc\n";
        let mut image = Image::from_bytes(src);
        let hunk = Hunk {
            old_start: 1,
            old_count: 1,
            new_start: 1,
            new_count: 1,
            lines: vec![
                tl(LineOrigin::Context, b"a\n"),
                tl(LineOrigin::Deletion, b"b\n"),
                tl(LineOrigin::Addition, b"B\n"),
                tl(LineOrigin::Context, b"c\n"),
            ],
        };
        assert!(apply_hunk(&mut image, &hunk).is_err());
    }

    #[test]
    fn length_arithmetic() {
        let src = b"a\nb\nc\n";
        let mut image = Image::from_bytes(src);
        let before = image.len();
        let hunk = Hunk {
            old_start: 1,
            old_count: 1,
            new_start: 1,
            new_count: 2,
            lines: vec![
                tl(LineOrigin::Context, b"a\n"),
                tl(LineOrigin::Deletion, b"b\n"),
                tl(LineOrigin::Addition, b"B1\n"),
                tl(LineOrigin::Addition, b"B2\n"),
                tl(LineOrigin::Context, b"c\n"),
            ],
        };
        apply_hunk(&mut image, &hunk).unwrap();
        assert_eq!(image.len() as isize - before as isize, 2 - 1);
    }
}
