/*!
Core of a patch-application engine: given a previous version of a file and
a structured patch describing how it changed, produce the new version of
the file.

This crate covers exactly the patch-to-contents transform — hunk
localization on a line-indexed [`Image`], image mutation preserving hunk
semantics, and binary delta application with round-trip validation. It
does not parse diffs into patches, does not implement the zlib inflate or
git-style delta decoder primitives itself (those are consumed through the
[`Inflate`] and [`DeltaDecoder`] traits; default implementations are
provided), and does not touch a filesystem, repository, or index — it
consumes an opaque preimage (`&[u8]`) and produces an opaque postimage
(`path, mode, bytes`) triple.

```
use patchcore::{
    apply_patch, Delta, DeltaFlags, DeltaStatus, FileRef, Hunk, LineOrigin,
    Line, Mode, Options, TaggedLine, ZlibInflate, GitDeltaDecoder,
};

let src = b"a\nb\nc\n";
let hunk = Hunk {
    old_start: 1,
    old_count: 1,
    new_start: 1,
    new_count: 1,
    lines: vec![
        TaggedLine::new(LineOrigin::Context, Line::from_slice(b"a\n")),
        TaggedLine::new(LineOrigin::Deletion, Line::from_slice(b"b\n")),
        TaggedLine::new(LineOrigin::Addition, Line::from_slice(b"B\n")),
        TaggedLine::new(LineOrigin::Context, Line::from_slice(b"c\n")),
    ],
};
let delta = Delta {
    status: DeltaStatus::Modified,
    old_file: FileRef { path: "f.txt".into(), mode: Mode::REGULAR },
    new_file: FileRef { path: "f.txt".into(), mode: Mode::REGULAR },
    flags: DeltaFlags::default(),
    hunks: vec![hunk],
    binary: None,
};

let (path, mode, bytes) = apply_patch(
    src, &delta, &ZlibInflate, &GitDeltaDecoder, &Options::default(),
).unwrap();
assert_eq!(path.as_deref(), Some("f.txt"));
assert_eq!(mode, Mode::REGULAR);
assert_eq!(bytes, b"a\nB\nc\n");
```
*/

mod binary;
mod collab;
mod delta;
mod driver;
mod error;
mod gitdelta;
mod hunk;
mod image;

pub use binary::{
    apply_bdelta, apply_bdelta_with_capacity, apply_binary_patch, apply_binary_patch_with_capacity,
    BinaryFile, BinaryFileType, BinaryPatch, DeltaDecoder, Inflate, ZlibInflate,
};
pub use collab::{ApplyLocation, MapPreimageReader, PreimageReader, ReadError};
pub use delta::{Delta, DeltaFlags, DeltaStatus, FileRef, Mode};
pub use driver::{
    apply_patch, apply_patch_from_reader, order_batch, read_preimage, ApplyOutput, BatchItem,
    BatchOp, Options,
};
pub use error::{Error, Result};
pub use gitdelta::{apply_delta, GitDeltaDecoder};
pub use hunk::{apply_hunk, Hunk, LineOrigin, TaggedLine};
pub use image::{Image, Line};
