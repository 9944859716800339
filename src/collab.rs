/// Error surfaced by a [`PreimageReader`] (spec §6.1). `NotFound` is kept
/// distinct from `Io` so the driver can re-classify a missing preimage as
/// an `ApplyFail` (a patch-level failure) rather than a transport failure.
#[derive(Debug, Clone)]
pub enum ReadError {
    NotFound,
    Io(String),
}

/// Opaque preimage source: path → bytes. The core never touches a
/// filesystem, repository, or index directly; it only calls this trait.
pub trait PreimageReader {
    fn read(&self, path: &str) -> Result<Vec<u8>, ReadError>;
}

/// An in-memory preimage reader, useful for tests and for callers that
/// already have the relevant blobs resident.
#[derive(Debug, Default, Clone)]
pub struct MapPreimageReader {
    files: std::collections::HashMap<String, Vec<u8>>,
}

impl MapPreimageReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }
}

impl PreimageReader for MapPreimageReader {
    fn read(&self, path: &str) -> Result<Vec<u8>, ReadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or(ReadError::NotFound)
    }
}

/// Which location a preimage should be read from / a postimage written to
/// (spec §6.3). The core's transform does not branch on this itself — it
/// exists so collaborators have a stable type to pass across the
/// core/collaborator boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyLocation {
    Workdir,
    Index,
    Both,
}

impl Default for ApplyLocation {
    fn default() -> Self {
        ApplyLocation::Workdir
    }
}
