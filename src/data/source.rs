use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use log::debug;

use crate::error::LoadError;

/// Directory holding the parquet files shipped with the crate.
pub const BUNDLED_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

/// File extension every dataset is stored under.
pub const EXTENSION: &str = "parquet";

// ---------------------------------------------------------------------------
// DatasetSource – where the parquet bytes come from
// ---------------------------------------------------------------------------

/// Resolves a dataset name to the raw bytes of its parquet file.
///
/// The loader only ever asks for whole files, one at a time, so
/// implementations hand back the complete contents.
pub trait DatasetSource: Send + Sync {
    fn fetch(&self, name: &str) -> Result<Bytes, LoadError>;

    /// Human-readable location, used in log lines.
    fn describe(&self) -> String;
}

impl<S: DatasetSource + ?Sized> DatasetSource for &S {
    fn fetch(&self, name: &str) -> Result<Bytes, LoadError> {
        (**self).fetch(name)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: DatasetSource + ?Sized> DatasetSource for Box<S> {
    fn fetch(&self, name: &str) -> Result<Bytes, LoadError> {
        (**self).fetch(name)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ---------------------------------------------------------------------------
// Directory source
// ---------------------------------------------------------------------------

/// Reads `<root>/<name>.parquet` from the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The `data/` directory packaged with the crate.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_DATA_DIR)
    }

    /// `./data`, resolved against the process working directory at read time.
    pub fn current_dir() -> Self {
        Self::new("data")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `name` would be read from.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{EXTENSION}"))
    }
}

impl Default for DirectorySource {
    fn default() -> Self {
        Self::bundled()
    }
}

impl DatasetSource for DirectorySource {
    fn fetch(&self, name: &str) -> Result<Bytes, LoadError> {
        let path = self.path_for(name);
        debug!("reading {}", path.display());

        // The handle lives only inside fs::read, so it is closed on both paths.
        match std::fs::read(&path) {
            Ok(buf) => Ok(Bytes::from(buf)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(LoadError::NotFound {
                name: name.to_string(),
                location: path.display().to_string(),
            }),
            Err(source) => Err(LoadError::Io {
                name: name.to_string(),
                path,
                source,
            }),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

/// Parquet files held in memory, keyed by dataset name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Bytes>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemorySource::insert`].
    pub fn with(mut self, name: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Bytes>) {
        self.files.insert(name.into(), contents.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl DatasetSource for MemorySource {
    fn fetch(&self, name: &str) -> Result<Bytes, LoadError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                name: name.to_string(),
                location: self.describe(),
            })
    }

    fn describe(&self) -> String {
        format!("<memory: {} files>", self.files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_path_is_name_dot_parquet() {
        let src = DirectorySource::new("/srv/cj");
        assert_eq!(src.path_for("coupons"), PathBuf::from("/srv/cj/coupons.parquet"));
        assert!(DirectorySource::bundled().root().ends_with("data"));
        assert_eq!(DirectorySource::current_dir().root(), Path::new("data"));
    }

    #[test]
    fn directory_missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let src = DirectorySource::new(tmp.path());

        let err = src.fetch("not_a_real_dataset").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.dataset(), "not_a_real_dataset");
    }

    #[test]
    fn directory_reads_whole_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("coupons.parquet"), b"PAR1 payload").unwrap();

        let src = DirectorySource::new(tmp.path());
        assert_eq!(src.fetch("coupons").unwrap(), Bytes::from_static(b"PAR1 payload"));
    }

    #[test]
    fn directory_unreadable_path_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        // a directory where the file should be
        std::fs::create_dir(tmp.path().join("products.parquet")).unwrap();

        let src = DirectorySource::new(tmp.path());
        let err = src.fetch("products").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn memory_source_lookup() {
        let src = MemorySource::new().with("products", vec![1u8, 2, 3]);
        assert_eq!(src.len(), 1);
        assert_eq!(src.fetch("products").unwrap().as_ref(), &[1, 2, 3]);
        assert!(src.fetch("coupons").unwrap_err().is_not_found());
    }
}
