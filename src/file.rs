//! Whole-file persistence.
//!
//! Every operation reads the entire file, decompresses it, works on the
//! in-memory [`Document`], and for mutations compresses and writes the result
//! to a sibling temporary file that is then renamed over the target. The
//! wrapper does no locking; callers must serialize access to one path.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::debug;

use crate::{Compressor, Document, Key, Registry, Result, Tag};

/// An ODS file on disk, compressed as a whole with one compressor.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use ods::{GzipCompression, OdsFile, Registry, Tag};
///
/// let file = OdsFile::new("save.ods", Arc::new(GzipCompression), Arc::new(Registry::default()));
/// file.save(&[Tag::string("ExampleKey", "This is an example string!")])?;
/// assert!(file.find("ExampleKey")?);
/// # Ok::<(), ods::Error>(())
/// ```
#[derive(Clone)]
pub struct OdsFile {
    path: PathBuf,
    compressor: Arc<dyn Compressor>,
    registry: Arc<Registry>,
}

impl OdsFile {
    pub fn new(
        path: impl Into<PathBuf>,
        compressor: Arc<dyn Compressor>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            path: path.into(),
            compressor,
            registry,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decompresses the file. A missing file is an empty document.
    pub fn load(&self) -> Result<Document> {
        match fs::read(&self.path) {
            Ok(bytes) => Document::import(&bytes, self.compressor.as_ref(), self.registry.clone()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Ok(Document::with_registry(self.registry.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Compresses `document` and atomically replaces the file with it.
    pub fn store(&self, document: &Document) -> Result<()> {
        let bytes = document.export(self.compressor.as_ref())?;
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        if let Err(e) = write_synced(&temp, &bytes).and_then(|()| fs::rename(&temp, &self.path)) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }
        debug!(path = %self.path.display(), len = bytes.len(), "stored document");
        Ok(())
    }

    /// Loads, runs `f`, and stores the document if `f` reports a change.
    fn update<R>(&self, f: impl FnOnce(&mut Document) -> Result<(R, bool)>) -> Result<R> {
        let mut document = self.load()?;
        let (result, changed) = f(&mut document)?;
        if changed {
            self.store(&document)?;
        }
        Ok(result)
    }

    pub fn get(&self, key: impl Key) -> Result<Option<Tag>> {
        self.load()?.get(key)
    }

    pub fn find(&self, key: impl Key) -> Result<bool> {
        self.load()?.find(key)
    }

    pub fn get_all(&self) -> Result<Vec<Tag>> {
        self.load()?.get_all()
    }

    /// Overwrites the file with `tags`, creating it if needed.
    pub fn save(&self, tags: &[Tag]) -> Result<()> {
        let mut document = Document::with_registry(self.registry.clone());
        document.save(tags)?;
        self.store(&document)
    }

    pub fn append(&self, tag: &Tag) -> Result<()> {
        self.update(|document| document.append(tag).map(|()| ((), true)))
    }

    pub fn append_all(&self, tags: &[Tag]) -> Result<()> {
        self.update(|document| document.append_all(tags).map(|()| ((), true)))
    }

    pub fn delete(&self, key: impl Key) -> Result<bool> {
        self.update(|document| document.delete(key).map(|deleted| (deleted, deleted)))
    }

    pub fn replace(&self, key: impl Key, tag: &Tag) -> Result<bool> {
        self.update(|document| document.replace(key, tag).map(|done| (done, done)))
    }

    pub fn set(&self, key: impl Key, tag: &Tag) -> Result<()> {
        self.update(|document| document.set(key, tag).map(|()| ((), true)))
    }

    pub fn unset(&self, key: impl Key) -> Result<()> {
        self.update(|document| document.unset(key).map(|()| ((), true)))
    }
}

/// Writes `bytes` to `path` and flushes them to disk.
fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
