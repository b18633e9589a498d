//! Include-Dependency Tracking
//!
//! The shader compiler resolves every template and include through
//! [`DependencyRecorder::load`], which notes the absolute path and
//! last-modified timestamp of each file it opens. The snapshot taken after a
//! successful compile becomes the program's [`FileMetadata`]; the hot-reload
//! scanner later compares those timestamps against the filesystem without
//! re-parsing any source.
//!
//! Resolution is disk-first against the configured shader root. Files that
//! are missing on disk fall back to the copies embedded at build time, which
//! record no dependency (embedded content cannot go stale).

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use minijinja::{Error, ErrorKind};
use parking_lot::Mutex;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "shaders"]
struct ShaderAssets;

/// Staleness record of one compiled shader program.
///
/// Holds the resolved primary source path and every file transitively opened
/// during the most recent successful compile, together with the modification
/// timestamps observed at that time. Repeated includes of the same file are
/// collapsed to a single entry.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    source_path: PathBuf,
    dependencies: Vec<(PathBuf, SystemTime)>,
}

impl FileMetadata {
    /// Resolved path of the primary source file.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Every file opened during the compile, with its observed timestamp.
    #[must_use]
    pub fn dependencies(&self) -> &[(PathBuf, SystemTime)] {
        &self.dependencies
    }

    /// Returns `true` when any dependency's on-disk modification time differs
    /// from the recorded one. A dependency that can no longer be read counts
    /// as stale; the retry then surfaces the read failure as a compile
    /// diagnostic.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.dependencies.iter().any(|(path, recorded)| {
            match std::fs::metadata(path).and_then(|meta| meta.modified()) {
                Ok(current) => current != *recorded,
                Err(_) => true,
            }
        })
    }
}

/// Accumulates the dependency list of one compilation.
///
/// One recorder lives exactly as long as one compile: the template
/// environment's loader callback funnels every file access through
/// [`DependencyRecorder::load`], and [`DependencyRecorder::snapshot`] turns
/// the accumulated list into the program's [`FileMetadata`].
pub struct DependencyRecorder {
    root: PathBuf,
    entries: Mutex<Vec<(PathBuf, SystemTime)>>,
}

impl DependencyRecorder {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Template loader callback: resolves `name` against the shader root,
    /// records the file, and returns its contents.
    ///
    /// Names without an extension get `.wgsl` appended. Returns `Ok(None)`
    /// when the file exists neither on disk nor in the embedded assets, which
    /// the template engine reports as a missing-template error.
    pub(crate) fn load(&self, name: &str) -> Result<Option<String>, Error> {
        let filename = if Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wgsl"))
        {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(format!("{name}.wgsl"))
        };

        let path = self.root.join(filename.as_ref());
        if path.exists() {
            let modified = std::fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .map_err(|e| {
                    Error::new(
                        ErrorKind::InvalidOperation,
                        format!("Failed to stat shader file {}: {e}", path.display()),
                    )
                })?;
            let source = std::fs::read_to_string(&path).map_err(|e| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!("Failed to read shader file {}: {e}", path.display()),
                )
            })?;

            let mut entries = self.entries.lock();
            if !entries.iter().any(|(recorded, _)| recorded == &path) {
                entries.push((path, modified));
            }
            return Ok(Some(source));
        }

        if let Some(file) = ShaderAssets::get(filename.as_ref()) {
            if let Ok(source) = std::str::from_utf8(file.data.as_ref()) {
                return Ok(Some(source.to_string()));
            }
        }

        Ok(None)
    }

    /// Freezes the accumulated list into a [`FileMetadata`].
    ///
    /// The first recorded entry is the primary source; for a compile resolved
    /// entirely from embedded assets the unresolved root path is kept so the
    /// metadata still names its origin.
    #[must_use]
    pub(crate) fn snapshot(&self, source_name: &str) -> FileMetadata {
        let dependencies = self.entries.lock().clone();
        let source_path = dependencies
            .first()
            .map_or_else(|| self.root.join(source_name), |(path, _)| path.clone());
        FileMetadata {
            source_path,
            dependencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("prism_dep_{}_{tag}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        root
    }

    #[test]
    fn load_records_each_file_once() {
        let root = temp_root("dedupe");
        std::fs::write(root.join("a.wgsl"), "fn a() {}").unwrap();

        let recorder = DependencyRecorder::new(root.clone());
        recorder.load("a").unwrap();
        recorder.load("a.wgsl").unwrap();

        let meta = recorder.snapshot("a");
        assert_eq!(meta.dependencies().len(), 1);
        assert_eq!(meta.source_path(), root.join("a.wgsl"));
    }

    #[test]
    fn missing_file_is_reported_as_absent() {
        let root = temp_root("missing");
        let recorder = DependencyRecorder::new(root);
        assert!(recorder.load("nope").unwrap().is_none());
    }

    #[test]
    fn metadata_goes_stale_when_file_changes() {
        let root = temp_root("stale");
        let path = root.join("b.wgsl");
        std::fs::write(&path, "fn b() {}").unwrap();

        let recorder = DependencyRecorder::new(root);
        recorder.load("b").unwrap();
        let meta = recorder.snapshot("b");
        assert!(!meta.is_stale());

        let file = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap();
        file.set_modified(SystemTime::now() + std::time::Duration::from_secs(5))
            .unwrap();
        assert!(meta.is_stale());
    }

    #[test]
    fn deleted_dependency_counts_as_stale() {
        let root = temp_root("deleted");
        let path = root.join("c.wgsl");
        std::fs::write(&path, "fn c() {}").unwrap();

        let recorder = DependencyRecorder::new(root);
        recorder.load("c").unwrap();
        let meta = recorder.snapshot("c");

        std::fs::remove_file(&path).unwrap();
        assert!(meta.is_stale());
    }
}
