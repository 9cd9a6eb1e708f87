use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::StoreConfig;
use crate::document::{self, DocumentId, Fields, DOCUMENT_EXTENSION, ID_FIELD};
use crate::error::{StoreError, StoreResult};
use crate::locks::{self, LockRegistry};
use crate::logger::Logger;

/// Handle to a document store rooted at a directory.
///
/// Documents live at `<root>/<collection>/<id>.json`. Writes, deletes and
/// collection deletes are serialized per collection; reads take no lock and
/// may observe a document while it is being written.
pub struct Driver {
    dir: PathBuf,
    locks: LockRegistry,
    log: Arc<dyn Logger>,
}

impl Driver {
    /// Open the store at `dir`, creating the directory if it does not exist.
    ///
    /// Only the last path component is created; a missing parent is an I/O
    /// error. Opening an existing directory leaves its contents untouched.
    pub fn open(dir: impl AsRef<Path>, config: Option<StoreConfig>) -> StoreResult<Self> {
        let config = config.unwrap_or_default();
        let driver = Self {
            dir: clean_path(dir.as_ref()),
            locks: LockRegistry::new(),
            log: config.resolve_logger(),
        };

        if fs::metadata(&driver.dir).is_ok() {
            driver.log.debug(format_args!(
                "using '{}', database already exists",
                driver.dir.display()
            ));
        } else {
            driver
                .log
                .debug(format_args!("creating database in '{}'", driver.dir.display()));
            dir_builder(false).create(&driver.dir)?;
        }
        Ok(driver)
    }

    /// The normalized root directory.
    pub fn root(&self) -> &Path {
        &self.dir
    }

    /// The logger this driver reports lifecycle notices to.
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.log
    }

    /// Store `value` as a new document in `collection` and return its id.
    ///
    /// The value must encode to a JSON object. Its `_id` field is set (or
    /// replaced) with the generated id. The file is overwritten in place, so
    /// a crash mid-write can leave it truncated.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        value: &T,
    ) -> StoreResult<DocumentId> {
        if collection.is_empty() {
            return Err(StoreError::Validation(
                "missing collection - no place to save record".into(),
            ));
        }
        let mut fields = document::to_fields(value)?.ok_or_else(|| {
            StoreError::Validation("no data to store in the database".into())
        })?;

        let id = DocumentId::generate();
        fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        let bytes = document::encode(&fields)?;

        let lock = self.locks.get_or_create(collection);
        let _guard = locks::acquire(&lock);

        let dir = self.collection_dir(collection);
        dir_builder(true).create(&dir)?;
        write_file(&dir.join(id.file_name()), &bytes)?;

        self.log
            .trace(format_args!("wrote document '{id}' to '{collection}'"));
        Ok(id)
    }

    /// Read a single document.
    pub fn read(&self, collection: &str, id: &str) -> StoreResult<Fields> {
        require_collection(collection)?;
        require_id(id)?;

        let base = self.collection_dir(collection).join(id);
        match stat(&base) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::DocumentNotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        read_document(&with_extension(&base))
    }

    /// Read every document in a collection, ordered by file name.
    ///
    /// The first unreadable or malformed entry aborts the whole call.
    pub fn read_all(&self, collection: &str) -> StoreResult<Vec<Fields>> {
        require_collection(collection)?;

        let dir = self.collection_dir(collection);
        self.stat_collection(&dir, collection)?;

        let mut paths = fs::read_dir(&dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        paths.sort();

        paths.iter().map(|path| read_document(path)).collect()
    }

    /// Read a document and decode it into `T`.
    pub fn read_as<T: DeserializeOwned>(&self, collection: &str, id: &str) -> StoreResult<T> {
        let fields = self.read(collection, id)?;
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| StoreError::decode(format!("{collection}/{id}"), e))
    }

    /// Read every document in a collection and decode each into `T`.
    pub fn read_all_as<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<Vec<T>> {
        self.read_all(collection)?
            .into_iter()
            .map(|fields| {
                let what = match fields.get(ID_FIELD).and_then(Value::as_str) {
                    Some(id) => format!("{collection}/{id}"),
                    None => collection.to_string(),
                };
                serde_json::from_value(Value::Object(fields))
                    .map_err(|e| StoreError::decode(what, e))
            })
            .collect()
    }

    /// Delete one document.
    ///
    /// A missing collection directory surfaces the raw I/O error. The removal
    /// is recursive: a directory named `<id>.json` is removed as well.
    pub fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        require_collection(collection)?;
        require_id(id)?;

        let dir = self.collection_dir(collection);
        stat(&dir)?;

        let lock = self.locks.get_or_create(collection);
        let _guard = locks::acquire(&lock);

        let base = dir.join(id);
        if stat(&base).is_err() {
            return Err(StoreError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        remove_all(&with_extension(&base))?;

        self.log
            .trace(format_args!("deleted document '{id}' from '{collection}'"));
        Ok(())
    }

    /// Delete a collection directory and everything in it.
    ///
    /// The collection's lock stays registered.
    pub fn delete_all(&self, collection: &str) -> StoreResult<()> {
        require_collection(collection)?;

        let lock = self.locks.get_or_create(collection);
        let _guard = locks::acquire(&lock);

        let dir = self.collection_dir(collection);
        self.stat_collection(&dir, collection)?;
        remove_all(&dir)?;

        self.log
            .debug(format_args!("deleted collection '{collection}'"));
        Ok(())
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.dir.join(collection)
    }

    fn stat_collection(&self, dir: &Path, collection: &str) -> StoreResult<()> {
        match stat(dir) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::CollectionNotFound(collection.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("dir", &self.dir)
            .field("collections_locked", &self.locks.len())
            .finish()
    }
}

fn require_collection(collection: &str) -> StoreResult<()> {
    if collection.is_empty() {
        return Err(StoreError::Validation("collection can not be empty".into()));
    }
    Ok(())
}

fn require_id(id: &str) -> StoreResult<()> {
    if id.is_empty() {
        return Err(StoreError::Validation("id can not be empty".into()));
    }
    Ok(())
}

/// Stat `path`, falling back to `path.json` when `path` does not exist.
fn stat(path: &Path) -> io::Result<fs::Metadata> {
    match fs::metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => fs::metadata(with_extension(path)),
        other => other,
    }
}

/// Append `.json` to the full path (ids may contain dots).
fn with_extension(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(DOCUMENT_EXTENSION);
    PathBuf::from(name)
}

fn read_document(path: &Path) -> StoreResult<Fields> {
    let bytes = fs::read(path)?;
    document::decode(&bytes, &path.display().to_string())
}

/// Remove a file or directory tree. A missing path is not an error.
fn remove_all(path: &Path) -> io::Result<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) => Err(e),
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn dir_builder(recursive: bool) -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(recursive);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)
}

/// Lexically normalize a path: drop `.`, fold `..` into its parent where
/// possible, and map the empty path to `.`.
fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
