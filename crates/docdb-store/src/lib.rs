//! Embedded JSON document store.
//!
//! Each document is one pretty-printed JSON file; each collection is one
//! directory under the store root:
//!
//! ```text
//! <root>/
//!   <collection>/
//!     <uuid>.json
//! ```
//!
//! # Operations
//!
//! All access goes through a [`Driver`]:
//!
//! - [`Driver::open`] -- open or create the root directory
//! - [`Driver::write`] -- store a value under a fresh [`DocumentId`]
//! - [`Driver::read`] / [`Driver::read_all`] -- load documents as [`Fields`]
//! - [`Driver::delete`] / [`Driver::delete_all`] -- remove a document or a
//!   whole collection
//!
//! # Design Rules
//!
//! 1. Every document file holds a JSON object whose `_id` equals its file stem.
//! 2. Writes and deletes are serialized per collection, parallel across
//!    collections. Reads take no lock.
//! 3. Locking is in-process only; two processes sharing a root are not
//!    coordinated.
//! 4. Files are overwritten in place. There is no write-ahead log and no
//!    atomic rename, so a crash can leave a truncated document.
//! 5. Errors are returned to the caller; nothing is retried.
//!
//! ```no_run
//! use docdb_store::Driver;
//! use serde_json::json;
//!
//! # fn main() -> docdb_store::StoreResult<()> {
//! let db = Driver::open("./store", None)?;
//! let id = db.write("users", &json!({"name": "kosi", "age": 21}))?;
//! let doc = db.read("users", id.as_str())?;
//! assert_eq!(doc["_id"], id.as_str());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod driver;
pub mod error;
pub mod locks;
pub mod logger;

pub use config::StoreConfig;
pub use document::{DocumentId, Fields, DOCUMENT_EXTENSION, ID_FIELD};
pub use driver::Driver;
pub use error::{StoreError, StoreResult};
pub use locks::LockRegistry;
pub use logger::{ConsoleLogger, LogLevel, Logger, NoopLogger, TracingLogger};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
