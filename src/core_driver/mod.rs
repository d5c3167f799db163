//! Storage backend contracts consumed by the protocol engine.
//!
//! The engine never touches storage itself. Every path handed to a
//! [`Driver`] is absolute and lexically clean, but keeping it inside the
//! backend's own root is the driver's job.

pub mod error;
pub mod fileinfo;
pub mod memory;
pub mod perm;

pub use error::DriverError;
pub use fileinfo::FileInfo;
pub use memory::{MemDriver, MemDriverFactory};
pub use perm::{Perm, SimplePerm};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncRead;

/// A readable byte stream of unknown length moving between a driver and a data connection.
pub type FileReader = Box<dyn AsyncRead + Send + Unpin>;

/// Persistence backend owned by exactly one session.
#[async_trait]
pub trait Driver: Send {
    /// Checks that `path` is a directory the client may change into.
    async fn change_dir(&mut self, path: &str) -> Result<(), DriverError>;

    /// Lists the entries of the directory at `path`.
    async fn dir_contents(&mut self, path: &str) -> Result<Vec<FileInfo>, DriverError>;

    async fn delete_dir(&mut self, path: &str) -> Result<(), DriverError>;

    async fn delete_file(&mut self, path: &str) -> Result<(), DriverError>;

    async fn rename(&mut self, from: &str, to: &str) -> Result<(), DriverError>;

    async fn make_dir(&mut self, path: &str) -> Result<(), DriverError>;

    /// Size in bytes of the file at `path`.
    async fn bytes(&mut self, path: &str) -> Result<u64, DriverError>;

    async fn modified_time(&mut self, path: &str) -> Result<DateTime<Utc>, DriverError>;

    /// Opens the file at `path` for download, starting `offset` bytes in.
    async fn get_file(&mut self, path: &str, offset: u64) -> Result<FileReader, DriverError>;

    /// Stores `data` at `path`, appending to an existing file when `append` is set.
    /// Returns the number of bytes written.
    async fn put_file(
        &mut self,
        path: &str,
        data: FileReader,
        append: bool,
    ) -> Result<u64, DriverError>;
}

/// Builds one [`Driver`] per accepted control connection.
pub trait DriverFactory: Send + Sync {
    fn new_driver(&self) -> Result<Box<dyn Driver>, DriverError>;
}
