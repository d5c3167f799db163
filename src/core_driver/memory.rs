use crate::core_driver::{Driver, DriverError, DriverFactory, FileInfo, FileReader, Perm};
use crate::helpers::clean_path;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
enum MemNode {
    Dir {
        mod_time: DateTime<Utc>,
    },
    File {
        data: Vec<u8>,
        mod_time: DateTime<Utc>,
    },
}

impl MemNode {
    fn mod_time(&self) -> DateTime<Utc> {
        match self {
            MemNode::Dir { mod_time } | MemNode::File { mod_time, .. } => *mod_time,
        }
    }
}

/// In-memory file tree keyed by absolute clean path. `/` always exists.
#[derive(Debug)]
struct MemFs {
    nodes: BTreeMap<String, MemNode>,
}

impl MemFs {
    fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            "/".to_string(),
            MemNode::Dir {
                mod_time: Utc::now(),
            },
        );
        Self { nodes }
    }

    fn is_dir(&self, path: &str) -> bool {
        matches!(self.nodes.get(path), Some(MemNode::Dir { .. }))
    }

    fn require_parent_dir(&self, path: &str) -> Result<(), DriverError> {
        let parent = parent_of(path);
        if self.is_dir(&parent) {
            Ok(())
        } else {
            Err(DriverError::NotFound(parent))
        }
    }

    fn children<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = (&'a String, &'a MemNode)> {
        self.nodes
            .iter()
            .filter(move |(path, _)| path.as_str() != "/" && parent_of(path) == dir)
    }

    fn make_dir_all(&mut self, path: &str) {
        let mut current = String::new();
        for element in path.split('/').filter(|e| !e.is_empty()) {
            current.push('/');
            current.push_str(element);
            self.nodes
                .entry(current.clone())
                .or_insert_with(|| MemNode::Dir {
                    mod_time: Utc::now(),
                });
        }
    }
}

/// Roots every path at `/` and removes any `..` escape.
fn normalize(path: &str) -> String {
    clean_path(&format!("/{}", path))
}

fn parent_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Driver storing everything in memory. All drivers built by one
/// [`MemDriverFactory`] share the same tree.
pub struct MemDriver {
    fs: Arc<Mutex<MemFs>>,
    perm: Arc<dyn Perm>,
}

impl MemDriver {
    fn file_info(&self, path: &str, node: &MemNode) -> Result<FileInfo, DriverError> {
        let owner = self.perm.get_owner(path)?;
        let group = self.perm.get_group(path)?;
        let info = match node {
            MemNode::Dir { .. } => FileInfo::new_dir(base_name(path)),
            MemNode::File { data, .. } => FileInfo::new_file(base_name(path), data.len() as u64)
                .with_mode(self.perm.get_mode(path)?),
        };
        Ok(info
            .with_owner(owner, group)
            .with_mod_time(node.mod_time()))
    }
}

#[async_trait]
impl Driver for MemDriver {
    async fn change_dir(&mut self, path: &str) -> Result<(), DriverError> {
        let path = normalize(path);
        let fs = self.fs.lock().await;
        match fs.nodes.get(&path) {
            Some(MemNode::Dir { .. }) => Ok(()),
            Some(MemNode::File { .. }) => Err(DriverError::NotADirectory(path)),
            None => Err(DriverError::NotFound(path)),
        }
    }

    async fn dir_contents(&mut self, path: &str) -> Result<Vec<FileInfo>, DriverError> {
        let path = normalize(path);
        let fs = self.fs.lock().await;
        match fs.nodes.get(&path) {
            Some(MemNode::Dir { .. }) => {}
            Some(MemNode::File { .. }) => return Err(DriverError::NotADirectory(path)),
            None => return Err(DriverError::NotFound(path)),
        }
        let entries = fs
            .children(&path)
            .map(|(child, node)| self.file_info(child, node))
            .collect::<Result<Vec<_>, _>>();
        entries
    }

    async fn delete_dir(&mut self, path: &str) -> Result<(), DriverError> {
        let path = normalize(path);
        if path == "/" {
            return Err(DriverError::PermissionDenied(path));
        }
        let mut fs = self.fs.lock().await;
        if !fs.is_dir(&path) {
            return Err(DriverError::NotFound(path));
        }
        if fs.children(&path).next().is_some() {
            return Err(DriverError::DirectoryNotEmpty(path));
        }
        fs.nodes.remove(&path);
        debug!("MemDriver removed directory {}", path);
        Ok(())
    }

    async fn delete_file(&mut self, path: &str) -> Result<(), DriverError> {
        let path = normalize(path);
        let mut fs = self.fs.lock().await;
        match fs.nodes.get(&path) {
            Some(MemNode::File { .. }) => {}
            Some(MemNode::Dir { .. }) => return Err(DriverError::NotAFile(path)),
            None => return Err(DriverError::NotFound(path)),
        }
        fs.nodes.remove(&path);
        debug!("MemDriver removed file {}", path);
        Ok(())
    }

    async fn rename(&mut self, from: &str, to: &str) -> Result<(), DriverError> {
        let from = normalize(from);
        let to = normalize(to);
        if from == "/" || to == "/" {
            return Err(DriverError::PermissionDenied(from));
        }
        let mut fs = self.fs.lock().await;
        if !fs.nodes.contains_key(&from) {
            return Err(DriverError::NotFound(from));
        }
        if fs.nodes.contains_key(&to) {
            return Err(DriverError::AlreadyExists(to));
        }
        if to.starts_with(&format!("{}/", from)) {
            return Err(DriverError::PermissionDenied(to));
        }
        fs.require_parent_dir(&to)?;

        let prefix = format!("{}/", from);
        let moved: Vec<String> = fs
            .nodes
            .keys()
            .filter(|key| **key == from || key.starts_with(&prefix))
            .cloned()
            .collect();
        for old in moved {
            if let Some(node) = fs.nodes.remove(&old) {
                let new = format!("{}{}", to, &old[from.len()..]);
                fs.nodes.insert(new, node);
            }
        }
        debug!("MemDriver renamed {} to {}", from, to);
        Ok(())
    }

    async fn make_dir(&mut self, path: &str) -> Result<(), DriverError> {
        let path = normalize(path);
        let mut fs = self.fs.lock().await;
        if fs.nodes.contains_key(&path) {
            return Err(DriverError::AlreadyExists(path));
        }
        fs.require_parent_dir(&path)?;
        fs.nodes.insert(
            path,
            MemNode::Dir {
                mod_time: Utc::now(),
            },
        );
        Ok(())
    }

    async fn bytes(&mut self, path: &str) -> Result<u64, DriverError> {
        let path = normalize(path);
        let fs = self.fs.lock().await;
        match fs.nodes.get(&path) {
            Some(MemNode::File { data, .. }) => Ok(data.len() as u64),
            Some(MemNode::Dir { .. }) => Err(DriverError::NotAFile(path)),
            None => Err(DriverError::NotFound(path)),
        }
    }

    async fn modified_time(&mut self, path: &str) -> Result<DateTime<Utc>, DriverError> {
        let path = normalize(path);
        let fs = self.fs.lock().await;
        fs.nodes
            .get(&path)
            .map(MemNode::mod_time)
            .ok_or(DriverError::NotFound(path))
    }

    async fn get_file(&mut self, path: &str, offset: u64) -> Result<FileReader, DriverError> {
        let path = normalize(path);
        let fs = self.fs.lock().await;
        match fs.nodes.get(&path) {
            Some(MemNode::File { data, .. }) => {
                let start = usize::try_from(offset).unwrap_or(usize::MAX).min(data.len());
                Ok(Box::new(Cursor::new(data[start..].to_vec())))
            }
            Some(MemNode::Dir { .. }) => Err(DriverError::NotAFile(path)),
            None => Err(DriverError::NotFound(path)),
        }
    }

    async fn put_file(
        &mut self,
        path: &str,
        mut data: FileReader,
        append: bool,
    ) -> Result<u64, DriverError> {
        let path = normalize(path);
        {
            let fs = self.fs.lock().await;
            fs.require_parent_dir(&path)?;
            if fs.is_dir(&path) {
                return Err(DriverError::NotAFile(path));
            }
        }

        let mut buffer = Vec::new();
        let received = data.read_to_end(&mut buffer).await? as u64;

        let mut fs = self.fs.lock().await;
        let now = Utc::now();
        let existing_file = matches!(fs.nodes.get(&path), Some(MemNode::File { .. }));
        if append && existing_file {
            if let Some(MemNode::File { data, mod_time }) = fs.nodes.get_mut(&path) {
                data.extend_from_slice(&buffer);
                *mod_time = now;
            }
        } else {
            fs.nodes.insert(
                path.clone(),
                MemNode::File {
                    data: buffer,
                    mod_time: now,
                },
            );
        }
        debug!("MemDriver stored {} bytes at {}", received, path);
        Ok(received)
    }
}

/// Hands out [`MemDriver`]s that all operate on one shared tree.
pub struct MemDriverFactory {
    fs: Arc<Mutex<MemFs>>,
    perm: Arc<dyn Perm>,
}

impl MemDriverFactory {
    pub fn new(perm: impl Perm + 'static) -> Self {
        Self {
            fs: Arc::new(Mutex::new(MemFs::new())),
            perm: Arc::new(perm),
        }
    }

    /// Seeds a file, creating missing parent directories. Meant for setup
    /// before the server starts handing out drivers.
    pub fn with_file(self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        let path = normalize(path);
        match self.fs.try_lock() {
            Ok(mut fs) => {
                fs.make_dir_all(&parent_of(&path));
                fs.nodes.insert(
                    path,
                    MemNode::File {
                        data: contents.into(),
                        mod_time: Utc::now(),
                    },
                );
            }
            Err(_) => warn!("MemDriverFactory busy, not seeding {}", path),
        }
        self
    }
}

impl DriverFactory for MemDriverFactory {
    fn new_driver(&self) -> Result<Box<dyn Driver>, DriverError> {
        Ok(Box::new(MemDriver {
            fs: Arc::clone(&self.fs),
            perm: Arc::clone(&self.perm),
        }))
    }
}
