// src/fs/mock.rs

use std::collections::{BTreeSet, HashMap};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, bail, Result};

use super::FileSystem;

#[derive(Debug, Clone)]
enum Node {
    File { content: Vec<u8>, modified: SystemTime },
    Dir { children: BTreeSet<String> },
}

#[derive(Debug)]
struct Tree {
    nodes: HashMap<PathBuf, Node>,
    /// Seconds past the mock epoch; advanced by every write.
    clock: u64,
}

impl Tree {
    fn tick(&mut self) -> SystemTime {
        self.clock += 1;
        UNIX_EPOCH + Duration::from_secs(1_000_000 + self.clock)
    }

    fn file(&self, path: &Path) -> Result<(&[u8], SystemTime)> {
        match self.nodes.get(path) {
            Some(Node::File { content, modified }) => Ok((content, *modified)),
            Some(Node::Dir { .. }) => Err(anyhow!("{} is a directory", path.display())),
            None => Err(anyhow!("{} does not exist", path.display())),
        }
    }

    /// Create `dir` and any missing ancestors, linking each into its parent.
    fn mkdir_all(&mut self, dir: &Path) {
        if self.nodes.contains_key(dir) {
            return;
        }
        self.nodes.insert(
            dir.to_path_buf(),
            Node::Dir {
                children: BTreeSet::new(),
            },
        );
        if let Some(parent) = parent_of(dir).filter(|p| p != dir) {
            self.mkdir_all(&parent);
            self.link(&parent, dir);
        }
    }

    fn link(&mut self, parent: &Path, child: &Path) {
        let name = child.file_name().and_then(|n| n.to_str());
        if let (Some(Node::Dir { children }), Some(name)) = (self.nodes.get_mut(parent), name) {
            children.insert(name.to_string());
        }
    }

    fn unlink(&mut self, parent: &Path, child: &Path) {
        let name = child.file_name().and_then(|n| n.to_str());
        if let (Some(Node::Dir { children }), Some(name)) = (self.nodes.get_mut(parent), name) {
            children.remove(name);
        }
    }
}

/// Relative paths hang off ".", absolute ones off their real parent.
fn parent_of(path: &Path) -> Option<PathBuf> {
    match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Some(PathBuf::from(".")),
        Some(p) => Some(p.to_path_buf()),
        None => None,
    }
}

/// In-memory filesystem with a logical clock.
///
/// Every write advances the clock by one second, so a file written later is
/// always strictly newer than one written earlier. Tests can pin times with
/// [`MockFileSystem::set_modified`]. Clones share the same tree.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    tree: Arc<Mutex<Tree>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut tree = Tree {
            nodes: HashMap::new(),
            clock: 0,
        };
        tree.mkdir_all(Path::new("."));
        Self {
            tree: Arc::new(Mutex::new(tree)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        // A panicking test thread must not hide the tree from the others.
        self.tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create or replace a file, creating its directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut tree = self.lock();
        let modified = tree.tick();
        tree.nodes.insert(
            path.to_path_buf(),
            Node::File {
                content: content.into(),
                modified,
            },
        );
        if let Some(parent) = parent_of(path) {
            tree.mkdir_all(&parent);
            tree.link(&parent, path);
        }
    }

    /// Override the modification time of an existing file.
    pub fn set_modified(&self, path: impl AsRef<Path>, time: SystemTime) {
        if let Some(Node::File { modified, .. }) = self.lock().nodes.get_mut(path.as_ref()) {
            *modified = time;
        }
    }

    /// Bump a file's modification time without changing its content.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut tree = self.lock();
        let now = tree.tick();
        if let Some(Node::File { modified, .. }) = tree.nodes.get_mut(path.as_ref()) {
            *modified = now;
        }
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lock().nodes.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().nodes.get(path), Some(Node::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().nodes.get(path), Some(Node::Dir { .. }))
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        self.lock().file(path).map(|(_, modified)| modified)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // Tests address everything by absolute path already.
        Ok(path.to_path_buf())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.lock().nodes.get(path) {
            Some(Node::Dir { children }) => Ok(children.iter().map(|n| path.join(n)).collect()),
            Some(Node::File { .. }) => bail!("{} is not a directory", path.display()),
            None => bail!("{} does not exist", path.display()),
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let tree = self.lock();
        let (content, _) = tree.file(path)?;
        String::from_utf8(content.to_vec())
            .map_err(|e| anyhow!("{} is not UTF-8: {e}", path.display()))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let (content, _) = self.lock().file(path).map(|(c, m)| (c.to_vec(), m))?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut tree = self.lock();
        tree.file(path)?;
        tree.nodes.remove(path);
        if let Some(parent) = parent_of(path) {
            tree.unlink(&parent, path);
        }
        Ok(())
    }
}
