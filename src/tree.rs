use anyhow::anyhow;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A non-directory entry found while walking.
///
/// Symlinks are never followed, so a symlink to a directory is recorded here
/// too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
}

/// A directory and everything visible beneath it at scan time.
///
/// Children are stored in the order they were discovered (ascending by file
/// name). Hidden entries and excluded directories never appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    pub path: PathBuf,
    pub dirs: Vec<DirectoryNode>,
    pub files: Vec<FileEntry>,
}

impl DirectoryNode {
    fn empty(path: PathBuf) -> Self {
        Self {
            path,
            dirs: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Last path component, or the full path for a filesystem root.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Immediate child directory with the given name.
    pub fn find_dir(&self, name: &str) -> Option<&DirectoryNode> {
        self.dirs.iter().find(|d| d.name() == name)
    }

    /// Number of files in this directory and all of its descendants.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.dirs.iter().map(DirectoryNode::file_count).sum::<usize>()
    }
}

/// Rules applied while walking a directory tree.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Entries whose name starts with this character are skipped.
    pub hidden_prefix: char,
    /// Directory names whose whole subtree is skipped.
    pub excluded_dirs: Vec<String>,
    /// Log and omit unreadable subdirectories instead of failing the walk.
    pub skip_unreadable: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            hidden_prefix: '.',
            excluded_dirs: vec!["node_modules".to_string()],
            skip_unreadable: false,
        }
    }
}

impl WalkOptions {
    fn is_hidden(&self, name: &str) -> bool {
        name.starts_with(self.hidden_prefix)
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }

    /// Whether `entry` and, for directories, its subtree are visited.
    fn keeps(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if self.is_hidden(&name) {
            return false;
        }
        if entry.file_type().is_dir() && self.is_excluded(&name) {
            debug!("Skipping excluded directory {}", entry.path().display());
            return false;
        }
        true
    }

    /// Whether a directory or file name would be visible to a walk.
    pub fn is_visible(&self, name: &str) -> bool {
        !self.is_hidden(name) && !self.is_excluded(name)
    }
}

/// Builds a [`DirectoryNode`] tree from the filesystem.
#[derive(Debug, Clone, Default)]
pub struct DirectoryWalker {
    options: WalkOptions,
}

impl DirectoryWalker {
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }

    /// Walks `path` recursively and returns the fully built tree.
    ///
    /// An unreadable root always fails. An unreadable subdirectory fails the
    /// whole walk unless [`WalkOptions::skip_unreadable`] is set.
    pub fn walk(&self, path: &Path) -> anyhow::Result<DirectoryNode> {
        let root = std::path::absolute(path)
            .map_err(|e| anyhow!("Failed to resolve {}: {}", path.display(), e))?;
        debug!("Walking {}", root.display());

        let entries = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || self.options.keeps(entry));

        // open[d] is the directory currently being filled at depth d
        let mut open: Vec<DirectoryNode> = Vec::new();
        for item in entries {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    self.handle_error(e, &mut open)?;
                    continue;
                }
            };
            close_to_depth(&mut open, entry.depth());

            if entry.file_type().is_dir() {
                open.push(DirectoryNode::empty(entry.into_path()));
            } else if entry.depth() == 0 {
                return Err(anyhow!("{} is not a directory", root.display()));
            } else if let Some(parent) = open.last_mut() {
                if entry.path_is_symlink() {
                    debug!("Not following symlink {}", entry.path().display());
                }
                parent.files.push(FileEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path: entry.into_path(),
                });
            }
        }
        close_to_depth(&mut open, 1);

        let node = open
            .pop()
            .ok_or_else(|| anyhow!("Failed to read directory {}", root.display()))?;
        debug!(
            "Walked {}: {} directories, {} files",
            root.display(),
            node.dirs.len(),
            node.file_count()
        );
        Ok(node)
    }

    fn handle_error(
        &self,
        err: walkdir::Error,
        open: &mut Vec<DirectoryNode>,
    ) -> anyhow::Result<()> {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        if err.depth() == 0 || !self.options.skip_unreadable {
            return Err(anyhow!(
                "Failed to read directory {}: {}",
                path.display(),
                err
            ));
        }
        warn!("Skipping {}: {}", path.display(), err);
        // the directory was yielded before its listing failed
        if open.last().is_some_and(|node| node.path == path) {
            open.pop();
        }
        Ok(())
    }
}

/// Attaches finished directories to their parents until the deepest open
/// directory is the parent of an entry at `depth`. The root is never closed.
fn close_to_depth(open: &mut Vec<DirectoryNode>, depth: usize) {
    while open.len() > depth.max(1) {
        let Some(child) = open.pop() else { break };
        if let Some(parent) = open.last_mut() {
            parent.dirs.push(child);
        }
    }
}
