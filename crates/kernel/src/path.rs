//! Guest path translation.
//!
//! The guest sees a single drive whose root is a host directory. Guest
//! paths use `\`, may carry a drive letter and may be relative to the guest
//! current directory. Every translated path is checked to stay inside the
//! root, first lexically and then, for anything that already exists, after
//! resolving symlinks.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Longest guest path accepted, terminator excluded.
pub const MAX_GUEST_PATH: usize = 256;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("sandbox root {path:?} is unusable: {source}")]
    Root { path: PathBuf, source: io::Error },
    #[error("path leaves the sandbox")]
    Escape,
    #[error("path is longer than {MAX_GUEST_PATH} bytes")]
    TooLong,
    #[error("no such directory: {0:?}")]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
    /// Guest current directory as components below the root.
    cwd: Vec<String>,
}

impl Sandbox {
    /// Confines the guest to `root`, which must be an existing directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, PathError> {
        let path = root.as_ref();
        let root = path.canonicalize().map_err(|source| PathError::Root {
            path: path.to_path_buf(),
            source,
        })?;
        if !root.is_dir() {
            return Err(PathError::Root {
                path: root,
                source: io::Error::other("not a directory"),
            });
        }
        Ok(Self {
            root,
            cwd: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Guest current directory in GEMDOS form: `\DIR\SUB`, empty at the
    /// root.
    pub fn guest_cwd(&self) -> String {
        self.cwd.iter().map(|part| format!("\\{part}")).collect()
    }

    /// Lexically normalized components of a guest path.
    fn components(&self, guest: &[u8]) -> Result<Vec<String>, PathError> {
        if guest.len() > MAX_GUEST_PATH {
            return Err(PathError::TooLong);
        }
        // Guest strings are 8-bit; keep every byte as one char.
        let mut text: String = guest
            .iter()
            .map(|&b| if b == b'\\' { '/' } else { char::from(b) })
            .collect();
        let bytes = text.as_bytes();
        if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
            text.drain(..2);
        }

        let mut parts = if text.starts_with('/') {
            Vec::new()
        } else {
            self.cwd.clone()
        };
        for part in text.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop().ok_or(PathError::Escape)?;
                }
                name => parts.push(name.to_string()),
            }
        }
        Ok(parts)
    }

    /// Host path for a guest path.
    pub fn resolve(&self, guest: &[u8]) -> Result<PathBuf, PathError> {
        let parts = self.components(guest)?;
        let path = parts.iter().fold(self.root.clone(), |acc, part| acc.join(part));
        self.confine(&path)?;
        Ok(path)
    }

    /// Rejects `path` if its deepest existing ancestor resolves outside the
    /// root.
    fn confine(&self, path: &Path) -> Result<(), PathError> {
        let existing = path.ancestors().find(|p| p.symlink_metadata().is_ok());
        let Some(existing) = existing else {
            return Err(PathError::Escape);
        };
        match existing.canonicalize() {
            Ok(real) if real.starts_with(&self.root) => Ok(()),
            Ok(_) => Err(PathError::Escape),
            // Dangling symlink: nothing to follow, judge the link's parent.
            Err(_) => match existing.parent() {
                Some(parent) if parent != existing => self.confine(parent),
                _ => Err(PathError::Escape),
            },
        }
    }

    /// Changes the guest current directory.
    pub fn set_cwd(&mut self, guest: &[u8]) -> Result<(), PathError> {
        let parts = self.components(guest)?;
        let path = parts.iter().fold(self.root.clone(), |acc, part| acc.join(part));
        self.confine(&path)?;
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path));
        }
        self.cwd = parts;
        Ok(())
    }
}
