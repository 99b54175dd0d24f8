//! Temporary files placed in the content root for a single check.

use crate::error::{CheckError, CheckResult};

use std::fs::{self, Permissions};
use std::io::ErrorKind;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::{Path, PathBuf};

use log::{debug, warn};

const RESTORED_MODE: u32 = 0o644;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fixture {
    /// Regular file with optional permission bits
    File {
        name: String,
        contents: Vec<u8>,
        mode: Option<u32>,
    },
    /// Symbolic link pointing at `target`
    Symlink { name: String, target: PathBuf },
    /// A path the server will create; only removed afterwards
    Created { name: String },
}

impl Fixture {
    pub fn file(name: &str, contents: impl Into<Vec<u8>>) -> Self {
        Self::File {
            name: name.to_string(),
            contents: contents.into(),
            mode: None,
        }
    }

    pub fn file_with_mode(name: &str, contents: impl Into<Vec<u8>>, mode: u32) -> Self {
        Self::File {
            name: name.to_string(),
            contents: contents.into(),
            mode: Some(mode),
        }
    }

    pub fn symlink(name: &str, target: impl Into<PathBuf>) -> Self {
        Self::Symlink {
            name: name.to_string(),
            target: target.into(),
        }
    }

    pub fn created(name: &str) -> Self {
        Self::Created {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Symlink { name, .. } | Self::Created { name } => name,
        }
    }

    /// Create the fixture under `root`. Anything already at the path is
    /// replaced. The returned guard removes it again when dropped.
    pub fn install(&self, root: &Path) -> CheckResult<FixtureGuard> {
        let path = root.join(self.name());
        let fail = |source| CheckError::fixture(path.clone(), source);

        remove_path(&path).map_err(fail)?;
        let guard = FixtureGuard { path: path.clone() };

        match self {
            Self::File { contents, mode, .. } => {
                fs::write(&path, contents).map_err(fail)?;
                if let Some(mode) = mode {
                    fs::set_permissions(&path, Permissions::from_mode(*mode)).map_err(fail)?;
                }
            }
            Self::Symlink { target, .. } => symlink(target, &path).map_err(fail)?,
            Self::Created { .. } => {}
        }

        debug!("Installed fixture {}", path.display());
        Ok(guard)
    }
}

/// Removes a fixture on drop, on success and failure paths alike.
#[derive(Debug)]
pub struct FixtureGuard {
    path: PathBuf,
}

impl FixtureGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FixtureGuard {
    fn drop(&mut self) {
        match remove_path(&self.path) {
            Ok(()) => debug!("Removed fixture {}", self.path.display()),
            Err(e) => warn!("Failed to remove fixture {}: {e}", self.path.display()),
        }
    }
}

/// Remove a file or symlink (never following it). Missing is fine.
fn remove_path(path: &Path) -> std::io::Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if meta.is_file() {
        // Mode-000 fixtures get their permissions back before removal
        fs::set_permissions(path, Permissions::from_mode(RESTORED_MODE))?;
    }

    match fs::remove_file(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
