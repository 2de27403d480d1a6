//! Maps request targets onto files below the served root.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

/// File metadata looked up fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("{} is a directory", .0.display())]
    Directory(PathBuf),
    #[error("target {0} climbs out of the served root")]
    Escapes(String),
    #[error("metadata lookup for {} failed: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Turns a wire target into a path under `root`; the leading `/` stands for
/// the root itself. Targets with a `..` component are refused.
pub fn target_path(root: &Path, target: &str) -> Result<PathBuf, ResolveError> {
    let relative = Path::new(target.trim_start_matches('/'));

    let mut path = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ResolveError::Escapes(target.to_string()));
            }
        }
    }
    Ok(path)
}

/// Resolves `target` and reads its metadata.
pub async fn resolve(root: &Path, target: &str) -> Result<Resource, ResolveError> {
    let path = target_path(root, target)?;

    let meta = match tokio::fs::metadata(&path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ResolveError::Missing(path));
        }
        Err(source) => return Err(ResolveError::Metadata { path, source }),
    };

    if meta.is_dir() {
        return Err(ResolveError::Directory(path));
    }

    let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    Ok(Resource {
        path,
        size: meta.len(),
        modified,
    })
}
