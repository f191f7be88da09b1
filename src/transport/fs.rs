use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::Transport;
use crate::errors::RouteError;
use crate::types::AssetPath;

/// Serves static-asset paths (e.g. `/assets/recommendations/x.csv`) from a local site root.
#[derive(Clone, Debug)]
pub struct FsTransport {
    root: PathBuf,
    follow_links: bool,
}

impl FsTransport {
    /// Create a transport rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
        }
    }

    /// Configure symlink traversal during dataset discovery.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Site root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an asset path onto the root, refusing paths that climb out of it.
    pub fn resolve(&self, source_id: &str, location: &str) -> Result<PathBuf, RouteError> {
        let relative = Path::new(location.trim_start_matches('/'));
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || relative.as_os_str().is_empty() {
            return Err(RouteError::SourceUnavailable {
                source_id: source_id.to_string(),
                reason: format!("asset path '{location}' is outside the site root"),
            });
        }
        Ok(self.root.join(relative))
    }

    /// Every `.csv` / `.json` dataset under the root as a `/`-prefixed asset path, sorted.
    pub fn discover_datasets(&self) -> Vec<AssetPath> {
        let mut walker = WalkDir::new(&self.root);
        if self.follow_links {
            walker = walker.follow_links(true);
        }
        let mut found: Vec<AssetPath> = walker
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file() && is_dataset_file(entry.path()))
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                let parts: Vec<String> = relative
                    .components()
                    .map(|part| part.as_os_str().to_string_lossy().into_owned())
                    .collect();
                Some(format!("/{}", parts.join("/")))
            })
            .collect();
        found.sort();
        found
    }
}

impl Transport for FsTransport {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn fetch_text(&self, source_id: &str, location: &str) -> Result<String, RouteError> {
        let path = self.resolve(source_id, location)?;
        debug!("[route_planner:fs] reading {}", path.display());
        fs::read_to_string(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => RouteError::SourceUnavailable {
                source_id: source_id.to_string(),
                reason: format!("no asset at {}", path.display()),
            },
            _ => RouteError::SourceUnavailable {
                source_id: source_id.to_string(),
                reason: format!("failed reading {}: {err}", path.display()),
            },
        })
    }
}

/// True if the path has a `.csv` or `.json` extension (case-insensitive).
pub fn is_dataset_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
