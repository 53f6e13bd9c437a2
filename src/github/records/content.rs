//! Repository content entries.

use serde::{Deserialize, Serialize};

/// Kind of a content entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Regular file.
    #[default]
    File,
    /// Directory; expanded lazily during traversal.
    Dir,
    /// Symbolic link.
    Symlink,
    /// Git submodule.
    Submodule,
}

/// File, directory, symlink or submodule in a repository tree.
///
/// `parent_path` and `full_path` are not part of GitHub's response; the
/// traverser fills them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Entry name.
    pub name: String,
    /// Path from the repository root.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// Blob or tree SHA.
    #[serde(default)]
    pub sha: String,
    /// Size in bytes; zero for directories.
    #[serde(default)]
    pub size: u64,
    /// API URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Raw download URL; absent for directories.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Encoded body; only present when a single file is fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Encoding of `content`, normally `base64`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Path of the directory listing this entry came from.
    #[serde(default)]
    pub parent_path: String,
    /// `path` with filesystem-unsafe characters removed from each segment.
    #[serde(default)]
    pub full_path: String,
}

impl Content {
    /// Returns true for directories.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == ContentKind::Dir
    }
}
