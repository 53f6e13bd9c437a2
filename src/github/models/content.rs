//! Repository contents and their tree traversal.
//!
//! Directories are listed one at a time, only when the consumer reaches
//! them. A listing failure ends the traversal with that error.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures::future;
use futures::stream::{self, StreamExt, TryStreamExt};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::github::error::ModelError;
use crate::github::locator::RepositoryRef;
use crate::github::pagination::{RecordStream, StreamSource, TotalCount, counted};
use crate::github::query::QueryParams;
use crate::github::records::Content;
use crate::github::transport::{GitHubClient, decode};

const UNSAFE_PATH_CHARACTERS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Filter for content streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    /// List only the direct children of this directory instead of walking the
    /// whole tree.
    pub path: Option<String>,
    /// Regular expression matched against entry names. Non-matching entries
    /// are hidden but directories are still descended.
    pub name: Option<String>,
}

#[derive(Deserialize)]
struct ContentWrite {
    content: Content,
}

/// Removes filesystem-unsafe characters from every segment of `path`.
///
/// Segments that end up empty are dropped.
///
/// ```
/// use octostore::github::models::sanitize_path;
///
/// assert_eq!(sanitize_path("docs/what?.md"), "docs/what.md");
/// assert_eq!(sanitize_path("a/<>/b"), "a/b");
/// ```
#[must_use]
pub fn sanitize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            segment
                .chars()
                .filter(|ch| !ch.is_control() && !UNSAFE_PATH_CHARACTERS.contains(ch))
                .collect::<String>()
        })
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .chars()
        .fold(String::with_capacity(path.len()), |mut encoded, ch| {
            match ch {
                '%' => encoded.push_str("%25"),
                ' ' => encoded.push_str("%20"),
                '#' => encoded.push_str("%23"),
                '?' => encoded.push_str("%3F"),
                other => encoded.push(other),
            }
            encoded
        })
}

/// Files and directories of one repository.
#[derive(Clone)]
pub struct ContentModel {
    client: GitHubClient,
    repository: RepositoryRef,
    total: TotalCount,
}

impl ContentModel {
    /// Creates a model for `repository`.
    #[must_use]
    pub fn new(client: GitHubClient, repository: RepositoryRef) -> Self {
        Self {
            client,
            repository,
            total: TotalCount::new(),
        }
    }

    fn route(&self, path: &str) -> String {
        let encoded = encode_path(path);
        if encoded.is_empty() {
            self.repository.route_to("contents")
        } else {
            self.repository.route_to(&format!("contents/{encoded}"))
        }
    }

    async fn list(&self, path: &str) -> Result<Vec<Content>, ModelError> {
        let route = self.route(path);
        let body: Value = self.client.get(&route, &QueryParams::new()).await?;
        if body.is_array() {
            decode(&route, body)
        } else {
            decode(&route, body).map(|single| vec![single])
        }
    }

    /// Streams the direct children of `parent_path`, annotated with their
    /// parent and sanitized full path. A file path yields the file itself.
    #[must_use]
    pub fn traverse_children(&self, parent_path: &str) -> RecordStream<Content> {
        let model = self.clone();
        let parent_path = parent_path.to_owned();

        stream::once(async move {
            let entries = model.list(&parent_path).await?;
            tracing::debug!(
                repository = %model.repository,
                path = %parent_path,
                entries = entries.len(),
                "listed directory"
            );
            Ok(entries
                .into_iter()
                .map(|mut entry| {
                    entry.parent_path.clone_from(&parent_path);
                    entry.full_path = sanitize_path(&entry.path);
                    entry
                })
                .collect::<Vec<_>>())
        })
        .map_ok(|entries| stream::iter(entries.into_iter().map(Ok)))
        .try_flatten()
        .boxed()
    }

    /// Streams `node` and, if it is a directory, its whole subtree in
    /// pre-order.
    #[must_use]
    pub fn traverse_tree(&self, node: Content) -> RecordStream<Content> {
        stop_on_error(self.walk(node))
    }

    /// Streams every entry of the repository in pre-order, starting from the
    /// root's children.
    #[must_use]
    pub fn traverse_root(&self) -> RecordStream<Content> {
        stop_on_error(self.walk_children(""))
    }

    fn walk(&self, node: Content) -> RecordStream<Content> {
        if !node.is_dir() {
            return stream::once(future::ready(Ok(node))).boxed();
        }
        let children = self.walk_children(&node.path);
        stream::once(future::ready(Ok(node))).chain(children).boxed()
    }

    fn walk_children(&self, path: &str) -> RecordStream<Content> {
        let model = self.clone();
        self.traverse_children(path)
            .map_ok(move |child| model.walk(child))
            .try_flatten()
            .boxed()
    }

    /// Fetches the entry at `path`. A directory path returns its first entry.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] when the path does not exist or names
    /// an empty directory.
    pub async fn get_one(&self, path: &str) -> Result<Content, ModelError> {
        self.list(path)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::NotFound {
                message: format!("{}: {path} is empty", self.repository),
            })
    }

    /// Creates or replaces the file at `path` with `content`.
    ///
    /// The current blob SHA is looked up first so that existing files are
    /// updated; a missing file is created. `message` defaults to
    /// `[update] <path>`.
    ///
    /// # Errors
    ///
    /// Propagates failures of the SHA lookup other than
    /// [`ModelError::NotFound`], and of the write itself.
    pub async fn update_one(
        &self,
        path: &str,
        content: &[u8],
        message: Option<&str>,
    ) -> Result<Content, ModelError> {
        let sha = match self.get_one(path).await {
            Ok(existing) => Some(existing.sha),
            Err(error) if error.is_not_found() => {
                tracing::warn!(%error, "no existing file at {path}; creating it");
                None
            }
            Err(error) => return Err(error),
        };

        let message = message.map_or_else(|| format!("[update] {path}"), str::to_owned);
        let mut body = json!({
            "message": message,
            "content": STANDARD.encode(content),
        });
        if let (Some(sha), Some(fields)) = (sha, body.as_object_mut()) {
            fields.insert("sha".to_owned(), Value::String(sha));
        }

        let written: ContentWrite = self.client.put(&self.route(path), body).await?;
        Ok(written.content)
    }
}

fn stop_on_error(inner: RecordStream<Content>) -> RecordStream<Content> {
    stream::try_unfold(inner, |mut inner| async move {
        Ok(inner.try_next().await?.map(|entry| (entry, inner)))
    })
    .boxed()
}

impl StreamSource for ContentModel {
    type Item = Content;
    type Filter = ContentFilter;

    fn open_stream(&self, filter: &ContentFilter) -> RecordStream<Content> {
        let pattern = match filter.name.as_deref().map(Regex::new).transpose() {
            Ok(pattern) => pattern,
            Err(error) => {
                return stream::once(future::ready(Err(ModelError::InvalidPattern {
                    message: error.to_string(),
                })))
                .boxed();
            }
        };

        let entries = filter.path.as_deref().map_or_else(
            || self.traverse_root(),
            |path| self.traverse_children(path),
        );
        let visible = entries
            .try_filter(move |entry| {
                future::ready(pattern.as_ref().is_none_or(|regex| regex.is_match(&entry.name)))
            })
            .boxed();

        counted(visible, self.total.clone())
    }

    fn total_count(&self) -> Option<u64> {
        self.total.get()
    }
}
