use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Weak;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::sources::Source;

/// Tag set carried by a task. Ordering is canonical, so two tasks built from
/// the same tags in a different order compare and hash the same.
pub type Tags = BTreeSet<String>;

/// Build a [`Tags`] set from anything yielding strings.
pub fn tags<I, S>(iter: I) -> Tags
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    iter.into_iter().map(Into::into).collect()
}

/// The `{title, tags}` projection of a task, detached from any source.
///
/// Deserializes from either a bare title string or a `{ title, tags }` table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RecordRepr")]
pub struct TaskRecord {
    pub title: String,
    pub tags: Tags,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordRepr {
    Title(String),
    Full {
        title: String,
        #[serde(default)]
        tags: Tags,
    },
}

impl From<RecordRepr> for TaskRecord {
    fn from(repr: RecordRepr) -> Self {
        match repr {
            RecordRepr::Title(title) => TaskRecord::new(title, Tags::new()),
            RecordRepr::Full { title, tags } => TaskRecord::new(title, tags),
        }
    }
}

impl TaskRecord {
    pub fn new(title: impl Into<String>, tags: Tags) -> Self {
        Self {
            title: title.into(),
            tags,
        }
    }

    /// Whether this record and `task` share the same title+tags identity.
    pub fn matches(&self, task: &Task) -> bool {
        self.title == task.title && self.tags == task.tags
    }
}

impl From<&str> for TaskRecord {
    fn from(title: &str) -> Self {
        TaskRecord::new(title, Tags::new())
    }
}

impl From<String> for TaskRecord {
    fn from(title: String) -> Self {
        TaskRecord::new(title, Tags::new())
    }
}

/// A todo item as surfaced by a [`Source`].
///
/// Identity is title plus tag set. The handle to the owning source is only
/// used to route [`Task::remove`] and never takes part in equality or hashing.
#[derive(Clone)]
pub struct Task {
    title: String,
    tags: Tags,
    source: Option<Weak<dyn Source>>,
}

impl Task {
    /// A task not attached to any source. Calling [`Task::remove`] on it fails.
    pub fn unbound(title: impl Into<String>, tags: Tags) -> Self {
        Self {
            title: title.into(),
            tags,
            source: None,
        }
    }

    /// A task whose removal is routed to `source`. Sources use this for every
    /// task they hand out.
    pub fn bound(record: TaskRecord, source: &Weak<dyn Source>) -> Self {
        Self {
            title: record.title,
            tags: record.tags,
            source: Some(source.clone()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str, case_sensitive: bool) -> bool {
        if case_sensitive {
            self.tags.contains(tag)
        } else {
            let lower = tag.to_lowercase();
            self.tags.iter().any(|t| t.to_lowercase() == lower)
        }
    }

    /// True while the owning source is still alive.
    pub fn is_bound(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|source| source.strong_count() > 0)
    }

    pub fn record(&self) -> TaskRecord {
        TaskRecord::new(self.title.clone(), self.tags.clone())
    }

    /// Ask the owning source to delete this task.
    pub fn remove(&self) -> Result<()> {
        let source = self
            .source
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| Error::UnboundTask(self.title.clone()))?;
        source.remove_task(self)
    }

    /// Canonical `title!tag#tag` string the hash is derived from.
    fn identity_key(&self) -> String {
        let joined: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        format!("{}!{}", self.title, joined.join("#"))
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("title", &self.title)
            .field("tags", &self.tags)
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.tags == other.tags
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity_key().hash(state);
    }
}

impl PartialEq<str> for Task {
    fn eq(&self, other: &str) -> bool {
        self.title == other
    }
}

impl PartialEq<&str> for Task {
    fn eq(&self, other: &&str) -> bool {
        self.title == *other
    }
}

impl PartialEq<String> for Task {
    fn eq(&self, other: &String) -> bool {
        &self.title == other
    }
}
