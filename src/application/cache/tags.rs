//! Cache tags: labels tying cached query results to backend entities.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKind {
    User,
    Task,
    Company,
    MonitoringSetting,
    Resource,
}

impl TagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::User => "User",
            TagKind::Task => "Task",
            TagKind::Company => "Company",
            TagKind::MonitoringSetting => "MonitoringSetting",
            TagKind::Resource => "Resource",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagId {
    /// The whole kind; when invalidated it matches every tag of the kind
    Whole,
    Id(i64),
    /// Marker for list queries
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub kind: TagKind,
    pub id: TagId,
}

impl Tag {
    pub const fn whole(kind: TagKind) -> Self {
        Self {
            kind,
            id: TagId::Whole,
        }
    }

    pub const fn id(kind: TagKind, id: i64) -> Self {
        Self {
            kind,
            id: TagId::Id(id),
        }
    }

    pub const fn list(kind: TagKind) -> Self {
        Self {
            kind,
            id: TagId::List,
        }
    }

    /// Whether invalidating `self` hits an entry that provides `provided`
    pub fn invalidates(&self, provided: &Tag) -> bool {
        self.kind == provided.kind && (self.id == TagId::Whole || self.id == provided.id)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            TagId::Whole => write!(f, "{}", self.kind.as_str()),
            TagId::Id(id) => write!(f, "{}:{}", self.kind.as_str(), id),
            TagId::List => write!(f, "{}:LIST", self.kind.as_str()),
        }
    }
}

/// One tag per row with a known id, plus the kind's LIST tag
pub fn list_tags<I>(kind: TagKind, ids: I) -> Vec<Tag>
where
    I: IntoIterator<Item = Option<i64>>,
{
    ids.into_iter()
        .flatten()
        .map(|id| Tag::id(kind, id))
        .chain(std::iter::once(Tag::list(kind)))
        .collect()
}
