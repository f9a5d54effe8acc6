use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An atomic possession action, identified by its label.
///
/// Labels come straight from the historical corpus ("make", "miss",
/// "defensive rebound", "shooting foul", ...). The engine only gives special
/// meaning to [`Event::MAKE`] and [`Event::MISS`]; every other label is opaque.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Box<str>);

impl Event {
    /// A successful shot attempt.
    pub const MAKE: &'static str = "make";
    /// An unsuccessful shot attempt.
    pub const MISS: &'static str = "miss";

    #[must_use]
    pub fn new<S>(label: S) -> Self
    where
        S: Into<Box<str>>,
    {
        Self(label.into())
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_make(&self) -> bool {
        &*self.0 == Self::MAKE
    }

    #[must_use]
    pub fn is_miss(&self) -> bool {
        &*self.0 == Self::MISS
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vertex of the transition graph.
///
/// Besides regular events the graph carries three sentinels: `start` and `end`
/// delimit every historical possession, and `vs` opens the first possession of
/// a quarter (the jump ball / tip-off).
///
/// Nodes serialize as their label, so a corpus is simply a JSON array of
/// string arrays.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::IsVariant)]
pub enum Node {
    Start,
    Vs,
    End,
    Event(Event),
}

impl Node {
    pub const START_LABEL: &'static str = "start";
    pub const VS_LABEL: &'static str = "vs";
    pub const END_LABEL: &'static str = "end";

    /// Parses a corpus label, mapping the reserved sentinel labels.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            Self::START_LABEL => Self::Start,
            Self::VS_LABEL => Self::Vs,
            Self::END_LABEL => Self::End,
            _ => Self::Event(Event::new(label)),
        }
    }

    #[must_use]
    pub fn make() -> Self {
        Self::Event(Event::new(Event::MAKE))
    }

    #[must_use]
    pub fn miss() -> Self {
        Self::Event(Event::new(Event::MISS))
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Start => Self::START_LABEL,
            Self::Vs => Self::VS_LABEL,
            Self::End => Self::END_LABEL,
            Self::Event(event) => event.label(),
        }
    }

    #[must_use]
    pub fn is_make(&self) -> bool {
        matches!(self, Self::Event(event) if event.is_make())
    }

    #[must_use]
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Event(event) if event.is_miss())
    }
}

impl From<&str> for Node {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// The event sequence of one possession.
///
/// `start` and `end` are never stored; a possession that opens a quarter
/// keeps its leading `vs` marker, which is rendered and timed like any other
/// event but does not count as a play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Node>);

impl Path {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, node: Node) {
        self.0.push(node);
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the path starts with the `vs` marker.
    #[must_use]
    pub fn opens_quarter(&self) -> bool {
        self.0.first().is_some_and(Node::is_vs)
    }

    /// Number of plays, not counting a leading `vs` marker.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.len() - usize::from(self.opens_quarter())
    }

    #[must_use]
    pub fn make_count(&self) -> usize {
        self.0.iter().filter(|node| node.is_make()).count()
    }

    #[must_use]
    pub fn contains_make(&self) -> bool {
        self.0.iter().any(Node::is_make)
    }

    #[must_use]
    pub fn contains_miss(&self) -> bool {
        self.0.iter().any(Node::is_miss)
    }

    /// Length of the longest run of consecutive "make" events.
    #[must_use]
    pub fn longest_make_run(&self) -> usize {
        self.0
            .iter()
            .fold((0, 0), |(longest, run), node| {
                let run = if node.is_make() { run + 1 } else { 0 };
                (longest.max(run), run)
            })
            .0
    }
}

impl FromIterator<Node> for Path {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl AsRef<[Node]> for Path {
    fn as_ref(&self) -> &[Node] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(labels: &[&str]) -> Path {
        labels.iter().copied().map(Node::from_label).collect()
    }

    #[test]
    fn test_sentinel_labels_roundtrip() {
        for label in ["start", "vs", "end", "make", "offensive foul"] {
            assert_eq!(Node::from_label(label).label(), label);
        }
        assert!(Node::from_label("start").is_start());
        assert!(Node::from_label("vs").is_vs());
        assert!(Node::from_label("end").is_end());
        assert!(Node::from_label("make").is_make());
    }

    #[test]
    fn test_corpus_json_format() {
        let corpus: Vec<Vec<Node>> =
            serde_json::from_str(r#"[["start", "miss", "defensive rebound", "end"]]"#).unwrap();
        assert_eq!(
            corpus[0],
            vec![
                Node::Start,
                Node::miss(),
                Node::Event(Event::new("defensive rebound")),
                Node::End
            ]
        );
        assert_eq!(
            serde_json::to_string(&corpus).unwrap(),
            r#"[["start","miss","defensive rebound","end"]]"#
        );
    }

    #[test]
    fn test_play_count_ignores_vs_marker() {
        let opening = path(&["vs", "jump ball", "miss"]);
        assert!(opening.opens_quarter());
        assert_eq!(opening.play_count(), 2);

        let regular = path(&["miss", "defensive rebound"]);
        assert!(!regular.opens_quarter());
        assert_eq!(regular.play_count(), 2);
    }

    #[test]
    fn test_make_counting() {
        let p = path(&["shooting foul", "make", "make", "defensive rebound", "make"]);
        assert_eq!(p.make_count(), 3);
        assert_eq!(p.longest_make_run(), 2);
        assert!(p.contains_make());
        assert!(!p.contains_miss());
    }
}
