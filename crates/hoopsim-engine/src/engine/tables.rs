use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{core::Node, engine::TransitionGraph};

/// Empirical duration distribution per event label.
///
/// Maps each label to `{seconds: probability}`. In JSON the seconds are object
/// keys:
///
/// ```json
/// {"miss": {"0": 0.05, "4": 0.31, "8": 0.64}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventDurations(BTreeMap<String, BTreeMap<u32, f64>>);

impl EventDurations {
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&BTreeMap<u32, f64>> {
        self.0.get(label)
    }

    pub fn insert<S, I>(&mut self, label: S, distribution: I)
    where
        S: Into<String>,
        I: IntoIterator<Item = (u32, f64)>,
    {
        self.0.insert(label.into(), distribution.into_iter().collect());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Candidate description templates per event label.
///
/// Templates may contain `<...>` placeholders, see
/// [`fill_placeholders`](crate::engine::fill_placeholders).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptionTemplates(BTreeMap<String, Vec<String>>);

impl DescriptionTemplates {
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.0.get(label).map(Vec::as_slice)
    }

    pub fn insert<S, I, T>(&mut self, label: S, templates: I)
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.0
            .insert(label.into(), templates.into_iter().map(Into::into).collect());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a simulation reads: the transition graph and the two lookup
/// tables. Loaded once and shared by reference across all games.
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    pub graph: TransitionGraph,
    pub durations: EventDurations,
    pub templates: DescriptionTemplates,
}

impl ModelData {
    /// Builds the transition graph from `corpus` and bundles it with the tables.
    #[must_use]
    pub fn new<I, P>(corpus: I, durations: EventDurations, templates: DescriptionTemplates) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[Node]>,
    {
        Self {
            graph: TransitionGraph::build(corpus),
            durations,
            templates,
        }
    }
}
