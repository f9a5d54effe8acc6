//! First-order Markov model of event-to-event transitions.
//!
//! The graph is estimated from a corpus of historical possessions. Each
//! possession is a node sequence such as
//!
//! ```text
//! start → shooting foul → make → make → end
//! vs → jump ball → miss → defensive rebound → end
//! ```
//!
//! and the weight of an edge `u → v` is the empirical conditional probability
//!
//! ```text
//! P(v | u) = count(u → v) / Σ_v' count(u → v')
//! ```
//!
//! so the outgoing weights of every source node sum to 1.0. The graph is
//! built once per run and only read afterwards.

use std::collections::BTreeMap;

use crate::core::Node;

/// An outgoing edge of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub target: Node,
    pub probability: f64,
}

/// Directed graph of transition probabilities between events.
///
/// Successors are kept in sorted order, so a seeded generator walks the same
/// path on every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionGraph {
    edges: BTreeMap<Node, Vec<Transition>>,
}

impl TransitionGraph {
    /// Builds the graph from historical paths.
    ///
    /// Every consecutive pair of every path is counted; an empty corpus (or one
    /// whose paths are all shorter than two nodes) yields an empty graph.
    ///
    /// # Example
    ///
    /// ```
    /// use hoopsim_engine::{Node, TransitionGraph};
    ///
    /// let corpus = [
    ///     vec![Node::Start, Node::make(), Node::End],
    ///     vec![Node::Start, Node::miss(), Node::End],
    /// ];
    /// let graph = TransitionGraph::build(&corpus);
    /// assert_eq!(graph.probability(&Node::Start, &Node::make()), Some(0.5));
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn build<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[Node]>,
    {
        let mut counts = BTreeMap::<Node, BTreeMap<Node, u64>>::new();
        for path in paths {
            for pair in path.as_ref().windows(2) {
                *counts
                    .entry(pair[0].clone())
                    .or_default()
                    .entry(pair[1].clone())
                    .or_default() += 1;
            }
        }

        let edges = counts
            .into_iter()
            .map(|(source, targets)| {
                let total = targets.values().sum::<u64>() as f64;
                let transitions = targets
                    .into_iter()
                    .map(|(target, count)| Transition {
                        target,
                        probability: count as f64 / total,
                    })
                    .collect();
                (source, transitions)
            })
            .collect();
        Self { edges }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Outgoing edges of `node`; empty if `node` never appeared as a source.
    #[must_use]
    pub fn successors(&self, node: &Node) -> &[Transition] {
        self.edges
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_successors(&self, node: &Node) -> bool {
        self.edges.contains_key(node)
    }

    #[must_use]
    pub fn probability(&self, source: &Node, target: &Node) -> Option<f64> {
        self.successors(source)
            .iter()
            .find(|t| &t.target == target)
            .map(|t| t.probability)
    }

    /// Nodes with at least one outgoing edge, in sorted order.
    pub fn sources(&self) -> impl Iterator<Item = &Node> {
        self.edges.keys()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}
