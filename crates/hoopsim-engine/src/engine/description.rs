use std::sync::LazyLock;

use rand::{Rng, seq::IndexedRandom as _};
use regex::Regex;
use tracing::warn;

use crate::{
    core::{Path, Roster, TeamId},
    engine::DescriptionTemplates,
};

const FREE_THROW: &str = "free throw";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(.*?)>").expect("placeholder pattern should compile"));

/// Picks a description template for every node of `path`.
///
/// The result has one slot per node; a node without templates yields `None`.
/// Two consecutive makes are a free-throw trip, and both are drawn from the
/// templates mentioning "free throw" (or from all of them if none does).
/// Templates are returned unfilled, see [`fill_placeholders`].
pub fn render_path<R>(
    path: &Path,
    templates: &DescriptionTemplates,
    rng: &mut R,
) -> Vec<Option<String>>
where
    R: Rng + ?Sized,
{
    let nodes = path.nodes();
    let mut in_free_throws = false;
    let mut rendered = Vec::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        let free_throw = if in_free_throws {
            in_free_throws = false;
            true
        } else if node.is_make() && nodes.get(i + 1).is_some_and(|next| next.is_make()) {
            in_free_throws = true;
            true
        } else {
            false
        };

        let Some(candidates) = templates.get(node.label()) else {
            warn!(event = %node, "no description templates; skipping play");
            rendered.push(None);
            continue;
        };
        let choice = if free_throw {
            let free_throws = candidates
                .iter()
                .filter(|c| c.to_lowercase().contains(FREE_THROW))
                .collect::<Vec<_>>();
            if free_throws.is_empty() {
                candidates.choose(rng)
            } else {
                free_throws.choose(rng).copied()
            }
        } else {
            candidates.choose(rng)
        };
        if choice.is_none() {
            warn!(event = %node, "empty description template list; skipping play");
        }
        rendered.push(choice.cloned());
    }
    rendered
}

/// Replaces the `<...>` placeholders of `text`.
///
/// - a token mentioning "team" becomes the team name
/// - `<Role-POS>` becomes the player at position `POS`, or a random player
///   when that position is empty
/// - any other token becomes a random player
///
/// Each distinct token is resolved once and replaced everywhere it occurs.
/// Player tokens are left as is when the roster is empty.
pub fn fill_placeholders<R>(text: &str, team: &TeamId, roster: &Roster, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let mut filled = text.to_owned();
    for token in placeholders(text) {
        let inner = &token[1..token.len() - 1];
        let value = if inner.to_lowercase().contains("team") {
            Some(team.as_str())
        } else {
            position_of(inner)
                .and_then(|position| roster.get(&position))
                .or_else(|| roster.random_player(rng))
                .map(|player| player.name.as_str())
        };
        if let Some(value) = value {
            filled = filled.replace(token, value);
        }
    }
    filled
}

/// Distinct `<...>` tokens of `text`, brackets included, in order of appearance.
fn placeholders(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for token in PLACEHOLDER.find_iter(text).map(|m| m.as_str()) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// The position of a `Role-POS` token, upper-cased.
fn position_of(inner: &str) -> Option<String> {
    let (_, tail) = inner.split_once('-')?;
    let position = tail.split('-').next().unwrap_or(tail);
    Some(position.to_uppercase())
}
