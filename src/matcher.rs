//! Scoring user input against command descriptions
//!
//! Every description in the active command set is scored; the strongest tier
//! wins and ties go to the description registered first.

use crate::ast::{PlaceholderIndex, Segment, Statement};
use crate::command::CommandDescriptor;

/// How well a user statement fits a description, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    None,
    /// Matched through `$*`
    Wildcard,
    /// Matched through `$n`
    Substitution,
    /// Every word matched literally
    Exact,
}

/// Compare one user segment with the description segment at the same position
fn match_segment(input: &Segment, description: &Segment) -> MatchTier {
    match description {
        Segment::Placeholder {
            index: PlaceholderIndex::Wildcard,
            ..
        } => MatchTier::Wildcard,
        Segment::Placeholder { .. } => MatchTier::Substitution,
        Segment::Literal(text) => match input {
            Segment::Literal(word) if word == text => MatchTier::Exact,
            _ => MatchTier::None,
        },
    }
}

/// Score a parsed user statement against a description
pub fn score(input: &Statement, description: &Statement) -> MatchTier {
    let wildcard = description.wildcard_position();
    let (have, want) = (input.segments.len(), description.segments.len());

    // more words than the description takes, and nothing to absorb them
    if have > want && wildcard.is_none() {
        return MatchTier::None;
    }
    // description not satisfied
    if have < want {
        return MatchTier::None;
    }

    let mut tier = MatchTier::Exact;
    for (i, word) in input.segments.iter().enumerate() {
        if wildcard.is_some_and(|w| i >= w) {
            return MatchTier::Wildcard;
        }
        match match_segment(word, &description.segments[i]) {
            MatchTier::None => return MatchTier::None,
            MatchTier::Wildcard => tier = MatchTier::Wildcard,
            MatchTier::Substitution if tier == MatchTier::Exact => tier = MatchTier::Substitution,
            _ => {}
        }
    }
    tier
}

/// Pick the best description for `input`: the first one reaching the highest
/// tier. Returns `None` when nothing scores above [`MatchTier::None`].
pub fn select<'a, I>(input: &Statement, commands: I) -> Option<(&'a CommandDescriptor, MatchTier)>
where
    I: IntoIterator<Item = &'a CommandDescriptor>,
{
    let mut best: Option<(&'a CommandDescriptor, MatchTier)> = None;
    for command in commands {
        let tier = score(input, command.description());
        let best_tier = best.map_or(MatchTier::None, |(_, t)| t);
        if tier > best_tier {
            best = Some((command, tier));
        }
    }
    if let Some((command, tier)) = best {
        tracing::debug!(input = %input, command = command.source(), ?tier, "matched command");
    }
    best
}
