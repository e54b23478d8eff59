//! Tab completion
//!
//! [`complete`] works out what a single description can offer for a partially
//! typed statement; [`suggest`] runs it across every description in the
//! active command set and turns the candidates into full replacement lines.

use crate::ast::{Segment, Statement};
use crate::command::{CommandDescriptor, RegistrationError};
use std::collections::HashMap;
use std::fmt;

/// What a completion offers, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompletionTier {
    None,
    /// Finishes the word currently being typed
    Partial,
    /// The typed words are complete; offers the next word
    Exact,
}

/// Candidate source for `$n:name` placeholders, called with the word typed so far
pub type Completer = Box<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Named completers
#[derive(Default)]
pub struct CompleterTable {
    completers: HashMap<String, Completer>,
}

impl CompleterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, completer: F) -> Result<(), RegistrationError>
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        if self.completers.contains_key(name) {
            return Err(RegistrationError::DuplicateCompleter(name.to_string()));
        }
        self.completers.insert(name.to_string(), Box::new(completer));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Completer> {
        self.completers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.completers.contains_key(name)
    }

    /// Run the completer a placeholder asks for, if one is registered
    fn candidates(&self, placeholder: &Segment, seed: &str) -> Option<Vec<String>> {
        let completer = self.get(placeholder.completion()?)?;
        Some(completer(seed))
    }
}

impl fmt::Debug for CompleterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.completers.keys().collect();
        names.sort();
        f.debug_struct("CompleterTable").field("names", &names).finish()
    }
}

/// Per-position compatibility between a typed word and a description word
fn complete_segment(input: &Segment, description: &Segment) -> CompletionTier {
    match description {
        Segment::Placeholder { .. } => CompletionTier::Partial,
        Segment::Literal(text) => {
            let typed = input.text();
            if *text == typed {
                CompletionTier::Exact
            } else if text.starts_with(&typed) {
                CompletionTier::Partial
            } else {
                CompletionTier::None
            }
        }
    }
}

const NOTHING: (CompletionTier, Vec<String>) = (CompletionTier::None, Vec::new());

/// Completions one description offers for the typed `line`
pub fn complete(
    line: &[Segment],
    description: &Statement,
    completers: &CompleterTable,
) -> (CompletionTier, Vec<String>) {
    let words = &description.segments;
    let Some(first) = words.first() else {
        return NOTHING;
    };

    if line.is_empty() {
        if let Segment::Literal(text) = first {
            return (CompletionTier::Exact, vec![text.clone()]);
        }
    }

    match description.wildcard_position() {
        None if line.len() > words.len() => return NOTHING,
        Some(position) if line.len() >= words.len() => {
            // only the word being typed is looked at, not the ones before it
            let Some(last) = line.last() else {
                return NOTHING;
            };
            let seed = last.text();
            return match completers.candidates(&words[position], &seed) {
                Some(candidates) if candidates.len() == 1 && candidates[0] == seed => NOTHING,
                Some(candidates) => (CompletionTier::Partial, candidates),
                None => NOTHING,
            };
        }
        _ => {}
    }

    // tier of the last typed word decides whether we finish it or offer the next
    let mut target = 0;
    let mut tier = CompletionTier::None;
    for (i, typed) in line.iter().enumerate() {
        tier = complete_segment(typed, &words[i]);
        if tier == CompletionTier::None {
            return NOTHING;
        }
        target = i;
    }

    if tier == CompletionTier::Exact {
        if target == words.len() - 1 {
            return NOTHING;
        }
        target += 1;
    }

    match &words[target] {
        placeholder @ Segment::Placeholder { .. } => {
            let seed = line.get(target).map(Segment::text).unwrap_or_default();
            match completers.candidates(placeholder, &seed) {
                Some(candidates) if !candidates.is_empty() && tier != CompletionTier::None => {
                    (tier, candidates)
                }
                _ => NOTHING,
            }
        }
        Segment::Literal(text) => (CompletionTier::Partial, vec![text.clone()]),
    }
}

/// A word as it has to be typed to come back as a single literal
fn requote(word: &str) -> String {
    let plain = !word.is_empty()
        && !word
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ';' | '|' | '>' | '"' | '\'' | '`' | '\\'));
    if plain {
        return word.to_string();
    }
    let mut quoted = String::with_capacity(word.len() + 2);
    quoted.push('"');
    for c in word.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Full replacement lines for the typed `line`, drawn from every description
/// in `commands`. Sorted, without duplicates or empty candidates.
pub fn suggest<'a, I>(line: &[Segment], commands: I, completers: &CompleterTable) -> Vec<String>
where
    I: IntoIterator<Item = &'a CommandDescriptor>,
{
    let results: Vec<(CompletionTier, Vec<String>)> = commands
        .into_iter()
        .map(|command| complete(line, command.description(), completers))
        .filter(|(tier, _)| *tier != CompletionTier::None)
        .collect();

    let has_partial = results.iter().any(|(t, _)| *t == CompletionTier::Partial);
    let has_exact = !has_partial && results.iter().any(|(t, _)| *t == CompletionTier::Exact);

    // finishing the current word wins over proposing the next one
    let mut candidates: Vec<String> = results
        .into_iter()
        .filter(|(tier, _)| !(has_partial && *tier == CompletionTier::Exact))
        .flat_map(|(_, candidates)| candidates)
        .filter(|c| !c.is_empty())
        .collect();
    candidates.sort();
    candidates.dedup();

    let mut working: Vec<String> = line.iter().map(|segment| requote(&segment.text())).collect();
    if has_exact || working.is_empty() {
        working.push(String::new());
    }
    let last = working.len() - 1;

    candidates
        .into_iter()
        .map(|candidate| {
            working[last] = requote(&candidate);
            working.join(" ")
        })
        .collect()
}
