//! Argument extraction
//!
//! Literal words in a description consume a user word and contribute nothing.
//! `$n` placeholders capture one word each and are reordered by `n`; a `$*`
//! swallows every remaining word, which lands after the numbered arguments.

use crate::ast::{PlaceholderIndex, Segment};

/// Pull handler arguments out of `input` using the matched `description`
pub fn extract_args(input: &[Segment], description: &[Segment]) -> Vec<String> {
    let mut numbered: Vec<(u32, String)> = Vec::new();
    let mut rest: Vec<String> = Vec::new();

    for (i, segment) in description.iter().enumerate() {
        let Segment::Placeholder { index, .. } = segment else {
            continue;
        };
        match index {
            PlaceholderIndex::Wildcard => {
                rest.extend(input.iter().skip(i).map(Segment::text));
                break;
            }
            PlaceholderIndex::Numbered(n) => {
                if let Some(word) = input.get(i) {
                    numbered.push((*n, word.text()));
                }
            }
        }
    }

    // stable, so equal indices keep their positional order
    numbered.sort_by_key(|(n, _)| *n);
    numbered
        .into_iter()
        .map(|(_, text)| text)
        .chain(rest)
        .collect()
}
