//! Statement model shared by descriptions and user input
//!
//! A [`Statement`] is an ordered list of [`Segment`]s (command words and, in
//! descriptions, placeholders), followed by an optional filter chain and an
//! optional output file.

use std::fmt;

/// Which argument slot a placeholder stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderIndex {
    /// `$1`, `$2`, ...: exactly one user word, reordered by number
    Numbered(u32),
    /// `$*`: every remaining user word
    Wildcard,
}

impl fmt::Display for PlaceholderIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderIndex::Numbered(n) => write!(f, "{}", n),
            PlaceholderIndex::Wildcard => f.write_str("*"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder {
        index: PlaceholderIndex,
        /// Completer name from `$1:name`
        completion: Option<String>,
    },
}

impl Segment {
    pub fn literal(text: impl Into<String>) -> Self {
        Segment::Literal(text.into())
    }

    pub fn wildcard() -> Self {
        Segment::Placeholder {
            index: PlaceholderIndex::Wildcard,
            completion: None,
        }
    }

    pub fn numbered(n: u32) -> Self {
        Segment::Placeholder {
            index: PlaceholderIndex::Numbered(n),
            completion: None,
        }
    }

    /// The text a user would type for this segment
    pub fn text(&self) -> String {
        match self {
            Segment::Literal(s) => s.clone(),
            Segment::Placeholder { index, .. } => format!("${}", index),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(
            self,
            Segment::Placeholder {
                index: PlaceholderIndex::Wildcard,
                ..
            }
        )
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Segment::Placeholder { .. })
    }

    pub fn completion(&self) -> Option<&str> {
        match self {
            Segment::Placeholder { completion, .. } => completion.as_deref(),
            Segment::Literal(_) => None,
        }
    }
}

/// `| name arg...`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterInvocation {
    pub name: String,
    pub args: Vec<String>,
}

impl FilterInvocation {
    pub fn new(name: impl Into<String>) -> Self {
        FilterInvocation {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statement {
    pub segments: Vec<Segment>,
    pub filters: Vec<FilterInvocation>,
    pub output: Option<String>,
}

impl Statement {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Position of the `$*` segment, if any
    pub fn wildcard_position(&self) -> Option<usize> {
        self.segments.iter().position(Segment::is_wildcard)
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard_position().is_some()
    }

    /// Whether any `$n` segment is present
    pub fn has_numbered(&self) -> bool {
        self.segments.iter().any(|s| {
            matches!(
                s,
                Segment::Placeholder {
                    index: PlaceholderIndex::Numbered(_),
                    ..
                }
            )
        })
    }

    pub fn has_placeholder(&self, index: PlaceholderIndex) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder { index: i, .. } if *i == index))
    }
}

/// Join segments the way a user would type them
pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical user form, used for history and "command not found" messages
impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_segments(&self.segments))?;
        for filter in &self.filters {
            write!(f, " | {}", filter.name)?;
            if !filter.args.is_empty() {
                write!(f, " {}", filter.args.join(" "))?;
            }
        }
        if let Some(output) = &self.output {
            write!(f, " > {}", output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_text_of_plain_statement() {
        let stmt = Statement {
            segments: vec![Segment::literal("show"), Segment::literal("interfaces")],
            ..Default::default()
        };
        assert_eq!(stmt.to_string(), "show interfaces");
    }

    #[test]
    fn canonical_text_with_filters_and_output() {
        let stmt = Statement {
            segments: vec![Segment::literal("ls"), Segment::literal("/tmp")],
            filters: vec![
                FilterInvocation {
                    name: "grep".into(),
                    args: vec!["-i".into(), "foo".into()],
                },
                FilterInvocation::new("sort"),
            ],
            output: Some("out.txt".into()),
        };
        assert_eq!(stmt.to_string(), "ls /tmp | grep -i foo | sort > out.txt");
    }

    #[test]
    fn placeholder_text() {
        assert_eq!(Segment::wildcard().text(), "$*");
        assert_eq!(Segment::numbered(2).text(), "$2");
    }

    #[test]
    fn wildcard_position() {
        let stmt = Statement {
            segments: vec![Segment::literal("go"), Segment::numbered(1), Segment::wildcard()],
            ..Default::default()
        };
        assert_eq!(stmt.wildcard_position(), Some(2));
        assert!(stmt.has_numbered());
        assert!(stmt.has_placeholder(PlaceholderIndex::Numbered(1)));
        assert!(!stmt.has_placeholder(PlaceholderIndex::Numbered(2)));
    }
}
