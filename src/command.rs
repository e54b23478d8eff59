//! Registered commands
//!
//! A [`CommandDescriptor`] pairs a parsed description (`ls $1:fileOrDir`) with
//! the handler invoked when user input matches it. Handlers never see the
//! engine itself; they write to the [`Invocation`] they are given and may ask
//! for menu navigation, which the engine applies once the handler returns.

use crate::ast::Statement;
use crate::parser::{parse_description, ParseError};
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("invalid command description '{description}': {source}")]
    InvalidDescription {
        description: String,
        #[source]
        source: ParseError,
    },
    #[error("empty command description")]
    EmptyDescription,
    #[error("expected a single command in '{0}'")]
    NotSingleStatement(String),
    #[error("command description '{0}' cannot filter or redirect output")]
    RedirectInDescription(String),
    #[error("completer {0} is already registered")]
    DuplicateCompleter(String),
    #[error("filter {0} is already registered")]
    DuplicateFilter(String),
    #[error("command set {0} is already registered")]
    DuplicateCommandSet(String),
    #[error("unknown command set: {0}")]
    UnknownCommandSet(String),
}

/// Menu navigation asked for by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    PushCommandSet(String),
    PopCommandSet,
    Exit,
}

/// What a handler gets to work with: its arguments, an output stream that
/// feeds the statement's filter chain, and a way to ask for navigation.
pub struct Invocation<'a> {
    out: &'a mut dyn Write,
    args: &'a [String],
    requests: &'a mut Vec<Request>,
}

impl<'a> Invocation<'a> {
    pub fn new(out: &'a mut dyn Write, args: &'a [String], requests: &'a mut Vec<Request>) -> Self {
        Invocation {
            out,
            args,
            requests,
        }
    }

    /// Arguments extracted from the user's words, in placeholder order
    pub fn args(&self) -> &[String] {
        self.args
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Enter the named command set after this command completes
    pub fn push_command_set(&mut self, name: impl Into<String>) {
        self.requests.push(Request::PushCommandSet(name.into()));
    }

    /// Leave the current command set after this command completes
    pub fn pop_command_set(&mut self) {
        self.requests.push(Request::PopCommandSet);
    }

    pub fn request_exit(&mut self) {
        self.requests.push(Request::Exit);
    }
}

impl Write for Invocation<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

pub type Handler = Box<dyn Fn(&mut Invocation<'_>) -> io::Result<()> + Send + Sync>;

pub struct CommandDescriptor {
    source: String,
    description: Statement,
    handler: Handler,
}

impl CommandDescriptor {
    /// Parse `description` and bind it to `handler`.
    ///
    /// The description must be exactly one statement of words and
    /// placeholders; filters and redirection belong to user input only.
    pub fn new<F>(description: &str, handler: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&mut Invocation<'_>) -> io::Result<()> + Send + Sync + 'static,
    {
        let mut statements =
            parse_description(description).map_err(|source| RegistrationError::InvalidDescription {
                description: description.to_string(),
                source,
            })?;
        let statement = match statements.len() {
            0 => return Err(RegistrationError::EmptyDescription),
            1 => statements.remove(0),
            _ => return Err(RegistrationError::NotSingleStatement(description.to_string())),
        };
        if !statement.filters.is_empty() || statement.output.is_some() {
            return Err(RegistrationError::RedirectInDescription(description.to_string()));
        }
        Ok(CommandDescriptor {
            source: description.to_string(),
            description: statement,
            handler: Box::new(handler),
        })
    }

    pub fn description(&self) -> &Statement {
        &self.description
    }

    /// The description exactly as registered
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn invoke(&self, invocation: &mut Invocation<'_>) -> io::Result<()> {
        (self.handler)(invocation)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Segment;
    use crate::lexer::LexError;

    fn noop(_: &mut Invocation<'_>) -> io::Result<()> {
        Ok(())
    }

    #[test]
    fn descriptor_parses_description() {
        let cmd = CommandDescriptor::new("go $1 $*", noop).unwrap();
        assert_eq!(cmd.source(), "go $1 $*");
        assert_eq!(
            cmd.description().segments,
            vec![Segment::literal("go"), Segment::numbered(1), Segment::wildcard()]
        );
    }

    #[test]
    fn descriptor_rejects_bad_placeholder() {
        let err = CommandDescriptor::new("foo $ bar", noop).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::InvalidDescription {
                source: ParseError::Lex(LexError::InvalidPlaceholderChar(' ')),
                ..
            }
        ));
    }

    #[test]
    fn descriptor_rejects_multiple_statements() {
        let err = CommandDescriptor::new("foo; bar", noop).unwrap_err();
        assert!(matches!(err, RegistrationError::NotSingleStatement(_)));
    }

    #[test]
    fn descriptor_rejects_empty() {
        let err = CommandDescriptor::new("  ", noop).unwrap_err();
        assert!(matches!(err, RegistrationError::EmptyDescription));
    }

    #[test]
    fn descriptor_rejects_redirection() {
        let err = CommandDescriptor::new("show $* | grep x", noop).unwrap_err();
        assert!(matches!(err, RegistrationError::RedirectInDescription(_)));
    }

    #[test]
    fn invocation_collects_requests() {
        let mut out = Vec::new();
        let args = vec!["b".to_string()];
        let mut requests = Vec::new();
        let cmd = CommandDescriptor::new("enter $1", |inv: &mut Invocation<'_>| {
            let target = inv.args()[0].clone();
            writeln!(inv, "entering {}", target)?;
            inv.push_command_set(target);
            Ok(())
        })
        .unwrap();

        let mut invocation = Invocation::new(&mut out, &args, &mut requests);
        cmd.invoke(&mut invocation).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "entering b\n");
        assert_eq!(requests, vec![Request::PushCommandSet("b".into())]);
    }
}
