//! The command-line engine
//!
//! [`Engine`] owns everything a session needs: the command sets, the menu
//! stack, and the completer and filter tables. A line editor hands it each
//! submitted line through [`Engine::evaluate`] and each tab press through
//! [`Engine::suggest`].

use crate::args::extract_args;
use crate::ast::Statement;
use crate::command::{CommandDescriptor, Invocation, RegistrationError, Request};
use crate::completion;
use crate::config::Config;
use crate::matcher;
use crate::parser::{parse_input, ParseError};
use crate::pipeline::{self, FilterTable};
use crate::registry::{CommandSetStack, Registry, StackError};
use std::io::{self, Read, Write};

/// What became of one submitted line
#[derive(Debug)]
pub enum Outcome {
    /// Nothing but whitespace
    Empty,
    /// Every statement matched a command. Holds the canonical text of the
    /// statements that ran to completion, for history.
    Executed(Vec<String>),
    ParseError(ParseError),
    /// A statement matched nothing; the statements before it did run
    CommandNotFound { executed: Vec<String>, input: String },
}

impl Outcome {
    /// Canonical text of the statements that ran
    pub fn executed(&self) -> &[String] {
        match self {
            Outcome::Executed(executed) | Outcome::CommandNotFound { executed, .. } => executed,
            Outcome::Empty | Outcome::ParseError(_) => &[],
        }
    }
}

#[derive(Debug, Default)]
pub struct Engine {
    config: Config,
    registry: Registry,
    stack: CommandSetStack,
    completers: completion::CompleterTable,
    filters: FilterTable,
    exit_requested: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Engine {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create an empty command set. The first one created is the menu the
    /// session starts in.
    pub fn new_command_set(&mut self, name: &str) -> Result<(), RegistrationError> {
        self.registry.create(name)?;
        tracing::debug!(set = name, "created command set");
        Ok(())
    }

    /// Register a command in `set`; nothing is registered on failure
    pub fn register_command<F>(&mut self, set: &str, description: &str, handler: F) -> Result<(), RegistrationError>
    where
        F: Fn(&mut Invocation<'_>) -> io::Result<()> + Send + Sync + 'static,
    {
        let command = CommandDescriptor::new(description, handler)?;
        self.registry.by_name_mut(set)?.add(command);
        Ok(())
    }

    pub fn register_completer<F>(&mut self, name: &str, completer: F) -> Result<(), RegistrationError>
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        self.completers.register(name, completer)
    }

    pub fn register_filter<F>(&mut self, name: &str, filter: F) -> Result<(), RegistrationError>
    where
        F: Fn(&mut dyn Read, &mut dyn Write, &[String]) -> io::Result<()> + Send + Sync + 'static,
    {
        self.filters.register(name, filter)
    }

    pub fn push_command_set(&mut self, name: &str) -> Result<(), StackError> {
        self.stack.push(&self.registry, name)
    }

    pub fn pop_command_set(&mut self) -> Result<(), StackError> {
        self.stack.pop()
    }

    /// Name of the active command set, if any set exists
    pub fn current_command_set(&self) -> Option<&str> {
        let id = self.stack.current(&self.registry).ok()?;
        Some(self.registry.get(id).name())
    }

    pub fn command_set_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Whether a command asked to end the session
    pub fn should_exit(&self) -> bool {
        self.exit_requested
    }

    pub fn render_prompt(&self) -> String {
        self.config
            .render_prompt(self.current_command_set().unwrap_or_default())
    }

    /// Parse and run a submitted line, statement by statement.
    ///
    /// Parse errors, unmatched statements and pipeline failures are reported
    /// on `sink`; only a failure to write to `sink` is returned as an error.
    pub fn evaluate(&mut self, line: &str, sink: &mut (dyn Write + Send)) -> io::Result<Outcome> {
        let statements = match parse_input(line) {
            Ok(statements) => statements,
            Err(err) => {
                tracing::debug!(line, error = %err, "parse error");
                writeln!(sink, "parse error: {}", err)?;
                return Ok(Outcome::ParseError(err));
            }
        };
        if statements.is_empty() {
            return Ok(Outcome::Empty);
        }

        let mut executed = Vec::new();
        for statement in &statements {
            let requests = match self.run_statement(statement, sink)? {
                Some((true, requests)) => {
                    executed.push(statement.to_string());
                    requests
                }
                Some((false, requests)) => requests,
                None => {
                    let input = statement.to_string();
                    writeln!(sink, "{}: command not found", input)?;
                    return Ok(Outcome::CommandNotFound { executed, input });
                }
            };
            self.apply(requests, sink)?;
            if self.exit_requested {
                break;
            }
        }
        Ok(Outcome::Executed(executed))
    }

    /// Match and run one statement. `None` when nothing matched; otherwise
    /// whether it completed, and the navigation its handler asked for.
    fn run_statement(
        &self,
        statement: &Statement,
        sink: &mut (dyn Write + Send),
    ) -> io::Result<Option<(bool, Vec<Request>)>> {
        let Ok(current) = self.stack.current(&self.registry) else {
            return Ok(None);
        };
        let Some((command, _)) = matcher::select(statement, self.registry.get(current).commands()) else {
            return Ok(None);
        };

        let args = extract_args(&statement.segments, &command.description().segments);
        let mut requests = Vec::new();
        let result = pipeline::execute(
            &self.filters,
            &statement.filters,
            statement.output.as_deref(),
            sink,
            |out| command.invoke(&mut Invocation::new(out, &args, &mut requests)),
        );
        match result {
            Ok(()) => Ok(Some((true, requests))),
            Err(err) => {
                tracing::warn!(statement = %statement, error = %err, "statement abandoned");
                writeln!(sink, "{}", err)?;
                Ok(Some((false, requests)))
            }
        }
    }

    fn apply(&mut self, requests: Vec<Request>, sink: &mut (dyn Write + Send)) -> io::Result<()> {
        for request in requests {
            let result = match request {
                Request::PushCommandSet(name) => self.stack.push(&self.registry, &name),
                Request::PopCommandSet => self.stack.pop(),
                Request::Exit => {
                    self.exit_requested = true;
                    Ok(())
                }
            };
            if let Err(err) = result {
                tracing::warn!(error = %err, "navigation failed");
                writeln!(sink, "{}", err)?;
            }
        }
        Ok(())
    }

    /// Replacement lines for the last statement of a partially typed line
    pub fn suggest(&self, partial: &str) -> Vec<String> {
        let statements = match parse_input(partial) {
            Ok(statements) => statements,
            Err(err) => {
                tracing::debug!(partial, error = %err, "no suggestions for unparsable input");
                return Vec::new();
            }
        };
        let Ok(current) = self.stack.current(&self.registry) else {
            return Vec::new();
        };
        let line = statements.last().map(|s| s.segments.as_slice()).unwrap_or_default();

        let mut suggestions = completion::suggest(line, self.registry.get(current).commands(), &self.completers);
        if self.config.max_suggestions > 0 {
            suggestions.truncate(self.config.max_suggestions);
        }
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard;
    use std::sync::{Arc, Mutex};

    fn echo(inv: &mut Invocation<'_>) -> io::Result<()> {
        let line = inv.args().join(",");
        writeln!(inv, "{}", line)
    }

    fn engine() -> Engine {
        let mut engine = Engine::new();
        engine.new_command_set("main").unwrap();
        engine.new_command_set("sub").unwrap();
        engine.register_command("main", "echo $*", echo).unwrap();
        engine.register_command("main", "enter", standard::push_command_set("sub")).unwrap();
        engine.register_command("sub", "exit", standard::pop_command_set()).unwrap();
        engine.register_command("sub", "whoami", |inv: &mut Invocation<'_>| writeln!(inv, "sub")).unwrap();
        engine
    }

    fn run(engine: &mut Engine, line: &str) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = engine.evaluate(line, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn empty_line() {
        let (outcome, out) = run(&mut engine(), "   ");
        assert!(matches!(outcome, Outcome::Empty));
        assert!(out.is_empty());
    }

    #[test]
    fn parse_error_reported() {
        let (outcome, out) = run(&mut engine(), "echo \"open");
        assert!(matches!(outcome, Outcome::ParseError(_)));
        assert!(out.starts_with("parse error: "));
    }

    #[test]
    fn statements_run_in_order() {
        let (outcome, out) = run(&mut engine(), "echo a b; echo c");
        assert_eq!(out, "a,b\nc\n");
        assert_eq!(outcome.executed(), ["echo a b", "echo c"]);
    }

    #[test]
    fn not_found_stops_the_line() {
        let (outcome, out) = run(&mut engine(), "echo a; bogus x; echo b");
        assert_eq!(out, "a\nbogus x: command not found\n");
        match outcome {
            Outcome::CommandNotFound { executed, input } => {
                assert_eq!(executed, vec!["echo a"]);
                assert_eq!(input, "bogus x");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn unknown_filter_abandons_statement_only() {
        let (outcome, out) = run(&mut engine(), "echo a | nope; echo b");
        assert_eq!(out, "nope is not a valid filter\nb\n");
        assert_eq!(outcome.executed(), ["echo b"]);
    }

    #[test]
    fn navigation_through_handlers() {
        let mut engine = engine();
        assert_eq!(engine.current_command_set(), Some("main"));
        run(&mut engine, "enter");
        assert_eq!(engine.current_command_set(), Some("sub"));
        assert_eq!(engine.command_set_depth(), 2);

        // commands in "main" are no longer active
        let (_, out) = run(&mut engine, "echo x");
        assert_eq!(out, "echo x: command not found\n");
        let (_, out) = run(&mut engine, "whoami; exit");
        assert_eq!(out, "sub\n");
        assert_eq!(engine.current_command_set(), Some("main"));
    }

    #[test]
    fn navigation_failures_reported() {
        let mut engine = engine();
        engine
            .register_command("main", "go $1", standard::push_command_set_arg())
            .unwrap();
        let (_, out) = run(&mut engine, "go nowhere");
        assert_eq!(out, "unknown command set: nowhere\n");
        assert_eq!(engine.current_command_set(), Some("main"));
        assert!(engine.pop_command_set().is_err());
    }

    #[test]
    fn exit_request_stops_line() {
        let mut engine = engine();
        engine.register_command("main", "quit", standard::exit()).unwrap();
        let (_, out) = run(&mut engine, "quit; echo after");
        assert!(out.is_empty());
        assert!(engine.should_exit());
    }

    #[test]
    fn first_registered_wins_ties() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let mut engine = Engine::new();
        engine.new_command_set("main").unwrap();
        for tag in ["first", "second"] {
            let hits = Arc::clone(&hits);
            engine
                .register_command("main", "ping $1", move |_: &mut Invocation<'_>| {
                    hits.lock().unwrap().push(tag);
                    Ok(())
                })
                .unwrap();
        }
        run(&mut engine, "ping host");
        assert_eq!(*hits.lock().unwrap(), vec!["first"]);
    }

    #[test]
    fn register_into_unknown_set_fails() {
        let mut engine = engine();
        let err = engine.register_command("nope", "x", echo).unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownCommandSet(_)));
    }

    #[test]
    fn suggest_uses_active_set_and_last_statement() {
        let mut engine = engine();
        assert_eq!(engine.suggest(""), vec!["echo", "enter"]);
        assert_eq!(engine.suggest("echo a; en"), vec!["enter"]);
        engine.push_command_set("sub").unwrap();
        assert_eq!(engine.suggest(""), vec!["exit", "whoami"]);
        assert!(engine.suggest("echo \"open").is_empty());
    }

    #[test]
    fn suggest_respects_cap() {
        let mut engine = Engine::with_config(Config {
            max_suggestions: 1,
            ..Config::default()
        });
        engine.new_command_set("main").unwrap();
        engine.register_command("main", "alpha", echo).unwrap();
        engine.register_command("main", "beta", echo).unwrap();
        assert_eq!(engine.suggest(""), vec!["alpha"]);
    }

    #[test]
    fn prompt_follows_active_set() {
        let mut engine = engine();
        assert_eq!(engine.render_prompt(), "main> ");
        engine.push_command_set("sub").unwrap();
        assert_eq!(engine.render_prompt(), "sub> ");
    }

    #[test]
    fn no_command_sets() {
        let mut engine = Engine::new();
        let (outcome, out) = run(&mut engine, "anything");
        assert!(matches!(outcome, Outcome::CommandNotFound { .. }));
        assert_eq!(out, "anything: command not found\n");
        assert!(engine.suggest("").is_empty());
    }
}
