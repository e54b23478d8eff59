//! netprompt - embeddable network-equipment-style command lines
//!
//! # Overview
//!
//! Commands are registered with a small description grammar and grouped into
//! named command sets, which behave like the menus of a router CLI: entering a
//! submenu swaps the set of commands that user input is matched against.
//!
//! ```text
//! show interfaces           literal words
//! ping $1                   one argument
//! copy $2 $1                arguments, reordered
//! hello $*:name             every remaining word, completed by "name"
//! ```
//!
//! User input may chain several statements and send a command's output
//! through filters and into a file:
//!
//! ```text
//! show log | grep -i error | grep -v debug > errors.txt; show clock
//! ```
//!
//! # Matching
//!
//! Every description in the active set is scored against the input. An exact
//! literal match beats a `$n` substitution, which beats a `$*` wildcard; the
//! earliest registered description wins a tie.
//!
//! # Example
//!
//! ```rust
//! use netprompt::{Engine, Invocation, Outcome};
//! use std::io::Write;
//!
//! let mut engine = Engine::new();
//! engine.new_command_set("main").unwrap();
//! engine
//!     .register_command("main", "hello $*", |inv: &mut Invocation<'_>| {
//!         let names = inv.args().join(" ");
//!         writeln!(inv, "Hello {}!", names)
//!     })
//!     .unwrap();
//!
//! let mut out = Vec::new();
//! let outcome = engine.evaluate("hello Todd", &mut out).unwrap();
//! assert!(matches!(outcome, Outcome::Executed(_)));
//! assert_eq!(out, b"Hello Todd!\n");
//! assert_eq!(engine.suggest("hel"), vec!["hello"]);
//! ```

pub mod args;
pub mod ast;
pub mod command;
pub mod completers;
pub mod completion;
pub mod config;
pub mod engine;
pub mod filters;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod standard;

// Re-export commonly used items
pub use args::extract_args;
pub use ast::{FilterInvocation, PlaceholderIndex, Segment, Statement};
pub use command::{CommandDescriptor, Handler, Invocation, RegistrationError, Request};
pub use completion::{complete, suggest, Completer, CompleterTable, CompletionTier};
pub use config::{Config, ConfigError};
pub use engine::{Engine, Outcome};
pub use lexer::{lex, LexError, LexMode, Token, TokenKind};
pub use matcher::{score, select, MatchTier};
pub use parser::{parse, parse_description, parse_input, ParseError};
pub use pipeline::{execute, relay, Filter, FilterTable, PipelineError, RelayReader, RelayWriter};
pub use registry::{CommandSet, CommandSetStack, Registry, SetId, StackError};
