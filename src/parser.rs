//! Parser for netprompt
//!
//! Assembles the token stream into [`Statement`]s. The parser is a small state
//! machine (start of statement, inside a statement, filter, output file) that
//! pulls tokens from the lexer on demand with one token of pushback.

use crate::ast::{FilterInvocation, PlaceholderIndex, Segment, Statement};
use crate::lexer::{LexError, LexMode, Lexer, Token, TokenKind};
use std::mem;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unexpected {kind} token '{text}'")]
    UnexpectedToken { kind: TokenKind, text: String },
    #[error("duplicate placeholder ${0}")]
    DuplicatePlaceholder(PlaceholderIndex),
    #[error("invalid placeholder index ${0}")]
    InvalidPlaceholderIndex(String),
    #[error("cannot specify multiple output files")]
    MultipleOutputs,
    #[error("expected output filename")]
    ExpectedFilename,
    #[error("expected word after |")]
    ExpectedFilterName,
}

impl ParseError {
    fn unexpected(token: Token) -> Self {
        ParseError::UnexpectedToken {
            kind: token.kind,
            text: token.text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartStatement,
    MidStatement,
    Filter,
    OutputFile,
}

/// Parser state
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    pushback: Option<Token>,
    current: Statement,
    parsed: Vec<Statement>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, mode: LexMode) -> Self {
        Parser {
            lexer: Lexer::new(input, mode),
            pushback: None,
            current: Statement::default(),
            parsed: Vec::new(),
        }
    }

    /// Consume and return the next token
    fn advance(&mut self) -> Result<Option<Token>, ParseError> {
        if let Some(token) = self.pushback.take() {
            return Ok(Some(token));
        }
        Ok(self.lexer.next().transpose()?)
    }

    /// Peek at the next token without consuming it
    fn peek(&mut self) -> Result<Option<&Token>, ParseError> {
        if self.pushback.is_none() {
            self.pushback = self.lexer.next().transpose()?;
        }
        Ok(self.pushback.as_ref())
    }

    fn peek_kind(&mut self) -> Result<Option<TokenKind>, ParseError> {
        Ok(self.peek()?.map(|t| t.kind))
    }

    fn backup(&mut self, token: Token) {
        self.pushback = Some(token);
    }

    /// Parse the entire input into statements
    pub fn parse(mut self) -> Result<Vec<Statement>, ParseError> {
        let mut state = Some(State::StartStatement);
        while let Some(current) = state {
            state = match current {
                State::StartStatement => self.start_statement()?,
                State::MidStatement => self.mid_statement()?,
                State::Filter => self.filter()?,
                State::OutputFile => self.output_file()?,
            };
        }
        self.finish_statement();
        Ok(self.parsed)
    }

    fn finish_statement(&mut self) {
        let statement = mem::take(&mut self.current);
        if !statement.is_empty() {
            tracing::debug!(statement = %statement, "parsed statement");
            self.parsed.push(statement);
        }
    }

    fn start_statement(&mut self) -> Result<Option<State>, ParseError> {
        self.finish_statement();
        loop {
            match self.advance()? {
                None => return Ok(None),
                Some(token) => match token.kind {
                    TokenKind::Word | TokenKind::QuotedString => {
                        self.backup(token);
                        return Ok(Some(State::MidStatement));
                    }
                    TokenKind::LineContinuation => continue,
                    _ => return Err(ParseError::unexpected(token)),
                },
            }
        }
    }

    fn mid_statement(&mut self) -> Result<Option<State>, ParseError> {
        loop {
            let token = match self.advance()? {
                None => return Ok(None),
                Some(token) => token,
            };
            match token.kind {
                TokenKind::Word => self.current.segments.push(Segment::Literal(token.text)),
                TokenKind::QuotedString => self
                    .current
                    .segments
                    .push(Segment::Literal(unquote(&token.text))),
                TokenKind::Placeholder => self.placeholder(token)?,
                TokenKind::LineContinuation => {}
                TokenKind::Pipe => return Ok(Some(State::Filter)),
                TokenKind::OutputRedirect => return Ok(Some(State::OutputFile)),
                TokenKind::StatementSeparator => return Ok(Some(State::StartStatement)),
                TokenKind::PlaceholderCompletionType | TokenKind::OutputFilename => {
                    return Err(ParseError::unexpected(token))
                }
            }
        }
    }

    fn placeholder(&mut self, token: Token) -> Result<(), ParseError> {
        let index = if token.text == "*" {
            PlaceholderIndex::Wildcard
        } else {
            let n = token
                .text
                .parse()
                .map_err(|_| ParseError::InvalidPlaceholderIndex(token.text.clone()))?;
            PlaceholderIndex::Numbered(n)
        };

        let mut completion = None;
        if self.peek_kind()? == Some(TokenKind::PlaceholderCompletionType) {
            completion = self
                .advance()?
                .map(|t| t.text)
                .filter(|name| !name.is_empty());
        }

        if self.current.has_placeholder(index) {
            return Err(ParseError::DuplicatePlaceholder(index));
        }
        self.current
            .segments
            .push(Segment::Placeholder { index, completion });
        Ok(())
    }

    fn filter(&mut self) -> Result<Option<State>, ParseError> {
        let name = match self.advance()? {
            Some(token) if token.kind == TokenKind::Word => token.text,
            _ => return Err(ParseError::ExpectedFilterName),
        };
        let mut filter = FilterInvocation::new(name);
        while let Some(kind) = self.peek_kind()? {
            match kind {
                TokenKind::Word | TokenKind::QuotedString => {
                    if let Some(token) = self.advance()? {
                        filter.args.push(match kind {
                            TokenKind::QuotedString => unquote(&token.text),
                            _ => token.text,
                        });
                    }
                }
                TokenKind::LineContinuation => {
                    self.advance()?;
                }
                _ => break,
            }
        }
        self.current.filters.push(filter);
        Ok(Some(State::MidStatement))
    }

    fn output_file(&mut self) -> Result<Option<State>, ParseError> {
        let file = match self.advance()? {
            Some(token) if token.kind == TokenKind::OutputFilename => token.text,
            _ => return Err(ParseError::ExpectedFilename),
        };
        if self.current.output.is_some() {
            return Err(ParseError::MultipleOutputs);
        }
        self.current.output = Some(file);

        match self.advance()? {
            None => Ok(None),
            Some(token) => match token.kind {
                TokenKind::StatementSeparator => Ok(Some(State::StartStatement)),
                TokenKind::OutputRedirect => Ok(Some(State::OutputFile)),
                _ => Err(ParseError::unexpected(token)),
            },
        }
    }
}

/// Strip the delimiters of a quoted string token and resolve `\<delimiter>`
/// and `\\` escapes
fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    let delimiter = match chars.next() {
        Some(d) => d,
        None => return String::new(),
    };
    let inner = chars.as_str();
    let inner = inner.strip_suffix(delimiter).unwrap_or(inner);

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == delimiter || next == '\\' {
                    result.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        result.push(c);
    }
    result
}

/// Parse a line into statements
pub fn parse(input: &str, mode: LexMode) -> Result<Vec<Statement>, ParseError> {
    Parser::new(input, mode).parse()
}

/// Parse free-form user input
pub fn parse_input(line: &str) -> Result<Vec<Statement>, ParseError> {
    parse(line, LexMode::Input)
}

/// Parse a command description such as `move $1 $2:direction`
pub fn parse_description(description: &str) -> Result<Vec<Statement>, ParseError> {
    parse(description, LexMode::Description)
}
