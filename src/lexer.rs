//! Tokenization for netprompt
//!
//! One scanner serves both command descriptions (`move $1 $2:direction`) and
//! free-form user input (`ls /tmp | grep foo > out.txt`). Tokens are produced
//! on demand by [`Lexer`]: the parser pulls one token at a time, and scanning
//! stops at the first error without looking at the rest of the line.

use nom::{
    bytes::complete::{escaped, take_while, take_while1},
    character::complete::{anychar, char, digit1, none_of, space0},
    combinator::{opt, recognize},
    sequence::delimited,
    IResult,
};
use std::fmt;
use thiserror::Error;

/// Which grammar the scanner applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// Command descriptions: `$1`, `$*` and `:type` are recognized
    Description,
    /// User input: `$` is ordinary word text
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of non-special characters
    Word,
    /// A `"..."`, `'...'` or `` `...` `` string, delimiters included
    QuotedString,
    /// `;`, `\n` or `\r`
    StatementSeparator,
    /// A backslash immediately followed by end of line
    LineContinuation,
    /// `$*` or `$<digits>` (description mode only); text is `*` or the digits
    Placeholder,
    /// The `type` in `$1:type`
    PlaceholderCompletionType,
    /// `|`
    Pipe,
    /// `>`
    OutputRedirect,
    /// The single word following `>`
    OutputFilename,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Word => "word",
            TokenKind::QuotedString => "quoted string",
            TokenKind::StatementSeparator => "separator",
            TokenKind::LineContinuation => "line continuation",
            TokenKind::Placeholder => "placeholder",
            TokenKind::PlaceholderCompletionType => "completion type",
            TokenKind::Pipe => "pipe",
            TokenKind::OutputRedirect => "redirect",
            TokenKind::OutputFilename => "filename",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated quoted string")]
    UnterminatedString,
    #[error("invalid placeholder character '{0}'")]
    InvalidPlaceholderChar(char),
    #[error("unterminated placeholder")]
    UnterminatedPlaceholder,
    #[error("unexpected filter character '{0}'")]
    UnexpectedFilterChar(char),
    #[error("unexpected filename character '{0}'")]
    UnexpectedFilenameChar(char),
}

/// What the scanner expects next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Command,
    /// Just emitted `|`; a filter name must follow
    FilterName,
    /// Just emitted `>`; a filename must follow
    Filename,
    /// Just emitted a placeholder followed by `:`
    CompletionType,
    Done,
}

fn is_end_of_line(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_word_char(c: char, mode: LexMode) -> bool {
    match c {
        ' ' | '\t' | '\n' | '\r' | ';' | '|' | '>' => false,
        '$' => mode == LexMode::Input,
        _ => true,
    }
}

/// A quoted string running to the matching unescaped delimiter.
/// A backslash escapes any following character, including a newline.
fn quoted(delimiter: char, input: &str) -> IResult<&str, &str> {
    let stop = match delimiter {
        '"' => "\"\\\n\r",
        '\'' => "'\\\n\r",
        _ => "`\\\n\r",
    };
    recognize(delimited(
        char(delimiter),
        opt(escaped(none_of(stop), '\\', anychar)),
        char(delimiter),
    ))(input)
}

fn word(mode: LexMode, input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| is_word_char(c, mode))(input)
}

fn completion_type(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Pull-based tokenizer over a single line (or several `;`/newline separated
/// statements).
pub struct Lexer<'a> {
    rest: &'a str,
    mode: LexMode,
    state: State,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, mode: LexMode) -> Self {
        Lexer {
            rest: input,
            mode,
            state: State::Command,
        }
    }

    pub fn mode(&self) -> LexMode {
        self.mode
    }

    fn skip_space(&mut self) {
        if let Ok((rest, _)) = space0::<_, nom::error::Error<&str>>(self.rest) {
            self.rest = rest;
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    fn lex_command(&mut self) -> Option<Result<Token, LexError>> {
        self.skip_space();
        let c = self.peek()?;
        let token = match c {
            '`' | '"' | '\'' => return Some(self.lex_quote(c)),
            ';' => {
                self.bump();
                Token::new(TokenKind::StatementSeparator, ";")
            }
            '|' => {
                self.bump();
                self.state = State::FilterName;
                Token::new(TokenKind::Pipe, "|")
            }
            '>' => {
                self.bump();
                self.state = State::Filename;
                Token::new(TokenKind::OutputRedirect, ">")
            }
            '$' if self.mode == LexMode::Description => return Some(self.lex_placeholder()),
            '\\' if self.rest[1..].starts_with(is_end_of_line) => {
                self.bump();
                self.rest = self.rest.trim_start_matches(is_end_of_line);
                Token::new(TokenKind::LineContinuation, "")
            }
            c if is_end_of_line(c) => {
                self.bump();
                Token::new(TokenKind::StatementSeparator, c.to_string())
            }
            _ => self.lex_word(),
        };
        Some(Ok(token))
    }

    fn lex_word(&mut self) -> Token {
        match word(self.mode, self.rest) {
            Ok((rest, text)) => {
                self.rest = rest;
                Token::new(TokenKind::Word, text)
            }
            // lex_command dispatches every non-word character itself
            Err(_) => {
                let c = self.bump().unwrap_or_default();
                Token::new(TokenKind::Word, c.to_string())
            }
        }
    }

    fn lex_quote(&mut self, delimiter: char) -> Result<Token, LexError> {
        let (rest, text) = quoted(delimiter, self.rest).map_err(|_| LexError::UnterminatedString)?;
        self.rest = rest;
        Ok(Token::new(TokenKind::QuotedString, text))
    }

    fn lex_placeholder(&mut self) -> Result<Token, LexError> {
        self.bump(); // '$'
        let text = match self.peek() {
            None => return Err(LexError::UnterminatedPlaceholder),
            Some('*') => {
                self.bump();
                "*"
            }
            Some(c) if c.is_ascii_digit() => {
                let (rest, digits) = digit1::<_, nom::error::Error<&str>>(self.rest)
                    .map_err(|_| LexError::InvalidPlaceholderChar(c))?;
                self.rest = rest;
                digits
            }
            Some(c) => return Err(LexError::InvalidPlaceholderChar(c)),
        };
        if self.peek() == Some(':') {
            self.state = State::CompletionType;
        }
        Ok(Token::new(TokenKind::Placeholder, text))
    }

    fn lex_completion_type(&mut self) -> Token {
        self.bump(); // ':'
        let (rest, name) = completion_type(self.rest).unwrap_or((self.rest, ""));
        self.rest = rest;
        self.state = State::Command;
        Token::new(TokenKind::PlaceholderCompletionType, name)
    }

    fn lex_filter_name(&mut self) -> Option<Result<Token, LexError>> {
        self.skip_space();
        let c = self.peek()?;
        if is_word_char(c, self.mode) {
            self.state = State::Command;
            return Some(Ok(self.lex_word()));
        }
        match c {
            '|' => {
                self.bump();
                Some(Ok(Token::new(TokenKind::Pipe, "|")))
            }
            ';' => {
                self.bump();
                self.state = State::Command;
                Some(Ok(Token::new(TokenKind::StatementSeparator, ";")))
            }
            c => Some(Err(LexError::UnexpectedFilterChar(c))),
        }
    }

    fn lex_filename(&mut self) -> Option<Result<Token, LexError>> {
        self.skip_space();
        let mode = self.mode;
        let rest = self.rest;
        let end = rest.find(|c: char| !is_word_char(c, mode)).unwrap_or(rest.len());
        let (name, after) = rest.split_at(end);
        self.rest = after;
        match self.peek() {
            None => {}
            Some(' ') | Some('\t') => {
                self.bump();
            }
            Some(c) if c == ';' || is_end_of_line(c) => {}
            Some(c) => return Some(Err(LexError::UnexpectedFilenameChar(c))),
        }
        self.state = State::Command;
        if name.is_empty() {
            // leave the complaint to the parser, which expects a filename here
            return self.lex_command();
        }
        Some(Ok(Token::new(TokenKind::OutputFilename, name)))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.state {
            State::Done => return None,
            State::Command => self.lex_command(),
            State::FilterName => self.lex_filter_name(),
            State::Filename => self.lex_filename(),
            State::CompletionType => Some(Ok(self.lex_completion_type())),
        };
        match &item {
            Some(Ok(token)) => tracing::trace!(kind = %token.kind, text = %token.text, "token"),
            Some(Err(_)) | None => self.state = State::Done,
        }
        item
    }
}

/// Tokenize a complete input string
pub fn lex(input: &str, mode: LexMode) -> Result<Vec<Token>, LexError> {
    Lexer::new(input, mode).collect()
}
