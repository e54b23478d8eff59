//! Ready-made output filters

use regex::RegexBuilder;
use std::io::{self, BufRead, BufReader, Read, Write};

/// A small grep: keeps lines matching a regular expression.
///
/// `-i` makes the match case-insensitive and `-v` keeps the lines that do
/// not match. With no arguments everything passes through.
pub fn grep(input: &mut dyn Read, output: &mut dyn Write, args: &[String]) -> io::Result<()> {
    if args.is_empty() {
        io::copy(input, output)?;
        return Ok(());
    }

    let mut case_insensitive = false;
    let mut invert = false;
    let mut pattern = "";
    for arg in args {
        match arg.as_str() {
            "-i" => case_insensitive = true,
            "-v" => invert = true,
            other => pattern = other,
        }
    }

    let re = match RegexBuilder::new(pattern).case_insensitive(case_insensitive).build() {
        Ok(re) => re,
        Err(err) => {
            tracing::warn!(pattern, error = %err, "bad grep pattern");
            return write!(output, "error compiling regexp: {}", err);
        }
    };

    for line in BufReader::new(input).lines() {
        let line = line?;
        if re.is_match(&line) != invert {
            writeln!(output, "{}", line)?;
        }
    }
    Ok(())
}
