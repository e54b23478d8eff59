use netprompt::config::home_dir;
use netprompt::{Engine, Outcome};
use std::fs;
use std::io::{self, Write};

/// Run the configured startup lines, then ~/.netpromptrc if it exists
pub(crate) fn run_startup(engine: &mut Engine, out: &mut (dyn Write + Send)) -> io::Result<()> {
    let startup = engine.config().startup.clone();
    run_lines(engine, startup.iter().map(String::as_str), "config startup", out)?;

    let rc_path = match home_dir() {
        Some(home) => home.join(".netpromptrc"),
        None => return Ok(()),
    };
    let content = match fs::read_to_string(&rc_path) {
        Ok(c) => c,
        Err(_) => return Ok(()),
    };
    run_lines(engine, content.lines(), "~/.netpromptrc", out)
}

/// Evaluate each line, skipping blanks and `#` comments. Lines that fail are
/// reported on stderr and do not stop the rest.
pub(crate) fn run_lines<'a, I>(engine: &mut Engine, lines: I, source: &str, out: &mut (dyn Write + Send)) -> io::Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for (line_num, line) in lines.into_iter().enumerate() {
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match engine.evaluate(trimmed, out)? {
            Outcome::ParseError(e) => {
                eprintln!("Warning: {} line {}: {}", source, line_num + 1, e);
            }
            Outcome::CommandNotFound { input, .. } => {
                eprintln!("Warning: {} line {}: {}: command not found", source, line_num + 1, input);
            }
            Outcome::Empty | Outcome::Executed(_) => {}
        }
        if engine.should_exit() {
            break;
        }
    }
    Ok(())
}
