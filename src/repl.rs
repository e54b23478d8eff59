use crate::rcfile::run_startup;
use netprompt::Engine;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config as EditorConfig, Editor, Helper, Result as RlResult};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

/// rustyline helper completing from the engine's active command set
struct NetHelper {
    engine: Arc<Mutex<Engine>>,
}

fn lock(engine: &Mutex<Engine>) -> MutexGuard<'_, Engine> {
    engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Byte offset where the statement under the cursor starts
fn statement_start(line: &str) -> usize {
    let start = line.rfind(|c: char| c == ';' || c == '\n').map(|i| i + 1).unwrap_or(0);
    let rest = &line[start..];
    start + (rest.len() - rest.trim_start().len())
}

impl Helper for NetHelper {}

impl Completer for NetHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = statement_start(&line[..pos]);
        let suggestions = lock(&self.engine).suggest(&line[start..pos]);

        // show just the word being offered, replace the whole statement
        let candidates = suggestions
            .into_iter()
            .map(|replacement| Pair {
                display: replacement
                    .rsplit(' ')
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                replacement,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for NetHelper {
    type Hint = String;
}

impl Highlighter for NetHelper {}

impl Validator for NetHelper {}

/// Run lines from the editor until exit, Ctrl-D or an editor failure
pub(crate) fn run_repl(engine: Engine) -> RlResult<()> {
    let config = engine.config().clone();
    let editor_config = EditorConfig::builder()
        .max_history_size(config.history_size)?
        .auto_add_history(false)
        .build();

    let engine = Arc::new(Mutex::new(engine));
    let mut rl: Editor<NetHelper, DefaultHistory> = Editor::with_config(editor_config)?;
    rl.set_helper(Some(NetHelper {
        engine: Arc::clone(&engine),
    }));

    if let Some(ref path) = config.history_file {
        if let Err(e) = rl.load_history(path) {
            tracing::debug!(path = %path.display(), error = %e, "no history loaded");
        }
    }

    {
        let mut engine = lock(&engine);
        run_startup(&mut engine, &mut io::stdout())?;
    }

    loop {
        let prompt = {
            let engine = lock(&engine);
            if engine.should_exit() {
                break;
            }
            engine.render_prompt()
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let outcome = lock(&engine).evaluate(&line, &mut io::stdout())?;
                // history keeps the canonical text of what actually ran
                for text in outcome.executed() {
                    rl.add_history_entry(text.as_str())?;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C - drop the line, keep going
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D - exit
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = config.history_file {
        if let Err(e) = rl.save_history(path) {
            eprintln!("Warning: cannot save history to {}: {}", path.display(), e);
        }
    }

    Ok(())
}
