//! Common test utilities for netprompt integration tests

pub use netprompt::{Engine, Invocation, Outcome};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::{Arc, Mutex};

/// Arguments each handler invocation received, in call order
pub type Calls = Arc<Mutex<Vec<Vec<String>>>>;

/// Evaluate a line and return the outcome with everything written to the sink
pub fn run(engine: &mut Engine, line: &str) -> (Outcome, String) {
    let mut out = Vec::new();
    let outcome = engine.evaluate(line, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

/// Evaluate a line and return only its output
#[allow(dead_code)]
pub fn output(engine: &mut Engine, line: &str) -> String {
    run(engine, line).1
}

/// A handler that records its arguments
#[allow(dead_code)]
pub fn recorder(calls: &Calls) -> impl Fn(&mut Invocation<'_>) -> io::Result<()> + Send + Sync + 'static {
    let calls = Arc::clone(calls);
    move |inv: &mut Invocation<'_>| {
        calls.lock().unwrap().push(inv.args().to_vec());
        Ok(())
    }
}

/// The fixed roster used by the name completer
#[allow(dead_code)]
pub fn complete_name(partial: &str) -> Vec<String> {
    ["Todd", "Elizabeth", "Ellen", "Eleanore"]
        .iter()
        .filter(|name| name.starts_with(partial))
        .map(|name| name.to_string())
        .collect()
}

/// Substring filter: keeps lines containing the first argument
#[allow(dead_code)]
pub fn contains_filter(input: &mut dyn Read, output: &mut dyn Write, args: &[String]) -> io::Result<()> {
    let needle = args.first().map(String::as_str).unwrap_or("");
    for line in BufReader::new(input).lines() {
        let line = line?;
        if line.contains(needle) {
            writeln!(output, "{}", line)?;
        }
    }
    Ok(())
}

/// An engine with a single empty command set named "main"
#[allow(dead_code)]
pub fn engine() -> Engine {
    let mut engine = Engine::new();
    engine.new_command_set("main").unwrap();
    engine
}
