//! The menus the netprompt binary ships with

use netprompt::{completers, filters, standard, Config, Engine, Invocation, RegistrationError};
use std::fs;
use std::io::{self, Write};

const NAMES: [&str; 4] = ["Todd", "Elizabeth", "Ellen", "Eleanore"];

fn complete_name(partial: &str) -> Vec<String> {
    NAMES
        .iter()
        .filter(|name| name.starts_with(partial))
        .map(|name| name.to_string())
        .collect()
}

/// "Hello Todd, Ellen and Eleanore!"
fn hello(inv: &mut Invocation<'_>) -> io::Result<()> {
    let mut greeting = String::from("Hello ");
    let names = inv.args();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            greeting.push_str(if i + 1 == names.len() { " and " } else { ", " });
        }
        greeting.push_str(name);
    }
    writeln!(inv, "{}!", greeting)
}

fn list(inv: &mut Invocation<'_>) -> io::Result<()> {
    let Some(target) = inv.args().first().cloned() else {
        return Ok(());
    };
    let meta = match fs::metadata(&target) {
        Ok(meta) => meta,
        Err(e) => return writeln!(inv, "error listing {}: {}", target, e),
    };
    if !meta.is_dir() {
        return writeln!(inv, "{} is {} bytes", target, meta.len());
    }
    let entries = match fs::read_dir(&target) {
        Ok(entries) => entries,
        Err(e) => return writeln!(inv, "error listing {}: {}", target, e),
    };
    let mut names: Vec<(String, Option<u64>)> = entries
        .filter_map(Result::ok)
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let size = entry
                .metadata()
                .ok()
                .and_then(|m| if m.is_dir() { None } else { Some(m.len()) });
            (name, size)
        })
        .collect();
    names.sort();
    for (name, size) in names {
        match size {
            Some(bytes) => writeln!(inv, "{} is {} bytes", name, bytes)?,
            None => writeln!(inv, "<{}>", name)?,
        }
    }
    Ok(())
}

/// Build the demo engine: a top menu leading to a greeting menu and a file
/// listing menu.
pub(crate) fn build(config: Config) -> Result<Engine, RegistrationError> {
    let mut engine = Engine::with_config(config);

    engine.register_completer("fileOrDir", completers::file_or_dir)?;
    engine.register_completer("name", complete_name)?;
    engine.register_filter("grep", filters::grep)?;

    engine.new_command_set("default")?;
    engine.new_command_set("names")?;
    engine.new_command_set("files")?;

    engine.register_command("default", "exit", standard::exit())?;
    engine.register_command("default", "names", standard::push_command_set("names"))?;
    engine.register_command("default", "list-files", standard::push_command_set("files"))?;

    engine.register_command("names", "exit", standard::pop_command_set())?;
    engine.register_command("names", "hello $*:name", hello)?;

    engine.register_command("files", "exit", standard::pop_command_set())?;
    engine.register_command("files", "ls $1:fileOrDir", list)?;

    Ok(engine)
}
