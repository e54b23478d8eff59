//! Ready-made command handlers for menu navigation
//!
//! ```
//! use netprompt::{standard, Engine};
//!
//! let mut engine = Engine::new();
//! engine.new_command_set("main").unwrap();
//! engine.new_command_set("interface").unwrap();
//! engine.register_command("main", "interface", standard::push_command_set("interface")).unwrap();
//! engine.register_command("interface", "exit", standard::pop_command_set()).unwrap();
//! ```

use crate::command::Invocation;
use std::io::{self, Write};

/// Enter the named command set
pub fn push_command_set(
    name: impl Into<String>,
) -> impl Fn(&mut Invocation<'_>) -> io::Result<()> + Send + Sync + 'static {
    let name = name.into();
    move |inv: &mut Invocation<'_>| {
        inv.push_command_set(name.clone());
        Ok(())
    }
}

/// Enter the command set named by the single argument. Register it with a
/// description such as `enter $1`.
pub fn push_command_set_arg() -> impl Fn(&mut Invocation<'_>) -> io::Result<()> + Send + Sync + 'static {
    |inv: &mut Invocation<'_>| {
        if inv.args().len() != 1 {
            return write!(inv, "expected a single argument");
        }
        let name = inv.args()[0].clone();
        inv.push_command_set(name);
        Ok(())
    }
}

/// Leave the current command set
pub fn pop_command_set() -> impl Fn(&mut Invocation<'_>) -> io::Result<()> + Send + Sync + 'static {
    |inv: &mut Invocation<'_>| {
        inv.pop_command_set();
        Ok(())
    }
}

/// End the session
pub fn exit() -> impl Fn(&mut Invocation<'_>) -> io::Result<()> + Send + Sync + 'static {
    |inv: &mut Invocation<'_>| {
        inv.request_exit();
        Ok(())
    }
}
