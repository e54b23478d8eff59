//! Command sets and the menu stack
//!
//! Command sets are registered once and never removed, so the stack refers to
//! them by [`SetId`] rather than borrowing them.

use crate::command::{CommandDescriptor, RegistrationError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    #[error("unknown command set: {0}")]
    UnknownCommandSet(String),
    #[error("can't pop command set")]
    CannotPop,
    #[error("no command sets registered")]
    Empty,
}

/// A named menu of commands, matched in registration order
#[derive(Debug)]
pub struct CommandSet {
    name: String,
    commands: Vec<CommandDescriptor>,
}

impl CommandSet {
    pub fn new(name: impl Into<String>) -> Self {
        CommandSet {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, command: CommandDescriptor) {
        tracing::debug!(set = %self.name, command = command.source(), "registered command");
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetId(usize);

/// Every command set, in creation order
#[derive(Debug, Default)]
pub struct Registry {
    sets: Vec<CommandSet>,
    index: HashMap<String, SetId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, name: &str) -> Result<SetId, RegistrationError> {
        if self.index.contains_key(name) {
            return Err(RegistrationError::DuplicateCommandSet(name.to_string()));
        }
        let id = SetId(self.sets.len());
        self.sets.push(CommandSet::new(name));
        self.index.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<SetId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, id: SetId) -> &CommandSet {
        &self.sets[id.0]
    }

    pub fn get_mut(&mut self, id: SetId) -> &mut CommandSet {
        &mut self.sets[id.0]
    }

    pub fn by_name_mut(&mut self, name: &str) -> Result<&mut CommandSet, RegistrationError> {
        let id = self
            .lookup(name)
            .ok_or_else(|| RegistrationError::UnknownCommandSet(name.to_string()))?;
        Ok(self.get_mut(id))
    }

    /// The first set ever created; the bottom of every stack
    pub fn root(&self) -> Option<SetId> {
        if self.sets.is_empty() {
            None
        } else {
            Some(SetId(0))
        }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Active menus, innermost last. The bottom frame is the registry's root set
/// and can never be popped.
#[derive(Debug, Default, Clone)]
pub struct CommandSetStack {
    frames: Vec<SetId>,
}

impl CommandSetStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `name`; the stack is unchanged on failure
    pub fn push(&mut self, registry: &Registry, name: &str) -> Result<(), StackError> {
        let id = registry
            .lookup(name)
            .ok_or_else(|| StackError::UnknownCommandSet(name.to_string()))?;
        if self.frames.is_empty() {
            self.frames.extend(registry.root());
        }
        self.frames.push(id);
        tracing::debug!(set = name, depth = self.frames.len(), "pushed command set");
        Ok(())
    }

    /// Leave the current set; the stack is unchanged on failure
    pub fn pop(&mut self) -> Result<(), StackError> {
        if self.frames.len() <= 1 {
            return Err(StackError::CannotPop);
        }
        self.frames.pop();
        tracing::debug!(depth = self.frames.len(), "popped command set");
        Ok(())
    }

    /// Top of the stack, falling back to the root set before anything is pushed
    pub fn current(&self, registry: &Registry) -> Result<SetId, StackError> {
        self.frames
            .last()
            .copied()
            .or_else(|| registry.root())
            .ok_or(StackError::Empty)
    }

    /// Number of active sets, counting the root
    pub fn depth(&self) -> usize {
        self.frames.len().max(1)
    }

    /// Names from the root outwards
    pub fn names<'r>(&self, registry: &'r Registry) -> Vec<&'r str> {
        if self.frames.is_empty() {
            return registry.root().map(|id| registry.get(id).name()).into_iter().collect();
        }
        self.frames.iter().map(|id| registry.get(*id).name()).collect()
    }
}
