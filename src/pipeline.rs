//! Filter pipeline execution
//!
//! A statement such as `show log | grep err | grep -v debug > errors.txt` runs
//! its handler and every filter at the same time, each filter on its own
//! thread. Neighbouring stages are joined by a [`relay`]: a bounded channel
//! that holds at most one in-flight write, so a slow filter stalls whoever
//! writes to it.

use crate::ast::FilterInvocation;
use crate::command::RegistrationError;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0} is not a valid filter")]
    UnknownFilter(String),
    #[error("filter {name} failed: {source}")]
    Filter {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("filter {0} panicked")]
    FilterPanicked(String),
    #[error("command failed: {0}")]
    Handler(#[source] io::Error),
    #[error("error writing: {0}")]
    Output(#[from] io::Error),
}

/// Reads the upstream stage, writes the downstream stage, with the arguments
/// that followed its name on the command line.
pub type Filter = Box<dyn Fn(&mut dyn Read, &mut dyn Write, &[String]) -> io::Result<()> + Send + Sync>;

#[derive(Default)]
pub struct FilterTable {
    filters: HashMap<String, Filter>,
}

impl FilterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, filter: F) -> Result<(), RegistrationError>
    where
        F: Fn(&mut dyn Read, &mut dyn Write, &[String]) -> io::Result<()> + Send + Sync + 'static,
    {
        if self.filters.contains_key(name) {
            return Err(RegistrationError::DuplicateFilter(name.to_string()));
        }
        self.filters.insert(name.to_string(), Box::new(filter));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }
}

impl fmt::Debug for FilterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.filters.keys().collect();
        names.sort();
        f.debug_struct("FilterTable").field("names", &names).finish()
    }
}

/// Producer end of a relay. Dropping it signals end of stream to the reader.
pub struct RelayWriter {
    tx: SyncSender<Vec<u8>>,
}

/// Consumer end of a relay. Dropping it makes further writes fail with
/// [`io::ErrorKind::BrokenPipe`].
pub struct RelayReader {
    rx: Receiver<Vec<u8>>,
    chunk: Vec<u8>,
    pos: usize,
}

/// A connected writer/reader pair holding at most one write in flight
pub fn relay() -> (RelayWriter, RelayReader) {
    let (tx, rx) = sync_channel(1);
    (
        RelayWriter { tx },
        RelayReader {
            rx,
            chunk: Vec::new(),
            pos: 0,
        },
    )
}

impl Write for RelayWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "relay reader closed"))?;
        tracing::trace!(bytes = buf.len(), "relay write");
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for RelayReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos >= self.chunk.len() {
            match self.rx.recv() {
                Ok(chunk) => {
                    self.chunk = chunk;
                    self.pos = 0;
                }
                // every writer is gone
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.chunk.len() - self.pos);
        buf[..n].copy_from_slice(&self.chunk[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

/// Run `head` with its output flowing through `chain` and into either the
/// file named by `output` or `sink`.
///
/// Every filter name is resolved before anything runs. When the output file
/// cannot be created the failure is reported on `sink` and output goes to
/// `sink` instead. Returns once the head and every filter have finished.
pub fn execute<H>(
    filters: &FilterTable,
    chain: &[FilterInvocation],
    output: Option<&str>,
    sink: &mut (dyn Write + Send),
    head: H,
) -> Result<(), PipelineError>
where
    H: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let stages = chain
        .iter()
        .map(|invocation| {
            filters
                .get(&invocation.name)
                .map(|filter| (invocation, filter))
                .ok_or_else(|| PipelineError::UnknownFilter(invocation.name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut file;
    let target: &mut (dyn Write + Send) = match output {
        Some(path) => match File::create(path) {
            Ok(created) => {
                file = created;
                &mut file
            }
            Err(err) => {
                tracing::warn!(path, error = %err, "cannot create output file");
                writeln!(sink, "error writing: {}", err)?;
                sink
            }
        },
        None => sink,
    };

    thread::scope(|scope| {
        let mut current: Box<dyn Write + Send + '_> = Box::new(target);
        let mut running = Vec::with_capacity(stages.len());

        // wire from the sink backwards so each stage already has somewhere to write
        for (invocation, filter) in stages.iter().rev() {
            let (writer, mut reader) = relay();
            let mut downstream = current;
            let args = invocation.args.as_slice();
            let handle = scope.spawn(move || {
                let input: &mut dyn Read = &mut reader;
                let result = filter(input, &mut *downstream, args).and_then(|()| downstream.flush());
                // close both ends so neighbours see end of stream or a broken pipe
                drop(reader);
                drop(downstream);
                result
            });
            running.push((invocation.name.as_str(), handle));
            current = Box::new(writer);
        }

        let head_result = head(&mut *current).and_then(|()| current.flush());
        drop(current);

        let mut failure = match head_result {
            Err(err) if !is_broken_pipe(&err) => Some(PipelineError::Handler(err)),
            _ => None,
        };
        // joined in the order the stages were started
        for (name, handle) in running {
            let stage_failure = match handle.join() {
                Ok(Ok(())) => None,
                Ok(Err(err)) if is_broken_pipe(&err) => None,
                Ok(Err(err)) => {
                    tracing::warn!(filter = name, error = %err, "filter failed");
                    Some(PipelineError::Filter {
                        name: name.to_string(),
                        source: err,
                    })
                }
                Err(_) => {
                    tracing::warn!(filter = name, "filter panicked");
                    Some(PipelineError::FilterPanicked(name.to_string()))
                }
            };
            if failure.is_none() {
                failure = stage_failure;
            }
        }
        failure.map_or(Ok(()), Err)
    })
}
