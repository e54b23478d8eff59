//! Ready-made completers

use glob::Pattern;
use std::env;
use std::path::{Path, MAIN_SEPARATOR};

/// Complete a file or directory name. Directories are suffixed with the path
/// separator so completion can continue inside them; an empty seed lists the
/// current directory.
pub fn file_or_dir(partial: &str) -> Vec<String> {
    let seed = if partial.is_empty() {
        match env::current_dir() {
            Ok(cwd) => cwd.to_string_lossy().into_owned(),
            Err(_) => return Vec::new(),
        }
    } else {
        partial.to_string()
    };

    let path = Path::new(&seed);
    let (dir, prefix) = if path.is_dir() {
        (seed.clone(), String::new())
    } else {
        (
            path.parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    };

    let pattern = if dir.is_empty() {
        format!("{}*", Pattern::escape(&prefix))
    } else {
        format!(
            "{}{}{}*",
            Pattern::escape(dir.trim_end_matches(MAIN_SEPARATOR)),
            MAIN_SEPARATOR,
            Pattern::escape(&prefix)
        )
    };

    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(pattern, error = %err, "bad completion pattern");
            return Vec::new();
        }
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| {
            let mut name = entry.to_string_lossy().into_owned();
            if entry.is_dir() {
                name.push(MAIN_SEPARATOR);
            }
            name
        })
        .collect()
}
