//! Shared test utilities

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

/// Build an environment source from key/value pairs
#[must_use]
pub fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Write a plugin source unit into a directory
pub fn write_plugin(dir: &Path, file_name: &str, contents: &str) {
    std::fs::write(dir.join(file_name), contents).expect("failed to write plugin");
}

/// Plugin source declaring a single reply command
#[must_use]
pub fn reply_plugin(command: &str, reply: &str) -> String {
    format!(
        "[[router.commands]]\ncommand = \"{command}\"\ndescription = \"{command}\"\nreply = \"{reply}\"\n"
    )
}
