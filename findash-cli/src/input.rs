use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Reads a JSON request from `path`, or from stdin when no path is given.
///
/// Malformed JSON (including non-numeric amount fields) is rejected here,
/// before any computation runs.
pub fn read_request<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let contents = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read request from stdin")?;
            buffer
        }
    };

    let trimmed = contents.trim();
    if trimmed.is_empty() {
        anyhow::bail!("empty request body");
    }
    serde_json::from_str(trimmed).context("Failed to parse request JSON")
}
