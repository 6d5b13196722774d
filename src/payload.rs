use crate::error::PayloadError;
use crate::issue::IssueRecord;
use serde_json::Value;
use std::path::Path;

/// How an issue payload argument should be read.
#[derive(Debug, PartialEq, Eq)]
pub enum PayloadSource<'a> {
    Empty,
    Inline(&'a str),
    Path(&'a Path),
}

impl<'a> PayloadSource<'a> {
    pub fn classify(input: &'a str) -> Self {
        let trimmed = input.trim_start();

        if trimmed.is_empty() {
            PayloadSource::Empty
        } else if trimmed.starts_with('{') || trimmed.starts_with('[') {
            PayloadSource::Inline(input)
        } else {
            PayloadSource::Path(Path::new(input))
        }
    }
}

/// Reads an issue record from either an inline JSON string or a path to a JSON file.
pub fn resolve_issue(input: &str) -> Result<IssueRecord, PayloadError> {
    let document = match PayloadSource::classify(input) {
        PayloadSource::Empty => return Err(PayloadError::Empty),
        PayloadSource::Inline(json) => match serde_json::from_str::<Value>(json) {
            Ok(document) => document,
            // File names may start with a bracket too, e.g. `[2024] issue.json`.
            Err(_) if Path::new(input).is_file() => read_file(Path::new(input))?,
            Err(e) => return Err(PayloadError::InvalidInlineJson(e)),
        },
        PayloadSource::Path(path) => read_path(path, input)?,
    };

    into_issue(document)
}

fn read_path(path: &Path, input: &str) -> Result<Value, PayloadError> {
    if path.is_dir() {
        return Err(PayloadError::Directory(path.to_path_buf()));
    }

    if path.exists() {
        return read_file(path);
    }

    // Bare scalars such as `42` or `null` are JSON, just not an issue object.
    if let Ok(document) = serde_json::from_str::<Value>(input) {
        return Ok(document);
    }

    Err(if looks_like_path(path) {
        PayloadError::FileNotFound(path.to_path_buf())
    } else {
        PayloadError::NotJsonOrFile(input.to_string())
    })
}

fn read_file(path: &Path) -> Result<Value, PayloadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PayloadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| PayloadError::InvalidFileJson {
        path: path.to_path_buf(),
        source,
    })
}

fn looks_like_path(path: &Path) -> bool {
    path.components().count() > 1 || path.extension().is_some_and(|ext| ext == "json")
}

fn into_issue(document: Value) -> Result<IssueRecord, PayloadError> {
    let kind = match &document {
        Value::Object(_) => None,
        Value::Array(_) => Some("an array"),
        Value::String(_) => Some("a string"),
        Value::Number(_) => Some("a number"),
        Value::Bool(_) => Some("a boolean"),
        Value::Null => Some("null"),
    };

    if let Some(kind) = kind {
        return Err(PayloadError::NotAnObject(kind));
    }

    // Every field is optional and loosely typed, so an object always fits.
    serde_json::from_value(document).map_err(PayloadError::InvalidShape)
}
