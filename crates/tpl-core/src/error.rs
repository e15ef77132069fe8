//! Error types for classification and template rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering a template against an environment table.
#[derive(Error, Debug)]
pub enum TplError {
    /// The top-level template file does not exist.
    #[error("{} not found", .0.display())]
    TemplateNotFound(PathBuf),

    /// A template or included file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendered output could not be written.
    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),

    /// The template engine rejected or failed to render a template.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Why a raw value was kept as plain text instead of becoming structured.
///
/// Never escapes [`classify`](crate::classify); it exists so callers of
/// [`parse_lenient`](crate::parse_lenient) and the debug log can see the reason.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Trimmed input is empty or does not start with `{`, `[` or `"`.
    #[error("value does not look like JSON")]
    NotCandidate,

    /// Neither the raw nor the repaired text is valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The text parsed to JSON `null`.
    #[error("value parsed to null")]
    Null,

    /// The text parsed to a top-level number, which is never promoted.
    #[error("value parsed to a bare number")]
    BareNumber,
}

/// Convenience alias used throughout tpl-core.
pub type Result<T> = std::result::Result<T, TplError>;
