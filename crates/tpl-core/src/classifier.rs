//! Lenient JSON classification of raw environment values.
//!
//! Environment variables can't carry literal `"` characters without shell
//! quoting, so operators write JSON-like expressions with bare tokens:
//!
//! ```text
//! SERVERS=[alpha,beta]
//! LIMITS={cpu:2,memory:4G}
//! LINKS={home:https:://example.com}
//! ```
//!
//! [`classify`] turns those into structured values and leaves everything else
//! alone:
//!
//! 1. **Candidacy**: only values whose trimmed form starts with `{`, `[` or `"`
//!    are considered. Numbers, booleans and `null` are never converted unless
//!    they sit inside a container.
//! 2. **Strict parse**: valid JSON is taken as-is.
//! 3. **Repair**: seven ordered regex passes insert the missing quotes around
//!    bare tokens, then collapse the `::` escape back to `:` (see [`repair`]).
//! 4. **Fallback**: if the repaired text still doesn't parse, or parses to
//!    `null` or a bare number, the raw string is kept.
//!
//! The repair is delimiter-local, not a tokenizer. It handles flat and nested
//! containers of bare words; it is not a JSON5 parser.

use crate::error::ClassifyError;
use crate::types::{EnvValue, StructuredValue};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

/// One whole-string substitution sweep of the repair.
struct RepairPass {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl RepairPass {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            // Patterns are compile-time literals covered by tests.
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("repair pass {name}: {e}")),
            replacement,
        }
    }
}

/// The repair passes, in the order they must run.
static REPAIR_PASSES: LazyLock<[RepairPass; 7]> = LazyLock::new(|| {
    [
        // `,` followed by none of `[ { "`
        RepairPass::new("after_comma", r#",([^\[{"])"#, r#","${1}"#),
        // `,` preceded by none of `] } "`
        RepairPass::new("before_comma", r#"([^\]}"]),"#, r#"${1}","#),
        // `[ {` followed by none of `] [ } { , "`
        RepairPass::new("after_bracket", r#"([\[{])([^\]\[}{,"])"#, r#"${1}"${2}"#),
        // `] }` preceded by none of `] [ } { , "`
        RepairPass::new("before_bracket", r#"([^\]\[}{,"])([\]}])"#, r#"${1}"${2}"#),
        // `:` followed by none of `: [ { "`
        RepairPass::new("after_colon", r#"([^:]):([^:\[{"])"#, r#"${1}:"${2}"#),
        // `:` preceded by none of `: "` and not followed by `:`
        RepairPass::new("before_colon", r#"([^:"]):([^:])"#, r#"${1}":${2}"#),
        // `::` escapes a literal colon
        RepairPass::new("double_colon", "::", ":"),
    ]
});

/// Whether `raw` is worth a structured parse: its trimmed form is non-empty and
/// starts with `{`, `[` or `"`.
pub fn looks_like_json(raw: &str) -> bool {
    matches!(raw.trim().as_bytes().first(), Some(b'{' | b'[' | b'"'))
}

/// Quote bare tokens in a JSON-like string and collapse `::` escapes.
///
/// Each pass looks only at the character next to a delimiter, so a bare token
/// gets its opening and closing quote from two independent passes. Already
/// valid JSON is left unchanged except for `::` sequences outside strings.
///
/// ```
/// use tpl_core::repair;
///
/// assert_eq!(repair("{foo:[bar,baz]}"), r#"{"foo":["bar","baz"]}"#);
/// assert_eq!(repair("{url:https:://x.io}"), r#"{"url":"https://x.io"}"#);
/// ```
pub fn repair(raw: &str) -> String {
    let mut text = raw.to_owned();
    for pass in REPAIR_PASSES.iter() {
        let replaced = pass.pattern.replace_all(&text, pass.replacement).into_owned();
        if replaced != text {
            debug!(pass = pass.name, json = %replaced, "repair pass applied");
        }
        text = replaced;
    }
    text
}

/// Parse `raw` as JSON, repairing it first when the strict parse fails.
///
/// Returns the reason as a [`ClassifyError`] whenever the value would be kept
/// as plain text.
pub fn parse_lenient(raw: &str) -> Result<StructuredValue, ClassifyError> {
    if !looks_like_json(raw) {
        return Err(ClassifyError::NotCandidate);
    }

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(strict) => {
            debug!(error = %strict, "strict parse failed, repairing");
            let repaired = repair(raw);
            debug!(json = %repaired, "repaired");
            serde_json::from_str(&repaired)?
        }
    };

    match value {
        Value::Null => Err(ClassifyError::Null),
        // Unreachable after the candidacy check; kept so a bare number is never
        // promoted whatever path produced it.
        Value::Number(_) => Err(ClassifyError::BareNumber),
        other => Ok(StructuredValue::from(other)),
    }
}

/// Classify one raw environment value. Never fails: anything that can't be
/// turned into a structured value comes back as [`EnvValue::Plain`] holding the
/// untouched input.
///
/// ```
/// use tpl_core::{classify, EnvValue};
///
/// assert_eq!(classify("1.0-123"), EnvValue::Plain("1.0-123".to_string()));
/// assert!(classify("[foo,bar]").is_structured());
/// ```
pub fn classify(raw: &str) -> EnvValue {
    debug!(input = raw, "classifying");
    match parse_lenient(raw) {
        Ok(value) => {
            debug!(result = ?value, "structured");
            EnvValue::Structured(value)
        }
        Err(reason) => {
            debug!(result = raw, %reason, "plain");
            EnvValue::Plain(raw.to_owned())
        }
    }
}
