//! # tpl-core
//!
//! Render a text template against the process environment, with environment
//! values coerced into structured data when they look like JSON.
//!
//! Environment variables are flat strings, and the ones meant as lists or maps
//! usually arrive without their quotes (`HOSTS=[a,b]`, `LIMITS={cpu:2}`). The
//! classifier recognizes JSON-like values, repairs the missing quotes and
//! falls back to the raw string whenever the result is not a container or a
//! string. The operator's value is never lost.
//!
//! ## Quick start
//!
//! ```rust
//! use tpl_core::{classify, EnvValue, EnvironmentTable};
//!
//! // JSON-like → structured
//! let hosts = classify("[alpha,beta]");
//! let hosts = hosts.as_structured().unwrap();
//! assert_eq!(hosts.to_json_string(), r#"["alpha","beta"]"#);
//!
//! // Anything else stays as written
//! assert_eq!(classify("59614658972"), EnvValue::Plain("59614658972".into()));
//!
//! // A whole table, filtered by prefix
//! let table = EnvironmentTable::from_pairs([("APP_X", "{a:b}"), ("PATH", "/bin")], "APP_");
//! assert_eq!(table.keys().collect::<Vec<_>>(), ["APP_X"]);
//! ```
//!
//! ## Modules
//!
//! - [`classifier`] — raw string → plain or structured value (lenient JSON)
//! - [`environment`] — `KEY=VALUE` entries → [`EnvironmentTable`]
//! - [`render`] — template file + table → rendered text (minijinja)
//! - [`types`] — [`StructuredValue`] and [`EnvValue`]
//! - [`error`] — error types

pub mod classifier;
pub mod environment;
pub mod error;
pub mod render;
pub mod types;

pub use classifier::{classify, looks_like_json, parse_lenient, repair};
pub use environment::EnvironmentTable;
pub use error::{ClassifyError, TplError};
pub use render::Renderer;
pub use types::{EnvValue, StructuredValue};
