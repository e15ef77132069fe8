//! Template rendering against an [`EnvironmentTable`].
//!
//! Templates use [`minijinja`] syntax. Every variable of the table is a
//! top-level name, so `{{ HOSTS[0] }}` or `{% for k, v in LIMITS|items %}`
//! work on structured values and plain values render as the raw string.
//!
//! Two functions are available in every template:
//!
//! - `include_file(name)` renders another template with the same table and
//!   returns the output. A missing file renders as the empty string.
//! - `must_include_file(name)` does the same, but a missing file is an error.
//!
//! Relative names resolve against the directory of the top-level template.

use crate::environment::EnvironmentTable;
use crate::error::{Result, TplError};
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior, Value};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Maximum nesting of `include_file` / `must_include_file` calls.
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// State shared by the top-level render and every nested include.
#[derive(Debug)]
struct Shared {
    base_dir: PathBuf,
    context: Value,
}

/// Renders one template file with an environment table as its context.
#[derive(Debug, Clone)]
pub struct Renderer {
    template: PathBuf,
    shared: Arc<Shared>,
}

impl Renderer {
    /// Create a renderer for `template`. The table becomes the root context.
    pub fn new(template: impl Into<PathBuf>, table: EnvironmentTable) -> Self {
        let template = template.into();
        let base_dir = template
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let context = Value::from_serialize(&table);
        Self {
            template,
            shared: Arc::new(Shared { base_dir, context }),
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template
    }

    /// Read and render the template file.
    pub fn render(&self) -> Result<String> {
        let source = std::fs::read_to_string(&self.template).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                TplError::TemplateNotFound(self.template.clone())
            } else {
                TplError::Io {
                    path: self.template.clone(),
                    source,
                }
            }
        })?;
        let name = template_name(&self.template);
        Ok(render_source(&self.shared, &name, &source, 0)?)
    }

    /// Render template source directly, with includes resolved as if it were
    /// the template file.
    pub fn render_str(&self, source: &str) -> Result<String> {
        let name = template_name(&self.template);
        Ok(render_source(&self.shared, &name, source, 0)?)
    }

    /// Render the template file into `out`.
    pub fn render_to<W: Write>(&self, mut out: W) -> Result<()> {
        let rendered = self.render()?;
        out.write_all(rendered.as_bytes()).map_err(TplError::Write)?;
        out.flush().map_err(TplError::Write)
    }
}

fn template_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn render_source(
    shared: &Arc<Shared>,
    name: &str,
    source: &str,
    depth: usize,
) -> std::result::Result<String, minijinja::Error> {
    let env = template_environment(shared, depth);
    env.render_named_str(name, source, &shared.context)
}

/// Build an engine whose include functions render one level deeper.
fn template_environment(shared: &Arc<Shared>, depth: usize) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Lenient);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);

    let lenient = Arc::clone(shared);
    env.add_function("include_file", move |name: String| {
        include(&lenient, &name, depth + 1, false)
    });
    let strict = Arc::clone(shared);
    env.add_function("must_include_file", move |name: String| {
        include(&strict, &name, depth + 1, true)
    });
    env
}

fn include(
    shared: &Arc<Shared>,
    name: &str,
    depth: usize,
    must_exist: bool,
) -> std::result::Result<String, minijinja::Error> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("include of {name} exceeds maximum depth {MAX_INCLUDE_DEPTH}"),
        ));
    }

    let path = resolve_include(&shared.base_dir, name);
    debug!(path = %path.display(), depth, must_exist, "including template");

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !must_exist => {
            debug!(path = %path.display(), "include not found, rendering empty");
            return Ok(String::new());
        }
        Err(e) => {
            let kind = if e.kind() == io::ErrorKind::NotFound {
                ErrorKind::TemplateNotFound
            } else {
                ErrorKind::InvalidOperation
            };
            return Err(
                minijinja::Error::new(kind, format!("failed to read {}", path.display()))
                    .with_source(e),
            );
        }
    };

    render_source(shared, &template_name(&path), &source, depth)
}

fn resolve_include(base_dir: &Path, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
