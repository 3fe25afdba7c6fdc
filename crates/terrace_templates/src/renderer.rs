//! Template rendering.

use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;

/// Renders template sources against serializable substitution data.
///
/// Undefined variables are errors rather than empty strings, and a trailing
/// newline in the source is kept.
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        // JSON literals double as HCL string/list/number literals.
        env.add_filter("tojson", |value: Value| -> Result<String, minijinja::Error> {
            serde_json::to_string(&value)
                .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
        });

        Self { env }
    }

    /// Render `source` (reported as `name` in errors) against `data`.
    pub fn render<S: Serialize>(
        &self,
        name: &str,
        source: &str,
        data: &S,
    ) -> Result<String, minijinja::Error> {
        self.env
            .render_named_str(name, source, Value::from_serialize(data))
    }
}
