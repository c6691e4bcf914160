//! Render context assembly.

use std::collections::BTreeMap;

use minijinja::Value;
use nbforge_notebook::Notebook;

/// Caller-supplied template variables.
pub type ExtraContext = serde_json::Map<String, serde_json::Value>;

/// Variables handed to a template for one render.
///
/// Always holds `notebook`, `metadata` (the notebook metadata), `cells` and
/// `language` (the kernel language, none when the notebook does not say);
/// extra variables are layered on top and win on a name clash.
#[derive(Debug, Clone)]
pub struct RenderContext {
    vars: BTreeMap<String, Value>,
}

impl RenderContext {
    /// Assemble the context for rendering `notebook`.
    pub fn new(notebook: &Notebook, extra: &ExtraContext) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert("notebook".to_string(), Value::from_serialize(notebook));
        vars.insert("metadata".to_string(), Value::from_serialize(&notebook.metadata));
        vars.insert("cells".to_string(), Value::from_serialize(&notebook.cells));
        vars.insert("language".to_string(), Value::from(notebook.language()));

        for (key, value) in extra {
            if vars.contains_key(key) {
                tracing::debug!("Context variable '{}' overridden by caller", key);
            }
            vars.insert(key.clone(), Value::from_serialize(value));
        }

        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Variable names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// The context as a single template value.
    pub fn to_value(&self) -> Value {
        Value::from_serialize(&self.vars)
    }
}
