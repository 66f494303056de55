//! Parser configuration.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::parser::ast::SourceType;
use crate::parser::plugin::{Plugin, PluginSet};
use crate::plugins;

/// Options for a single parse.
///
/// ```
/// use jspat_core::options::ParserOptions;
/// use jspat_core::parser::ast::SourceType;
///
/// let options = ParserOptions::default()
///     .with_source_type(SourceType::Module)
///     .with_plugin_names(&["capture"])
///     .unwrap();
/// assert!(jspat_core::parse("export const {{x}} = 1;", &options).is_ok());
/// ```
#[derive(Clone)]
pub struct ParserOptions {
    /// Script or module goal.  Modules are strict and allow top-level `await`.
    pub source_type: SourceType,
    /// `return` is accepted at the top level.
    pub allow_return_outside_function: bool,
    /// Installed extensions, innermost first.
    pub plugins: Vec<Rc<dyn Plugin>>,
    /// How deeply statements and expressions may nest before the parse
    /// fails with `Maximum nesting depth exceeded`.
    pub max_depth: usize,
}

/// Nesting allowed by default.  A parenthesised or bracketed level costs two.
pub const DEFAULT_MAX_DEPTH: usize = 512;

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            source_type: SourceType::default(),
            allow_return_outside_function: false,
            plugins: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserOptions {
    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    pub fn allow_return_outside_function(mut self, allow: bool) -> Self {
        self.allow_return_outside_function = allow;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Install `plugin` outside every plugin already present.
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Rc::new(plugin));
        self
    }

    /// Install built-in plugins by registry name, in order.
    pub fn with_plugin_names(mut self, names: &[&str]) -> Result<Self> {
        for name in names {
            self.plugins.push(plugins::lookup(name)?);
        }
        Ok(self)
    }

    /// `true` when a plugin called `name` is installed.
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    pub(crate) fn plugin_set(&self) -> PluginSet {
        self.plugins
            .iter()
            .cloned()
            .fold(PluginSet::default(), PluginSet::with_rc)
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("source_type", &self.source_type)
            .field(
                "allow_return_outside_function",
                &self.allow_return_outside_function,
            )
            .field("plugins", &self.plugin_set())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::plugins::capture::{self, CapturePlugin};

    #[test]
    fn test_defaults() {
        let options = ParserOptions::default();
        assert_eq!(options.source_type, SourceType::Script);
        assert!(!options.allow_return_outside_function);
        assert!(options.plugins.is_empty());
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_plugin_names_resolve() {
        let options = ParserOptions::default()
            .with_plugin_names(&[capture::NAME])
            .unwrap();
        assert!(options.has_plugin("capture"));
        assert!(options.plugin_set().contains("capture"));
    }

    #[test]
    fn test_unknown_plugin_name() {
        let err = ParserOptions::default()
            .with_plugin_names(&["capture", "jsx"])
            .unwrap_err();
        assert_eq!(err, Error::UnknownPlugin("jsx".into()));
    }

    #[test]
    fn test_debug_lists_plugins() {
        let options = ParserOptions::default().with_plugin(CapturePlugin);
        assert_eq!(
            format!("{options:?}"),
            r#"ParserOptions { source_type: Script, allow_return_outside_function: false, plugins: ["capture"], max_depth: 512 }"#
        );
    }
}
