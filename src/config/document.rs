//! Config document abstraction layer.
//!
//! `ConfigDocument`, `ConfigSection`, and `ParseNode` wrap the `kdl` crate
//! types so the rest of the config module never touches KDL directly.

use super::ConfigError;

/// Parsed KDL document paired with its source text.
///
/// Provides section and setting lookup that return [`ParseNode`] wrappers
/// carrying source context for line-number error reporting.
pub(super) struct ConfigDocument {
    doc: kdl::KdlDocument,
    source: String,
}

/// Borrowed view into a KDL children block: the top level of the document,
/// or the body of a section such as `gitlab { … }`.
pub(super) struct ConfigSection<'a> {
    doc: &'a kdl::KdlDocument,
    source: &'a str,
}

/// Single KDL node with source context for line-number reporting.
pub(super) struct ParseNode<'a> {
    node: &'a kdl::KdlNode,
    source: &'a str,
}

impl ConfigDocument {
    /// Parse a KDL source string into a document.
    pub(super) fn parse(source: &str) -> Result<Self, ConfigError> {
        let doc: kdl::KdlDocument = source
            .parse()
            .map_err(|e: kdl::KdlError| ConfigError::ParseError(e.to_string()))?;
        Ok(Self {
            doc,
            source: source.to_string(),
        })
    }

    /// Load and parse a KDL config file.
    pub(super) fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::ReadError(e)
            }
        })?;
        Self::parse(&content)
    }

    /// The top-level nodes of the document.
    pub(super) fn root(&self) -> ConfigSection<'_> {
        ConfigSection {
            doc: &self.doc,
            source: &self.source,
        }
    }
}

impl<'a> ConfigSection<'a> {
    /// Get a named child section, e.g. `section("gitlab")` for `gitlab { … }`.
    ///
    /// A node with that name but no children block counts as absent.
    pub(super) fn section(&self, name: &str) -> Option<ConfigSection<'a>> {
        self.doc
            .get(name)
            .and_then(|n| n.children())
            .map(|doc| ConfigSection {
                doc,
                source: self.source,
            })
    }

    /// The last node with the given name. Later settings override earlier ones.
    pub(super) fn setting(&self, name: &str) -> Option<ParseNode<'a>> {
        self.doc
            .nodes()
            .iter()
            .rev()
            .find(|n| n.name().value() == name)
            .map(|node| ParseNode {
                node,
                source: self.source,
            })
    }

    /// Names of all nodes in this block, in source order, with their lines.
    pub(super) fn node_names(&self) -> Vec<(&'a str, usize)> {
        self.doc
            .nodes()
            .iter()
            .map(|node| {
                let parsed = ParseNode {
                    node,
                    source: self.source,
                };
                (node.name().value(), parsed.line())
            })
            .collect()
    }
}

impl<'a> ParseNode<'a> {
    /// The node's identifier (e.g. `"api-url"`).
    pub(super) fn name(&self) -> &'a str {
        self.node.name().value()
    }

    /// The single positional string argument of a `key "value"` node.
    pub(super) fn string_value(&self) -> Result<&'a str, ConfigError> {
        match self.single_argument()?.as_string() {
            Some(s) => Ok(s),
            None => Err(self.invalid("expected a string value")),
        }
    }

    /// The single positional integer argument of a `key 42` node.
    pub(super) fn integer_value(&self) -> Result<i128, ConfigError> {
        match self.single_argument()?.as_integer() {
            Some(n) => Ok(n),
            None => Err(self.invalid("expected an integer value")),
        }
    }

    /// Build a validation error that names this node and its line.
    pub(super) fn invalid(&self, detail: &str) -> ConfigError {
        ConfigError::ValidationError(format!(
            "line {}: '{}': {detail}",
            self.line(),
            self.name()
        ))
    }

    /// 1-based line number of this node in the original source.
    pub(super) fn line(&self) -> usize {
        let offset = self.node.span().offset();
        self.source[..offset.min(self.source.len())]
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1
    }

    fn single_argument(&self) -> Result<&'a kdl::KdlValue, ConfigError> {
        let mut args = self
            .node
            .entries()
            .iter()
            .filter(|e| e.name().is_none())
            .map(|e| e.value());
        match (args.next(), args.next()) {
            (Some(value), None) => Ok(value),
            (None, _) => Err(self.invalid("missing value")),
            (Some(_), Some(_)) => Err(self.invalid("expected exactly one value")),
        }
    }
}
