//! Level rules compiled from a configuration tree
//!
//! A rule node may set a level and may restrict itself to entries whose
//! module, file, function or class has a given name. Nodes under any other
//! key are plain scopes that always apply.
//!
//! ```json
//! {
//!     "level": "WARNING",
//!     "module": { "name": "net", "level": "DEBUG",
//!                 "class": { "name": "Socket", "level": "TRACE" } }
//! }
//! ```

use super::tree::ConfigTree;
use crate::core::error::{LogxxError, Result};
use crate::core::log_entry::LogEntry;
use crate::core::log_level::LevelFilter;
use std::fmt;

/// Keys holding a rule's own attributes rather than child rules.
const ATTRIBUTE_KEYS: [&str; 2] = ["level", "name"];

/// Root-level sections that belong to other parts of the configuration.
pub(crate) const RESERVED_SECTIONS: [&str; 2] = ["backends", "header"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Module,
    File,
    Function,
    Class,
}

impl MatchKind {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "module" => Some(MatchKind::Module),
            "file" => Some(MatchKind::File),
            "function" => Some(MatchKind::Function),
            "class" => Some(MatchKind::Class),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Module => "module",
            MatchKind::File => "file",
            MatchKind::Function => "function",
            MatchKind::Class => "class",
        }
    }

    /// Forms of the entry attribute a rule name may equal. An attribute that
    /// was never set contributes only the empty string.
    fn candidates(self, entry: &LogEntry) -> [&str; 2] {
        match self {
            MatchKind::Module => {
                let module = entry.module.as_deref().unwrap_or("");
                [module, module.rsplit("::").next().unwrap_or(module)]
            }
            MatchKind::File => [
                entry.file.as_deref().unwrap_or(""),
                entry.file_name().unwrap_or(""),
            ],
            MatchKind::Function => [
                entry.function.as_deref().unwrap_or(""),
                entry.extended_function.as_deref().unwrap_or(""),
            ],
            MatchKind::Class => {
                let class = entry.class.as_deref().unwrap_or("");
                [class, class]
            }
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchClause {
    pub kind: MatchKind,
    pub name: String,
}

impl MatchClause {
    pub fn new(kind: MatchKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Case-insensitive equality against the entry's attribute.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        // An empty name would otherwise match every entry lacking the attribute
        if self.name.is_empty() {
            return false;
        }
        self.kind
            .candidates(entry)
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(&self.name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleNode {
    pub level: Option<LevelFilter>,
    pub matcher: Option<MatchClause>,
    pub children: Vec<RuleNode>,
}

impl RuleNode {
    /// An unconditional scope with no level of its own.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn matching(mut self, kind: MatchKind, name: impl Into<String>) -> Self {
        self.matcher = Some(MatchClause::new(kind, name));
        self
    }

    #[must_use]
    pub fn child(mut self, node: RuleNode) -> Self {
        self.children.push(node);
        self
    }

    /// Compile the rule tree rooted at `tree`. The tree is normalized first,
    /// and the root's reserved sections are skipped.
    pub fn from_tree(tree: &ConfigTree) -> Result<Self> {
        Self::compile(&tree.normalize(), None, true)
    }

    fn compile(tree: &ConfigTree, kind: Option<MatchKind>, is_root: bool) -> Result<Self> {
        let level = tree
            .get_value("level")
            .map(|raw| {
                raw.parse::<LevelFilter>()
                    .map_err(|e| LogxxError::config("level", e))
            })
            .transpose()?;

        let matcher = match kind {
            Some(kind) => {
                let name = tree.get_value("name").ok_or_else(|| {
                    LogxxError::config("rules", format!("{} rule without a name", kind))
                })?;
                Some(MatchClause::new(kind, name))
            }
            None => None,
        };

        let mut children = Vec::new();
        for (key, node) in tree.children() {
            if ATTRIBUTE_KEYS.contains(&key) || (is_root && RESERVED_SECTIONS.contains(&key)) {
                continue;
            }

            let kind = MatchKind::from_key(key);
            if kind.is_none() && node.is_leaf() {
                // Scalars under unknown keys carry no rules
                continue;
            }
            children.push(Self::compile(node, kind, false)?);
        }

        Ok(Self {
            level,
            matcher,
            children,
        })
    }
}
