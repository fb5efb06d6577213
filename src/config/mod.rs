//! Configuration loading
//!
//! A configuration document is loaded into a [`ConfigTree`], then split into
//! level rules, an optional sink header format, and the sink backends:
//!
//! ```json
//! {
//!     "level": "WARNING",
//!     "header": "%1% %2% %3% [%4%] %5%:%10%",
//!     "backends": {
//!         "console": { "colors": "true" },
//!         "file": { "path": "/var/log/app.log" }
//!     },
//!     "module": { "name": "net", "level": "DEBUG" }
//! }
//! ```
//!
//! The same document in XML, where attributes and child elements are
//! interchangeable:
//!
//! ```xml
//! <logging level="WARNING" header="%1% %2% %3% [%4%] %5%:%10%">
//!     <backends>
//!         <console colors="true"/>
//!         <file path="/var/log/app.log"/>
//!     </backends>
//!     <module name="net" level="DEBUG"/>
//! </logging>
//! ```

pub mod rules;
pub mod tree;

pub use rules::{MatchClause, MatchKind, RuleNode};
pub use tree::ConfigTree;

use crate::core::error::{LogxxError, Result};
use crate::core::header::HeaderFormat;
use crate::core::sink::Sink;
use std::path::{Path, PathBuf};

/// One output backend described by the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Console { colors: bool },
    File { path: PathBuf },
}

impl BackendConfig {
    fn from_tree(kind: &str, tree: &ConfigTree) -> Result<Self> {
        match kind {
            "console" => {
                let colors = match tree.get_value("colors") {
                    Some(raw) => parse_bool(raw)
                        .ok_or_else(|| LogxxError::config("console", format!("invalid colors value '{}'", raw)))?,
                    None => true,
                };
                Ok(BackendConfig::Console { colors })
            }
            "file" => {
                let path = tree
                    .get_value("path")
                    .ok_or_else(|| LogxxError::config("file", "backend without a path"))?;
                Ok(BackendConfig::File {
                    path: PathBuf::from(path),
                })
            }
            other => Err(LogxxError::config(
                "backends",
                format!("unknown backend '{}'", other),
            )),
        }
    }

    /// Open the sink this backend describes.
    pub fn build(&self, header: &HeaderFormat) -> Result<Box<dyn Sink>> {
        match self {
            #[cfg(feature = "console")]
            BackendConfig::Console { colors } => Ok(Box::new(
                crate::sinks::ConsoleSink::with_colors(*colors).with_header(header.clone()),
            )),
            #[cfg(not(feature = "console"))]
            BackendConfig::Console { .. } => Err(LogxxError::config(
                "console",
                "console support is not compiled in",
            )),
            #[cfg(feature = "file")]
            BackendConfig::File { path } => Ok(Box::new(
                crate::sinks::FileSink::new(path)?.with_header(header.clone()),
            )),
            #[cfg(not(feature = "file"))]
            BackendConfig::File { .. } => Err(LogxxError::config(
                "file",
                "file support is not compiled in",
            )),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    rules: RuleNode,
    header: HeaderFormat,
    backends: Vec<BackendConfig>,
}

impl Configuration {
    pub fn from_tree(tree: &ConfigTree) -> Result<Self> {
        let tree = tree.normalize();
        let rules = RuleNode::from_tree(&tree)?;

        let header = tree
            .get_value("header")
            .map(HeaderFormat::new)
            .unwrap_or_default();

        let mut backends = Vec::new();
        if let Some(section) = tree.get("backends") {
            for (kind, node) in section.children() {
                backends.push(BackendConfig::from_tree(kind, node)?);
            }
        }

        Ok(Self {
            rules,
            header,
            backends,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_tree(&ConfigTree::from_json_str(json)?)
    }

    /// Load and compile a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_tree(&ConfigTree::load(path)?)
    }

    pub fn rules(&self) -> &RuleNode {
        &self.rules
    }

    pub fn header(&self) -> &HeaderFormat {
        &self.header
    }

    pub fn backends(&self) -> &[BackendConfig] {
        &self.backends
    }

    /// Open one sink per configured backend, in document order.
    pub fn build_sinks(&self) -> Result<Vec<Box<dyn Sink>>> {
        self.backends
            .iter()
            .map(|backend| backend.build(&self.header))
            .collect()
    }

    pub fn into_rules(self) -> RuleNode {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LevelFilter;

    #[test]
    fn test_full_document() {
        let config = Configuration::from_json_str(
            r#"{
                "level": "WARNING",
                "header": "%3% %5%",
                "backends": {
                    "console": { "colors": "off" },
                    "file": { "path": "/tmp/app.log" }
                },
                "module": { "name": "net", "level": "DEBUG" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.rules().level, Some(LevelFilter::Warn));
        assert_eq!(config.rules().children.len(), 1);
        assert_eq!(config.header().template(), "%3% %5%");
        assert_eq!(
            config.backends(),
            &[
                BackendConfig::Console { colors: false },
                BackendConfig::File {
                    path: PathBuf::from("/tmp/app.log")
                },
            ]
        );
    }

    #[test]
    fn test_defaults() {
        let config = Configuration::from_json_str("{}").unwrap();
        assert_eq!(config.rules(), &RuleNode::new());
        assert_eq!(config.header(), &HeaderFormat::default());
        assert!(config.backends().is_empty());
        assert!(config.build_sinks().unwrap().is_empty());
    }

    #[test]
    fn test_console_colors_default_on() {
        let config =
            Configuration::from_json_str(r#"{"backends": {"console": {}}}"#).unwrap();
        assert_eq!(config.backends(), &[BackendConfig::Console { colors: true }]);
    }

    #[test]
    fn test_backend_errors() {
        let err = Configuration::from_json_str(r#"{"backends": {"syslog": {}}}"#).unwrap_err();
        assert!(err.to_string().contains("unknown backend 'syslog'"));

        let err = Configuration::from_json_str(r#"{"backends": {"file": {}}}"#).unwrap_err();
        assert!(err.to_string().contains("backend without a path"));

        let err = Configuration::from_json_str(r#"{"backends": {"console": {"colors": "maybe"}}}"#)
            .unwrap_err();
        assert!(matches!(err, LogxxError::InvalidConfiguration { .. }));
    }

    #[cfg(feature = "file")]
    #[test]
    fn test_build_file_sink() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("out.log");
        let json = format!(
            r#"{{"backends": {{"file": {{"path": {}}}}}}}"#,
            serde_json::to_string(&path.display().to_string()).unwrap()
        );

        let sinks = Configuration::from_json_str(&json).unwrap().build_sinks().unwrap();
        assert_eq!(sinks.len(), 1);
        assert_eq!(sinks[0].name(), "file");
        assert!(path.exists());
    }
}
