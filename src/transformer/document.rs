//! Exporter configuration document
//!
//! The YAML document handed to the Prometheus JMX exporter: connection
//! settings followed by the generated rules.
//!
//! ```yaml
//! hostPort: localhost:9999
//! startDelaySeconds: 30
//! ssl: false
//! lowercaseOutputName: false
//! lowercaseOutputLabelNames: false
//! rules:
//! - pattern: java.lang<type="([\w-]*)"><([^<>]*)>([^:]*)
//!   name: java.lang{$2#$3}
//!   labels:
//!     type: $1
//! ```

use serde::Serialize;

use super::rules::{Rule, RuleBuilder};
use crate::catalog::Catalog;
use crate::config::ExporterConfig;
use crate::error::DocumentError;
use crate::selection::SelectionModel;

/// Serializable exporter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    host_port: String,
    start_delay_seconds: u32,
    ssl: bool,
    lowercase_output_name: bool,
    lowercase_output_label_names: bool,
    rules: Vec<Rule>,
}

impl ConfigDocument {
    /// Create a document with no rules
    pub fn new(host_port: impl Into<String>, settings: &ExporterConfig) -> Self {
        Self {
            host_port: host_port.into(),
            start_delay_seconds: settings.start_delay_seconds,
            ssl: settings.ssl,
            lowercase_output_name: settings.lowercase_output_name,
            lowercase_output_label_names: settings.lowercase_output_label_names,
            rules: Vec::new(),
        }
    }

    /// Target address
    pub fn host_port(&self) -> &str {
        &self.host_port
    }

    /// Current rules
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Replace every rule with the projection of the current selection
    pub fn regenerate(
        &mut self,
        builder: &RuleBuilder,
        catalog: &Catalog,
        selection: &SelectionModel,
    ) {
        self.rules = builder.build(catalog, selection);
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Serialize` if YAML serialization fails.
    pub fn dump(&self) -> Result<String, DocumentError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
