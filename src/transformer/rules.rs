//! Exporter rule synthesis
//!
//! Turns the beans and labels marked used in a [`SelectionModel`] into JMX
//! exporter rules. A generated pattern matches the exporter's raw metric line
//! `domain<label="value",...><attribute>valueName` and always lists every
//! label of the bean, so capture group `$i` is the label with index `i`
//! regardless of which labels are used.
//!
//! # Example
//!
//! For bean `java.lang<type=Memory>` with its only label used:
//!
//! ```yaml
//! pattern: java.lang<type="([\w-]*)"><([^<>]*)>([^:]*)
//! name: java.lang{$2#$3}
//! labels:
//!   type: $1
//! ```
//!
//! Label names are inserted verbatim. A name containing regex
//! metacharacters produces a pattern that does not compile; such rules are
//! still emitted and a warning is logged.

use std::collections::{BTreeSet, HashSet};

use clap::ValueEnum;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::catalog::{Bean, Catalog};
use crate::error::RuleError;
use crate::selection::SelectionModel;

/// Capture group for a quoted label value
pub const LABEL_VALUE_GROUP: &str = r"([\w-]*)";

/// Capture group for the attribute key path bracket
pub const ATTRIBUTE_GROUP: &str = r"<([^<>]*)>";

/// Capture group for the attribute value name
pub const VALUE_NAME_GROUP: &str = r"([^:]*)";

/// Result type for rule operations
pub type RuleResult<T> = Result<T, RuleError>;

/// Granularity of the selection that feeds rule generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RuleMode {
    /// One rule per bean with used labels, labels exported by capture group
    #[default]
    Label,
    /// One rule per used bean, labels matched literally
    Bean,
}

impl RuleMode {
    /// Returns the configuration string for the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleMode::Label => "label",
            RuleMode::Bean => "bean",
        }
    }
}

impl std::fmt::Display for RuleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label name → capture reference, in label index order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap(Vec<(String, String)>);

impl LabelMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Look up the value of a label
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate entries in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for LabelMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// One JMX exporter rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Regex matched against the exporter's raw metric line
    pub pattern: String,

    /// Output metric name template
    pub name: String,

    /// Labels filled from capture groups
    #[serde(skip_serializing_if = "LabelMap::is_empty")]
    pub labels: LabelMap,
}

impl Rule {
    /// Rule exporting the used labels of a bean
    ///
    /// The pattern captures every label in index order followed by the
    /// attribute and value name groups; `used` holds the label indices that
    /// become rule labels.
    pub fn for_labels(bean: &Bean, used: &BTreeSet<usize>) -> Self {
        let parts = bean
            .labels
            .iter()
            .map(|l| format!("{}=\"{}\"", l.name, LABEL_VALUE_GROUP));

        let mut labels = LabelMap::new();
        for label in bean.labels.iter().filter(|l| used.contains(&l.index)) {
            labels.push(&label.name, format!("${}", label.index));
        }

        Self {
            pattern: bean_pattern(&bean.domain, parts),
            name: metric_name(&bean.domain, bean.labels.len()),
            labels,
        }
    }

    /// Rule matching one bean literally
    pub fn for_bean(bean: &Bean) -> Self {
        let parts = bean
            .labels
            .iter()
            .map(|l| format!("{}=\"{}\"", l.name, regex::escape(&l.value)));

        Self {
            pattern: bean_pattern(&bean.domain, parts),
            name: metric_name(&bean.domain, 0),
            labels: LabelMap::new(),
        }
    }

    /// Compile the pattern
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidPattern` if the pattern is not valid regex.
    pub fn compile(&self) -> RuleResult<Regex> {
        Regex::new(&self.pattern).map_err(|e| RuleError::InvalidPattern {
            pattern: self.pattern.clone(),
            source: e,
        })
    }
}

/// `domain<part,part,...><attribute>valueName` pattern shared by both modes
pub fn bean_pattern<I>(domain: &str, label_parts: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let labels: Vec<String> = label_parts.into_iter().collect();
    format!(
        "{}<{}>{}{}",
        domain,
        labels.join(","),
        ATTRIBUTE_GROUP,
        VALUE_NAME_GROUP
    )
}

/// `domain{$<n+1>#$<n+2>}` where `n` is the number of label groups
pub fn metric_name(domain: &str, label_groups: usize) -> String {
    format!("{}{{${}#${}}}", domain, label_groups + 1, label_groups + 2)
}

/// Derives the full rule list from selection state
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBuilder {
    mode: RuleMode,
}

impl RuleBuilder {
    /// Create a builder for the given mode
    pub fn new(mode: RuleMode) -> Self {
        Self { mode }
    }

    /// Selection granularity
    pub fn mode(&self) -> RuleMode {
        self.mode
    }

    /// Build every rule for the current selection
    ///
    /// The list is rebuilt from scratch in catalog order. Beans sharing a
    /// [`crate::catalog::BeanKey`] (one line per attribute) yield one rule.
    pub fn build(&self, catalog: &Catalog, selection: &SelectionModel) -> Vec<Rule> {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();

        for bean in catalog.domains().iter().flat_map(|d| d.beans.iter()) {
            let key = bean.key();
            let rule = match self.mode {
                RuleMode::Label => match selection.used_labels(&key) {
                    Some(used) if !seen.contains(&key) => Rule::for_labels(bean, used),
                    _ => continue,
                },
                RuleMode::Bean => {
                    if !selection.is_key_used(&key) || seen.contains(&key) {
                        continue;
                    }
                    Rule::for_bean(bean)
                }
            };

            if let Err(e) = rule.compile() {
                tracing::warn!(error = %e, "Generated rule pattern does not compile");
            }
            seen.insert(key);
            rules.push(rule);
        }

        rules
    }
}
