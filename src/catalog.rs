//! Bean catalog
//!
//! The immutable domain → bean → label structure built from one run of the
//! enumerator. A catalog is never mutated after construction; the refresh
//! task replaces it wholesale.

use std::collections::HashMap;

use serde::Serialize;

use crate::enumerator::{parse_line, ParsePolicy};
use crate::error::ParseError;

/// A `name=value` pair from a bean's ObjectName
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    /// Label key
    pub name: String,
    /// Label value
    pub value: String,
    /// 1-based position within the bean's label list.
    ///
    /// This is the capture group number the label fills in a generated
    /// pattern, so it never changes once parsed.
    pub index: usize,
}

/// One bean attribute as reported by the enumerator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bean {
    /// Owning domain name
    pub domain: String,
    /// Raw label list text, e.g. `type=GarbageCollector,name=G1`
    pub name: String,
    /// Parsed labels in original order
    pub labels: Vec<Label>,
    /// Attribute key path (contents of the third bracket, may be empty)
    pub attribute: String,
    /// Attribute name
    #[serde(rename = "valueName")]
    pub value_name: String,
    /// Attribute value
    pub value: String,
}

impl Bean {
    /// Find a label by name (first match)
    pub fn label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.name == name)
    }

    /// Stable key shared by every attribute line of the same bean
    pub fn key(&self) -> BeanKey {
        BeanKey::new(&self.domain, &self.name)
    }
}

/// Identity of a bean across attribute lines and catalog refreshes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeanKey {
    /// Domain name
    pub domain: String,
    /// Bean name (raw label list)
    pub name: String,
}

impl BeanKey {
    /// Create a key from domain and bean name
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
        }
    }
}

/// A JMX domain and the beans discovered in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    /// Domain name, e.g. `java.lang`
    pub name: String,
    /// Beans in parse order
    pub beans: Vec<Bean>,
}

/// Parsed enumerator output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    domains: Vec<Domain>,
    index: HashMap<String, usize>,
}

/// Result of building a catalog under [`ParsePolicy::Skip`]
#[derive(Debug, Clone, Default)]
pub struct CatalogBuild {
    /// The catalog built from every well-formed line
    pub catalog: Catalog,
    /// Lines that were dropped
    pub skipped: Vec<ParseError>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from raw enumerator lines
    ///
    /// Blank lines are ignored. Domains are ordered by first appearance and
    /// beans keep their line order within a domain.
    ///
    /// # Errors
    ///
    /// With [`ParsePolicy::Abort`] the first malformed line is returned as an
    /// error. With [`ParsePolicy::Skip`] malformed lines are collected in
    /// [`CatalogBuild::skipped`] instead.
    pub fn build<I, S>(lines: I, policy: ParsePolicy) -> Result<CatalogBuild, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Catalog::empty();
        let mut skipped = Vec::new();

        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Ok(bean) => catalog.push(bean),
                Err(e) => match policy {
                    ParsePolicy::Abort => return Err(e),
                    ParsePolicy::Skip => skipped.push(e),
                },
            }
        }

        Ok(CatalogBuild { catalog, skipped })
    }

    fn push(&mut self, bean: Bean) {
        let idx = match self.index.get(&bean.domain) {
            Some(&idx) => idx,
            None => {
                self.domains.push(Domain {
                    name: bean.domain.clone(),
                    beans: Vec::new(),
                });
                let idx = self.domains.len() - 1;
                self.index.insert(bean.domain.clone(), idx);
                idx
            }
        };
        self.domains[idx].beans.push(bean);
    }

    /// Domains in discovery order
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Domain names in discovery order
    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|d| d.name.as_str())
    }

    /// Look up a domain by name
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.index.get(name).map(|&i| &self.domains[i])
    }

    /// Position of a domain in discovery order
    pub fn domain_position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Beans of a domain, empty when the domain is unknown
    pub fn beans(&self, domain: &str) -> &[Bean] {
        self.domain(domain).map(|d| d.beans.as_slice()).unwrap_or(&[])
    }

    /// Number of domains
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether no bean was parsed
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Total number of bean lines
    pub fn bean_count(&self) -> usize {
        self.domains.iter().map(|d| d.beans.len()).sum()
    }
}

impl Serialize for Catalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.domains.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINES: &[&str] = &[
        "java.lang<type=Memory><HeapMemoryUsage>used: 52428800",
        "java.lang<type=Threading><>ThreadCount: 42",
        "kafka.server<type=BrokerTopicMetrics,name=MessagesInPerSec><>Count: 7",
        "java.lang<type=Memory><NonHeapMemoryUsage>used: 1024",
        "",
    ];

    #[test]
    fn test_build_groups_by_domain_in_discovery_order() {
        let build = Catalog::build(LINES, ParsePolicy::Abort).unwrap();
        let catalog = build.catalog;

        let names: Vec<&str> = catalog.domain_names().collect();
        assert_eq!(names, vec!["java.lang", "kafka.server"]);
        assert_eq!(catalog.bean_count(), 4);
        assert!(build.skipped.is_empty());

        let beans = catalog.beans("java.lang");
        assert_eq!(beans.len(), 3);
        assert_eq!(beans[0].attribute, "HeapMemoryUsage");
        assert_eq!(beans[1].value_name, "ThreadCount");
        assert_eq!(beans[2].attribute, "NonHeapMemoryUsage");
    }

    #[test]
    fn test_label_indices_follow_list_position() {
        let catalog = Catalog::build(LINES, ParsePolicy::Abort).unwrap().catalog;
        let bean = &catalog.beans("kafka.server")[0];

        assert_eq!(bean.labels.len(), 2);
        assert_eq!(bean.labels[0].name, "type");
        assert_eq!(bean.labels[0].index, 1);
        assert_eq!(bean.labels[1].name, "name");
        assert_eq!(bean.labels[1].value, "MessagesInPerSec");
        assert_eq!(bean.labels[1].index, 2);
        assert_eq!(bean.label("name").map(|l| l.index), Some(2));
    }

    #[test]
    fn test_skip_policy_collects_bad_lines() {
        let lines = ["not a bean", "java.lang<type=Memory><>Verbose: false"];
        let build = Catalog::build(lines, ParsePolicy::Skip).unwrap();

        assert_eq!(build.catalog.bean_count(), 1);
        assert_eq!(build.skipped.len(), 1);
        assert_eq!(build.skipped[0].line, "not a bean");
    }

    #[test]
    fn test_abort_policy_fails_on_first_bad_line() {
        let lines = ["java.lang<type=Memory><>Verbose: false", "not a bean"];
        let err = Catalog::build(lines, ParsePolicy::Abort).unwrap_err();
        assert_eq!(err.line, "not a bean");
    }

    #[test]
    fn test_unknown_domain_has_no_beans() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.beans("nope").is_empty());
        assert_eq!(catalog.domain_position("nope"), None);
    }

    #[test]
    fn test_same_named_beans_share_key() {
        let catalog = Catalog::build(LINES, ParsePolicy::Abort).unwrap().catalog;
        let beans = catalog.beans("java.lang");
        assert_eq!(beans[0].key(), beans[2].key());
        assert_ne!(beans[0].key(), beans[1].key());
    }
}
