//! Rule generation module
//!
//! This module turns the operator's selection into JMX exporter rules and
//! the YAML document that carries them.

pub mod document;
pub mod rules;

pub use document::ConfigDocument;
pub use rules::{bean_pattern, metric_name, LabelMap, Rule, RuleBuilder, RuleMode, RuleResult};
