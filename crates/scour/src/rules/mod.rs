//! Cleaning rules and their persisted form.

mod record;
mod store;

pub use record::{Rule, RuleType};
pub(crate) use store::parse_rules;
pub use store::{RuleSet, RuleSetMetadata};
