//! Rule generation from a data sample.
//!
//! Generators look at a small sample of a table and propose a [`RuleSet`]
//! for the engine to apply. Every generated rule set goes through the same
//! validation as a rule file loaded from disk.
//!
//! # Providers
//!
//! - **OpenAI** - chat-completions API (requires `OPENAI_API_KEY`)
//! - **Mock** - deterministic heuristics, no network
//!
//! # Example
//!
//! ```no_run
//! use scour::{MockGenerator, RuleGenerator, TableLoader};
//!
//! let (table, _) = TableLoader::new().load("sales.csv").unwrap();
//! let rules = MockGenerator::new()
//!     .generate(&table.head(20), "Retail store sales")
//!     .unwrap();
//! println!("{} rules proposed", rules.len());
//! ```
//!
//! [`RuleSet`]: crate::RuleSet

mod mock;
mod openai;
pub mod prompts;
mod provider;

pub use mock::MockGenerator;
pub use openai::OpenAiGenerator;
pub use provider::{GeneratorConfig, RuleGenerator};
