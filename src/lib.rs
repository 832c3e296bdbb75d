//! Roster extraction: named officers and board members from cleaned page text.
//!
//! The core is [`RosterExtractor::process`], which takes a [`PageContent`]
//! and returns a categorized [`ProcessedContent`]. It performs no I/O.

pub mod config;
pub mod error;
pub mod parser;
pub mod report;

pub use config::{PatternConfig, Patterns};
pub use error::{ConfigError, LocateError};
pub use parser::names::{CapitalizedNameLocator, GazetteerNameLocator, NameLocator, NameSpan};
pub use parser::person::{ContactInfo, Person};
pub use parser::{PageContent, ProcessedContent, RosterExtractor};
