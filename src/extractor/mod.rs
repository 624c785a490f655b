//! Main content and comment extraction.
//!
//! - `tags`: tag families and catalogs
//! - `state`: per-call state (processed nodes, potential tags, dedup cache)
//! - `handlers`: per-element transformers
//! - `pruning`: boilerplate removal on candidate subtrees
//! - `pipeline`: candidate selection and wild text recovery
//! - `comments`: comment section extraction
//! - `fallback`: baseline scraping and the external readability comparison

pub mod comments;
pub mod fallback;
pub mod handlers;
pub mod pipeline;
pub mod pruning;
pub mod state;
pub mod tags;

pub use comments::extract_comments;
pub use fallback::{baseline, candidate_is_usable, compare_external_extraction, sanitize_tree};
pub use pipeline::{extract_content, recover_wild_text};
pub use pruning::prune_unwanted_sections;
pub use state::ExtractionState;
