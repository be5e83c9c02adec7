//! Taxonomy Core Library
//!
//! Derives taxonomy terms from content nodes: slugs and redirects, term
//! records, value-term associations, usage counts and page plans.
//! The graph store and the page builder are reached through traits.
//!

pub mod assembler;
pub mod associations;
pub mod config;
pub mod content;
pub mod counter;
mod engine;
pub mod error;
pub mod identity;
pub mod model;
pub mod normalize;
pub mod pages;
pub mod registry;
pub mod resolver;
pub mod slug;
pub mod store;
pub mod utils;
pub mod vfs;

pub use config::{PluginConfig, TaxonomyConfig, TermSettings};
pub use engine::TaxonomyEngine;
pub use error::{ConfigurationError, Result, StoreError, TaxonomyError};
pub use normalize::{follow_slug_redirect, normalize, NormalizedTerm};
pub use resolver::{ResolveContext, ResolverTable, TermsResolver};
pub use slug::{deburr, kebab_case, slugify_heading, SlugStyle, Slugifier};
pub use store::{GraphStore, MemoryStore, NodeFilter};
pub use utils::normalize_path_to_key;
