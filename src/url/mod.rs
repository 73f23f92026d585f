//! URL handling module for Sitegraph
//!
//! This module provides domain extraction, same-domain scoping, link
//! resolution, and the mapping from a seed URL to its output directory.

mod domain;
mod resolve;
mod scope;

// Re-export main functions
pub use domain::domain_of;
pub use resolve::{output_dir_for, parse_seed, resolve_link};
pub use scope::{domain_in_scope, same_domain};
