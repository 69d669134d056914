//! URL classification helpers
//!
//! Suffix matching for archive links and directory/origin checks for
//! descend links. These rules treat URLs as plain text after redirect
//! resolution; no normalization is performed here.

mod matcher;

pub use matcher::{is_directory_url, ArchiveRules};
