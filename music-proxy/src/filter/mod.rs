//! Target host filtering

pub mod allowlist;

pub use allowlist::{Allowlist, DEFAULT_DOMAINS};
