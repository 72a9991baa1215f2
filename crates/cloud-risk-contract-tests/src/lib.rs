//! Frozen JSON contracts shared with the risk-analysis backend.
//!
//! Schemas and fixtures live in the workspace `contracts/` directory; the
//! checks are in this crate's `tests/`.

/// Workspace-relative directory holding the schema documents.
pub const CONTRACTS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../contracts");
