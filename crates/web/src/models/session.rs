//! Session-related types.
//!
//! The session only tracks which draft request a browser is editing.

/// Session keys.
pub mod keys {
    /// Key for storing the code of the in-progress draft request.
    pub const DRAFT_CODE: &str = "draft_code";
}
