//! Collaborator services.

pub mod autosave;

pub use autosave::{AutosaveHook, LogAutosave};
