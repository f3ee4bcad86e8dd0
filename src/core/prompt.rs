//! Blocking user interaction.

/// Confirmation dialogs and alerts shown by the controller's workflows.
pub trait Prompt: Send + Sync {
    /// Ask a yes/no question; `false` unless the user accepts.
    fn confirm(&self, message: &str) -> bool;

    /// Show a message the user must acknowledge.
    fn alert(&self, message: &str);
}
