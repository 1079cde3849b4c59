//! Actions flowing from key handling into the application loop

use ingress_pilot_core::ActionKind;

/// Messages produced by components and consumed by the app loop
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Return to the explorer, leaving open documents in place
    Back,
    Tick,
    Resize(u16, u16),
    /// Reload the ingress listing
    Refresh,
    /// Run one inspection action against the current selection
    Inspect(ActionKind),
    /// Cycle forward through open documents
    NextDocument,
    /// Cycle backward through open documents
    PreviousDocument,
    /// Close the focused document
    CloseDocument,
    /// Copy the focused document body to the system clipboard
    CopyDocument,
}
