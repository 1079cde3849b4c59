//! ingress-pilot-tui: Terminal UI for ingress-pilot
//!
//! Ratatui-based UI using the Component pattern: a resource-tree explorer
//! over the cluster's ingresses, and a stack of read-only document views
//! holding captured command output.

pub mod action;
pub mod app;
pub mod clipboard;
pub mod components;
pub mod tui;

pub use app::App;
