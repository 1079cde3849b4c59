//! UI components
//!
//! Each view implements the Component trait: translate key events into
//! actions, react to actions, draw itself into a frame region.

pub mod document;
pub mod explorer;

pub use document::DocumentComponent;
pub use explorer::ExplorerComponent;

use crate::action::Action;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

pub trait Component {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>>;

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
