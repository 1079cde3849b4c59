//! Read-only document viewer
//!
//! One captured command output, shown as an unsaved scrollable document.
//! The content is never edited or persisted; the viewer only moves a
//! window over it.

use crate::action::Action;
use crate::components::Component;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ingress_pilot_core::Document;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
    },
};

/// Scrollable view over one document
pub struct DocumentComponent {
    document: Document,
    /// Total body lines, cached at construction
    line_count: usize,
    /// Topmost visible line
    scroll: usize,
    /// Content rows available at the last draw, for paging and clamping
    viewport_height: usize,
}

impl DocumentComponent {
    pub fn new(document: Document) -> Self {
        let line_count = document.body.lines().count();
        Self {
            document,
            line_count,
            scroll: 0,
            viewport_height: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.document.title
    }

    pub fn body(&self) -> &str {
        &self.document.body
    }

    fn max_scroll(&self) -> usize {
        self.line_count.saturating_sub(self.viewport_height.max(1))
    }

    fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll.saturating_add_signed(delta);
        self.scroll = target.min(self.max_scroll());
    }
}

impl Component for DocumentComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Ok(Some(Action::Back)),
            KeyCode::Char('y') => Ok(Some(Action::CopyDocument)),
            KeyCode::Char('x') => Ok(Some(Action::CloseDocument)),
            KeyCode::Char(']') | KeyCode::Tab => Ok(Some(Action::NextDocument)),
            KeyCode::Char('[') | KeyCode::BackTab => Ok(Some(Action::PreviousDocument)),
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_by(-1);
                Ok(None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_by(1);
                Ok(None)
            }
            KeyCode::PageUp => {
                self.scroll_by(-(self.viewport_height.max(1) as isize));
                Ok(None)
            }
            KeyCode::PageDown => {
                self.scroll_by(self.viewport_height.max(1) as isize);
                Ok(None)
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.scroll = 0;
                Ok(None)
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.scroll = self.max_scroll();
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = Layout::vertical([
            Constraint::Length(2), // Title bar
            Constraint::Min(0),    // Body
        ])
        .split(area);

        let title_bar = Paragraph::new(Line::from(vec![
            Span::raw(format!(" {} ", self.document.title))
                .bold()
                .fg(Color::Cyan),
            Span::raw(format!("[{}]", self.document.language)).dim(),
        ]))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(title_bar, layout[0]);

        let body_area = layout[1];
        self.viewport_height = body_area.height as usize;
        self.scroll = self.scroll.min(self.max_scroll());

        // Plain-text rendering; the language tag is a hint only.
        let body = Paragraph::new(self.document.body.as_str())
            .scroll((self.scroll as u16, 0));
        frame.render_widget(body, body_area);

        if self.line_count > self.viewport_height {
            let mut scrollbar_state =
                ScrollbarState::new(self.max_scroll()).position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                body_area,
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn component(lines: usize) -> DocumentComponent {
        let content = (0..lines)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut doc = DocumentComponent::new(Document::new("Title", "text", &content));
        doc.viewport_height = 10;
        doc
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn body_keeps_the_composed_title() {
        let doc = DocumentComponent::new(Document::new("Ingress Backends:", "json", "[]"));
        assert!(doc.body().starts_with("Ingress Backends:\n\n"));
        assert_eq!(doc.title(), "Ingress Backends:");
    }

    #[test]
    fn scrolling_clamps_to_content() {
        let mut doc = component(30);

        doc.handle_key_event(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(doc.scroll, 0);

        for _ in 0..100 {
            doc.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        }
        // 32 body lines (title + blank + 30) in a 10-line viewport
        assert_eq!(doc.scroll, 22);

        doc.handle_key_event(key(KeyCode::Char('g'))).unwrap();
        assert_eq!(doc.scroll, 0);
        doc.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(doc.scroll, 22);
    }

    #[test]
    fn paging_moves_a_viewport_at_a_time() {
        let mut doc = component(50);
        doc.handle_key_event(key(KeyCode::PageDown)).unwrap();
        assert_eq!(doc.scroll, 10);
        doc.handle_key_event(key(KeyCode::PageUp)).unwrap();
        assert_eq!(doc.scroll, 0);
    }

    #[test]
    fn viewer_keys_map_to_stack_actions() {
        let mut doc = component(3);
        let cases = [
            (KeyCode::Esc, Action::Back),
            (KeyCode::Char('y'), Action::CopyDocument),
            (KeyCode::Char('x'), Action::CloseDocument),
            (KeyCode::Char(']'), Action::NextDocument),
            (KeyCode::Char('['), Action::PreviousDocument),
        ];
        for (code, expected) in cases {
            assert_eq!(doc.handle_key_event(key(code)).unwrap(), Some(expected));
        }
    }

    #[test]
    fn short_documents_never_scroll() {
        let mut doc = component(3);
        doc.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(doc.scroll, 0);
    }
}
