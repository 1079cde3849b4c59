//! Explorer component - resource tree of the cluster's ingresses

use crate::action::Action;
use crate::components::Component;
use chrono::Utc;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ingress_nginx_rs::IngressSummary;
use ingress_pilot_core::{ActionKind, CommandTarget};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// Explorer component showing the ingress listing with a details pane
pub struct ExplorerComponent {
    /// Rows of the resource tree
    rows: Vec<IngressSummary>,
    /// Currently selected row index
    selected: usize,
    /// List state for selection
    list_state: ListState,
    /// Whether a listing fetch is in flight
    loading: bool,
    /// Listing fetch error, if any
    error: Option<String>,
}

impl Default for ExplorerComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerComponent {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            rows: Vec::new(),
            selected: 0,
            list_state,
            loading: true,
            error: None,
        }
    }

    /// Replace the tree contents after a successful listing fetch.
    pub fn set_rows(&mut self, rows: Vec<IngressSummary>) {
        self.rows = rows;
        self.loading = false;
        self.error = None;
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
        self.list_state.select(Some(self.selected));
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    pub fn set_error(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }

    /// Resolve the current selection into a command target.
    ///
    /// Every row in this tree is an Ingress; an empty tree resolves to
    /// nothing and downstream actions become no-ops.
    pub fn resolve_command_target(&self) -> Option<CommandTarget> {
        self.rows.get(self.selected).map(|row| CommandTarget::Ingress {
            name: row.name.clone(),
            namespace: row.namespace.clone(),
        })
    }

    fn select_previous(&mut self) {
        if !self.rows.is_empty() {
            self.selected = self.selected.saturating_sub(1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn select_next(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + 1).min(self.rows.len() - 1);
            self.list_state.select(Some(self.selected));
        }
    }
}

impl Component for ExplorerComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Ok(Some(Action::Quit)),
            KeyCode::Char('r') => Ok(Some(Action::Refresh)),
            KeyCode::Char('b') => Ok(Some(Action::Inspect(ActionKind::Backends))),
            KeyCode::Char('c') => Ok(Some(Action::Inspect(ActionKind::HostConf))),
            KeyCode::Char('t') => Ok(Some(Action::Inspect(ActionKind::HostCerts))),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
                Ok(None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = Layout::vertical([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(2), // Footer
        ])
        .split(area);

        let state = if self.loading {
            Span::raw("loading...").fg(Color::Yellow)
        } else if let Some(error) = &self.error {
            Span::raw(error.as_str()).fg(Color::Red)
        } else {
            Span::raw(format!("{} ingresses", self.rows.len())).dim()
        };
        let header = Paragraph::new(Line::from(vec![
            Span::raw(" ingress-pilot ").bold().fg(Color::Cyan),
            state,
        ]))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(header, layout[0]);

        let content_layout = Layout::horizontal([
            Constraint::Percentage(45), // Ingress list
            Constraint::Percentage(55), // Details
        ])
        .split(layout[1]);

        self.draw_list(frame, content_layout[0]);
        self.draw_details(frame, content_layout[1]);

        let footer = Paragraph::new(Line::from(vec![
            Span::raw(" [b]").fg(Color::Yellow),
            Span::raw(" backends").dim(),
            Span::raw("  [c]").fg(Color::Yellow),
            Span::raw(" host conf").dim(),
            Span::raw("  [t]").fg(Color::Yellow),
            Span::raw(" host certs").dim(),
            Span::raw("  [r]").fg(Color::Yellow),
            Span::raw(" refresh").dim(),
            Span::raw("  [↑↓/jk]").fg(Color::Yellow),
            Span::raw(" navigate").dim(),
            Span::raw("  [q]").fg(Color::Yellow),
            Span::raw(" quit").dim(),
        ]))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(footer, layout[2]);

        Ok(())
    }
}

impl ExplorerComponent {
    fn draw_list(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let tls_symbol = if row.tls_entries > 0 { "●" } else { "○" };
                let tls_color = if row.tls_entries > 0 {
                    Color::Green
                } else {
                    Color::DarkGray
                };

                let style = if i == self.selected {
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                let label = match &row.namespace {
                    Some(namespace) => format!("{namespace}/{}", row.name),
                    None => row.name.clone(),
                };

                ListItem::new(Line::from(vec![
                    Span::raw(format!(" {tls_symbol} ")).fg(tls_color),
                    Span::raw(label).style(style),
                ]))
            })
            .collect();

        let items = if items.is_empty() {
            let placeholder = if self.loading {
                "  Loading ingresses..."
            } else {
                "  No ingresses found"
            };
            vec![ListItem::new(Line::from(Span::raw(placeholder).dim()))]
        } else {
            items
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Ingresses ")
                    .title_style(Style::default().fg(Color::Cyan).bold())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray));

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn draw_details(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Details ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(row) = self.rows.get(self.selected) else {
            let msg = Paragraph::new(Line::from(Span::raw("No ingress selected").dim()));
            frame.render_widget(msg, inner);
            return;
        };

        let mut lines = vec![
            Line::from(vec![
                Span::raw(" Name:       ").dim(),
                Span::raw(&row.name).fg(Color::White),
            ]),
            Line::from(vec![
                Span::raw(" Namespace:  ").dim(),
                Span::raw(row.namespace.as_deref().unwrap_or("-")).fg(Color::White),
            ]),
            Line::from(vec![
                Span::raw(" Class:      ").dim(),
                Span::raw(row.class.as_deref().unwrap_or("-")).fg(Color::White),
            ]),
            Line::from(vec![
                Span::raw(" TLS:        ").dim(),
                Span::raw(format!("{} entries", row.tls_entries)).fg(Color::White),
            ]),
            Line::from(vec![
                Span::raw(" Age:        ").dim(),
                Span::raw(row.age(Utc::now())).fg(Color::White),
            ]),
            Line::from(""),
            Line::from(Span::raw(" Hosts:").dim()),
        ];

        if row.hosts.is_empty() {
            lines.push(Line::from(Span::raw("   (no host rules)").dim()));
        } else {
            for host in &row.hosts {
                lines.push(Line::from(vec![
                    Span::raw("   "),
                    Span::raw(host).fg(Color::Green),
                ]));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
