//! Application state and main loop

use crate::action::Action;
use crate::components::{Component, DocumentComponent, ExplorerComponent};
use crate::tui::{self, Tui};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ingress_nginx_rs::kubectl::KubectlCli;
use ingress_nginx_rs::plugin::{self, ControllerLocator};
use ingress_nginx_rs::IngressSummary;
use ingress_pilot_core::{ActionKind, Document, DocumentSink, Orchestrator, Outcome};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// How long a notice stays on the status line
const NOTICE_TTL: Duration = Duration::from_secs(6);

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq)]
enum View {
    Explorer,
    Document,
}

/// Results from background work
#[derive(Debug)]
enum AsyncResult {
    IngressList(Result<Vec<IngressSummary>, String>),
    ActionFinished {
        action: ActionKind,
        target: String,
        result: Result<ActionReport, String>,
    },
}

/// What one background action run produced
#[derive(Debug, Default)]
struct ActionReport {
    /// Selection was not an ingress; nothing ran.
    not_applicable: bool,
    documents: Vec<Document>,
    /// Formatted per-host failure messages
    failures: Vec<String>,
}

impl ActionReport {
    fn from_outcome(outcome: Outcome, documents: Vec<Document>) -> Self {
        match outcome {
            Outcome::NotApplicable => Self {
                not_applicable: true,
                ..Self::default()
            },
            Outcome::Completed { failures, .. } => Self {
                not_applicable: false,
                documents,
                failures: failures
                    .iter()
                    .map(|f| format!("host {}: {}", f.host, f.error))
                    .collect(),
            },
        }
    }
}

/// Sink handed to the orchestrator inside the background task; the
/// collected documents travel back over the result channel.
#[derive(Default)]
struct CollectingSink {
    documents: Vec<Document>,
}

impl DocumentSink for CollectingSink {
    fn present(&mut self, document: Document) {
        self.documents.push(document);
    }
}

/// Progress indicator for the in-flight action
struct ProgressState {
    label: &'static str,
    frame: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NoticeLevel {
    Info,
    Error,
}

/// One transient status-line message
struct Notice {
    text: String,
    level: NoticeLevel,
    posted: Instant,
}

/// Main application state
pub struct App {
    /// Whether the application should quit
    should_quit: bool,
    /// Current view
    view: View,
    /// Resource tree
    explorer: ExplorerComponent,
    /// Open documents, oldest first; new ones never replace old ones
    documents: Vec<DocumentComponent>,
    /// Focused document index
    active_document: usize,
    /// Collaborators, resolved once at startup
    kubectl: Arc<KubectlCli>,
    orchestrator: Arc<Orchestrator>,
    /// In-flight background work, if any
    progress: Option<ProgressState>,
    /// Transient status-line messages
    notices: Vec<Notice>,
    /// Tick rate for spinner animation (ms)
    tick_rate: Duration,
    /// Channel for async results
    result_rx: mpsc::UnboundedReceiver<AsyncResult>,
    result_tx: mpsc::UnboundedSender<AsyncResult>,
}

impl App {
    pub fn new(kubectl: KubectlCli, locator: ControllerLocator) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            should_quit: false,
            view: View::Explorer,
            explorer: ExplorerComponent::new(),
            documents: Vec::new(),
            active_document: 0,
            kubectl: Arc::new(kubectl),
            orchestrator: Arc::new(Orchestrator::new(locator)),
            progress: None,
            notices: Vec::new(),
            tick_rate: Duration::from_millis(100),
            result_rx,
            result_tx,
        }
    }

    /// Verify the required collaborators before the terminal is touched.
    ///
    /// Either probe failing is fatal: the error reaches stderr and no view
    /// is ever registered.
    pub fn preflight(&self) -> Result<()> {
        self.kubectl.probe()?;
        self.kubectl.probe_plugin()?;
        Ok(())
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        self.preflight()?;

        tui::install_panic_hook();
        let mut terminal = tui::init()?;
        let result = self.main_loop(&mut terminal).await;
        tui::restore()?;
        result
    }

    /// Main event loop
    async fn main_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        // Populate the tree on startup
        self.dispatch_refresh();

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(self.tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        let action = match self.view {
                            View::Explorer => self.explorer.handle_key_event(key)?,
                            View::Document => match self.documents.get_mut(self.active_document) {
                                Some(document) => document.handle_key_event(key)?,
                                None => Some(Action::Back),
                            },
                        };
                        if let Some(action) = action {
                            self.handle_action(action);
                        }
                    }
                    Event::Resize(w, h) => self.handle_action(Action::Resize(w, h)),
                    _ => {}
                }
            } else {
                self.handle_action(Action::Tick);
            }

            // Drain async results (non-blocking)
            while let Ok(result) = self.result_rx.try_recv() {
                self.handle_async_result(result);
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => {
                self.view = View::Explorer;
            }
            Action::Tick => {
                if let Some(progress) = &mut self.progress {
                    progress.frame = (progress.frame + 1) % SPINNER_FRAMES.len();
                }
                self.notices.retain(|n| n.posted.elapsed() < NOTICE_TTL);
            }
            Action::Resize(_w, _h) => {
                // Terminal resizes on the next draw
            }
            Action::Refresh => self.dispatch_refresh(),
            Action::Inspect(kind) => self.dispatch_inspect(kind),
            Action::NextDocument => {
                if !self.documents.is_empty() {
                    self.active_document = (self.active_document + 1) % self.documents.len();
                }
            }
            Action::PreviousDocument => {
                if !self.documents.is_empty() {
                    self.active_document = self
                        .active_document
                        .checked_sub(1)
                        .unwrap_or(self.documents.len() - 1);
                }
            }
            Action::CloseDocument => {
                if self.active_document < self.documents.len() {
                    self.documents.remove(self.active_document);
                }
                if self.documents.is_empty() {
                    self.active_document = 0;
                    self.view = View::Explorer;
                } else if self.active_document >= self.documents.len() {
                    self.active_document = self.documents.len() - 1;
                }
            }
            Action::CopyDocument => {
                if let Some(document) = self.documents.get(self.active_document) {
                    crate::clipboard::copy(document.body().to_string());
                    self.notify(NoticeLevel::Info, "copied document to clipboard".to_string());
                }
            }
        }
    }

    /// Reload the ingress listing in the background.
    fn dispatch_refresh(&mut self) {
        if self.progress.is_some() {
            return;
        }
        self.explorer.set_loading();
        self.progress = Some(ProgressState {
            label: "Loading ingresses",
            frame: 0,
        });

        let kubectl = Arc::clone(&self.kubectl);
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let joined = tokio::task::spawn_blocking(move || {
                plugin::list_ingresses(kubectl.as_ref())
            })
            .await;
            let result = match joined {
                Ok(Ok(rows)) => Ok(rows),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(AsyncResult::IngressList(result));
        });
    }

    /// Run one inspection action in the background, keeping the spinner
    /// alive for the duration of all nested invocations.
    fn dispatch_inspect(&mut self, kind: ActionKind) {
        if self.progress.is_some() {
            self.notify(
                NoticeLevel::Info,
                "another action is still running".to_string(),
            );
            return;
        }

        let target = self.explorer.resolve_command_target();
        let target_name = target
            .as_ref()
            .map(|t| t.name().to_string())
            .unwrap_or_default();

        self.progress = Some(ProgressState {
            label: kind.progress_label(),
            frame: 0,
        });

        let orchestrator = Arc::clone(&self.orchestrator);
        let kubectl = Arc::clone(&self.kubectl);
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let joined = tokio::task::spawn_blocking(move || {
                let mut sink = CollectingSink::default();
                orchestrator
                    .run(kind, target.as_ref(), kubectl.as_ref(), &mut sink)
                    .map(|outcome| ActionReport::from_outcome(outcome, sink.documents))
            })
            .await;
            let result = match joined {
                Ok(Ok(report)) => Ok(report),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(AsyncResult::ActionFinished {
                action: kind,
                target: target_name,
                result,
            });
        });
    }

    fn handle_async_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::IngressList(result) => {
                self.progress = None;
                match result {
                    Ok(rows) => {
                        tracing::info!("loaded {} ingresses", rows.len());
                        self.explorer.set_rows(rows);
                    }
                    Err(e) => {
                        tracing::error!("ingress listing failed: {e}");
                        self.explorer.set_error(e.clone());
                        self.notify(NoticeLevel::Error, format!("failed to list ingresses: {e}"));
                    }
                }
            }
            AsyncResult::ActionFinished {
                action,
                target,
                result,
            } => {
                self.progress = None;
                match result {
                    Ok(report) if report.not_applicable => {
                        // Not an ingress: deliberately silent.
                        tracing::debug!(?action, "action skipped for non-ingress selection");
                    }
                    Ok(report) => {
                        for failure in &report.failures {
                            self.notify(
                                NoticeLevel::Error,
                                format!("{action} failed for {target}: {failure}"),
                            );
                        }
                        let opened = !report.documents.is_empty();
                        for document in report.documents {
                            self.open_document(document);
                        }
                        if opened {
                            self.view = View::Document;
                        }
                    }
                    Err(e) => {
                        tracing::error!(?action, "action failed: {e}");
                        self.notify(
                            NoticeLevel::Error,
                            format!("{action} failed for {target}: {e}"),
                        );
                    }
                }
            }
        }
    }

    /// Push a new document; open documents are never replaced.
    fn open_document(&mut self, document: Document) {
        self.documents.push(DocumentComponent::new(document));
        self.active_document = self.documents.len() - 1;
    }

    fn notify(&mut self, level: NoticeLevel, text: String) {
        if level == NoticeLevel::Error {
            tracing::error!("{text}");
        }
        self.notices.push(Notice {
            text,
            level,
            posted: Instant::now(),
        });
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let layout =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);

        match self.view {
            View::Document if !self.documents.is_empty() => {
                if let Some(document) = self.documents.get_mut(self.active_document) {
                    let _ = document.draw(frame, layout[0]);
                }
            }
            _ => {
                let _ = self.explorer.draw(frame, layout[0]);
            }
        }

        self.draw_status_line(frame, layout[1]);
    }

    fn draw_status_line(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(progress) = &self.progress {
            Line::from(vec![
                Span::raw(format!(" {} ", SPINNER_FRAMES[progress.frame])).fg(Color::Cyan),
                Span::raw(progress.label).fg(Color::Cyan),
                Span::raw("...").dim(),
            ])
        } else if let Some(notice) = self.notices.last() {
            let color = match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(Span::raw(format!(" {}", notice.text)).fg(color))
        } else if self.view == View::Document {
            Line::from(
                Span::raw(format!(
                    " document {}/{}  ·  [/] cycle  ·  y copy  ·  x close  ·  Esc back",
                    self.active_document + 1,
                    self.documents.len()
                ))
                .dim(),
            )
        } else {
            Line::from(Span::raw(" select an ingress, then b / c / t").dim())
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingress_pilot_core::orchestrator::HostFailure;
    use ingress_nginx_rs::IngressNginxError;

    fn app() -> App {
        App::new(KubectlCli::default(), ControllerLocator::default())
    }

    fn report_with(documents: Vec<Document>, failures: Vec<String>) -> ActionReport {
        ActionReport {
            not_applicable: false,
            documents,
            failures,
        }
    }

    #[test]
    fn outcome_failures_are_formatted_per_host() {
        let outcome = Outcome::Completed {
            presented: 0,
            skipped_hosts: 0,
            failures: vec![HostFailure {
                host: "a.com".to_string(),
                error: IngressNginxError::EmptyOutput {
                    command: "ingress-nginx conf".to_string(),
                },
            }],
        };
        let report = ActionReport::from_outcome(outcome, Vec::new());
        assert!(!report.not_applicable);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].starts_with("host a.com:"));
    }

    #[test]
    fn not_applicable_outcome_stays_silent() {
        let mut app = app();
        app.handle_async_result(AsyncResult::ActionFinished {
            action: ActionKind::Backends,
            target: String::new(),
            result: Ok(ActionReport {
                not_applicable: true,
                ..ActionReport::default()
            }),
        });

        assert!(app.documents.is_empty());
        assert!(app.notices.is_empty());
        assert_eq!(app.view, View::Explorer);
    }

    #[test]
    fn presented_documents_open_and_focus_the_latest() {
        let mut app = app();
        app.handle_async_result(AsyncResult::ActionFinished {
            action: ActionKind::HostConf,
            target: "demo".to_string(),
            result: Ok(report_with(
                vec![
                    Document::new("Configuration for ingress: demo host: a.com", "nginx", "a"),
                    Document::new("Configuration for ingress: demo host: b.com", "nginx", "b"),
                ],
                Vec::new(),
            )),
        });

        assert_eq!(app.documents.len(), 2);
        assert_eq!(app.active_document, 1);
        assert_eq!(app.view, View::Document);
        assert!(app.notices.is_empty());
    }

    #[test]
    fn failed_action_notifies_and_opens_nothing() {
        let mut app = app();
        app.handle_async_result(AsyncResult::ActionFinished {
            action: ActionKind::Backends,
            target: "demo".to_string(),
            result: Err("exit code 1: boom".to_string()),
        });

        assert!(app.documents.is_empty());
        assert_eq!(app.notices.len(), 1);
        assert_eq!(app.notices[0].level, NoticeLevel::Error);
        assert!(app.notices[0].text.contains("list backends"));
        assert!(app.notices[0].text.contains("demo"));
        assert!(app.progress.is_none());
    }

    #[test]
    fn host_failures_notify_but_siblings_still_open() {
        let mut app = app();
        app.handle_async_result(AsyncResult::ActionFinished {
            action: ActionKind::HostCerts,
            target: "demo".to_string(),
            result: Ok(report_with(
                vec![Document::new(
                    "Certificates for ingress: demo host: b.com",
                    "text",
                    "chain",
                )],
                vec!["host a.com: boom".to_string()],
            )),
        });

        assert_eq!(app.documents.len(), 1);
        assert_eq!(app.notices.len(), 1);
        assert!(app.notices[0].text.contains("a.com"));
        assert_eq!(app.view, View::Document);
    }

    #[test]
    fn closing_the_last_document_returns_to_the_explorer() {
        let mut app = app();
        app.open_document(Document::new("one", "text", "1"));
        app.open_document(Document::new("two", "text", "2"));
        app.view = View::Document;

        app.handle_action(Action::CloseDocument);
        assert_eq!(app.documents.len(), 1);
        assert_eq!(app.view, View::Document);

        app.handle_action(Action::CloseDocument);
        assert!(app.documents.is_empty());
        assert_eq!(app.view, View::Explorer);
    }

    #[test]
    fn document_cycling_wraps_both_ways() {
        let mut app = app();
        for title in ["one", "two", "three"] {
            app.open_document(Document::new(title, "text", title));
        }
        assert_eq!(app.active_document, 2);

        app.handle_action(Action::NextDocument);
        assert_eq!(app.active_document, 0);
        app.handle_action(Action::PreviousDocument);
        assert_eq!(app.active_document, 2);
    }

    #[test]
    fn listing_failure_lands_in_the_explorer_and_notices() {
        let mut app = app();
        app.handle_async_result(AsyncResult::IngressList(Err("connection refused".to_string())));

        assert_eq!(app.notices.len(), 1);
        assert!(app.notices[0].text.contains("connection refused"));
        assert!(app.progress.is_none());
    }
}
