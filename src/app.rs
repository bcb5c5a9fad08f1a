// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Application loop
//
// The one task that owns the `Mailbox`. Transport input, user input and the
// completions of spawned HTTP requests are all funnelled into `run`, so
// every state change happens in a single order. Output (screens, alerts,
// prompts) goes out over a channel for the binary to print.

use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::client::MailboxApi;
use crate::api::endpoints::Endpoints;
use crate::commands::{self, Action, HELP};
use crate::error::CatcherError;
use crate::mailbox::{DetailRequest, Effect, Mailbox};
use crate::models::{Format, MessageDetail, MessageId, MessageSummary};
use crate::preferences::Preferences;
use crate::render;
use crate::transport::poll::diff_snapshot;
use crate::transport::Inbound;

pub const CLEAR_PROMPT: &str =
    "You will lose all your received messages.\n\nAre you sure you want to clear all messages? [y/N]";
pub const QUIT_PROMPT: &str =
    "You will lose all your received messages.\n\nAre you sure you want to quit? [y/N]";
pub const DELETE_FAILED: &str = "Error while removing message.";
pub const CLEAR_FAILED: &str = "Error while clearing all messages.";
pub const QUIT_FAILED: &str = "Error while quitting.";

/// Completion of a request the loop spawned.
#[derive(Debug)]
pub enum AppEvent {
    Bootstrapped(Result<Vec<MessageSummary>, CatcherError>),
    DetailLoaded {
        request: DetailRequest,
        result: Result<MessageDetail, CatcherError>,
    },
    Deleted {
        id: MessageId,
        result: Result<(), CatcherError>,
    },
    Cleared(Result<(), CatcherError>),
    Quit(Result<(), CatcherError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Screen(String),
    Alert(String),
    Prompt(String),
    Info(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirm {
    Clear,
    Quit,
}

pub struct App {
    mailbox: Mailbox,
    api: Arc<dyn MailboxApi>,
    endpoints: Endpoints,
    preferences: Option<Preferences>,
    pane_height: Option<u32>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
    output: mpsc::UnboundedSender<Output>,
    pending: Option<Confirm>,
    running: bool,
    rendered: Option<u64>,
}

impl App {
    pub fn new(
        api: Arc<dyn MailboxApi>,
        endpoints: Endpoints,
        default_format: &Format,
        preferences: Option<Preferences>,
        output: mpsc::UnboundedSender<Output>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let pane_height = preferences.as_ref().and_then(|p| p.load_pane_height());
        if let Some(height) = pane_height {
            debug!("Restored pane height {}", height);
        }
        Self {
            mailbox: Mailbox::new(default_format),
            api,
            endpoints,
            preferences,
            pane_height,
            events_tx,
            events_rx: Some(events_rx),
            output,
            pending: None,
            running: true,
            rendered: None,
        }
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn pane_height(&self) -> Option<u32> {
        self.pane_height
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fetch the full list once. Live events may land first; the mailbox
    /// skips ids it already has.
    pub fn start_bootstrap(&self) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.list_messages().await;
            let _ = tx.send(AppEvent::Bootstrapped(result));
        });
    }

    /// Drive the loop until the user exits, input closes or the server quits.
    pub async fn run(
        mut self,
        mut inbound_rx: mpsc::UnboundedReceiver<Inbound>,
        mut input_rx: mpsc::UnboundedReceiver<String>,
    ) -> Result<(), CatcherError> {
        let mut events_rx = self
            .events_rx
            .take()
            .ok_or_else(|| CatcherError::Config("application loop already started".to_string()))?;

        self.start_bootstrap();
        self.render_if_changed();

        let mut transport_open = true;
        while self.running {
            tokio::select! {
                Some(event) = events_rx.recv() => self.handle_app_event(event),
                inbound = inbound_rx.recv(), if transport_open => match inbound {
                    Some(inbound) => self.handle_inbound(inbound),
                    None => {
                        warn!("Transport stopped; the list will no longer update");
                        transport_open = false;
                    }
                },
                line = input_rx.recv() => match line {
                    Some(line) => self.handle_line(&line),
                    None => {
                        info!("Input closed, exiting");
                        self.running = false;
                    }
                },
            }
            self.render_if_changed();
        }
        Ok(())
    }

    /// Wait for and apply the next spawned-request completion. Only usable
    /// while `run` has not taken the receiver.
    pub async fn process_next_event(&mut self) -> bool {
        let event = match self.events_rx.as_mut() {
            Some(rx) => rx.recv().await,
            None => return false,
        };
        match event {
            Some(event) => {
                self.handle_app_event(event);
                true
            }
            None => false,
        }
    }

    pub fn handle_inbound(&mut self, inbound: Inbound) {
        let events = match inbound {
            Inbound::Event(event) => vec![event],
            Inbound::Snapshot(fetched) => diff_snapshot(self.mailbox.list(), fetched),
        };
        for event in events {
            let effects = self.mailbox.apply(event);
            self.run_effects(effects);
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Bootstrapped(Ok(summaries)) => {
                self.mailbox.bootstrap(summaries);
            }
            AppEvent::Bootstrapped(Err(e)) => {
                error!("Failed to load messages: {}", e);
            }
            AppEvent::DetailLoaded { request, result } => {
                self.mailbox.complete_detail(&request, result);
            }
            AppEvent::Deleted { id, result: Ok(()) } => {
                // The push channel may announce the same removal; that one is a no-op
                let effects = self.mailbox.remove(&id);
                self.run_effects(effects);
            }
            AppEvent::Deleted { id, result: Err(e) } => {
                error!("Failed to delete message {}: {}", id, e);
                self.emit(Output::Alert(DELETE_FAILED.to_string()));
            }
            AppEvent::Cleared(Ok(())) => self.mailbox.clear(),
            AppEvent::Cleared(Err(e)) => {
                error!("Failed to clear messages: {}", e);
                self.emit(Output::Alert(CLEAR_FAILED.to_string()));
            }
            AppEvent::Quit(Ok(())) => {
                self.run_effects(vec![Effect::NavigateAway]);
            }
            AppEvent::Quit(Err(e)) => {
                error!("Failed to quit server: {}", e);
                self.mailbox.quit_failed();
                self.emit(Output::Alert(QUIT_FAILED.to_string()));
            }
        }
    }

    /// One line of user input. While a confirmation is pending the line is
    /// its answer.
    pub fn handle_line(&mut self, line: &str) {
        if let Some(confirm) = self.pending.take() {
            if matches!(line.trim().to_lowercase().as_str(), "y" | "yes") {
                self.confirmed(confirm);
            } else {
                self.emit(Output::Info("Cancelled".to_string()));
            }
            return;
        }

        let command = match commands::parse(line) {
            Ok(command) => command,
            Err(e) => {
                self.emit(Output::Info(e.to_string()));
                return;
            }
        };
        match commands::dispatch(command, &self.mailbox) {
            Some(action) => self.perform(action),
            None => debug!("Command has no effect in the current state"),
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Select(id) => {
                let effects = self.mailbox.select(&id);
                self.run_effects(effects);
            }
            Action::Move { direction, extreme } => {
                let effects = self.mailbox.move_relative(direction, extreme);
                self.run_effects(effects);
            }
            Action::CycleTab(step) => {
                self.mailbox.cycle_tab(step);
            }
            Action::ShowFormat(format) => {
                self.mailbox.show_format(&format);
            }
            Action::DeleteSelected(id) => self.spawn_delete(id),
            Action::RequestClear => {
                self.pending = Some(Confirm::Clear);
                self.emit(Output::Prompt(CLEAR_PROMPT.to_string()));
            }
            Action::RequestQuit => {
                self.pending = Some(Confirm::Quit);
                self.emit(Output::Prompt(QUIT_PROMPT.to_string()));
            }
            Action::Search(query) => self.mailbox.apply_query(&query),
            Action::SaveHeight(height) => {
                self.pane_height = Some(height);
                if let Some(preferences) = &self.preferences {
                    preferences.save_pane_height(height);
                }
                self.force_render();
            }
            Action::OpenBody(path) => match self.endpoints.resolve(&path) {
                Ok(url) => self.emit(Output::Info(url.to_string())),
                Err(e) => self.emit(Output::Info(e.to_string())),
            },
            Action::Render => self.force_render(),
            Action::Help => self.emit(Output::Info(HELP.to_string())),
            Action::Exit => self.running = false,
        }
    }

    fn confirmed(&mut self, confirm: Confirm) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        match confirm {
            Confirm::Clear => {
                tokio::spawn(async move {
                    let result = api.clear_messages().await;
                    let _ = tx.send(AppEvent::Cleared(result));
                });
            }
            Confirm::Quit => {
                self.mailbox.begin_quit();
                tokio::spawn(async move {
                    let result = api.quit().await;
                    let _ = tx.send(AppEvent::Quit(result));
                });
            }
        }
    }

    fn spawn_delete(&self, id: MessageId) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.delete_message(&id).await;
            let _ = tx.send(AppEvent::Deleted { id, result });
        });
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchDetail(request) => {
                    let api = self.api.clone();
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        let result = api.message_detail(&request.id).await;
                        let _ = tx.send(AppEvent::DetailLoaded { request, result });
                    });
                }
                Effect::Alert(message) => self.emit(Output::Alert(message)),
                Effect::NavigateAway => {
                    info!("Server has quit, leaving");
                    self.running = false;
                }
            }
        }
    }

    fn render_if_changed(&mut self) {
        if self.rendered == Some(self.mailbox.revision()) {
            return;
        }
        self.force_render();
    }

    fn force_render(&mut self) {
        self.rendered = Some(self.mailbox.revision());
        let height = self.pane_height.map(|h| h as usize);
        let screen = render::render(&self.mailbox, &self.endpoints, height);
        self.emit(Output::Screen(screen));
    }

    fn emit(&self, output: Output) {
        if self.output.send(output).is_err() {
            debug!("Output receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockMailboxApi;
    use crate::mailbox::QUIT_NOTICE;
    use crate::transport::TransportEvent;
    use std::time::Duration;

    fn summary(id: u64) -> MessageSummary {
        MessageSummary {
            id: MessageId::from(id),
            sender: Some(format!("sender{}@example.com", id)),
            recipients: vec!["inbox@example.com".to_string()],
            subject: Some(format!("Message {}", id)),
            created_at: None,
        }
    }

    fn detail() -> MessageDetail {
        MessageDetail {
            created_at: None,
            sender: Some("sender@example.com".into()),
            recipients: vec!["inbox@example.com".into()],
            subject: Some("Message".into()),
            formats: vec![Format::Html, Format::Plain],
            attachments: Vec::new(),
        }
    }

    fn app(api: MockMailboxApi) -> (App, mpsc::UnboundedReceiver<Output>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let endpoints = Endpoints::new("http://127.0.0.1:1080/").unwrap();
        let app = App::new(Arc::new(api), endpoints, &Format::Html, None, tx);
        (app, rx)
    }

    fn outputs(rx: &mut mpsc::UnboundedReceiver<Output>) -> Vec<Output> {
        let mut seen = Vec::new();
        while let Ok(output) = rx.try_recv() {
            seen.push(output);
        }
        seen
    }

    #[tokio::test]
    async fn test_bootstrap_then_select_loads_detail() {
        let mut api = MockMailboxApi::new();
        api.expect_list_messages()
            .returning(|| Ok(vec![summary(1), summary(2)]));
        api.expect_message_detail()
            .withf(|id| id.as_str() == "2")
            .times(1)
            .returning(|_| Ok(detail()));
        let (mut app, _out) = app(api);

        app.start_bootstrap();
        assert!(app.process_next_event().await);
        assert_eq!(app.mailbox().count(), 2);

        app.handle_line("select 2");
        assert!(app.process_next_event().await);
        assert_eq!(app.mailbox().detail().map(|d| d.id.as_str()), Some("2"));
    }

    #[tokio::test]
    async fn test_delete_removes_after_success_and_tolerates_push_echo() {
        let mut api = MockMailboxApi::new();
        api.expect_delete_message().times(1).returning(|_| Ok(()));
        api.expect_message_detail().returning(|_| Ok(detail()));
        let (mut app, _out) = app(api);
        app.mailbox.bootstrap(vec![summary(1), summary(2), summary(3)]);

        app.handle_line("select 2");
        app.handle_line("delete");
        // Detail load and delete completion, in whichever order they land
        assert!(app.process_next_event().await);
        assert!(app.process_next_event().await);

        assert!(!app.mailbox().list().contains(&MessageId::from(2)));
        // Neighbour toward the head (newer) takes over
        assert_eq!(app.mailbox().selected_id(), Some(&MessageId::from(3)));

        app.handle_inbound(Inbound::Event(TransportEvent::Removed(MessageId::from(2))));
        assert_eq!(app.mailbox().count(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_alerts_and_keeps_row() {
        let mut api = MockMailboxApi::new();
        api.expect_delete_message().returning(|_| {
            Err(CatcherError::Status { status: 500, url: "messages/1".into() })
        });
        api.expect_message_detail().returning(|_| Ok(detail()));
        let (mut app, mut out) = app(api);
        app.mailbox.bootstrap(vec![summary(1)]);

        app.handle_line("select 1");
        app.handle_line("d");
        assert!(app.process_next_event().await);
        assert!(app.process_next_event().await);

        assert_eq!(app.mailbox().selected_id(), Some(&MessageId::from(1)));
        assert!(outputs(&mut out).contains(&Output::Alert(DELETE_FAILED.to_string())));
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let mut api = MockMailboxApi::new();
        api.expect_clear_messages().times(1).returning(|| Ok(()));
        let (mut app, mut out) = app(api);
        app.mailbox.bootstrap(vec![summary(1), summary(2)]);

        app.handle_line("clear");
        assert!(outputs(&mut out).contains(&Output::Prompt(CLEAR_PROMPT.to_string())));
        app.handle_line("n");
        assert_eq!(app.mailbox().count(), 2);

        app.handle_line("clear");
        app.handle_line("yes");
        assert!(app.process_next_event().await);
        assert_eq!(app.mailbox().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_quit_rolls_back() {
        let mut api = MockMailboxApi::new();
        api.expect_quit().returning(|| {
            Err(CatcherError::Status { status: 500, url: "/".into() })
        });
        let (mut app, mut out) = app(api);

        app.handle_line("quit");
        app.handle_line("y");
        assert!(app.mailbox().is_quitting());
        assert!(app.process_next_event().await);

        assert!(!app.mailbox().is_quitting());
        assert!(app.is_running());
        assert!(outputs(&mut out).contains(&Output::Alert(QUIT_FAILED.to_string())));
    }

    #[tokio::test]
    async fn test_successful_quit_ignores_echo_and_stops() {
        let mut api = MockMailboxApi::new();
        api.expect_quit().returning(|| Ok(()));
        let (mut app, mut out) = app(api);

        app.handle_line("quit");
        app.handle_line("y");
        app.handle_inbound(Inbound::Event(TransportEvent::Quit));
        assert!(app.is_running());
        assert!(!outputs(&mut out).contains(&Output::Alert(QUIT_NOTICE.to_string())));

        assert!(app.process_next_event().await);
        assert!(!app.is_running());
    }

    #[tokio::test]
    async fn test_server_quit_alerts_and_stops() {
        let (mut app, mut out) = app(MockMailboxApi::new());

        app.handle_inbound(Inbound::Event(TransportEvent::Quit));

        assert!(!app.is_running());
        assert!(outputs(&mut out).contains(&Output::Alert(QUIT_NOTICE.to_string())));
    }

    #[tokio::test]
    async fn test_snapshot_adds_only_new_messages() {
        let (mut app, _out) = app(MockMailboxApi::new());
        app.mailbox.bootstrap(vec![summary(1)]);

        app.handle_inbound(Inbound::Snapshot(vec![summary(1), summary(2)]));

        let ids: Vec<_> = app.mailbox().list().ids().map(|id| id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_unknown_command_reports_error() {
        let (mut app, mut out) = app(MockMailboxApi::new());
        app.handle_line("frobnicate");
        assert!(matches!(outputs(&mut out).as_slice(), [Output::Info(_)]));
        assert!(app.is_running());
        app.handle_line("exit");
        assert!(!app.is_running());
    }

    #[tokio::test]
    async fn test_loop_keeps_serving_input_after_transport_stops() {
        let mut api = MockMailboxApi::new();
        api.expect_list_messages().returning(|| Ok(vec![summary(1)]));
        let (app, mut out) = app(api);
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        drop(inbound_tx);
        input_tx.send("help".to_string()).unwrap();
        input_tx.send("exit".to_string()).unwrap();

        let result =
            tokio::time::timeout(Duration::from_secs(5), app.run(inbound_rx, input_rx)).await;

        assert!(matches!(result, Ok(Ok(()))));
        assert!(outputs(&mut out).contains(&Output::Info(HELP.to_string())));
    }

    #[tokio::test]
    async fn test_height_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let endpoints = Endpoints::new("http://127.0.0.1:1080/").unwrap();
        let prefs = Preferences::new(dir.path());
        let api = Arc::new(MockMailboxApi::new());
        let mut app = App::new(api, endpoints, &Format::Html, Some(prefs.clone()), tx);

        app.handle_line("height 7");

        assert_eq!(app.pane_height(), Some(7));
        assert_eq!(prefs.load_pane_height(), Some(7));
    }
}
