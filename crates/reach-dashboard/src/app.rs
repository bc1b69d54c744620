//! Application loop and input handling.
//!
//! Screens: login → dashboard, with two modal forms (add account, add
//! knowledge) and a search input mode layered on top. All network calls
//! are blocking and happen between frames; the 30-second refresh timer is
//! driven from the same loop so polls stay sequential.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::json;
use tracing::{info, warn};

use reach_core::{defaults, AddAccountRequest, Error, Session};

use crate::api::ApiClient;
use crate::poll::{DeferredRefresh, RefreshTimer};
use crate::session::{validate_login, SessionStore};
use crate::state::DashboardState;
use crate::ui;

/// Which screen owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

/// Login form state.
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
            error: None,
        }
    }
}

/// Add-account form, pre-filled like the web dialog.
#[derive(Debug)]
pub struct AccountForm {
    pub email: String,
    pub password: String,
    pub server: String,
    pub port: String,
    pub focus: usize,
}

impl AccountForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            server: defaults::IMAP_SERVER.to_string(),
            port: defaults::IMAP_PORT.to_string(),
            focus: 0,
        }
    }
}

/// Add-knowledge form; metadata is free-form JSON.
#[derive(Debug)]
pub struct KnowledgeForm {
    pub content: String,
    pub metadata: String,
    pub focus: usize,
}

impl KnowledgeForm {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            metadata: "{}".to_string(),
            focus: 0,
        }
    }
}

/// Active modal, if any.
#[derive(Debug)]
pub enum Modal {
    None,
    AddAccount(AccountForm),
    AddKnowledge(KnowledgeForm),
}

/// The terminal application.
pub struct App {
    client: ApiClient,
    session_store: SessionStore,
    pub session: Option<Session>,
    pub state: DashboardState,
    pub screen: Screen,
    pub login: LoginForm,
    pub modal: Modal,
    pub searching: bool,
    timer: Option<RefreshTimer>,
    deferred: Option<DeferredRefresh>,
    should_quit: bool,
}

impl App {
    pub fn new(client: ApiClient, session_store: SessionStore) -> Self {
        // A stored session skips the login screen.
        let session = session_store.load();
        let screen = if session.is_some() {
            Screen::Dashboard
        } else {
            Screen::Login
        };
        Self {
            client,
            session_store,
            session,
            state: DashboardState::new(),
            screen,
            login: LoginForm::default(),
            modal: Modal::None,
            searching: false,
            timer: None,
            deferred: None,
            should_quit: false,
        }
    }

    /// Run until quit.
    pub fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> anyhow::Result<()> {
        if self.screen == Screen::Dashboard {
            self.enter_dashboard();
        }
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
            self.tick();
        }
        Ok(())
    }

    // ========================================================================
    // Input dispatch
    // ========================================================================

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Dashboard => {
                if !matches!(self.modal, Modal::None) {
                    self.handle_modal_key(key);
                } else if self.searching {
                    self.handle_search_key(key);
                } else {
                    self.handle_dashboard_key(key);
                }
            }
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.login.focus = match self.login.focus {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::Backspace => {
                match self.login.focus {
                    LoginField::Email => self.login.email.pop(),
                    LoginField::Password => self.login.password.pop(),
                };
            }
            KeyCode::Char(c) => match self.login.focus {
                LoginField::Email => self.login.email.push(c),
                LoginField::Password => self.login.password.push(c),
            },
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('L') => self.logout(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('c') => self.state.cycle_category(),
            KeyCode::Char('a') => self.state.cycle_account(),
            KeyCode::Char('r') => self.manual_refresh(),
            KeyCode::Char('g') => self.generate_reply(),
            KeyCode::Char('A') => self.modal = Modal::AddAccount(AccountForm::new()),
            KeyCode::Char('K') => self.modal = Modal::AddKnowledge(KnowledgeForm::new()),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.set_query(String::new());
                self.searching = false;
            }
            KeyCode::Enter => self.searching = false,
            KeyCode::Backspace => self.state.pop_query_char(),
            KeyCode::Char(c) => self.state.push_query_char(c),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.modal = Modal::None,
            KeyCode::Enter => self.submit_modal(),
            KeyCode::Tab | KeyCode::Down => self.modal_focus_step(1),
            KeyCode::BackTab | KeyCode::Up => self.modal_focus_step(-1),
            KeyCode::Backspace => {
                if let Some(field) = self.modal_focused_field() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.modal_focused_field() {
                    field.push(c);
                }
            }
            _ => {}
        }
    }

    fn modal_focused_field(&mut self) -> Option<&mut String> {
        match &mut self.modal {
            Modal::AddAccount(form) => Some(match form.focus {
                0 => &mut form.email,
                1 => &mut form.password,
                2 => &mut form.server,
                _ => &mut form.port,
            }),
            Modal::AddKnowledge(form) => Some(match form.focus {
                0 => &mut form.content,
                _ => &mut form.metadata,
            }),
            Modal::None => None,
        }
    }

    fn modal_focus_step(&mut self, step: isize) {
        let (focus, len) = match &mut self.modal {
            Modal::AddAccount(form) => (&mut form.focus, 4),
            Modal::AddKnowledge(form) => (&mut form.focus, 2),
            Modal::None => return,
        };
        *focus = (*focus as isize + step).rem_euclid(len) as usize;
    }

    // ========================================================================
    // Login / logout
    // ========================================================================

    fn submit_login(&mut self) {
        if let Err(e) = validate_login(&self.login.email, &self.login.password) {
            // Rejected locally: visible error, no network call.
            self.login.error = Some(e.to_string());
            return;
        }

        let session = Session::new(self.login.email.clone());
        if let Err(e) = self.session_store.save(&session) {
            warn!(error = %e, "Failed to persist session");
        }
        info!(email = %session.email, "Logged in");
        self.session = Some(session);
        self.screen = Screen::Dashboard;
        self.login = LoginForm::default();
        self.enter_dashboard();
        if let Some(session) = &self.session {
            self.state.notify(format!("Welcome, {}!", session.email));
        }
    }

    /// Start the dashboard lifecycle: refresh timer plus initial data load.
    fn enter_dashboard(&mut self) {
        self.timer = Some(RefreshTimer::default_cadence());
        self.refresh_emails();
        self.refresh_accounts();
        self.refresh_stats();
    }

    fn logout(&mut self) {
        if let Err(e) = self.session_store.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        info!("Logged out");
        self.session = None;
        self.state = DashboardState::new();
        self.timer = None;
        self.deferred = None;
        self.searching = false;
        self.modal = Modal::None;
        self.login = LoginForm::default();
        self.screen = Screen::Login;
    }

    // ========================================================================
    // Data fetching
    // ========================================================================

    fn refresh_emails(&mut self) {
        match self.client.list_emails(defaults::EMAIL_FETCH_LIMIT) {
            Ok(emails) => self.state.set_emails(emails),
            Err(e) => self.state.notify_error(format!("Error fetching emails: {}", request_detail(&e))),
        }
    }

    fn refresh_accounts(&mut self) {
        match self.client.accounts() {
            Ok(list) => self.state.set_accounts(list.accounts),
            Err(e) => self.state.notify_error(format!("Error fetching accounts: {}", request_detail(&e))),
        }
    }

    fn refresh_stats(&mut self) {
        match self.client.stats() {
            Ok(stats) => self.state.set_stats(stats),
            Err(e) => self.state.notify_error(format!("Error fetching stats: {}", request_detail(&e))),
        }
    }

    fn manual_refresh(&mut self) {
        self.refresh_emails();
        self.refresh_stats();
        if let Some(timer) = &mut self.timer {
            timer.reset();
        }
        self.state.notify("Refreshed");
    }

    fn generate_reply(&mut self) {
        let Some(email_id) = self.state.selected_email().map(|e| e.id.clone()) else {
            self.state.notify_error("Select an email first");
            return;
        };
        self.state.loading_reply = true;
        match self.client.suggest_reply(&email_id) {
            Ok(suggestion) => {
                self.state.suggested_reply = Some(suggestion.suggested_reply);
                self.state.notify("Reply suggestion generated!");
            }
            Err(e) => {
                self.state
                    .notify_error(format!("Failed to generate reply: {}", request_detail(&e)));
            }
        }
        self.state.loading_reply = false;
    }

    // ========================================================================
    // Modal submission
    // ========================================================================

    fn submit_modal(&mut self) {
        match &self.modal {
            Modal::AddAccount(_) => self.submit_account(),
            Modal::AddKnowledge(_) => self.submit_knowledge(),
            Modal::None => {}
        }
    }

    fn submit_account(&mut self) {
        let Modal::AddAccount(form) = &self.modal else {
            return;
        };
        if form.email.is_empty() || form.password.is_empty() {
            self.state.notify_error("Email and app password are required");
            return;
        }
        let request = AddAccountRequest {
            email: form.email.clone(),
            password: form.password.clone(),
            server: form.server.clone(),
            port: form.port.parse().unwrap_or(defaults::IMAP_PORT),
        };

        match self.client.add_account(&request) {
            Ok(_) => {
                self.state
                    .notify("Account added successfully! Syncing emails...");
                self.modal = Modal::None;
                self.refresh_accounts();
                // First sync takes a few seconds; fetch again once it had a chance.
                self.deferred = Some(DeferredRefresh::after(Duration::from_secs(
                    defaults::POST_ACCOUNT_REFRESH_SECS,
                )));
            }
            Err(e) => {
                self.state
                    .notify_error(format!("Failed to add account: {}", request_detail(&e)));
            }
        }
    }

    fn submit_knowledge(&mut self) {
        let Modal::AddKnowledge(form) = &self.modal else {
            return;
        };
        if form.content.is_empty() {
            self.state.notify_error("Knowledge content is required");
            return;
        }
        // Unparsable metadata degrades to an empty object instead of
        // failing the submit.
        let metadata = serde_json::from_str(&form.metadata).unwrap_or_else(|_| json!({}));
        let content = form.content.clone();

        match self.client.add_knowledge(&content, metadata) {
            Ok(_) => {
                self.state.notify("Knowledge added to vector database!");
                self.modal = Modal::None;
            }
            Err(e) => {
                self.state
                    .notify_error(format!("Failed to add knowledge: {}", request_detail(&e)));
            }
        }
    }

    // ========================================================================
    // Scheduled work
    // ========================================================================

    /// Run between frames: scheduled refreshes only.
    fn tick(&mut self) {
        if self.screen != Screen::Dashboard {
            return;
        }
        if let Some(timer) = &mut self.timer {
            if timer.tick() {
                self.refresh_emails();
            }
        }
        if self.deferred.as_ref().is_some_and(|d| d.due()) {
            self.deferred = None;
            self.refresh_emails();
        }
    }
}

/// Status-line copy for an error: the proxy's `detail` where present,
/// otherwise the full error.
fn request_detail(error: &Error) -> String {
    match error {
        Error::Request(detail) => detail.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Client against a port nothing listens on: every call errors fast.
    fn offline_app() -> (tempfile::TempDir, App) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_path(dir.path().join("session.json"));
        let app = App::new(ApiClient::with_config(base_url), store);
        (dir, app)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_rejected_login_shows_error_and_stays_on_login() {
        let (_dir, mut app) = offline_app();
        app.login.email = "not-an-email".to_string();
        app.login.password = "pw".to_string();
        app.submit_login();

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(
            app.login.error.as_deref(),
            Some("Please enter a valid email address")
        );
        assert!(app.session.is_none());
        assert!(app.session_store.load().is_none());
    }

    #[test]
    fn test_successful_login_mints_session_and_enters_dashboard() {
        let (_dir, mut app) = offline_app();
        app.login.email = "you@example.com".to_string();
        app.login.password = "pw".to_string();
        app.submit_login();

        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.timer.is_some());
        assert_eq!(
            app.session_store.load().map(|s| s.email),
            Some("you@example.com".to_string())
        );
    }

    #[test]
    fn test_logout_clears_session_and_timer() {
        let (_dir, mut app) = offline_app();
        app.login.email = "you@example.com".to_string();
        app.login.password = "pw".to_string();
        app.submit_login();

        app.logout();
        assert_eq!(app.screen, Screen::Login);
        assert!(app.timer.is_none());
        assert!(app.session.is_none());
        assert!(app.session_store.load().is_none());
    }

    #[test]
    fn test_stored_session_skips_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_path(dir.path().join("session.json"));
        store.save(&Session::new("back@example.com")).unwrap();

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let app = App::new(ApiClient::with_config(base_url), store);
        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.session.as_ref().map(|s| s.email.as_str()), Some("back@example.com"));
    }

    #[test]
    fn test_search_keys_edit_the_query() {
        let (_dir, mut app) = offline_app();
        app.screen = Screen::Dashboard;
        app.searching = true;

        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(app.state.filter.query, "hi");

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.state.filter.query, "h");

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.searching);
        assert!(app.state.filter.query.is_empty());
    }

    #[test]
    fn test_modal_focus_wraps_both_ways() {
        let (_dir, mut app) = offline_app();
        app.modal = Modal::AddAccount(AccountForm::new());

        app.modal_focus_step(-1);
        match &app.modal {
            Modal::AddAccount(form) => assert_eq!(form.focus, 3),
            _ => unreachable!(),
        }
        app.modal_focus_step(1);
        match &app.modal {
            Modal::AddAccount(form) => assert_eq!(form.focus, 0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_offline_fetch_surfaces_status_line_error() {
        let (_dir, mut app) = offline_app();
        app.refresh_emails();
        let status = app.state.status.clone().expect("status line set");
        assert!(status.error);
        assert!(status.text.starts_with("Error fetching emails"));
    }
}
