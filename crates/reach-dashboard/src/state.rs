//! Dashboard application state.
//!
//! One owned state object per dashboard session; every mutation goes
//! through a method so the render layer stays a pure function of this
//! struct. Selection tracks the *filtered* view and survives refilters by
//! email id where possible.

use reach_core::{Account, Category, Email, MailboxStats};

use crate::filter::EmailFilter;

/// Transient status-line message (the toast analog).
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub error: bool,
}

/// Everything the dashboard renders.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub emails: Vec<Email>,
    pub filtered: Vec<Email>,
    pub accounts: Vec<Account>,
    pub stats: Option<MailboxStats>,
    pub filter: EmailFilter,
    pub selected: Option<usize>,
    pub suggested_reply: Option<String>,
    pub loading_reply: bool,
    pub status: Option<StatusLine>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Data updates
    // ========================================================================

    /// Replace the email set and reapply the active filter.
    pub fn set_emails(&mut self, emails: Vec<Email>) {
        self.emails = emails;
        self.refilter();
    }

    pub fn set_accounts(&mut self, accounts: Vec<Account>) {
        self.accounts = accounts;
    }

    pub fn set_stats(&mut self, stats: MailboxStats) {
        self.stats = Some(stats);
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    pub fn set_query(&mut self, query: String) {
        self.filter.query = query;
        self.refilter();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.filter.query.push(c);
        self.refilter();
    }

    pub fn pop_query_char(&mut self) {
        self.filter.query.pop();
        self.refilter();
    }

    /// Cycle the category filter: all → each category → all.
    pub fn cycle_category(&mut self) {
        self.filter.category = match self.filter.category {
            None => Some(Category::ALL[0]),
            Some(current) => Category::ALL
                .iter()
                .position(|c| *c == current)
                .and_then(|i| Category::ALL.get(i + 1))
                .copied(),
        };
        self.refilter();
    }

    /// Cycle the account filter through the configured accounts.
    pub fn cycle_account(&mut self) {
        let emails: Vec<&str> = self.accounts.iter().map(|a| a.email.as_str()).collect();
        self.filter.account = match self.filter.account.as_deref() {
            None => emails.first().map(|s| s.to_string()),
            Some(current) => emails
                .iter()
                .position(|e| *e == current)
                .and_then(|i| emails.get(i + 1))
                .map(|s| s.to_string()),
        };
        self.refilter();
    }

    /// Reapply the filter, keeping the selected email where possible.
    fn refilter(&mut self) {
        let selected_id = self.selected_email().map(|e| e.id.clone());
        self.filtered = self.filter.apply(&self.emails);
        self.selected = match &selected_id {
            Some(id) => self
                .filtered
                .iter()
                .position(|e| &e.id == id)
                .or(if self.filtered.is_empty() { None } else { Some(0) }),
            None if self.filtered.is_empty() => None,
            None => Some(0),
        };
        // A suggestion belongs to the email it was generated for.
        if self.selected_email().map(|e| e.id.clone()) != selected_id {
            self.suggested_reply = None;
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selected_email(&self) -> Option<&Email> {
        self.selected.and_then(|i| self.filtered.get(i))
    }

    pub fn select_next(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let next = match self.selected {
            Some(i) if i + 1 < self.filtered.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.select(next);
    }

    pub fn select_prev(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let prev = match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.select(prev);
    }

    /// Selecting a different email discards the previous reply suggestion.
    fn select(&mut self, index: usize) {
        if self.selected != Some(index) {
            self.suggested_reply = None;
        }
        self.selected = Some(index);
    }

    // ========================================================================
    // Status line
    // ========================================================================

    pub fn notify(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: false,
        });
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(id: &str, account: &str, category: &str) -> Email {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "sender": format!("{}@example.com", id),
            "subject": format!("subject {}", id),
            "body": "body",
            "account": account,
            "ai_category": category,
        }))
        .unwrap()
    }

    fn loaded_state() -> DashboardState {
        let mut state = DashboardState::new();
        state.set_emails(vec![
            email("1", "user@gmail.com", "Interested"),
            email("2", "user@gmail.com", "Meeting Booked"),
            email("3", "sales@corp.io", "Not Interested"),
        ]);
        state
    }

    #[test]
    fn test_set_emails_selects_the_first_one() {
        let state = loaded_state();
        assert_eq!(state.filtered.len(), 3);
        assert_eq!(state.selected_email().unwrap().id, "1");
    }

    #[test]
    fn test_selection_moves_and_clamps() {
        let mut state = loaded_state();
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_email().unwrap().id, "3");
        state.select_next(); // already last
        assert_eq!(state.selected_email().unwrap().id, "3");
        state.select_prev();
        state.select_prev();
        state.select_prev(); // already first
        assert_eq!(state.selected_email().unwrap().id, "1");
    }

    #[test]
    fn test_changing_selection_discards_reply_suggestion() {
        let mut state = loaded_state();
        state.suggested_reply = Some("Thanks!".to_string());
        state.select_next();
        assert!(state.suggested_reply.is_none());
    }

    #[test]
    fn test_refilter_keeps_selected_email_by_id() {
        let mut state = loaded_state();
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_email().unwrap().id, "3");

        state.cycle_category(); // → Interested, "3" drops out
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.selected_email().unwrap().id, "1");
    }

    #[test]
    fn test_category_cycle_wraps_back_to_all() {
        let mut state = loaded_state();
        for _ in 0..Category::ALL.len() {
            state.cycle_category();
            assert!(state.filter.category.is_some());
        }
        state.cycle_category();
        assert!(state.filter.category.is_none());
        assert_eq!(state.filtered.len(), 3);
    }

    #[test]
    fn test_account_cycle_walks_configured_accounts() {
        let mut state = loaded_state();
        state.set_accounts(vec![
            serde_json::from_value(serde_json::json!({"email": "user@gmail.com"})).unwrap(),
            serde_json::from_value(serde_json::json!({"email": "sales@corp.io"})).unwrap(),
        ]);

        state.cycle_account();
        assert_eq!(state.filter.account.as_deref(), Some("user@gmail.com"));
        assert_eq!(state.filtered.len(), 2);

        state.cycle_account();
        assert_eq!(state.filter.account.as_deref(), Some("sales@corp.io"));
        assert_eq!(state.filtered.len(), 1);

        state.cycle_account();
        assert!(state.filter.account.is_none());
        assert_eq!(state.filtered.len(), 3);
    }

    #[test]
    fn test_query_editing_refilters_incrementally() {
        let mut state = loaded_state();
        state.push_query_char('s');
        state.push_query_char('u');
        state.push_query_char('b');
        assert_eq!(state.filtered.len(), 3); // "subject" matches all

        state.set_query("subject 2".to_string());
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.selected_email().unwrap().id, "2");

        state.pop_query_char();
        assert_eq!(state.filter.query, "subject ");
        assert_eq!(state.filtered.len(), 3);
    }

    #[test]
    fn test_empty_filtered_view_clears_selection() {
        let mut state = loaded_state();
        state.set_query("no such text".to_string());
        assert!(state.filtered.is_empty());
        assert!(state.selected_email().is_none());
    }
}
