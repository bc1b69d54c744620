//! Mock-mode payload catalog.
//!
//! When the aggregation backend is unreachable the proxy answers with these
//! fixed payloads instead of an error, so the dashboard keeps rendering
//! during local development. The shapes and values are part of the wire
//! contract and are asserted by the proxy's integration tests; change them
//! and the dashboard's empty states stop lining up.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{json, Value};

use reach_core::{
    Account, AccountList, Category, Email, KnowledgeList, MailboxStats, ReplySuggestion,
    ReplyVariants, StatusResponse,
};

/// The account every mock email belongs to.
const MOCK_ACCOUNT: &str = "user@gmail.com";

fn base_email(
    id: &str,
    sender: &str,
    subject: &str,
    body: &str,
    category: Category,
    read: bool,
) -> Email {
    let now = Utc::now().to_rfc3339();
    Email {
        id: id.to_string(),
        sender: sender.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        account: MOCK_ACCOUNT.to_string(),
        ai_category: Some(category.as_str().to_string()),
        folder: Some("INBOX".to_string()),
        read,
        recipient: None,
        date: Some(now.clone()),
        created_at: Some(now),
        timestamp: None,
        suggested_reply: None,
    }
}

/// The three fixed emails served when the email list cannot be fetched.
pub fn email_list() -> Vec<Email> {
    vec![
        base_email(
            "1",
            "john@example.com",
            "Interested in your product",
            "Hi, I'm very interested in learning more about your solution.",
            Category::Interested,
            false,
        ),
        base_email(
            "2",
            "jane@company.com",
            "Meeting scheduled for next week",
            "Great! Let's schedule a meeting next Tuesday at 2 PM.",
            Category::MeetingBooked,
            false,
        ),
        base_email(
            "3",
            "bob@other.com",
            "Not interested at this time",
            "Thanks for reaching out, but we're not interested right now.",
            Category::NotInterested,
            true,
        ),
    ]
}

/// The fixed single email, echoing whatever id was requested.
pub fn email(id: &str) -> Email {
    base_email(
        id,
        "john@example.com",
        "Interested in your product",
        "Hi, I'm very interested in learning more about your solution. \
         Can we schedule a call next week?",
        Category::Interested,
        false,
    )
}

/// The fixed reply variant set.
pub fn reply_variants() -> ReplyVariants {
    ReplyVariants {
        short: "Thank you for your email.".to_string(),
        medium: "Thank you for reaching out. I appreciate your interest and would love \
                 to discuss further."
            .to_string(),
        detailed: "Thank you for reaching out! I appreciate your interest and would love \
                   to discuss further. Please let me know if you have any questions, and \
                   I'll be glad to assist."
            .to_string(),
    }
}

/// The fixed suggestion for `POST /api/emails/:id/suggest-reply`.
pub fn reply_suggestion(email_id: &str) -> ReplySuggestion {
    let variants = reply_variants();
    ReplySuggestion {
        email_id: email_id.to_string(),
        suggested_reply: variants.detailed.clone(),
        variants,
    }
}

/// The fixed envelope for `POST /api/emails/generate-reply`.
pub fn generated_reply() -> Value {
    json!({
        "status": "success",
        "variants": reply_variants(),
    })
}

/// One fixed account, no active syncs.
pub fn account_list() -> AccountList {
    AccountList {
        accounts: vec![Account {
            email: MOCK_ACCOUNT.to_string(),
            server: Some("imap.gmail.com".to_string()),
            port: Some(993),
            added_at: Some(Utc::now().to_rfc3339()),
        }],
        active_syncs: vec![],
    }
}

/// Success envelope for an account add that never reached the backend.
pub fn account_added(email: &str) -> StatusResponse {
    StatusResponse {
        status: "success".to_string(),
        message: format!("Account {} added successfully (mock mode)", email),
        account: Some(email.to_string()),
        id: None,
    }
}

/// Stats matching [`email_list`]: three emails, one account.
pub fn stats() -> MailboxStats {
    let mut categories = std::collections::HashMap::new();
    categories.insert(Category::Interested.as_str().to_string(), 1);
    categories.insert(Category::MeetingBooked.as_str().to_string(), 1);
    categories.insert(Category::NotInterested.as_str().to_string(), 1);
    categories.insert(Category::Spam.as_str().to_string(), 0);
    categories.insert(Category::OutOfOffice.as_str().to_string(), 0);
    MailboxStats {
        total_emails: 3,
        categories,
        accounts_configured: 1,
        active_syncs: 0,
    }
}

/// Empty knowledge base.
pub fn knowledge_list() -> KnowledgeList {
    KnowledgeList {
        knowledge: vec![],
        count: 0,
    }
}

/// Success envelope for a knowledge add that never reached the backend.
pub fn knowledge_added() -> StatusResponse {
    StatusResponse {
        status: "success".to_string(),
        message: "Knowledge added to vector database (mock mode)".to_string(),
        account: None,
        id: Some(short_id()),
    }
}

/// Random 7-character lowercase alphanumeric id.
fn short_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_list_is_the_documented_fixture() {
        let emails = email_list();
        assert_eq!(emails.len(), 3);
        assert_eq!(
            emails.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "2", "3"]
        );
        assert_eq!(emails[0].category(), Some(Category::Interested));
        assert_eq!(emails[1].category(), Some(Category::MeetingBooked));
        assert_eq!(emails[2].category(), Some(Category::NotInterested));
        assert!(emails[2].read);
    }

    #[test]
    fn test_single_email_echoes_requested_id() {
        let e = email("abc-123");
        assert_eq!(e.id, "abc-123");
        assert_eq!(e.category(), Some(Category::Interested));
    }

    #[test]
    fn test_stats_agree_with_email_fixture() {
        let s = stats();
        assert_eq!(s.total_emails, 3);
        assert_eq!(s.categories.values().sum::<u64>(), 3);
        assert_eq!(s.count_for(Category::Spam), 0);
        assert_eq!(s.accounts_configured, 1);
    }

    #[test]
    fn test_account_added_mentions_mock_mode() {
        let resp = account_added("me@example.com");
        assert_eq!(resp.status, "success");
        assert!(resp.message.ends_with("(mock mode)"));
        assert_eq!(resp.account.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn test_knowledge_added_has_short_random_id() {
        let resp = knowledge_added();
        let id = resp.id.unwrap();
        assert_eq!(id.len(), 7);
        assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_suggestion_uses_detailed_variant() {
        let suggestion = reply_suggestion("9");
        assert_eq!(suggestion.email_id, "9");
        assert_eq!(suggestion.suggested_reply, suggestion.variants.detailed);
    }
}
