//! Email list filtering.
//!
//! Category, account, and free-text search compose conjunctively. Text
//! matching is case-insensitive over subject, sender, and body; an empty
//! query leaves the result unfiltered. Account matching is exact, the way
//! the account picker produces it.

use reach_core::{Category, Email};

/// The active filter set of the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailFilter {
    pub category: Option<Category>,
    pub account: Option<String>,
    pub query: String,
}

impl EmailFilter {
    /// True when no criterion is active.
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.account.is_none() && self.query.is_empty()
    }

    /// Does one email survive every active criterion?
    pub fn matches(&self, email: &Email) -> bool {
        if let Some(category) = self.category {
            if email.category() != Some(category) {
                return false;
            }
        }

        if let Some(account) = &self.account {
            if &email.account != account {
                return false;
            }
        }

        if !self.query.is_empty() {
            let query = self.query.to_lowercase();
            let hit = email.subject.to_lowercase().contains(&query)
                || email.sender.to_lowercase().contains(&query)
                || email.body.to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }

        true
    }

    /// The filtered view, preserving order.
    pub fn apply(&self, emails: &[Email]) -> Vec<Email> {
        emails
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(id: &str, sender: &str, subject: &str, body: &str, account: &str, category: &str) -> Email {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "sender": sender,
            "subject": subject,
            "body": body,
            "account": account,
            "ai_category": category,
        }))
        .unwrap()
    }

    fn fixture() -> Vec<Email> {
        vec![
            email(
                "1",
                "john@example.com",
                "Interested in your product",
                "Tell me more about pricing.",
                "user@gmail.com",
                "Interested",
            ),
            email(
                "2",
                "jane@company.com",
                "Meeting scheduled",
                "Tuesday works for me.",
                "user@gmail.com",
                "Meeting Booked",
            ),
            email(
                "3",
                "bob@other.com",
                "Re: outreach",
                "Not right now, thanks.",
                "sales@corp.io",
                "Not Interested",
            ),
        ]
    }

    #[test]
    fn test_empty_filter_leaves_the_list_untouched() {
        let emails = fixture();
        let filter = EmailFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&emails).len(), 3);
    }

    #[test]
    fn test_category_filter_alone() {
        let filter = EmailFilter {
            category: Some(Category::MeetingBooked),
            ..Default::default()
        };
        let result = filter.apply(&fixture());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_account_filter_is_exact() {
        let filter = EmailFilter {
            account: Some("sales@corp.io".to_string()),
            ..Default::default()
        };
        let result = filter.apply(&fixture());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "3");
    }

    #[test]
    fn test_text_search_is_case_insensitive_across_fields() {
        let emails = fixture();

        // subject
        let filter = EmailFilter {
            query: "INTERESTED".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&emails).len(), 1);

        // sender
        let filter = EmailFilter {
            query: "Jane@Company".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&emails).len(), 1);

        // body
        let filter = EmailFilter {
            query: "pricing".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&emails).len(), 1);
    }

    #[test]
    fn test_filters_compose_conjunctively() {
        let filter = EmailFilter {
            category: Some(Category::Interested),
            account: Some("user@gmail.com".to_string()),
            query: "pricing".to_string(),
        };
        let result = filter.apply(&fixture());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");

        // Same category + query, wrong account: conjunction fails.
        let filter = EmailFilter {
            account: Some("sales@corp.io".to_string()),
            ..filter
        };
        assert!(filter.apply(&fixture()).is_empty());
    }

    #[test]
    fn test_category_filter_excludes_uncategorized_emails() {
        let mut emails = fixture();
        emails[0].ai_category = None;
        let filter = EmailFilter {
            category: Some(Category::Interested),
            ..Default::default()
        };
        assert!(filter.apply(&emails).is_empty());
    }

    #[test]
    fn test_no_match_yields_empty_not_error() {
        let filter = EmailFilter {
            query: "zzz-not-present".to_string(),
            ..Default::default()
        };
        assert!(filter.apply(&fixture()).is_empty());
    }
}
