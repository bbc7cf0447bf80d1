//! Static knowledge base — keyword lookup before any upstream call.
//!
//! Entries live in a slice so iteration order is fixed at build time;
//! the first entry whose keyword appears in the query wins. Matching is
//! case-insensitive substring, no scoring, no ranking.

use interdesk_core::KnowledgeEntry;

const ENTRIES: &[KnowledgeEntry] = &[
    KnowledgeEntry {
        topic: "password reset",
        keywords: &["password", "reset", "forgot password", "change password"],
        response: "To reset your password:\n1. Go to Settings > Security\n2. Click 'Reset Password'\n3. Check your email for the reset link\n4. Follow the instructions in the email",
    },
    KnowledgeEntry {
        topic: "otp issues",
        keywords: &["otp", "verification code", "2fa", "two factor"],
        response: "If you're not receiving OTP:\n1. Check your spam/junk folder\n2. Wait 2-3 minutes for delivery\n3. Ensure your phone number is correct\n\nStill not working? I can create a support ticket for you.",
    },
    KnowledgeEntry {
        topic: "billing",
        keywords: &["billing", "invoice", "payment", "charge"],
        response: "For billing inquiries, please contact our billing team at billing@intercloud.com or call 1-800-BILLING",
    },
];

/// The static topic table consulted before delegating to the model.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase;

impl KnowledgeBase {
    pub fn new() -> Self {
        Self
    }

    /// Find the canned response for a query, if any keyword matches.
    /// Side-effect-free; returns the response of the first matching entry.
    pub fn lookup(&self, query: &str) -> Option<&'static str> {
        let query = query.to_lowercase();
        for entry in ENTRIES {
            for keyword in entry.keywords {
                if query.contains(keyword) {
                    return Some(entry.response);
                }
            }
        }
        None
    }

    /// All entries, in match-priority order.
    pub fn entries(&self) -> &'static [KnowledgeEntry] {
        ENTRIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_reset_query_matches() {
        let kb = KnowledgeBase::new();
        let response = kb.lookup("How do I reset my password?").unwrap();
        assert!(response.contains("Settings > Security"));
    }

    #[test]
    fn unrelated_query_misses() {
        let kb = KnowledgeBase::new();
        assert!(kb.lookup("random unrelated text").is_none());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let kb = KnowledgeBase::new();
        assert!(kb.lookup("PROBLEM WITH MY INVOICE").is_some());
    }

    #[test]
    fn billing_response_carries_contact_address() {
        let kb = KnowledgeBase::new();
        let response = kb.lookup("I need help with billing").unwrap();
        assert!(response.contains("billing@intercloud.com"));
    }

    #[test]
    fn first_entry_wins_on_overlap() {
        let kb = KnowledgeBase::new();
        // "password" (entry 0) and "otp" (entry 1) both match; slice order decides.
        let response = kb.lookup("otp and password trouble").unwrap();
        assert!(response.contains("Reset Password"));
    }
}
