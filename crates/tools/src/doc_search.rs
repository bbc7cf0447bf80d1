//! Documentation search — substring title match over a fixed index.
//!
//! No semantic search: the query is matched case-insensitively against
//! document titles and all hits come back in source order.

use interdesk_core::DocSearchResult;

struct Doc {
    title: &'static str,
    content: &'static str,
}

const DOCUMENTS: &[Doc] = &[
    Doc {
        title: "password reset",
        content: "To reset your password, go to the settings page...",
    },
    Doc {
        title: "Billing",
        content: "For billing inquiries, please contact support.",
    },
    Doc {
        title: "Account Deletion",
        content: "contact support to delete your account.",
    },
];

/// The fixed in-memory documentation index.
#[derive(Debug, Clone, Default)]
pub struct DocIndex;

impl DocIndex {
    pub fn new() -> Self {
        Self
    }

    /// Return every document whose title contains the query.
    pub fn search(&self, query: &str) -> Vec<DocSearchResult> {
        let query = query.to_lowercase();
        DOCUMENTS
            .iter()
            .filter(|doc| doc.title.to_lowercase().contains(&query))
            .map(|doc| DocSearchResult {
                title: doc.title.to_string(),
                content: doc.content.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_match_is_case_insensitive() {
        let index = DocIndex::new();
        let results = index.search("BILLING");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Billing");
    }

    #[test]
    fn no_match_returns_empty() {
        let index = DocIndex::new();
        assert!(index.search("kubernetes").is_empty());
    }

    #[test]
    fn hits_come_back_in_source_order() {
        let index = DocIndex::new();
        // Empty query matches every title.
        let results = index.search("");
        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["password reset", "Billing", "Account Deletion"]);
    }
}
