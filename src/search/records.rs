//! Article records returned by the literature lookup.

use serde::{Deserialize, Serialize, Serializer};

pub const NO_TITLE: &str = "No title";
pub const NO_ABSTRACT: &str = "No abstract available";
pub const NO_AUTHORS: &str = "No authors listed";
pub const NO_DATE: &str = "No date";

const PUBMED_ARTICLE_BASE: &str = "https://pubmed.ncbi.nlm.nih.gov";

/// One PubMed article with every field populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub publication_date: String,
    pub article_url: String,
}

impl ArticleRecord {
    /// The fixed record substituted when no real article could be retrieved.
    pub fn simulated() -> Self {
        Self {
            title: "Simulated Study on Fever".to_string(),
            abstract_text: "This is a simulated abstract on the treatment of fever in adults."
                .to_string(),
            authors: vec!["John Doe".to_string(), "Jane Smith".to_string()],
            publication_date: "March 2024".to_string(),
            article_url: article_url("12345678"),
        }
    }
}

pub fn article_url(pmid: &str) -> String {
    format!("{}/{}/", PUBMED_ARTICLE_BASE, pmid)
}

/// Error payload returned instead of articles when fallback is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub message: String,
}

impl DiagnosticRecord {
    pub fn from_error(error: &impl std::fmt::Display) -> Self {
        Self {
            message: format!("Error: {}", error),
        }
    }
}

/// Result of a lookup. Never an error: failures either become the simulated
/// record or an `Unavailable` diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Articles(Vec<ArticleRecord>),
    Unavailable(DiagnosticRecord),
}

impl LookupOutcome {
    pub fn articles(&self) -> Option<&[ArticleRecord]> {
        match self {
            LookupOutcome::Articles(articles) => Some(articles),
            LookupOutcome::Unavailable(_) => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, LookupOutcome::Unavailable(_))
    }

    pub fn len(&self) -> usize {
        match self {
            LookupOutcome::Articles(articles) => articles.len(),
            LookupOutcome::Unavailable(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Both variants serialize as a JSON array so HTTP callers keep receiving a list.
impl Serialize for LookupOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LookupOutcome::Articles(articles) => articles.serialize(serializer),
            LookupOutcome::Unavailable(diagnostic) => {
                std::slice::from_ref(diagnostic).serialize(serializer)
            }
        }
    }
}
