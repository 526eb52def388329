//! PubMed Client
//!
//! Looks up articles through the NCBI E-utilities in two sequential steps:
//!
//! 1. **ESearch**: free-text query → ordered list of PubMed IDs (JSON)
//! 2. **EFetch**: one batched request for those IDs → article metadata (XML)
//!
//! Any failure along the way (no IDs, timeout, HTTP error status, malformed
//! JSON or XML, nothing parseable) ends in the same fallback branch: either
//! the simulated record or a diagnostic, depending on the caller's flag.
//! [`PubMedClient::lookup`] therefore never fails.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::efetch;
use super::records::{ArticleRecord, DiagnosticRecord, LookupOutcome};
use crate::config::LiteratureConfig;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while retrieving articles
#[derive(Debug, Error)]
pub enum LiteratureError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed search response: {0}")]
    MalformedSearch(#[from] serde_json::Error),

    #[error("Malformed article XML: {0}")]
    MalformedXml(String),

    #[error("No IDs found for this query.")]
    NoIdentifiers,

    #[error("No articles could be parsed from the fetch response.")]
    NoArticles,
}

/// ESearch JSON envelope
#[derive(Debug, Deserialize)]
struct ESearchResponse {
    esearchresult: ESearchResult,
}

#[derive(Debug, Deserialize)]
struct ESearchResult {
    idlist: Vec<String>,
}

/// Literature lookup service backed by PubMed.
///
/// Holds only immutable configuration and a pooled HTTP client, so one
/// instance can be shared across concurrent requests.
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    config: LiteratureConfig,
}

impl PubMedClient {
    pub fn new(config: LiteratureConfig) -> Result<Self, LiteratureError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LiteratureConfig {
        &self.config
    }

    /// Lookup with the configured result bound and fallback flag
    pub async fn lookup_default(&self, query: &str) -> LookupOutcome {
        self.lookup(
            query,
            self.config.max_results_default,
            self.config.fallback_enabled,
        )
        .await
    }

    /// Search PubMed for `query` and return at most `max_results` articles.
    ///
    /// When nothing real can be returned, yields the simulated record if
    /// `fallback_enabled`, otherwise a single diagnostic carrying the error.
    pub async fn lookup(
        &self,
        query: &str,
        max_results: usize,
        fallback_enabled: bool,
    ) -> LookupOutcome {
        let max_results = if max_results == 0 {
            warn!("max_results of 0 requested, using 1");
            1
        } else {
            max_results
        };

        let error = match self.try_lookup(query, max_results).await {
            Ok(articles) if !articles.is_empty() => return LookupOutcome::Articles(articles),
            Ok(_) => LiteratureError::NoArticles,
            Err(e) => e,
        };

        warn!(query = %query, error = %error, fallback_enabled, "PubMed lookup failed");
        if fallback_enabled {
            info!("Returning simulated article");
            LookupOutcome::Articles(vec![ArticleRecord::simulated()])
        } else {
            LookupOutcome::Unavailable(DiagnosticRecord::from_error(&error))
        }
    }

    async fn try_lookup(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<ArticleRecord>, LiteratureError> {
        let mut ids = self.search_ids(query, max_results).await?;
        if ids.is_empty() {
            return Err(LiteratureError::NoIdentifiers);
        }
        ids.truncate(max_results);

        self.fetch_articles(&ids).await
    }

    /// ESearch step: the ordered PubMed IDs matching `query`.
    pub async fn search_ids(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<String>, LiteratureError> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmax", max_results.to_string()),
            ("retmode", "json".to_string()),
        ];
        self.push_api_key(&mut params);

        let body = self
            .client
            .get(&self.config.search_endpoint)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let parsed: ESearchResponse = serde_json::from_str(&body)?;
        info!(query = %query, ids = ?parsed.esearchresult.idlist, "Found PubMed IDs");
        Ok(parsed.esearchresult.idlist)
    }

    /// EFetch step: one record per returned article, paired positionally with `ids`.
    ///
    /// If the document holds fewer (or more) articles than IDs, only the
    /// overlapping prefix is kept.
    pub async fn fetch_articles(
        &self,
        ids: &[String],
    ) -> Result<Vec<ArticleRecord>, LiteratureError> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("id", ids.join(",")),
            ("retmode", "xml".to_string()),
        ];
        self.push_api_key(&mut params);

        let xml = self
            .client
            .get(&self.config.fetch_endpoint)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let blocks = efetch::parse_articles(&xml)?;
        info!(count = blocks.len(), requested = ids.len(), "Articles found in XML");

        let articles: Vec<ArticleRecord> = blocks
            .into_iter()
            .zip(ids)
            .map(|(block, pmid)| block.into_record(pmid))
            .collect();

        for article in &articles {
            debug!(
                title = %article.title,
                authors = ?article.authors,
                date = %article.publication_date,
                url = %article.article_url,
                "Parsed article"
            );
        }

        Ok(articles)
    }

    fn push_api_key(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(key) = &self.config.api_key {
            params.push(("api_key", key.clone()));
        }
    }
}
