use std::env;
use std::str::FromStr;

use crate::types::LLMProvider;

pub const DEFAULT_ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
pub const DEFAULT_EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const GRAPH_VARS: &[&str] = &["NEO4J_URI", "NEO4J_USERNAME", "NEO4J_PASSWORD"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },

    #[error("Unsupported LLM provider: {0}")]
    UnknownProvider(String),

    #[error("NEO4J_URI must include a scheme (bolt, neo4j, http, https), got {0:?}")]
    InvalidGraphUri(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub literature: LiteratureConfig,
    pub graph: Option<GraphConfig>,
    missing_graph_vars: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub rate_limit_per_second: u32,
}

#[derive(Debug, Clone)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub api_key: Option<String>,
    pub api_base: String,
    /// Model used by the triage helper
    pub model: String,
    /// Model used by the graph chatbot (`GPT_ENGINE`)
    pub graph_model: String,
}

/// Settings for the PubMed lookup service, passed to it at construction.
#[derive(Debug, Clone)]
pub struct LiteratureConfig {
    /// Optional NCBI E-utilities key, sent as `api_key` on both requests
    pub api_key: Option<String>,
    pub search_endpoint: String,
    pub fetch_endpoint: String,
    pub timeout_seconds: u64,
    pub max_results_default: usize,
    pub fallback_enabled: bool,
}

impl Default for LiteratureConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            search_endpoint: DEFAULT_ESEARCH_URL.to_string(),
            fetch_endpoint: DEFAULT_EFETCH_URL.to_string(),
            timeout_seconds: 10,
            max_results_default: 3,
            fallback_enabled: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// HTTP(S) base of the Neo4j server, derived from `NEO4J_URI`
    pub http_base: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let provider_id = get("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string());
        let provider = LLMProvider::from_id(&provider_id)
            .ok_or_else(|| ConfigError::UnknownProvider(provider_id.clone()))?;
        let model = get("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let missing_graph_vars = missing_vars(GRAPH_VARS, &lookup);
        let graph = if missing_graph_vars.is_empty() {
            Some(GraphConfig {
                http_base: neo4j_http_base(&get("NEO4J_URI").unwrap_or_default())?,
                username: get("NEO4J_USERNAME").unwrap_or_default(),
                password: get("NEO4J_PASSWORD").unwrap_or_default(),
                database: get("NEO4J_DATABASE").unwrap_or_else(|| "neo4j".to_string()),
            })
        } else {
            None
        };

        Ok(Self {
            server: ServerConfig {
                port: parse_var(&get, "PORT", 3000)?,
                host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                cors_allowed_origins: get("ALLOWED_ORIGINS")
                    .unwrap_or_else(|| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                rate_limit_per_second: parse_var(&get, "RATE_LIMIT_PER_SECOND", 10)?,
            },
            llm: LLMConfig {
                api_base: get("LLM_API_BASE")
                    .unwrap_or_else(|| provider.default_api_base().to_string()),
                provider,
                api_key: get("OPENAI_API_KEY"),
                graph_model: get("GPT_ENGINE").unwrap_or_else(|| model.clone()),
                model,
            },
            literature: LiteratureConfig {
                api_key: get("NCBI_API_KEY"),
                search_endpoint: get("PUBMED_SEARCH_URL")
                    .unwrap_or_else(|| DEFAULT_ESEARCH_URL.to_string()),
                fetch_endpoint: get("PUBMED_FETCH_URL")
                    .unwrap_or_else(|| DEFAULT_EFETCH_URL.to_string()),
                timeout_seconds: parse_var(&get, "PUBMED_TIMEOUT_SECS", 10)?,
                max_results_default: parse_var(&get, "PUBMED_MAX_RESULTS", 3)?,
                fallback_enabled: parse_var(&get, "PUBMED_FALLBACK", true)?,
            },
            graph,
            missing_graph_vars,
        })
    }

    /// The LLM key, required by every pipeline that talks to a model.
    pub fn require_llm_key(&self) -> Result<&str, ConfigError> {
        self.llm
            .api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVars(vec!["OPENAI_API_KEY".to_string()]))
    }

    pub fn require_graph(&self) -> Result<&GraphConfig, ConfigError> {
        self.graph
            .as_ref()
            .ok_or_else(|| ConfigError::MissingVars(self.missing_graph_vars.clone()))
    }
}

/// Names from `names` that are unset or blank, in the given order.
pub fn missing_vars<F>(names: &[&str], lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter(|name| lookup(name).map_or(true, |v| v.trim().is_empty()))
        .map(|name| name.to_string())
        .collect()
}

fn parse_var<T, F>(get: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: name.to_string(),
            value,
        }),
    }
}

/// Map a Bolt/Neo4j connection URI onto the HTTP endpoint of the same server.
pub fn neo4j_http_base(uri: &str) -> Result<String, ConfigError> {
    let uri = uri.trim();
    let (scheme, rest) = uri
        .split_once("://")
        .ok_or_else(|| ConfigError::InvalidGraphUri(uri.to_string()))?;

    let http_scheme = match scheme.to_ascii_lowercase().as_str() {
        "neo4j+s" | "neo4j+ssc" | "bolt+s" | "bolt+ssc" | "https" => "https",
        "neo4j" | "bolt" | "http" => "http",
        _ => return Err(ConfigError::InvalidGraphUri(uri.to_string())),
    };

    let authority = rest.split('/').next().unwrap_or_default();
    if authority.is_empty() {
        return Err(ConfigError::InvalidGraphUri(uri.to_string()));
    }
    let authority = match authority.strip_suffix(":7687") {
        Some(host) => format!("{host}:7474"),
        None => authority.to_string(),
    };

    Ok(format!("{http_scheme}://{authority}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_allowed_origins, vec!["*"]);
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.llm.api_base, "https://api.openai.com/v1");
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.graph_model, DEFAULT_MODEL);
        assert_eq!(config.literature.search_endpoint, DEFAULT_ESEARCH_URL);
        assert_eq!(config.literature.timeout_seconds, 10);
        assert_eq!(config.literature.max_results_default, 3);
        assert!(config.literature.fallback_enabled);
        assert!(config.graph.is_none());
    }

    #[test]
    fn test_missing_llm_key_is_named() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        let err = config.require_llm_key().unwrap_err();
        assert_eq!(err.to_string(), "Missing environment variables: OPENAI_API_KEY");
    }

    #[test]
    fn test_missing_graph_vars_are_listed() {
        let config =
            Config::from_lookup(lookup_from(&[("NEO4J_URI", "neo4j://localhost:7687")])).unwrap();
        let err = config.require_graph().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variables: NEO4J_USERNAME, NEO4J_PASSWORD"
        );
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let missing = missing_vars(
            &["GPT_ENGINE", "NEO4J_URI"],
            lookup_from(&[("GPT_ENGINE", "  "), ("NEO4J_URI", "bolt://db")]),
        );
        assert_eq!(missing, vec!["GPT_ENGINE"]);
    }

    #[test]
    fn test_graph_config_from_vars() {
        let config = Config::from_lookup(lookup_from(&[
            ("NEO4J_URI", "neo4j+s://abc.databases.neo4j.io"),
            ("NEO4J_USERNAME", "neo4j"),
            ("NEO4J_PASSWORD", "secret"),
            ("GPT_ENGINE", "gpt-4o"),
        ]))
        .unwrap();
        let graph = config.require_graph().unwrap();
        assert_eq!(graph.http_base, "https://abc.databases.neo4j.io");
        assert_eq!(graph.database, "neo4j");
        assert_eq!(config.llm.graph_model, "gpt-4o");
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PUBMED_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "PUBMED_TIMEOUT_SECS".to_string(),
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_provider() {
        let err = Config::from_lookup(lookup_from(&[("LLM_PROVIDER", "acme")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownProvider("acme".to_string()));
    }

    #[test]
    fn test_groq_provider_base() {
        let config = Config::from_lookup(lookup_from(&[("LLM_PROVIDER", "groq")])).unwrap();
        assert_eq!(config.llm.api_base, "https://api.groq.com/openai/v1");
    }

    #[test]
    fn test_neo4j_http_base() {
        assert_eq!(
            neo4j_http_base("bolt://localhost:7687").unwrap(),
            "http://localhost:7474"
        );
        assert_eq!(
            neo4j_http_base("neo4j+ssc://graph.internal/extra").unwrap(),
            "https://graph.internal"
        );
        assert_eq!(
            neo4j_http_base("http://localhost:7474").unwrap(),
            "http://localhost:7474"
        );
        assert!(neo4j_http_base("localhost:7687").is_err());
        assert!(neo4j_http_base("ftp://localhost").is_err());
        assert!(neo4j_http_base("bolt://").is_err());
    }
}
