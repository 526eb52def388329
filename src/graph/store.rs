//! Graph store backed by the Neo4j HTTP Query API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::GraphConfig;
use crate::types::{AppError, AppResult};

/// One result row: column name → value
pub type GraphRow = Map<String, Value>;

#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn run(&self, statement: &str) -> AppResult<Vec<GraphRow>>;
}

pub struct Neo4jStore {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    errors: Vec<QueryError>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    code: String,
    message: String,
}

impl Neo4jStore {
    pub fn new(config: &GraphConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/db/{}/query/v2",
                config.http_base.trim_end_matches('/'),
                config.database
            ),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn run(&self, statement: &str) -> AppResult<Vec<GraphRow>> {
        debug!(statement = %statement, "Running Cypher statement");

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
            .json(&serde_json::json!({ "statement": statement }))
            .send()
            .await
            .map_err(|e| AppError::Graph(format!("Neo4j request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Graph(format!("Failed to read Neo4j response: {}", e)))?;

        let parsed: QueryResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(AppError::Graph(format!("Neo4j error ({}): {}", status, body)))
            }
            Err(e) => {
                return Err(AppError::Graph(format!("Failed to parse Neo4j response: {}", e)))
            }
        };

        if !parsed.errors.is_empty() {
            let messages: Vec<String> = parsed
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect();
            return Err(AppError::Graph(messages.join("; ")));
        }
        if !status.is_success() {
            return Err(AppError::Graph(format!("Neo4j error ({}): {}", status, body)));
        }

        Ok(parsed.data.map(rows_from).unwrap_or_default())
    }
}

fn rows_from(data: QueryData) -> Vec<GraphRow> {
    data.values
        .into_iter()
        .map(|values| data.fields.iter().cloned().zip(values).collect())
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config(base: String) -> GraphConfig {
        GraphConfig {
            http_base: base,
            username: "neo4j".to_string(),
            password: "secret".to_string(),
            database: "neo4j".to_string(),
        }
    }

    #[tokio::test]
    async fn test_rows_are_keyed_by_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/db/neo4j/query/v2")
            // neo4j:secret
            .match_header("authorization", "Basic bmVvNGo6c2VjcmV0")
            .match_body(Matcher::Json(serde_json::json!({
                "statement": "MATCH (h:Hotel) RETURN h.name AS name"
            })))
            .with_status(202)
            .with_body(
                r#"{"data":{"fields":["name"],"values":[["Creek Hotel"],["Deira Hotel"]]},"bookmarks":["b1"]}"#,
            )
            .create_async()
            .await;

        let store = Neo4jStore::new(&config(server.url())).unwrap();
        let rows = store.run("MATCH (h:Hotel) RETURN h.name AS name").await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Creek Hotel");
        assert_eq!(rows[1]["name"], "Deira Hotel");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_statement_errors_are_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/db/neo4j/query/v2")
            .with_status(400)
            .with_body(
                r#"{"errors":[{"code":"Neo.ClientError.Statement.SyntaxError","message":"Invalid input 'CRATE'"}]}"#,
            )
            .create_async()
            .await;

        let store = Neo4jStore::new(&config(server.url())).unwrap();
        let err = store.run("CRATE (n)").await.unwrap_err();
        assert!(err.to_string().contains("Neo.ClientError.Statement.SyntaxError"));
    }

    #[tokio::test]
    async fn test_non_json_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/db/neo4j/query/v2")
            .with_status(401)
            .with_body("Unauthorized")
            .create_async()
            .await;

        let store = Neo4jStore::new(&config(server.url())).unwrap();
        let err = store.run("MATCH (n) RETURN n").await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_write_without_data_yields_no_rows() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/db/neo4j/query/v2")
            .with_status(202)
            .with_body(r#"{"data":{"fields":[],"values":[]},"counters":{"nodesCreated":2}}"#)
            .create_async()
            .await;

        let store = Neo4jStore::new(&config(server.url())).unwrap();
        assert!(store.run("CREATE (a), (b)").await.unwrap().is_empty());
    }
}
