use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use anyhow::{Result, anyhow};

#[derive(Serialize)]
struct QueryRequest {
    query: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    answer: Value,
}

/// HTTP client for the remote query agent.
///
/// One endpoint, one exchange: `POST <base>/query` with `{"query": ...}`,
/// answered by `{"answer": ...}` where the answer may be any JSON value.
#[derive(Clone)]
pub struct QueryClient {
    client: Client,
    base_url: String,
}

impl QueryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn query(&self, query: &str) -> Result<Value> {
        let url = format!("{}/query", self.base_url);

        let request = QueryRequest {
            query: query.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "query request failed with status: {}",
                response.status()
            ));
        }

        let query_response: QueryResponse = response.json().await?;
        Ok(query_response.answer)
    }
}
