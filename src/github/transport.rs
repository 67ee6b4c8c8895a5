use crate::error::{GhstatsError, Result};
use log::trace;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = concat!("ghstats/", env!("CARGO_PKG_VERSION"));

/// Decoded GraphQL body: a `data` payload, an `errors` payload, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl GraphQlResponse {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flatten()
            .map(|e| match &e.kind {
                Some(kind) => format!("{kind}: {}", e.message),
                None => e.message.clone(),
            })
            .collect()
    }
}

/// One request/response cycle against a GraphQL endpoint.
pub trait Transport {
    fn execute(&self, credential: &str, query: &str, variables: Option<&Value>) -> Result<GraphQlResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, credential: &str, query: &str, variables: Option<&Value>) -> Result<GraphQlResponse> {
        (**self).execute(credential, query, variables)
    }
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, credential: &str, query: &str, variables: Option<&Value>) -> Result<GraphQlResponse> {
        trace!("POST {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(&json!({
                "query": query,
                "variables": variables,
            }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GhstatsError::Transport {
                status: status.as_u16(),
                query: query.to_string(),
            });
        }

        Ok(response.json::<GraphQlResponse>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn run_blocking(uri: String, query: &'static str, variables: Option<Value>) -> Result<GraphQlResponse> {
        let transport = HttpTransport::new(format!("{uri}/graphql"), Duration::from_secs(5))?;
        transport.execute("secret-token", query, variables.as_ref())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn posts_query_with_bearer_credential() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer secret-token"))
            .and(body_partial_json(json!({ "variables": { "owner": "octo" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "ok": true } })))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let response = tokio::task::spawn_blocking(move || {
            run_blocking(uri, "query { ok }", Some(json!({ "owner": "octo" })))
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(response.data, Some(json!({ "ok": true })));
        assert_eq!(response.errors, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn non_success_status_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let err = tokio::task::spawn_blocking(move || run_blocking(uri, "query { missing }", None))
            .await
            .unwrap()
            .unwrap_err();

        match err {
            GhstatsError::Transport { status, query } => {
                assert_eq!(status, 404);
                assert_eq!(query, "query { missing }");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn errors_payload_is_decoded() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "repository": null },
                "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve to a Repository" }]
            })))
            .mount(&server)
            .await;

        let uri = server.uri();
        let response = tokio::task::spawn_blocking(move || run_blocking(uri, "query { repository }", None))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            response.error_messages(),
            vec!["NOT_FOUND: Could not resolve to a Repository".to_string()]
        );
    }
}
