use super::transport::GraphQlResponse;
use crate::error::{GhstatsError, Result};
use crate::model::{CommitRecord, DateRange, PageInfo, RepoSlug};
use serde::Deserialize;
use serde_json::{json, Value};

pub const HISTORY_QUERY: &str = r#"
query ($owner: String!, $repo: String!, $cursor: String, $since: GitTimestamp!, $until: GitTimestamp!) {
  repository(owner: $owner, name: $repo) {
    defaultBranchRef {
      target {
        ... on Commit {
          history(first: 100, after: $cursor, since: $since, until: $until) {
            nodes {
              oid
              url
              messageHeadline
              committedDate
              additions
              deletions
              author {
                name
                email
              }
            }
            pageInfo {
              hasNextPage
              endCursor
            }
          }
        }
      }
    }
  }
}"#;

/// One page of `repository.defaultBranchRef.target.history`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub nodes: Vec<CommitRecord>,
    pub page_info: PageInfo,
}

#[derive(Deserialize)]
struct HistoryData {
    repository: Option<RepositoryNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    default_branch_ref: Option<BranchRef>,
}

#[derive(Deserialize)]
struct BranchRef {
    target: Option<TargetNode>,
}

#[derive(Deserialize)]
struct TargetNode {
    history: Option<HistoryPage>,
}

pub fn history_variables(repo: &RepoSlug, range: &DateRange, cursor: Option<&str>) -> Value {
    json!({
        "owner": repo.owner,
        "repo": repo.name,
        "since": range.since(),
        "until": range.until(),
        "cursor": cursor,
    })
}

pub fn extract_history(response: GraphQlResponse) -> Result<HistoryPage> {
    let messages = response.error_messages();
    let missing = |what: &str| {
        let mut msg = format!("{what} missing from response");
        if !messages.is_empty() {
            msg.push_str(&format!(" ({})", messages.join("; ")));
        }
        GhstatsError::Shape(msg)
    };

    let data = match response.data {
        Some(Value::Null) | None => return Err(missing("data")),
        Some(data) => data,
    };

    let data: HistoryData = serde_json::from_value(data)
        .map_err(|e| GhstatsError::shape(format!("malformed history response: {e}")))?;

    data.repository
        .ok_or_else(|| missing("repository"))?
        .default_branch_ref
        .ok_or_else(|| missing("repository.defaultBranchRef"))?
        .target
        .ok_or_else(|| missing("repository.defaultBranchRef.target"))?
        .history
        .ok_or_else(|| missing("repository.defaultBranchRef.target.history"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_date;
    use pretty_assertions::assert_eq;

    fn response(data: Value) -> GraphQlResponse {
        GraphQlResponse {
            data: Some(data),
            errors: None,
        }
    }

    #[test]
    fn variables_carry_cursor_and_midnight_bounds() {
        let range = DateRange::new(parse_date("2024-01-01").unwrap(), parse_date("2024-01-31").unwrap()).unwrap();
        let vars = history_variables(&RepoSlug::new("octo", "hello"), &range, None);
        assert_eq!(
            vars,
            json!({
                "owner": "octo",
                "repo": "hello",
                "since": "2024-01-01T00:00:00Z",
                "until": "2024-01-31T00:00:00Z",
                "cursor": null,
            })
        );
        let vars = history_variables(&RepoSlug::new("octo", "hello"), &range, Some("abc 99"));
        assert_eq!(vars["cursor"], "abc 99");
    }

    #[test]
    fn extracts_nodes_and_page_info() {
        let page = extract_history(response(json!({
            "repository": { "defaultBranchRef": { "target": { "history": {
                "nodes": [{
                    "oid": "1", "url": "u", "messageHeadline": "m",
                    "committedDate": "2024-01-02T00:00:00Z",
                    "additions": 1, "deletions": 2,
                    "author": { "name": "n", "email": "e" }
                }],
                "pageInfo": { "hasNextPage": true, "endCursor": "c1" }
            }}}}
        })))
        .unwrap();
        assert_eq!(page.nodes.len(), 1);
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("c1"));
        assert!(page.page_info.has_next_page);
    }

    #[test]
    fn null_default_branch_is_shape_error() {
        let err = extract_history(response(json!({
            "repository": { "defaultBranchRef": null }
        })))
        .unwrap_err();
        assert!(err.is_shape());
        assert!(err.to_string().contains("defaultBranchRef"));
    }

    #[test]
    fn missing_repository_includes_api_messages() {
        let err = extract_history(GraphQlResponse {
            data: Some(json!({ "repository": null })),
            errors: Some(vec![crate::github::GraphQlError {
                message: "Could not resolve to a Repository".into(),
                kind: Some("NOT_FOUND".into()),
            }]),
        })
        .unwrap_err();
        assert!(err.is_shape());
        assert!(err.to_string().contains("NOT_FOUND"));
    }

    #[test]
    fn malformed_node_is_shape_error() {
        let err = extract_history(response(json!({
            "repository": { "defaultBranchRef": { "target": { "history": {
                "nodes": [{ "oid": "1", "additions": -4 }],
                "pageInfo": { "hasNextPage": false, "endCursor": null }
            }}}}
        })))
        .unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn absent_data_is_shape_error() {
        assert!(extract_history(GraphQlResponse::default()).unwrap_err().is_shape());
    }
}
