//! GitHub GraphQL access: transport, the history query and cursor pagination.

pub mod paginate;
pub mod query;
pub mod transport;

pub use paginate::{fetch_commit_records, fetch_commit_records_with_progress, HistoryPages, PaginationOptions};
pub use query::{extract_history, history_variables, HistoryPage, HISTORY_QUERY};
pub use transport::{GraphQlError, GraphQlResponse, HttpTransport, Transport, GITHUB_GRAPHQL_URL};
