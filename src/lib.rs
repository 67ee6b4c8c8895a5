pub mod aggregate;
pub mod authors;
pub mod cache;
pub mod changes;
pub mod cli;
pub mod commits;
pub mod error;
pub mod fetch;
pub mod github;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod output;
pub mod period;
pub mod pipeline;
pub mod report;

pub use error::{GhstatsError, Result};
pub use pipeline::{fetch_commits, Report};
