//! Vision analysis proxy — forwards a wheat photo to a hosted
//! vision-language model and relays its structured verdict.
//!
//! The model does all the inference; this layer validates the upload,
//! builds the chat request, maps gateway failures, and digs the JSON
//! verdict out of the model's free-form reply.

pub mod gateway;
pub mod parser;
pub mod prompt;
pub mod types;
pub mod validate;

pub use gateway::*;
pub use parser::parse_analysis;
pub use types::*;
pub use validate::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("AI gateway is not reachable at {0}")]
    Connection(String),

    #[error("AI gateway rate limit exceeded")]
    RateLimited,

    #[error("AI gateway quota exceeded")]
    QuotaExceeded,

    #[error("AI gateway returned error (status {status}): {body}")]
    Gateway { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("AI gateway response had no content")]
    NoContent,

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}
