use anyhow::anyhow;
use reqwest::StatusCode;
use thiserror::Error;

/// Failures raised by this crate before or after talking to a collaborator.
///
/// Errors coming out of the catalog or the transport are never wrapped in this
/// type; they reach the caller exactly as the collaborator produced them.
#[derive(Debug, Error, PartialEq)]
pub enum FaultError {
    /// A two-solution product was cancelled without saying which model.
    #[error("Number (model number) to delete must be specified.")]
    MissingModelNumber,

    /// The event exists but carries no finite-fault product.
    #[error("Event {0:?} has no finite-fault product.")]
    NoFiniteFault(String),

    /// A two-model fetch did not find both `_1` and `_2` solutions.
    #[error("Two models were not found for this finite fault product {0:?}")]
    ModelsNotFound(String),

    /// A millisecond timestamp that cannot be represented as a date.
    #[error("Timestamp {0} ms is out of range")]
    InvalidTimestamp(f64),
}

/// Longest body excerpt quoted back in an HTTP error message.
const BODY_EXCERPT: usize = 400;

pub(crate) fn format_comcat_error(status: StatusCode, url: &str, body: &str) -> anyhow::Error {
    let excerpt = body_excerpt(body);

    if status == StatusCode::NOT_FOUND {
        return anyhow!(
            "ComCat has no event for this id (HTTP 404).\n- Check the event source and code (e.g. `us` + `1000abcd`)\n- Check the configured ComCat host\n\nServer message: {}\nrequest: {}",
            excerpt,
            url
        );
    }

    // ComCat answers 409 for events that were deleted or merged away.
    if status == StatusCode::CONFLICT {
        return anyhow!(
            "ComCat reports this event as deleted (HTTP 409).\n\nServer message: {}\nrequest: {}",
            excerpt,
            url
        );
    }

    if status == StatusCode::BAD_REQUEST {
        return anyhow!(
            "ComCat rejected the query (HTTP 400).\n\nServer message: {}\nrequest: {}",
            excerpt,
            url
        );
    }

    anyhow!(
        "ComCat request failed: HTTP {} for url ({})\n{}",
        status.as_u16(),
        url,
        excerpt
    )
}

fn body_excerpt(body: &str) -> String {
    let text = body.trim();
    if text.is_empty() {
        return "(empty)".to_string();
    }
    if text.len() <= BODY_EXCERPT {
        return text.to_string();
    }
    let mut end = BODY_EXCERPT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
