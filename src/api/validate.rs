//! Request shape validation for the timestamp API.
//!
//! Bodies arrive as loosely-typed JSON. Validation either produces a
//! well-typed request value or a [`Rejection`] carrying the exact status and
//! body text the caller sees.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

/// A shared list id paired with its last activity timestamp (ms since
/// epoch). Serializes to the wire form `[listId, timestamp]`.
pub type SharedListTimestamp = (String, u64);

/// Body field carrying the timestamp tuples in a set request
const TIMESTAMPS_FIELD: &str = "sharedListTimestamps";

/// Body field carrying the list ids in a get request
const LIST_IDS_FIELD: &str = "sharedListIds";

/// Validated body of a set request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRequest {
    pub timestamps: Vec<SharedListTimestamp>,
}

/// Validated body of a get request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    pub list_ids: Vec<String>,
}

/// A request refused before any store access.
///
/// The body texts are part of the external contract; clients match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Write attempted without acceptable credentials
    MissingCredentials,
    /// Set batch absent, not an array, or empty
    MissingTimestampTuples,
    /// Set batch contains an element that is not a [string, number] pair
    MalformedTimestampTuples,
    /// Get batch absent, not an array, or empty
    MissingListIds,
    /// Get batch contains an element that is not a non-empty string
    MalformedListIds,
}

impl Rejection {
    pub fn status(self) -> StatusCode {
        match self {
            Rejection::MissingCredentials => StatusCode::UNAUTHORIZED,
            Rejection::MissingTimestampTuples
            | Rejection::MalformedTimestampTuples
            | Rejection::MissingListIds
            | Rejection::MalformedListIds => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Rejection::MissingCredentials => {
                "Required auth credentials not received in request."
            }
            Rejection::MissingTimestampTuples => {
                "Expected shared list timestamp tuples were not supplied."
            }
            Rejection::MalformedTimestampTuples => {
                "Incorrectly typed shared list timestamp tuples were supplied."
            }
            Rejection::MissingListIds => "Expected shared list IDs were not supplied.",
            Rejection::MalformedListIds => "Incorrectly typed shared list IDs were supplied.",
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

/// Validate the body of a set request.
///
/// The batch must be a non-empty array of `[string, number]` pairs, the
/// number a non-negative integer. The scan stops at the first bad tuple; the
/// rejection does not say which one failed.
pub fn parse_set_request(body: &Value) -> Result<SetRequest, Rejection> {
    let tuples = body
        .get(TIMESTAMPS_FIELD)
        .and_then(Value::as_array)
        .filter(|tuples| !tuples.is_empty())
        .ok_or(Rejection::MissingTimestampTuples)?;

    let mut timestamps = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        let pair = tuple
            .as_array()
            .filter(|pair| pair.len() == 2)
            .ok_or(Rejection::MalformedTimestampTuples)?;
        let list_id = pair[0]
            .as_str()
            .ok_or(Rejection::MalformedTimestampTuples)?;
        let timestamp = pair[1]
            .as_u64()
            .ok_or(Rejection::MalformedTimestampTuples)?;
        timestamps.push((list_id.to_string(), timestamp));
    }

    Ok(SetRequest { timestamps })
}

/// Validate the body of a get request.
///
/// The batch must be a non-empty array of non-empty strings.
pub fn parse_get_request(body: &Value) -> Result<GetRequest, Rejection> {
    let ids = body
        .get(LIST_IDS_FIELD)
        .and_then(Value::as_array)
        .filter(|ids| !ids.is_empty())
        .ok_or(Rejection::MissingListIds)?;

    let mut list_ids = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id
            .as_str()
            .filter(|id| !id.is_empty())
            .ok_or(Rejection::MalformedListIds)?;
        list_ids.push(id.to_string());
    }

    Ok(GetRequest { list_ids })
}
