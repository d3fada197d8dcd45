//! HTTP route handlers for the timestamp API

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::error::{CoreError, Result};

use super::auth;
use super::validate::{self, SharedListTimestamp};
use super::AppState;

/// Route accepting timestamp writes
pub const SET_TIMESTAMPS_ROUTE: &str = "/shared-list-timestamps/set";

/// Route serving timestamp reads
pub const GET_TIMESTAMPS_ROUTE: &str = "/shared-list-timestamps/get";

/// Body returned for any route the service does not know
const UNKNOWN_ROUTE_BODY: &str = "Request was made to a location unknown to the service";

/// Record the last activity timestamp for each supplied shared list.
///
/// Writes require `Authorization: Basic <credentials>`. Store puts run
/// sequentially in input order; a failure mid-batch leaves earlier entries
/// written.
pub async fn set_timestamps(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let body: Value = serde_json::from_slice(&body)?;

    if let Err(rejection) = auth::check_write_credentials(&headers, state.credentials.as_deref())
    {
        return Ok(rejection.into_response());
    }

    let request = match validate::parse_set_request(&body) {
        Ok(request) => request,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    for (list_id, timestamp) in &request.timestamps {
        state.store.put(list_id, &timestamp.to_string()).await?;
    }

    Ok(StatusCode::OK.into_response())
}

/// Return the stored timestamp for each supplied shared list id.
///
/// Reads are public. Ids with no stored timestamp are omitted from the
/// result rather than reported as errors.
pub async fn get_timestamps(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let body: Value = serde_json::from_slice(&body)?;

    let request = match validate::parse_get_request(&body) {
        Ok(request) => request,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let mut timestamps: Vec<SharedListTimestamp> = Vec::new();
    for list_id in request.list_ids {
        let Some(stored) = state.store.get(&list_id).await? else {
            continue;
        };
        let timestamp = stored.parse::<u64>().map_err(|e| {
            CoreError::Api(format!(
                "stored timestamp for {} is not an integer: {}",
                list_id, e
            ))
        })?;
        timestamps.push((list_id, timestamp));
    }

    Ok(Json(timestamps).into_response())
}

/// Fallback for any (method, path) pair outside the two known routes
pub async fn unknown_route() -> Response {
    (StatusCode::GONE, UNKNOWN_ROUTE_BODY).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{create_router, AppState, INTERNAL_ERROR_PREFIX};
    use crate::store::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    const SECRET: &str = "writer-secret";

    fn test_state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
            credentials: Some(SECRET.to_string()),
        }
    }

    fn basic(credentials: &str) -> String {
        format!("Basic {}", credentials)
    }

    async fn send(
        state: &AppState,
        method: Method,
        route: &str,
        auth: Option<&str>,
        body: &str,
    ) -> (StatusCode, String) {
        let mut request = Request::builder().method(method).uri(route);
        if let Some(auth) = auth {
            request = request.header(header::AUTHORIZATION, auth);
        }
        let request = request.body(Body::from(body.to_string())).unwrap();

        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn set(state: &AppState, auth: Option<&str>, body: &str) -> (StatusCode, String) {
        send(state, Method::POST, SET_TIMESTAMPS_ROUTE, auth, body).await
    }

    async fn get(state: &AppState, body: &str) -> (StatusCode, String) {
        send(state, Method::POST, GET_TIMESTAMPS_ROUTE, None, body).await
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let state = test_state();

        let (status, body) = set(
            &state,
            Some(&basic(SECRET)),
            r#"{"sharedListTimestamps": [["a", 100], ["b", 200]]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());

        // "c" was never written and is silently omitted
        let (status, body) = get(&state, r#"{"sharedListIds": ["a", "b", "c"]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"[["a",100],["b",200]]"#);
    }

    #[tokio::test]
    async fn test_get_unknown_ids_returns_empty_array() {
        let state = test_state();

        let (status, body) = get(&state, r#"{"sharedListIds": ["never-written"]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_set_is_idempotent() {
        let state = test_state();
        let payload = r#"{"sharedListTimestamps": [["a", 100]]}"#;

        set(&state, Some(&basic(SECRET)), payload).await;
        set(&state, Some(&basic(SECRET)), payload).await;

        let (status, body) = get(&state, r#"{"sharedListIds": ["a"]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"[["a",100]]"#);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let state = test_state();

        set(
            &state,
            Some(&basic(SECRET)),
            r#"{"sharedListTimestamps": [["a", 100]]}"#,
        )
        .await;
        set(
            &state,
            Some(&basic(SECRET)),
            r#"{"sharedListTimestamps": [["a", 200]]}"#,
        )
        .await;

        let (status, body) = get(&state, r#"{"sharedListIds": ["a"]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"[["a",200]]"#);
    }

    #[tokio::test]
    async fn test_set_without_auth_header() {
        let state = test_state();

        let (status, body) = set(&state, None, r#"{"sharedListTimestamps": [["a", 100]]}"#).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Required auth credentials not received in request.");
    }

    #[tokio::test]
    async fn test_set_with_wrong_credentials() {
        let state = test_state();

        let (status, _) = set(
            &state,
            Some(&basic("someone-else")),
            r#"{"sharedListTimestamps": [["a", 100]]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_is_checked_before_batch_shape() {
        let state = test_state();

        // Invalid batch, but missing auth wins
        let (status, body) = set(&state, None, r#"{"sharedListTimestamps": []}"#).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Required auth credentials not received in request.");
    }

    #[tokio::test]
    async fn test_set_empty_batch() {
        let state = test_state();

        let (status, body) = set(
            &state,
            Some(&basic(SECRET)),
            r#"{"sharedListTimestamps": []}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            "Expected shared list timestamp tuples were not supplied."
        );
    }

    #[tokio::test]
    async fn test_set_three_element_tuple() {
        let state = test_state();

        let (status, body) = set(
            &state,
            Some(&basic(SECRET)),
            r#"{"sharedListTimestamps": [["a", 100, "extra"]]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            "Incorrectly typed shared list timestamp tuples were supplied."
        );
    }

    #[tokio::test]
    async fn test_set_bad_tuple_writes_nothing() {
        let state = test_state();

        set(
            &state,
            Some(&basic(SECRET)),
            r#"{"sharedListTimestamps": [["a", 100], ["b", "not-a-number"]]}"#,
        )
        .await;

        // Validation precedes every store call, so "a" was not written either
        let (status, body) = get(&state, r#"{"sharedListIds": ["a", "b"]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_get_empty_batch() {
        let state = test_state();

        let (status, body) = get(&state, r#"{"sharedListIds": []}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Expected shared list IDs were not supplied.");
    }

    #[tokio::test]
    async fn test_get_empty_string_id() {
        let state = test_state();

        let (status, body) = get(&state, r#"{"sharedListIds": ["a", ""]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Incorrectly typed shared list IDs were supplied.");
    }

    #[tokio::test]
    async fn test_unknown_path_is_gone() {
        let state = test_state();

        let (status, body) = send(&state, Method::GET, "/anything-else", None, "").await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body, "Request was made to a location unknown to the service");
    }

    #[tokio::test]
    async fn test_wrong_method_on_known_path_is_gone() {
        let state = test_state();

        let (status, _) = send(&state, Method::GET, SET_TIMESTAMPS_ROUTE, None, "").await;
        assert_eq!(status, StatusCode::GONE);

        let (status, _) = send(&state, Method::DELETE, GET_TIMESTAMPS_ROUTE, None, "").await;
        assert_eq!(status, StatusCode::GONE);
    }

    #[tokio::test]
    async fn test_malformed_json_is_internal_error() {
        let state = test_state();

        let (status, body) = set(&state, Some(&basic(SECRET)), "{not json").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with(INTERNAL_ERROR_PREFIX));
    }

    #[tokio::test]
    async fn test_malformed_json_beats_bad_auth() {
        let state = test_state();

        // Parsing precedes the credentials check
        let (status, _) = set(&state, None, "{not json").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
