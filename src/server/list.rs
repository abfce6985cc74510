use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::server::{ApiError, AppState, decode_body};
use crate::store::CountSpec;

#[derive(Debug, Deserialize)]
pub struct ElementsRequest {
    elements: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PopRequest {
    /// Zero, one or two integers: nothing, a count, or a `[start, end)` window
    #[serde(default)]
    count: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LsetRequest {
    index: i64,
    element: i64,
}

#[derive(Serialize)]
pub struct LengthResponse {
    length: usize,
}

#[derive(Serialize)]
pub struct KeyLengthResponse {
    key: String,
    length: usize,
}

#[derive(Serialize)]
pub struct PopResponse {
    removed: Vec<i64>,
}

#[derive(Serialize)]
pub struct ElementResponse {
    element: i64,
}

#[derive(Serialize)]
pub struct RangeResponse {
    key: String,
    elements: Vec<i64>,
}

fn elements(body: &Bytes) -> Result<Vec<i64>, ApiError> {
    let request: ElementsRequest = decode_body(body)?;
    Ok(request.elements)
}

/// An empty body means "no count"
fn count(body: &Bytes) -> Result<CountSpec, ApiError> {
    if body.is_empty() {
        return Ok(CountSpec::One);
    }
    let request: PopRequest = decode_body(body)?;
    Ok(CountSpec::from_args(&request.count)?)
}

/// POST /list/lpush/{key}
pub async fn lpush(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<LengthResponse>, ApiError> {
    let elements = elements(&body)?;
    let length = state.lists.lpush(&key, &elements)?;
    info!(key = %key, pushed = elements.len(), length, "LPUSH");
    Ok(Json(LengthResponse { length }))
}

/// POST /list/rpush/{key}
pub async fn rpush(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<LengthResponse>, ApiError> {
    let elements = elements(&body)?;
    let length = state.lists.rpush(&key, &elements)?;
    info!(key = %key, pushed = elements.len(), length, "RPUSH");
    Ok(Json(LengthResponse { length }))
}

/// POST /list/raddtoset/{key}
pub async fn raddtoset(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<LengthResponse>, ApiError> {
    let elements = elements(&body)?;
    let length = state.lists.raddtoset(&key, &elements)?;
    info!(key = %key, offered = elements.len(), length, "RADDTOSET");
    Ok(Json(LengthResponse { length }))
}

/// POST /list/lpop/{key}, optional body `{"count": [..]}`
pub async fn lpop(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<PopResponse>, ApiError> {
    let removed = state.lists.lpop(&key, count(&body)?)?;
    Ok(Json(PopResponse { removed }))
}

/// POST /list/rpop/{key}, optional body `{"count": [..]}`
pub async fn rpop(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<PopResponse>, ApiError> {
    let removed = state.lists.rpop(&key, count(&body)?)?;
    Ok(Json(PopResponse { removed }))
}

/// PUT /list/lset/{key}
pub async fn lset(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<(), ApiError> {
    let body: LsetRequest = decode_body(&body)?;
    state.lists.lset(&key, body.index, body.element)?;
    Ok(())
}

/// GET /list/lget/{key}/{index}
pub async fn lget(
    State(state): State<AppState>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> Result<Json<ElementResponse>, ApiError> {
    let Path((key, index)) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    let element = state.lists.lget(&key, index)?;
    Ok(Json(ElementResponse { element }))
}

/// GET /list/range/{key}
pub async fn range(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RangeResponse>, ApiError> {
    let elements = state.lists.range(&key)?;
    Ok(Json(RangeResponse { key, elements }))
}

/// GET /list/len/{key}
pub async fn len(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyLengthResponse>, ApiError> {
    let length = state.lists.len(&key)?;
    Ok(Json(KeyLengthResponse { key, length }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::json;

    use crate::server::test_util::{json_request, send};
    use crate::server::{AppState, router};
    use crate::store::{ListStore, MemoryScalarStore, PopMode};

    fn app(lists: Arc<ListStore>) -> Router {
        router(AppState::new(lists, Arc::new(MemoryScalarStore::new())))
    }

    async fn post(lists: &Arc<ListStore>, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        send(app(lists.clone()), json_request(Method::POST, uri, body)).await
    }

    async fn get(lists: &Arc<ListStore>, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        send(app(lists.clone()), request).await
    }

    #[tokio::test]
    async fn test_command_sequence() {
        let lists = Arc::new(ListStore::new());

        let (status, body) = post(&lists, "/list/lpush/l", r#"{"elements":[1,2,3]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "length": 3 }));

        let (_, body) = post(&lists, "/list/rpush/l", r#"{"elements":[4,5,6]}"#).await;
        assert_eq!(body, json!({ "length": 6 }));

        let (_, body) = post(&lists, "/list/raddtoset/l", r#"{"elements":[3,7]}"#).await;
        assert_eq!(body, json!({ "length": 7 }));

        let (_, body) = post(&lists, "/list/lpop/l", r#"{"count":[2]}"#).await;
        assert_eq!(body, json!({ "removed": [1, 2] }));

        let (_, body) = post(&lists, "/list/rpop/l", r#"{"count":[1]}"#).await;
        assert_eq!(body, json!({ "removed": [7] }));

        let (status, body) = get(&lists, "/list/range/l").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "key": "l", "elements": [3, 4, 5, 6] }));

        let (_, body) = get(&lists, "/list/len/l").await;
        assert_eq!(body, json!({ "key": "l", "length": 4 }));
        let (_, body) = get(&lists, "/list/len/other").await;
        assert_eq!(body, json!({ "key": "other", "length": 0 }));
    }

    #[tokio::test]
    async fn test_pop_without_body() {
        let lists = Arc::new(ListStore::new());
        lists.rpush("l", &[1, 2]).unwrap();

        let request = Request::post("/list/rpop/l").body(Body::empty()).unwrap();
        let (status, body) = send(app(lists.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "removed": [2] }));
    }

    #[tokio::test]
    async fn test_pop_missing_list() {
        let lists = Arc::new(ListStore::new());
        let (status, body) = post(&lists, "/list/lpop/missing", "{}").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "list is empty or does not exist");
    }

    #[tokio::test]
    async fn test_pop_window_errors() {
        let lists = Arc::new(ListStore::with_mode(PopMode::Exact));
        lists.rpush("l", &[1, 2, 3]).unwrap();

        let (status, _) = post(&lists, "/list/lpop/l", r#"{"count":[2,1]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(&lists, "/list/lpop/l", r#"{"count":[0,1,2]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post(&lists, "/list/lpop/l", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid request body");

        assert_eq!(lists.range("l").unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_lset_and_lget() {
        let lists = Arc::new(ListStore::new());
        lists.rpush("l", &[1, 2, 3]).unwrap();

        let request = json_request(Method::PUT, "/list/lset/l", r#"{"index":-1,"element":30}"#);
        let (status, body) = send(app(lists.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());

        let (status, body) = get(&lists, "/list/lget/l/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "element": 30 }));

        let (status, body) = get(&lists, "/list/lget/l/-4").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "index out of range");
    }

    #[tokio::test]
    async fn test_bodies_without_content_type() {
        let lists = Arc::new(ListStore::new());
        let cases = [
            (Method::POST, "/list/rpush/l", r#"{"elements":[1,2]}"#, json!({ "length": 2 })),
            (Method::POST, "/list/lpush/l", r#"{"elements":[0]}"#, json!({ "length": 3 })),
            (Method::POST, "/list/raddtoset/l", r#"{"elements":[2,3]}"#, json!({ "length": 4 })),
            (Method::PUT, "/list/lset/l", r#"{"index":0,"element":9}"#, serde_json::Value::Null),
            (Method::POST, "/list/lpop/l", r#"{"count":[1]}"#, json!({ "removed": [9] })),
        ];

        for (method, uri, body, expected) in cases {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::from(body))
                .unwrap();
            let (status, response) = send(app(lists.clone()), request).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert_eq!(response, expected, "{}", uri);
        }
        assert_eq!(lists.range("l").unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_lget_bad_index_is_json_error() {
        let lists = Arc::new(ListStore::new());
        lists.rpush("l", &[1]).unwrap();

        let (status, body) = get(&lists, "/list/lget/l/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("invalid path"));
    }

    #[tokio::test]
    async fn test_push_invalid_body() {
        let lists = Arc::new(ListStore::new());
        let (status, body) = post(&lists, "/list/rpush/l", r#"{"elements":["a"]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid request body");
        assert_eq!(lists.len("l").unwrap(), 0);
    }
}
