use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::info;

use logbook_core::{ident, reader, registry::LogFileInfo, validate::RegisterRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/logs/register", post(register_handler))
        .route("/api/logs/files", get(list_handler))
        .route("/api/logs/files/{id}", delete(delete_handler))
        .route("/api/logs/{id}", get(read_handler))
}

/// POST /api/logs/register — track a new log file
async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let format = body.validate()?;

    let path = body.path.trim();
    if !std::path::Path::new(path).exists() {
        return Err(ApiError::InvalidRequest("File does not exist".to_string()));
    }

    let sanitized = ident::sanitize_file_name(body.name.trim());
    let name = state.registry.unique_name(&sanitized);
    let file = LogFileInfo::new(ident::generate_id(), name, path, format);

    state.registry.add(file.clone());
    info!(id = %file.id, name = %file.name, format = file.format.as_str(), "Log file registered");

    Ok(Json(json!({
        "message": "Log file registered successfully",
        "file": file,
    })))
}

/// GET /api/logs/files — list all tracked files
async fn list_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "files": state.registry.list() }))
}

/// DELETE /api/logs/files/:id — stop tracking a file
async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.registry.exists(&id) {
        return Err(ApiError::NotFound(id));
    }

    state.registry.remove(&id);
    info!(%id, "Log file removed from registry");

    Ok(Json(json!({ "message": "Log file deleted successfully" })))
}

/// GET /api/logs/:id — parsed entries of a tracked file
async fn read_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    // Snapshot under the shared lock; a concurrent delete does not
    // affect this read
    let file = state
        .registry
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(id))?;

    // The core is synchronous, unbounded file I/O: keep it off the
    // async worker threads
    let entries = tokio::task::spawn_blocking(move || reader::read_entries(&file))
        .await
        .map_err(|e| ApiError::Internal(format!("read task failed: {e}")))??;

    Ok(Json(json!({ "data": entries })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use logbook_core::{FileRegistry, LogFormat};
    use std::io::Write;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        state: AppState,
        _dir: tempfile::TempDir,
    }

    fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let registry = FileRegistry::new(dir.path().join("log_registry.json"));
        let state = AppState::new(AppConfig::default(), registry);
        let router = api_router().with_state(state.clone());
        TestApp {
            router,
            state,
            _dir: dir,
        }
    }

    fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_list() {
        let app = test_app();
        let path = write_fixture(&app._dir, "app.log", "");

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/logs/register",
                json!({ "name": "My Log!!", "path": path, "type": "structured-text" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Log file registered successfully");
        assert_eq!(body["file"]["name"], "My-Log");
        assert_eq!(body["file"]["type"], "structured-text");

        let response = app
            .router
            .oneshot(get_request("/api/logs/files"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["files"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_validation_failure() {
        let app = test_app();
        let response = app
            .router
            .oneshot(json_request(
                "POST",
                "/api/logs/register",
                json!({ "name": "", "path": "/tmp/x.log", "type": "json-lines" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "name is required");
    }

    #[tokio::test]
    async fn test_register_unknown_type() {
        let app = test_app();
        let response = app
            .router
            .oneshot(json_request(
                "POST",
                "/api/logs/register",
                json!({ "name": "app", "path": "/tmp/x.log", "type": "syslog" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "type must be either 'structured-text' or 'json-lines'"
        );
    }

    #[tokio::test]
    async fn test_register_nonexistent_path() {
        let app = test_app();
        let response = app
            .router
            .oneshot(json_request(
                "POST",
                "/api/logs/register",
                json!({ "name": "app", "path": "/no/such/file.log", "type": "json-lines" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "File does not exist");
    }

    #[tokio::test]
    async fn test_case_insensitive_name_collision_gets_suffix() {
        let app = test_app();
        let path = write_fixture(&app._dir, "app.log", "");

        for name in ["My Log", "my log"] {
            let response = app
                .router
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/logs/register",
                    json!({ "name": name, "path": path, "type": "structured-text" }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let mut names: Vec<String> = app
            .state
            .registry
            .list()
            .into_iter()
            .map(|f| f.name)
            .collect();
        names.sort();
        assert_eq!(names, ["My-Log", "my-log-1"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_404_and_no_mutation() {
        let app = test_app();
        let path = write_fixture(&app._dir, "app.log", "");
        app.state.registry.add(LogFileInfo::new(
            "known".to_string(),
            "app".to_string(),
            &path,
            LogFormat::StructuredText,
        ));

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/logs/files/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.state.registry.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let app = test_app();
        let path = write_fixture(&app._dir, "app.log", "");
        app.state.registry.add(LogFileInfo::new(
            "known".to_string(),
            "app".to_string(),
            &path,
            LogFormat::StructuredText,
        ));

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/logs/files/known")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Log file deleted successfully");
        assert!(app.state.registry.is_empty());
    }

    #[tokio::test]
    async fn test_read_parsed_entries() {
        let app = test_app();
        let path = write_fixture(
            &app._dir,
            "app.log",
            "[2024-01-01 10:00:00] prod.ERROR: boom\n\nnoise\n",
        );
        app.state.registry.add(LogFileInfo::new(
            "log-1".to_string(),
            "app".to_string(),
            &path,
            LogFormat::StructuredText,
        ));

        let response = app
            .router
            .oneshot(get_request("/api/logs/log-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["level"], "ERROR");
        assert_eq!(data[0]["message"], "boom");
        assert_eq!(data[0]["timestamp"], "2024-01-01T10:00:00Z");
    }

    #[tokio::test]
    async fn test_read_unknown_id_is_404() {
        let app = test_app();
        let response = app
            .router
            .oneshot(get_request("/api/logs/missing"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_read_failure_is_500_with_message() {
        let app = test_app();
        // Registered, but the file has since disappeared
        app.state.registry.add(LogFileInfo::new(
            "gone".to_string(),
            "app".to_string(),
            "/no/such/file.log",
            LogFormat::JsonLines,
        ));

        let response = app
            .router
            .oneshot(get_request("/api/logs/gone"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("/no/such/file.log"));
    }
}
