//! Live HTTP server: server-rendered pages plus the upload and palette API.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/files/list?prefix=` | `{blobs: [...]}` from the storage provider |
//! | `DELETE` | `/api/files/delete` | `{pathname}` → `{success: true}` |
//! | `POST` | `/api/upload/image?filename=` | small image upload, body is the file |
//! | `POST` | `/api/upload/client` | client-token protocol (generate token, upload completed) |
//! | `PUT` | `/api/upload/blob` | file body stored under the `x-folio-client-token` token's pathname |
//! | `POST` | `/api/palette/key` | key event → effect |
//! | `GET` | `/api/palette/search?q=` | ranked palette items |
//! | `POST` | `/api/palette/select` | palette item or command → effect |
//! | `GET` | `/files` | upload controls and file browser over the endpoints above |
//! | `GET` | anything else | a file from `public/`, a rendered page, or the 404 page |
//!
//! Errors are `{"error": "<message>"}` with the status from
//! [`UploadError::status_code`].
//!
//! Every page request re-reads the content root, so edits show up on reload.
//! Navigation and theme state live in the URL and the `theme` cookie; the
//! server holds no per-visitor state.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::commands::{Command, Dispatch, Focus, KeyEvent, Palette, SearchResults};
use crate::config::SiteConfig;
use crate::content::{ContentSource, ContentType, FsSource, Library};
use crate::generate::{self, RenderOptions};
use crate::navigation::NavigationState;
use crate::uploads::{
    ClientPayload, CompletedBlob, UploadError, UploadGateway, UploadedObject,
};

/// Header carrying the hex HMAC of an upload-completed callback body.
pub const SIGNATURE_HEADER: &str = "x-folio-signature";

/// Header carrying a client token on `PUT /api/upload/blob`.
pub const CLIENT_TOKEN_HEADER: &str = "x-folio-client-token";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid bind address {0}")]
    Address(String),
}

/// Shared state handed to every handler.
pub struct AppState<S> {
    pub config: Arc<SiteConfig>,
    pub library: Arc<Library<S>>,
    pub gateway: UploadGateway,
    pub public_dir: PathBuf,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            library: self.library.clone(),
            gateway: self.gateway.clone(),
            public_dir: self.public_dir.clone(),
        }
    }
}

impl<S: ContentSource> AppState<S> {
    fn palette(&self) -> Palette {
        let fieldnotes = self.library.list_items(ContentType::Fieldnotes);
        Palette::new(&self.config, &fieldnotes)
    }
}

/// Build the application router.
pub fn router<S: ContentSource + 'static>(state: AppState<S>) -> Router {
    let image_limit = state.gateway.limits().max_server_upload_bytes as usize;
    let blob_limit = state.gateway.limits().max_client_upload_bytes as usize;
    Router::new()
        .route("/api/files/list", get(list_files::<S>))
        .route("/api/files/delete", delete(delete_file::<S>))
        .route(
            "/api/upload/image",
            post(upload_image::<S>).layer(DefaultBodyLimit::max(image_limit)),
        )
        .route("/api/upload/client", post(upload_client::<S>))
        .route(
            "/api/upload/blob",
            put(upload_blob::<S>).layer(DefaultBodyLimit::max(blob_limit)),
        )
        .route("/api/palette/key", post(palette_key::<S>))
        .route("/api/palette/search", get(palette_search::<S>))
        .route("/api/palette/select", post(palette_select::<S>))
        .route("/", get(page::<S>))
        .route("/{*path}", get(page::<S>))
        .with_state(state)
}

/// Serve the site from a content root until the process is stopped.
pub async fn serve(
    config: SiteConfig,
    root: &Path,
    public_dir: &Path,
    bind: Option<&str>,
) -> Result<(), ServeError> {
    let bind = bind.unwrap_or(&config.server.bind).to_string();
    let addr: SocketAddr = bind.parse().map_err(|_| ServeError::Address(bind.clone()))?;

    let gateway = UploadGateway::from_config(&config.uploads, &config.storage);
    let state = AppState {
        config: Arc::new(config),
        library: Arc::new(Library::new(FsSource::new(root))),
        gateway,
        public_dir: public_dir.to_path_buf(),
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("serving {} on http://{}", root.display(), addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

struct AppError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        Self {
            status: StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: err.to_string(),
        }
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

/// Parse a JSON body, answering malformed input with a 400 in the usual shape.
fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| bad_request(format!("Invalid request body: {e}")))
}

// ============================================================================
// Files
// ============================================================================

#[derive(Deserialize)]
struct ListQuery {
    prefix: Option<String>,
}

#[derive(Serialize)]
struct ListResponse {
    blobs: Vec<UploadedObject>,
}

async fn list_files<S: ContentSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let blobs = state.gateway.list_objects(query.prefix.as_deref()).await?;
    Ok(Json(ListResponse { blobs }))
}

#[derive(Deserialize)]
struct DeleteRequest {
    #[serde(default)]
    pathname: String,
}

#[derive(Serialize)]
struct DeleteResponse {
    success: bool,
}

async fn delete_file<S: ContentSource>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<DeleteResponse>, AppError> {
    let req: DeleteRequest = parse_json(&body)?;
    state.gateway.delete_object(&req.pathname).await?;
    Ok(Json(DeleteResponse { success: true }))
}

#[derive(Deserialize)]
struct ImageQuery {
    #[serde(default)]
    filename: String,
}

async fn upload_image<S: ContentSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<ImageQuery>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<UploadedObject>, AppError> {
    let body = limited_body(body, state.gateway.limits().max_server_upload_bytes)?;
    let object = state
        .gateway
        .upload_small(&query.filename, content_type(&headers), body.to_vec())
        .await?;
    Ok(Json(object))
}

async fn upload_blob<S: ContentSource>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<UploadedObject>, AppError> {
    let token = headers
        .get(CLIENT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| UploadError::InvalidToken("missing client token".into()))?;
    let body = limited_body(body, state.gateway.limits().max_client_upload_bytes)?;
    let object = state
        .gateway
        .upload_with_token(token, content_type(&headers), body.to_vec())
        .await?;
    Ok(Json(object))
}

/// A route's body-limit rejection reads as the gateway's own size error.
fn limited_body(body: Result<Bytes, BytesRejection>, limit: u64) -> Result<Bytes, AppError> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::from(UploadError::TooLarge {
                size: limit.saturating_add(1),
                limit,
            })
        } else {
            bad_request(rejection.body_text())
        }
    })
}

fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateTokenPayload {
    #[serde(default)]
    pathname: String,
    client_payload: Option<DeclaredPayload>,
}

/// Browser upload clients send `clientPayload` as a JSON-encoded string;
/// an inline object is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum DeclaredPayload {
    Encoded(String),
    Inline(ClientPayload),
}

impl DeclaredPayload {
    fn into_client_payload(self) -> Result<ClientPayload, AppError> {
        match self {
            DeclaredPayload::Inline(payload) => Ok(payload),
            DeclaredPayload::Encoded(text) => serde_json::from_str(&text)
                .map_err(|e| bad_request(format!("Invalid clientPayload: {}", e))),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadCompletedPayload {
    blob: CompletedBlob,
    #[serde(default)]
    token_payload: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "payload")]
enum ClientUploadEvent {
    #[serde(rename = "blob.generate-client-token")]
    GenerateClientToken(GenerateTokenPayload),
    #[serde(rename = "blob.upload-completed")]
    UploadCompleted(UploadCompletedPayload),
}

#[derive(Serialize)]
#[serde(untagged)]
enum ClientUploadResponse {
    Token {
        #[serde(rename = "type")]
        kind: &'static str,
        #[serde(rename = "clientToken")]
        client_token: String,
    },
    Ack {
        response: &'static str,
    },
}

async fn upload_client<S: ContentSource>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ClientUploadResponse>, AppError> {
    match parse_json::<ClientUploadEvent>(&body)? {
        ClientUploadEvent::GenerateClientToken(payload) => {
            let declared = payload
                .client_payload
                .ok_or_else(|| bad_request("clientPayload with fileType and fileSize is required"))?
                .into_client_payload()?;
            let auth = state
                .gateway
                .request_upload_authorization(&payload.pathname, &declared)?;
            Ok(Json(ClientUploadResponse::Token {
                kind: "blob.generate-client-token",
                client_token: auth.client_token,
            }))
        }
        ClientUploadEvent::UploadCompleted(payload) => {
            let signature = headers
                .get(SIGNATURE_HEADER)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| UploadError::InvalidToken("missing callback signature".into()))?;
            state.gateway.verify_callback(&body, signature)?;
            state
                .gateway
                .complete_upload(&payload.blob, payload.token_payload.as_deref());
            Ok(Json(ClientUploadResponse::Ack { response: "ok" }))
        }
    }
}

// ============================================================================
// Palette
// ============================================================================

fn root_path() -> String {
    "/".to_string()
}

#[derive(Deserialize)]
struct KeyRequest {
    event: KeyEvent,
    #[serde(default)]
    focus: Focus,
    #[serde(default)]
    open: bool,
    #[serde(default = "root_path")]
    path: String,
    theme: Option<String>,
}

async fn palette_key<S: ContentSource>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<Dispatch>, AppError> {
    let req: KeyRequest = parse_json(&body)?;
    let mut nav = NavigationState::from_path(&req.path).unwrap_or_default();
    let theme = state.config.themes.resolve(req.theme.as_deref());
    let dispatch = state
        .palette()
        .dispatch_key(&req.event, req.focus, req.open, &mut nav, theme);
    Ok(Json(dispatch))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn palette_search<S: ContentSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResults> {
    Json(state.palette().search(&query.q))
}

#[derive(Deserialize)]
struct SelectRequest {
    id: Option<String>,
    command: Option<Command>,
    #[serde(default = "root_path")]
    path: String,
    theme: Option<String>,
}

async fn palette_select<S: ContentSource>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<Dispatch>, AppError> {
    let req: SelectRequest = parse_json(&body)?;
    let palette = state.palette();
    let command = match (req.command, req.id.as_deref()) {
        (Some(command), _) => command,
        (None, Some(id)) => palette
            .item(id)
            .map(|item| item.command.clone())
            .ok_or_else(|| bad_request(format!("Unknown palette item {id}")))?,
        (None, None) => return Err(bad_request("id or command is required")),
    };
    let mut nav = NavigationState::from_path(&req.path).unwrap_or_default();
    let theme = state.config.themes.resolve(req.theme.as_deref());
    Ok(Json(palette.apply(&command, &mut nav, theme)))
}

// ============================================================================
// Pages and public files
// ============================================================================

/// Theme named by the `theme` cookie, if any.
pub fn theme_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| pair.trim().strip_prefix("theme="))
}

/// Map a request path onto a file under `public_dir`, refusing anything that
/// could leave it.
fn public_file(public_dir: &Path, path: &str) -> Option<PathBuf> {
    let relative = Path::new(path.trim_start_matches('/'));
    if relative.as_os_str().is_empty()
        || !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    let file = public_dir.join(relative);
    file.is_file().then_some(file)
}

async fn page<S: ContentSource>(
    State(state): State<AppState<S>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path();

    if let Some(file) = public_file(&state.public_dir, path) {
        return match tokio::fs::read(&file).await {
            Ok(bytes) => {
                let mime = mime_guess::from_path(&file).first_or_octet_stream();
                ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
            }
            Err(e) => {
                tracing::error!("cannot read {}: {}", file.display(), e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };
    }

    let theme = state.config.themes.resolve(theme_cookie(&headers));
    let rendered = generate::render_path(
        &state.config,
        &state.library,
        path,
        RenderOptions {
            theme,
            interactive: true,
        },
    );
    let status = StatusCode::from_u16(rendered.status).unwrap_or(StatusCode::OK);
    (status, Html(rendered.html)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use tempfile::TempDir;

    #[test]
    fn theme_cookie_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session=abc; theme=matcha; other=1"),
        );
        assert_eq!(theme_cookie(&headers), Some("matcha"));
    }

    #[test]
    fn theme_cookie_absent() {
        assert_eq!(theme_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn public_file_refuses_traversal() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("robots.txt"), "x").unwrap();
        assert!(public_file(tmp.path(), "/robots.txt").is_some());
        assert!(public_file(tmp.path(), "/../robots.txt").is_none());
        assert!(public_file(tmp.path(), "/").is_none());
        assert!(public_file(tmp.path(), "/missing.txt").is_none());
    }

    #[test]
    fn upload_error_maps_to_status() {
        let err = AppError::from(UploadError::MissingPathname);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Pathname is required");
        let err = AppError::from(UploadError::Storage("Failed to delete file".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_event_parses_both_kinds() {
        let event: ClientUploadEvent = serde_json::from_str(
            r#"{"type":"blob.generate-client-token","payload":{"pathname":"a.png","clientPayload":{"fileType":"image/png","fileSize":10}}}"#,
        )
        .unwrap();
        assert!(matches!(event, ClientUploadEvent::GenerateClientToken(_)));

        let event: ClientUploadEvent = serde_json::from_str(
            r#"{"type":"blob.upload-completed","payload":{"blob":{"url":"https://x/a.png","pathname":"a.png"}}}"#,
        )
        .unwrap();
        assert!(matches!(event, ClientUploadEvent::UploadCompleted(_)));
    }

    #[tokio::test]
    async fn bad_bind_address() {
        let tmp = TempDir::new().unwrap();
        let result = serve(SiteConfig::default(), tmp.path(), tmp.path(), Some("not an address")).await;
        assert!(matches!(result, Err(ServeError::Address(_))));
    }
}
