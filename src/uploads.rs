//! Upload gateway over an external blob storage provider.
//!
//! The provider owns every stored object; this module only validates
//! requests, signs short-lived client upload tokens and forwards delete and
//! list calls.
//!
//! ## Upload Paths
//!
//! | Path | Who sends the bytes | Types | Ceiling |
//! |------|---------------------|-------|---------|
//! | client token | the browser, straight to the provider | `uploads.allowed_content_types` | `max_client_upload_bytes` (100 MB) |
//! | small upload | this server, inside one request | `image/*` | `max_server_upload_bytes` (10 MB) |
//!
//! Validation always runs before any network call, so a rejected request
//! never reaches the provider.
//!
//! ## Client Tokens
//!
//! ```text
//! folio_client_<base64url(claims JSON)>.<hex(HMAC-SHA256(secret, base64 part))>
//! ```
//!
//! The claims carry the pathname, allowed types, size ceiling, random-suffix
//! flag, expiry (`validUntil`, epoch milliseconds) and an opaque token
//! payload echoed back in the upload-completed callback.
//!
//! ## Error Surface
//!
//! Provider failures are logged with their cause and replaced by a short
//! user-facing message (`"Failed to delete file"`). Nothing here panics or
//! aborts a batch: each operation reports its own result.
//!
//! None of these operations authenticate the caller.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;

use crate::config::{StorageConfig, UploadsConfig};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_PREFIX: &str = "folio_client_";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("File type {0} is not allowed")]
    InvalidContentType(String),
    #[error("File size exceeds {}MB limit", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },
    #[error("Pathname is required")]
    MissingPathname,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid client token: {0}")]
    InvalidToken(String),
    #[error("Upload storage is not configured: {0}")]
    NotConfigured(String),
    #[error("{0}")]
    Storage(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl UploadError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            UploadError::InvalidContentType(_)
            | UploadError::TooLarge { .. }
            | UploadError::MissingPathname
            | UploadError::InvalidRequest(_) => 400,
            UploadError::InvalidToken(_) => 401,
            UploadError::NotConfigured(_) | UploadError::Storage(_) | UploadError::Http(_) => 500,
        }
    }
}

/// An object held by the storage provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedObject {
    pub pathname: String,
    pub url: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub uploaded_at: String,
}

/// One page of a provider listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListPage {
    pub blobs: Vec<UploadedObject>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Operations the gateway needs from a storage provider.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `body` at `pathname`, optionally letting the provider make it unique.
    async fn put(
        &self,
        pathname: &str,
        content_type: &str,
        body: Vec<u8>,
        add_random_suffix: bool,
    ) -> Result<UploadedObject, UploadError>;

    /// Delete an object by pathname or URL.
    async fn delete(&self, target: &str) -> Result<(), UploadError>;

    /// One page of objects under `prefix`, starting at `cursor`.
    async fn list(&self, prefix: Option<&str>, cursor: Option<&str>)
    -> Result<ListPage, UploadError>;
}

// ============================================================================
// HTTP provider
// ============================================================================

/// Blob store speaking the provider's REST API.
///
/// | Call | Request |
/// |------|---------|
/// | put | `PUT {api}/{pathname}` with `x-content-type`, `x-add-random-suffix` |
/// | delete | `POST {api}/delete` with `{"urls": [target]}` |
/// | list | `GET {api}?prefix=&cursor=` → `{blobs, cursor, hasMore}` |
///
/// Every request carries `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct PutResponse {
    url: String,
    pathname: String,
}

impl HttpBlobStore {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(storage: &StorageConfig) -> Self {
        Self::new(storage.api_url.clone(), storage.token())
    }

    fn token(&self) -> Result<&str, UploadError> {
        self.token
            .as_deref()
            .ok_or_else(|| UploadError::NotConfigured("no provider token in the environment".into()))
    }

    async fn check(resp: reqwest::Response, call: &str) -> Result<reqwest::Response, UploadError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(UploadError::Storage(format!(
            "provider {} failed (HTTP {}): {}",
            call,
            status,
            body.chars().take(500).collect::<String>()
        )))
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(
        &self,
        pathname: &str,
        content_type: &str,
        body: Vec<u8>,
        add_random_suffix: bool,
    ) -> Result<UploadedObject, UploadError> {
        let size = body.len() as u64;
        let resp = self
            .client
            .put(format!("{}/{}", self.api_url, pathname.trim_start_matches('/')))
            .bearer_auth(self.token()?)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", if add_random_suffix { "1" } else { "0" })
            .body(body)
            .send()
            .await?;
        let stored: PutResponse = Self::check(resp, "put").await?.json().await?;
        Ok(UploadedObject {
            pathname: stored.pathname,
            url: stored.url,
            size,
            uploaded_at: Utc::now().to_rfc3339(),
        })
    }

    async fn delete(&self, target: &str) -> Result<(), UploadError> {
        let resp = self
            .client
            .post(format!("{}/delete", self.api_url))
            .bearer_auth(self.token()?)
            .json(&serde_json::json!({ "urls": [target] }))
            .send()
            .await?;
        Self::check(resp, "delete").await?;
        Ok(())
    }

    async fn list(
        &self,
        prefix: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<ListPage, UploadError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(prefix) = prefix {
            query.push(("prefix", prefix));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }
        let resp = self
            .client
            .get(&self.api_url)
            .bearer_auth(self.token()?)
            .query(&query)
            .send()
            .await?;
        let text = Self::check(resp, "list").await?.text().await?;
        if text.trim().is_empty() {
            return Ok(ListPage::default());
        }
        serde_json::from_str(&text)
            .map_err(|e| UploadError::Storage(format!("unreadable list response: {e}")))
    }
}

// ============================================================================
// In-memory provider
// ============================================================================

/// Blob store kept in process memory.
///
/// Counts every call it receives and can be switched into a failing mode,
/// which makes it a stand-in for the real provider wherever no network is
/// wanted.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: Mutex<BTreeMap<String, UploadedObject>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    page_size: Option<usize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that returns at most `size` objects per listing page.
    pub fn with_page_size(size: usize) -> Self {
        Self {
            page_size: Some(size.max(1)),
            ..Self::default()
        }
    }

    /// Make every later call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contains(&self, pathname: &str) -> bool {
        self.lock().contains_key(pathname)
    }

    fn enter(&self) -> Result<(), UploadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(UploadError::Storage("memory store is failing".into()));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, UploadedObject>> {
        // A poisoned map is still a consistent map.
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        pathname: &str,
        _content_type: &str,
        body: Vec<u8>,
        add_random_suffix: bool,
    ) -> Result<UploadedObject, UploadError> {
        self.enter()?;
        let pathname = if add_random_suffix {
            with_random_suffix(pathname)
        } else {
            pathname.to_string()
        };
        let object = UploadedObject {
            url: format!("memory://{pathname}"),
            pathname: pathname.clone(),
            size: body.len() as u64,
            uploaded_at: Utc::now().to_rfc3339(),
        };
        self.lock().insert(pathname, object.clone());
        Ok(object)
    }

    async fn delete(&self, target: &str) -> Result<(), UploadError> {
        self.enter()?;
        let mut objects = self.lock();
        let key = target.strip_prefix("memory://").unwrap_or(target);
        objects.remove(key);
        Ok(())
    }

    async fn list(
        &self,
        prefix: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<ListPage, UploadError> {
        self.enter()?;
        let objects = self.lock();
        let matching: Vec<&UploadedObject> = objects
            .values()
            .filter(|o| prefix.is_none_or(|p| o.pathname.starts_with(p)))
            .filter(|o| cursor.is_none_or(|c| o.pathname.as_str() > c))
            .collect();
        let take = self.page_size.unwrap_or(matching.len()).min(matching.len());
        let blobs: Vec<UploadedObject> = matching[..take].iter().map(|o| (*o).clone()).collect();
        let has_more = take < matching.len();
        Ok(ListPage {
            cursor: if has_more {
                blobs.last().map(|o| o.pathname.clone())
            } else {
                None
            },
            blobs,
            has_more,
        })
    }
}

/// Insert a short random suffix before the extension: `a/b.png` → `a/b-1f3c9e2a.png`.
pub fn with_random_suffix(pathname: &str) -> String {
    let suffix = &uuid::Uuid::new_v4().simple().to_string()[..8];
    let (dir, file) = match pathname.rsplit_once('/') {
        Some((dir, file)) => (format!("{dir}/"), file),
        None => (String::new(), pathname),
    };
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{dir}{stem}-{suffix}.{ext}"),
        _ => format!("{dir}{file}-{suffix}"),
    }
}

// ============================================================================
// Client tokens
// ============================================================================

/// What the browser declares about a file before uploading it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[serde(default)]
    pub file_name: Option<String>,
    pub file_type: String,
    pub file_size: u64,
}

/// Bookkeeping attached to an issued token and echoed in the completion callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub user_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub uploaded_at: String,
}

/// Signed contents of a client token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub pathname: String,
    pub allowed_content_types: Vec<String>,
    pub maximum_size_in_bytes: u64,
    pub add_random_suffix: bool,
    /// Expiry, epoch milliseconds.
    pub valid_until: i64,
    /// JSON-encoded [`TokenPayload`].
    pub token_payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadAuthorization {
    pub client_token: String,
    pub valid_until: i64,
}

/// Blob fields reported by the provider once a direct upload finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedBlob {
    pub url: String,
    pub pathname: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
}

// ============================================================================
// Gateway
// ============================================================================

/// Validates upload requests and forwards storage calls to a [`BlobStore`].
#[derive(Clone)]
pub struct UploadGateway {
    store: Arc<dyn BlobStore>,
    limits: UploadsConfig,
    secret: Option<String>,
}

impl UploadGateway {
    pub fn new(store: Arc<dyn BlobStore>, limits: UploadsConfig, secret: Option<String>) -> Self {
        Self {
            store,
            limits,
            secret,
        }
    }

    /// Gateway over the configured HTTP provider. Token and signing secret
    /// come from the environment.
    pub fn from_config(uploads: &UploadsConfig, storage: &StorageConfig) -> Self {
        let store = HttpBlobStore::from_config(storage);
        if store.token.is_none() {
            tracing::warn!(
                "{} is not set; storage calls will fail",
                storage.token_env
            );
        }
        Self::new(Arc::new(store), uploads.clone(), storage.signing_secret())
    }

    pub fn limits(&self) -> &UploadsConfig {
        &self.limits
    }

    /// Check a declared type and size against the direct-upload rules.
    pub fn validate(&self, content_type: &str, size: u64) -> Result<(), UploadError> {
        if !self
            .limits
            .allowed_content_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(content_type))
        {
            return Err(UploadError::InvalidContentType(content_type.to_string()));
        }
        if size > self.limits.max_client_upload_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: self.limits.max_client_upload_bytes,
            });
        }
        Ok(())
    }

    /// Check a declared type and size against the small in-request rules.
    pub fn validate_small(&self, content_type: &str, size: u64) -> Result<(), UploadError> {
        if !content_type.to_ascii_lowercase().starts_with("image/") {
            return Err(UploadError::InvalidContentType(content_type.to_string()));
        }
        if size > self.limits.max_server_upload_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: self.limits.max_server_upload_bytes,
            });
        }
        Ok(())
    }

    /// Issue a signed token the browser uploads straight to the provider with.
    ///
    /// Never touches the network.
    pub fn request_upload_authorization(
        &self,
        pathname: &str,
        declared: &ClientPayload,
    ) -> Result<UploadAuthorization, UploadError> {
        if pathname.trim().is_empty() {
            return Err(UploadError::MissingPathname);
        }
        self.validate(&declared.file_type, declared.file_size)?;

        let now = Utc::now();
        let valid_until = now.timestamp_millis() + (self.limits.token_ttl_secs as i64) * 1000;
        let payload = TokenPayload {
            user_id: "anonymous".to_string(),
            file_name: declared
                .file_name
                .clone()
                .unwrap_or_else(|| pathname.to_string()),
            file_type: declared.file_type.clone(),
            file_size: declared.file_size,
            uploaded_at: now.to_rfc3339(),
        };
        let claims = TokenClaims {
            pathname: pathname.to_string(),
            allowed_content_types: self.limits.allowed_content_types.clone(),
            maximum_size_in_bytes: self.limits.max_client_upload_bytes,
            add_random_suffix: self.limits.add_random_suffix,
            valid_until,
            token_payload: serde_json::to_string(&payload)
                .map_err(|e| UploadError::InvalidRequest(e.to_string()))?,
        };
        let encoded = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&claims).map_err(|e| UploadError::InvalidRequest(e.to_string()))?,
        );
        let signature = hex::encode(self.sign(encoded.as_bytes())?);

        Ok(UploadAuthorization {
            client_token: format!("{TOKEN_PREFIX}{encoded}.{signature}"),
            valid_until,
        })
    }

    /// Check a client token's signature and expiry, returning its claims.
    pub fn verify_client_token(&self, token: &str) -> Result<TokenClaims, UploadError> {
        let body = token
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| UploadError::InvalidToken("unknown token format".into()))?;
        let (encoded, signature) = body
            .rsplit_once('.')
            .ok_or_else(|| UploadError::InvalidToken("missing signature".into()))?;
        self.verify(encoded.as_bytes(), signature)?;

        let raw = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| UploadError::InvalidToken(e.to_string()))?;
        let claims: TokenClaims =
            serde_json::from_slice(&raw).map_err(|e| UploadError::InvalidToken(e.to_string()))?;
        if claims.valid_until <= Utc::now().timestamp_millis() {
            return Err(UploadError::InvalidToken("token expired".into()));
        }
        Ok(claims)
    }

    /// Hex signature the provider puts on an upload-completed callback body.
    pub fn sign_callback(&self, body: &[u8]) -> Result<String, UploadError> {
        Ok(hex::encode(self.sign(body)?))
    }

    pub fn verify_callback(&self, body: &[u8], signature: &str) -> Result<(), UploadError> {
        self.verify(body, signature)
    }

    /// Record a finished direct upload. Bookkeeping only; never fails.
    pub fn complete_upload(&self, blob: &CompletedBlob, token_payload: Option<&str>) {
        let payload = token_payload.and_then(|p| serde_json::from_str::<TokenPayload>(p).ok());
        tracing::info!(
            url = %blob.url,
            pathname = %blob.pathname,
            size = blob.size.unwrap_or_default(),
            user = payload.as_ref().map(|p| p.user_id.as_str()).unwrap_or("unknown"),
            "blob upload completed"
        );
    }

    /// Upload a small image through this server.
    pub async fn upload_small(
        &self,
        filename: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<UploadedObject, UploadError> {
        if filename.trim().is_empty() {
            return Err(UploadError::MissingPathname);
        }
        self.validate_small(content_type, body.len() as u64)?;
        self.store
            .put(filename, content_type, body, self.limits.add_random_suffix)
            .await
            .map_err(|e| provider_failure("upload", "Failed to upload image", e))
    }

    /// Upload any allowed file through this server, under the direct-upload rules.
    pub async fn upload(
        &self,
        pathname: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<UploadedObject, UploadError> {
        if pathname.trim().is_empty() {
            return Err(UploadError::MissingPathname);
        }
        self.validate(content_type, body.len() as u64)?;
        self.store
            .put(pathname, content_type, body, self.limits.add_random_suffix)
            .await
            .map_err(|e| provider_failure("upload", "Failed to upload file", e))
    }

    /// Store a file under a client token's pathname, within the token's limits.
    ///
    /// The token is checked before the store is called, and a successful
    /// upload is recorded like a provider completion callback.
    pub async fn upload_with_token(
        &self,
        token: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<UploadedObject, UploadError> {
        let claims = self.verify_client_token(token)?;
        if !claims
            .allowed_content_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(content_type))
        {
            return Err(UploadError::InvalidContentType(content_type.to_string()));
        }
        let size = body.len() as u64;
        if size > claims.maximum_size_in_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: claims.maximum_size_in_bytes,
            });
        }
        let object = self
            .store
            .put(&claims.pathname, content_type, body, claims.add_random_suffix)
            .await
            .map_err(|e| provider_failure("upload", "Failed to upload file", e))?;
        self.complete_upload(
            &CompletedBlob {
                url: object.url.clone(),
                pathname: object.pathname.clone(),
                size: Some(object.size),
                content_type: Some(content_type.to_string()),
            },
            Some(&claims.token_payload),
        );
        Ok(object)
    }

    /// Delete an object. An empty pathname is rejected locally.
    pub async fn delete_object(&self, pathname: &str) -> Result<(), UploadError> {
        if pathname.trim().is_empty() {
            return Err(UploadError::MissingPathname);
        }
        self.store
            .delete(pathname)
            .await
            .map_err(|e| provider_failure("delete", "Failed to delete file", e))
    }

    /// Every object under `prefix`, following the provider's pagination.
    pub async fn list_objects(&self, prefix: Option<&str>) -> Result<Vec<UploadedObject>, UploadError> {
        let mut objects = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .store
                .list(prefix, cursor.as_deref())
                .await
                .map_err(|e| provider_failure("list", "Failed to list files", e))?;
            objects.extend(page.blobs);
            match page.cursor {
                Some(next) if page.has_more && cursor.as_deref() != Some(next.as_str()) => {
                    cursor = Some(next)
                }
                _ => break,
            }
        }
        Ok(objects)
    }

    fn mac(&self) -> Result<HmacSha256, UploadError> {
        let secret = self
            .secret
            .as_deref()
            .ok_or_else(|| UploadError::NotConfigured("no upload signing secret".into()))?;
        HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| UploadError::NotConfigured(e.to_string()))
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, UploadError> {
        let mut mac = self.mac()?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn verify(&self, data: &[u8], signature: &str) -> Result<(), UploadError> {
        let expected =
            hex::decode(signature).map_err(|_| UploadError::InvalidToken("bad signature".into()))?;
        let mut mac = self.mac()?;
        mac.update(data);
        mac.verify_slice(&expected)
            .map_err(|_| UploadError::InvalidToken("signature mismatch".into()))
    }
}

fn provider_failure(call: &str, message: &str, cause: UploadError) -> UploadError {
    tracing::error!("storage {} failed: {}", call, cause);
    UploadError::Storage(message.to_string())
}

// ============================================================================
// Per-control upload state
// ============================================================================

/// Upload progress of one file-input control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadSlot {
    #[default]
    Idle,
    Pending { file_name: String },
    Succeeded(UploadedObject),
    Failed { file_name: String, message: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("an upload is already in flight for {0}")]
pub struct SlotBusy(pub String);

impl UploadSlot {
    /// Start an upload. Refused while another one is pending.
    pub fn begin(&mut self, file_name: impl Into<String>) -> Result<(), SlotBusy> {
        if let UploadSlot::Pending { file_name } = self {
            return Err(SlotBusy(file_name.clone()));
        }
        *self = UploadSlot::Pending {
            file_name: file_name.into(),
        };
        Ok(())
    }

    /// Settle the pending upload. Ignored unless an upload is pending.
    pub fn finish(&mut self, result: Result<UploadedObject, UploadError>) {
        let UploadSlot::Pending { file_name } = self else {
            return;
        };
        *self = match result {
            Ok(object) => UploadSlot::Succeeded(object),
            Err(e) => UploadSlot::Failed {
                file_name: std::mem::take(file_name),
                message: e.to_string(),
            },
        };
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, UploadSlot::Pending { .. })
    }
}
