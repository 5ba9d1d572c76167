use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use reqwest::StatusCode;

use crate::foundation::error::{RaceError, RaceResult};

/// Fallback name when the compile response carries no usable filename hint.
pub const DEFAULT_VIDEO_FILENAME: &str = "video.webm";

/// Opaque server-side recording session handle.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw handle value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw handle value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A compiled video downloaded from the service.
#[derive(Clone, Debug)]
pub struct VideoFile {
    /// Filename hint from the response (or [`DEFAULT_VIDEO_FILENAME`]).
    pub filename: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// External frame-compilation service consumed by the recording controller.
///
/// `create_session` and `submit_frame` are short calls that the controller
/// fires without always awaiting; `generate` may be long-running and is
/// cancelled by dropping its future.
pub trait VideoService: Send + Sync {
    /// Create a new recording session.
    fn create_session(&self) -> impl Future<Output = RaceResult<SessionId>> + Send;

    /// Submit one serialized frame tagged with its ordering value.
    fn submit_frame(
        &self,
        session: &SessionId,
        ordering: f64,
        svg: String,
    ) -> impl Future<Output = RaceResult<()>> + Send;

    /// Compile all submitted frames into a video at `framerate` fps.
    fn generate(
        &self,
        session: &SessionId,
        framerate: u32,
    ) -> impl Future<Output = RaceResult<VideoFile>> + Send;
}

#[derive(serde::Deserialize)]
struct CreateSessionResponse {
    id: String,
}

/// HTTP implementation of [`VideoService`].
///
/// Endpoints: `POST {base}/video/create/` (expects 201 with `{"id": ...}`),
/// `POST {base}/video/{id}/frame/` (form fields `ordering`, `svg`),
/// `GET {base}/video/{id}/generate/?framerate=N` (binary body, filename hint
/// in `content-disposition`).
#[derive(Clone, Debug)]
pub struct HttpVideoService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVideoService {
    /// Create a service client against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl VideoService for HttpVideoService {
    async fn create_session(&self) -> RaceResult<SessionId> {
        let response = self
            .client
            .post(self.url("video/create/"))
            .send()
            .await?;
        if response.status() != StatusCode::CREATED {
            return Err(RaceError::session(format!(
                "unexpected create status: {}",
                response.status()
            )));
        }
        let body: CreateSessionResponse = response.json().await?;
        Ok(SessionId::new(body.id))
    }

    async fn submit_frame(
        &self,
        session: &SessionId,
        ordering: f64,
        svg: String,
    ) -> RaceResult<()> {
        let response = self
            .client
            .post(self.url(&format!("video/{}/frame/", session.as_str())))
            .form(&[("ordering", ordering.to_string()), ("svg", svg)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RaceError::capture(format!(
                "frame submission rejected: {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn generate(&self, session: &SessionId, framerate: u32) -> RaceResult<VideoFile> {
        let response = self
            .client
            .get(self.url(&format!(
                "video/{}/generate/?framerate={framerate}",
                session.as_str()
            )))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RaceError::finalize(format!(
                "generate rejected: {}",
                response.status()
            )));
        }
        let filename = filename_from_content_disposition(
            response
                .headers()
                .get(reqwest::header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
        );
        let bytes = response.bytes().await?;
        Ok(VideoFile {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}

/// Extract the `filename="..."` hint from a `content-disposition` header,
/// falling back to [`DEFAULT_VIDEO_FILENAME`] when absent or malformed.
pub fn filename_from_content_disposition(header: Option<&str>) -> String {
    let Some(header) = header else {
        return DEFAULT_VIDEO_FILENAME.to_string();
    };
    let Some(start) = header.find("filename=\"") else {
        return DEFAULT_VIDEO_FILENAME.to_string();
    };
    let rest = &header[start + "filename=\"".len()..];
    match rest.find('"') {
        Some(end) if end > 0 => rest[..end].to_string(),
        _ => DEFAULT_VIDEO_FILENAME.to_string(),
    }
}

/// Write a downloaded video into `dir` under its filename hint, returning the
/// written path.
pub fn save_video(file: &VideoFile, dir: &Path) -> RaceResult<PathBuf> {
    let path = dir.join(&file.filename);
    std::fs::write(&path, &file.bytes)
        .with_context(|| format!("failed to write video to {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/record/service.rs"]
mod tests;
