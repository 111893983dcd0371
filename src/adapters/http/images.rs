use crate::application::TagService;
use crate::ports::media::{MediaStoreError, MediaStorePort};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path as UrlPath, State},
    http::StatusCode,
    routing::{get, post},
    BoxError, Json, Router,
};
use futures::{Stream, TryStreamExt};
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tempfile::NamedTempFile;
use tokio::{fs::File, io::BufWriter};
use tokio_util::io::StreamReader;
use tracing::info;

// Square photos under 2 MB work best; anything past this is rejected outright.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

static PUBLIC_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid regex"));

pub struct AppState<M> {
    pub tags: Arc<TagService<M>>,
    /// Bundled badge-frame template, uploaded by the seeding route.
    pub frame_asset: PathBuf,
}

// Manual impl: `derive(Clone)` would demand `M: Clone` even though the
// service sits behind an `Arc`.
impl<M> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            tags: self.tags.clone(),
            frame_asset: self.frame_asset.clone(),
        }
    }
}

pub fn router<M>(state: AppState<M>, serve_test_page: bool) -> Router
where
    M: MediaStorePort + 'static,
{
    let mut router = Router::new()
        .route("/api/images", post(create_tag::<M>))
        .route("/api/images/:id", get(get_image::<M>).post(seed_image::<M>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    if serve_test_page {
        router = router.route("/", get(super::test_page::show));
    }

    router.with_state(state)
}

type ApiError = (StatusCode, Json<Value>);

fn success(result: impl Serialize) -> Json<Value> {
    Json(json!({ "message": "Success", "result": result }))
}

fn error_body(error: impl Into<String>) -> Json<Value> {
    Json(json!({ "message": "Error", "error": error.into() }))
}

fn bad_request(err: impl std::fmt::Display) -> ApiError {
    (StatusCode::BAD_REQUEST, error_body(err.to_string()))
}

fn internal(err: io::Error) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, error_body(err.to_string()))
}

/// The upstream status code passes through when the media service sent one.
fn upstream(err: MediaStoreError) -> ApiError {
    let status = err
        .http_code()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::BAD_REQUEST);
    (status, error_body(err.to_string()))
}

// Handler for `POST /api/images`: multipart form with a `name` text field and
// `then`/`now` file fields. Returns the composite tag URL.
async fn create_tag<M: MediaStorePort + 'static>(
    State(state): State<AppState<M>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut name: Option<String> = None;
    let mut then_file: Option<NamedTempFile> = None;
    let mut now_file: Option<NamedTempFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let Some(field_name) = field.name().map(str::to_owned) else {
            continue;
        };
        match field_name.as_str() {
            "name" => name = Some(field.text().await.map_err(bad_request)?),
            "then" => then_file = Some(spool_field(field).await?),
            "now" => now_file = Some(spool_field(field).await?),
            _ => continue,
        }
    }

    let name = name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| bad_request("name field is required"))?;
    let then_file = then_file.ok_or_else(|| bad_request("then image is required"))?;
    let now_file = now_file.ok_or_else(|| bad_request("now image is required"))?;

    let url = state
        .tags
        .create_tag(name.trim(), then_file.path(), now_file.path())
        .await
        .map_err(upstream)?;

    info!(%url, "tag composed");
    Ok(success(url))
}

// Handler for `GET /api/images/:id`: look up an existing asset. A 404 from
// the media service means the badge frame has not been seeded yet.
async fn get_image<M: MediaStorePort + 'static>(
    State(state): State<AppState<M>>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<Value>, ApiError> {
    if !PUBLIC_ID_RE.is_match(&id) {
        return Err(bad_request("invalid image id"));
    }
    let asset = state.tags.badge_frame(&id).await.map_err(upstream)?;
    Ok(success(asset))
}

// Handler for `POST /api/images/:id`: upload the bundled badge-frame
// template under the given public id.
async fn seed_image<M: MediaStorePort + 'static>(
    State(state): State<AppState<M>>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<Value>, ApiError> {
    if !PUBLIC_ID_RE.is_match(&id) {
        return Err(bad_request("invalid image id"));
    }
    let asset = state
        .tags
        .seed_badge_frame(&id, &state.frame_asset)
        .await
        .map_err(upstream)?;
    Ok(success(asset))
}

/// Spool a multipart field to a temp file so the media store can upload from
/// a path. The temp file is removed when the handle drops.
async fn spool_field<S, E>(stream: S) -> Result<NamedTempFile, ApiError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let spool = NamedTempFile::new().map_err(internal)?;
    stream_to_file(spool.path(), stream).await.map_err(internal)?;
    Ok(spool)
}

// Save a `Stream` to a file
async fn stream_to_file<S, E>(path: &Path, stream: S) -> io::Result<()>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let body_with_io_error = stream.map_err(|err| io::Error::new(io::ErrorKind::Other, err));
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);

    let mut file = BufWriter::new(File::create(path).await?);
    tokio::io::copy(&mut body_reader, &mut file).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::media::{MediaAsset, MockMediaStorePort};
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use bytes::Bytes;
    use futures::stream;
    use std::fs;
    use tempfile::tempdir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "tag-test-boundary";

    fn text_part(name: &str, value: &str) -> String {
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
    }

    fn file_part(name: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
             filename=\"{name}.png\"\r\nContent-Type: image/png\r\n\r\nfake-png-bytes\r\n"
        )
    }

    fn multipart_request(parts: &[String]) -> Request<Body> {
        let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
        Request::builder()
            .method("POST")
            .uri("/api/images")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn app(store: MockMediaStorePort) -> Router {
        let state = AppState {
            tags: Arc::new(TagService::new(store, "badge-frame")),
            frame_asset: PathBuf::from("assets/badge-frame.png"),
        };
        router(state, false)
    }

    fn asset(public_id: &str) -> MediaAsset {
        MediaAsset {
            public_id: public_id.to_string(),
            secure_url: format!("https://cdn.example.com/{}", public_id),
            resource_type: "image".to_string(),
            format: Some("png".to_string()),
            width: None,
            height: None,
            bytes: None,
            created_at: None,
        }
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn create_tag_returns_success_envelope_with_url() {
        let mut store = MockMediaStorePort::new();
        store
            .expect_upload()
            .times(2)
            .returning(|_, _| Ok(asset("virtual-event-tags/photo")));
        store
            .expect_delivery_url()
            .times(1)
            .returning(|_, _| "https://cdn.example.com/composite".to_string());

        let request = multipart_request(&[
            text_part("name", "Jane Doe"),
            file_part("then"),
            file_part("now"),
        ]);
        let response = app(store).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Success");
        assert_eq!(body["result"], "https://cdn.example.com/composite");
    }

    #[tokio::test]
    async fn create_tag_without_name_is_rejected() {
        // No expectations: nothing may reach the media store.
        let store = MockMediaStorePort::new();

        let request = multipart_request(&[file_part("then"), file_part("now")]);
        let response = app(store).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Error");
        assert!(body["error"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn create_tag_without_photo_is_rejected() {
        let store = MockMediaStorePort::new();

        let request = multipart_request(&[text_part("name", "Jane Doe"), file_part("then")]);
        let response = app(store).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Error");
        assert!(body["error"].as_str().unwrap().contains("now"));
    }

    #[tokio::test]
    async fn get_image_passes_upstream_not_found_through() {
        let mut store = MockMediaStorePort::new();
        store.expect_resource().times(1).returning(|_| {
            Err(MediaStoreError::Upstream {
                http_code: 404,
                message: "Resource not found".to_string(),
            })
        });

        let request = Request::builder()
            .method("GET")
            .uri("/api/images/badge-frame")
            .body(Body::empty())
            .unwrap();
        let response = app(store).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Error");
    }

    #[tokio::test]
    async fn stream_to_file_writes_all_chunks() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("photo.png");

        type E = std::io::Error;
        let chunks = stream::iter(vec![
            Ok::<Bytes, E>(Bytes::from_static(b"\x89PNG\r\n\x1a\n")),
            Ok(Bytes::from_static(b"second-chunk")),
        ]);

        stream_to_file(&file_path, chunks).await.unwrap();
        assert_eq!(fs::read(&file_path).unwrap(), b"\x89PNG\r\n\x1a\nsecond-chunk");
    }

    #[tokio::test]
    async fn stream_to_file_surfaces_stream_error_as_io() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("photo.png");

        let broken = stream::iter(vec![Err("connection reset")]);
        let err = stream_to_file(&file_path, broken).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn spooled_field_survives_until_handle_drops() {
        type E = std::io::Error;
        let mock_stream = stream::iter(vec![Ok::<Bytes, E>(Bytes::from_static(b"png-ish"))]);

        let spool = spool_field(mock_stream).await.unwrap();
        let path = spool.path().to_path_buf();
        assert_eq!(fs::read(&path).unwrap(), b"png-ish");

        drop(spool);
        assert!(!path.exists());
    }

    #[test]
    fn public_id_pattern_rejects_traversal() {
        assert!(PUBLIC_ID_RE.is_match("badge-frame"));
        assert!(PUBLIC_ID_RE.is_match("frame_v2.png"));
        assert!(!PUBLIC_ID_RE.is_match("../etc/passwd"));
        assert!(!PUBLIC_ID_RE.is_match("a/b"));
        assert!(!PUBLIC_ID_RE.is_match(""));
    }

    #[test]
    fn upstream_error_keeps_service_status_code() {
        let (status, _) = upstream(MediaStoreError::Upstream {
            http_code: 404,
            message: "not found".to_string(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn non_upstream_error_maps_to_bad_request() {
        let err = MediaStoreError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let (status, _) = upstream(err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
