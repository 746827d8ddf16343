//! Route handlers for the copyscan HTTP API.

use std::collections::BTreeSet;

use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{Extension, Multipart};
use serde::{Deserialize, Serialize};

use copyscan_core::compare::compare_documents;
use copyscan_core::pipeline::SilentProgress;
use copyscan_extract::extract_text;
use copyscan_shared::{AggregateReport, CopyscanError, FileComparison};

use crate::app::AppState;
use crate::error::ApiError;

const NO_TEXT_MESSAGE: &str = "No text provided for plagiarism check";

// ---------------------------------------------------------------------------
// Request resolution
// ---------------------------------------------------------------------------

/// A check request, resolved from multipart form fields at the boundary.
///
/// An uploaded `file` field wins over an inline `text` field when both are
/// present. A file part without a filename (an untouched browser file
/// input) does not count as an upload.
enum CheckRequest {
    Text(String),
    File { name: String, bytes: Vec<u8> },
}

impl CheckRequest {
    /// Pull the request out of the multipart body.
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut text: Option<String> = None;
        let mut file: Option<(String, Vec<u8>)> = None;

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                "file" => {
                    if let Some(upload) = read_upload(field).await? {
                        file = Some(upload);
                    }
                }
                "text" => text = Some(field.text().await?),
                _ => {}
            }
        }

        match (file, text) {
            (Some((name, bytes)), _) => Ok(Self::File { name, bytes }),
            (None, Some(text)) => Ok(Self::Text(text)),
            (None, None) => Err(CopyscanError::validation(NO_TEXT_MESSAGE).into()),
        }
    }

    /// Resolve the request to plain text, extracting uploaded documents.
    fn into_text(self) -> Result<String, ApiError> {
        let text = match self {
            Self::Text(text) => text,
            Self::File { name, bytes } => extract_text(&name, &bytes)?,
        };

        if text.trim().is_empty() {
            return Err(CopyscanError::validation(NO_TEXT_MESSAGE).into());
        }
        Ok(text)
    }
}

/// Read an uploaded part's filename and content.
///
/// A part whose filename is missing or empty is an untouched browser file
/// input, not an upload; it yields `None` so other fields can still
/// satisfy the request.
async fn read_upload(field: Field<'_>) -> Result<Option<(String, Vec<u8>)>, ApiError> {
    let Some(name) = field
        .file_name()
        .map(str::to_string)
        .filter(|name| !name.is_empty())
    else {
        return Ok(None);
    };
    let bytes = field.bytes().await?;
    Ok(Some((name, bytes.to_vec())))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /check_plagiarism — run the full check pipeline over inline text or
/// an uploaded document.
pub(crate) async fn check_plagiarism(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<Json<AggregateReport>, ApiError> {
    let text = CheckRequest::from_multipart(multipart).await?.into_text()?;
    let report = state.orchestrator.run(&text, &SilentProgress).await?;
    Ok(Json(report))
}

/// POST /compare_files — whole-document similarity between two uploads.
pub(crate) async fn compare_files(
    mut multipart: Multipart,
) -> Result<Json<FileComparison>, ApiError> {
    let mut file1: Option<(String, Vec<u8>)> = None;
    let mut file2: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "file1" => {
                if let Some(upload) = read_upload(field).await? {
                    file1 = Some(upload);
                }
            }
            "file2" => {
                if let Some(upload) = read_upload(field).await? {
                    file2 = Some(upload);
                }
            }
            _ => {}
        }
    }

    let (Some((name1, bytes1)), Some((name2, bytes2))) = (file1, file2) else {
        return Err(CopyscanError::validation("Two files are required").into());
    };

    let text1 = extract_text(&name1, &bytes1)?;
    let text2 = extract_text(&name2, &bytes2)?;
    Ok(Json(compare_documents(&name1, &text1, &name2, &text2)))
}

/// Body of an `extract_seo_keywords` request.
#[derive(Debug, Deserialize)]
pub(crate) struct KeywordRequest {
    #[serde(default)]
    text: Option<String>,
}

/// Deduplicated keyword set, sorted for a stable wire order.
#[derive(Debug, Serialize)]
pub(crate) struct KeywordResponse {
    seo_keywords: BTreeSet<String>,
}

/// POST /extract_seo_keywords — topic and entity keywords for SEO.
pub(crate) async fn extract_seo_keywords(
    Extension(state): Extension<AppState>,
    Json(body): Json<KeywordRequest>,
) -> Result<Json<KeywordResponse>, ApiError> {
    let text = body
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| CopyscanError::validation("Text is required"))?;

    let Some(annotate) = &state.annotate else {
        return Err(CopyscanError::config(
            "annotation API key not configured; keyword extraction is disabled",
        )
        .into());
    };

    let seo_keywords = annotate.extract_keywords(&text).await?;
    Ok(Json(KeywordResponse { seo_keywords }))
}

/// GET /health — liveness check.
pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use tower::ServiceExt;

    use copyscan_shared::AppConfig;

    use crate::app;

    const BOUNDARY: &str = "copyscan-test-boundary";

    /// Assemble the full router against a stub search endpoint.
    fn test_router(search_endpoint: &str) -> axum::Router {
        let mut config = AppConfig::default();
        config.search.endpoint = search_endpoint.to_string();
        config.fetch.retry_delay_ms = 0;
        // Keep the annotate client off regardless of the host environment.
        config.annotate.api_key_env = "COPYSCAN_TEST_UNSET_KEY".into();
        let state = app::build_state(&config).expect("state builds");
        app::build_app(state)
    }

    /// Serve a results page with no hits on GET /search.
    async fn mock_search_without_results() -> wiremock::MockServer {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string("<html><body><p>No results found.</p></body></html>"),
            )
            .mount(&server)
            .await;
        server
    }

    /// Encode `(name, filename, value)` parts as a multipart/form-data body.
    fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (name, filename, value) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\""));
            if let Some(filename) = filename {
                body.push_str(&format!("; filename=\"{filename}\""));
            }
            body.push_str("\r\n\r\n");
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn inline_text_resolves_as_is() {
        let request = CheckRequest::Text("Some document text.".into());
        assert_eq!(request.into_text().unwrap(), "Some document text.");
    }

    #[test]
    fn blank_text_is_rejected() {
        let request = CheckRequest::Text("   \n ".into());
        assert!(request.into_text().is_err());
    }

    #[test]
    fn uploaded_txt_file_is_extracted() {
        let request = CheckRequest::File {
            name: "essay.txt".into(),
            bytes: b"An uploaded essay.".to_vec(),
        };
        assert_eq!(request.into_text().unwrap(), "An uploaded essay.");
    }

    #[test]
    fn unsupported_upload_is_rejected() {
        let request = CheckRequest::File {
            name: "photo.png".into(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        };
        assert!(request.into_text().is_err());
    }

    #[test]
    fn keyword_response_uses_the_wire_key() {
        let response = KeywordResponse {
            seo_keywords: BTreeSet::from(["rust".to_string(), "axum".to_string()]),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"seo_keywords":["axum","rust"]}"#);
    }

    #[tokio::test]
    async fn uploaded_file_wins_over_inline_text() {
        let server = mock_search_without_results().await;
        let app = test_router(&server.uri());

        let request = multipart_request(
            "/check_plagiarism",
            &[
                ("text", None, "Inline one. Inline two. Inline three."),
                ("file", Some("upload.txt"), "Only sentence from the file."),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // One sentence in the report means the upload was checked, not the
        // three-sentence inline text.
        let body = response_json(response).await;
        assert_eq!(body["total_sentences"], 1);
        assert_eq!(body["message"], "No plagiarism detected!");
    }

    #[tokio::test]
    async fn blank_filename_upload_falls_back_to_inline_text() {
        let server = mock_search_without_results().await;
        let app = test_router(&server.uri());

        // Browsers send a file part with an empty filename when the file
        // input was left untouched.
        let request = multipart_request(
            "/check_plagiarism",
            &[
                ("file", Some(""), ""),
                ("text", None, "First inline. Second inline."),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["total_sentences"], 2);
    }

    #[tokio::test]
    async fn missing_text_and_file_is_a_400() {
        let app = test_router("http://127.0.0.1:1");

        let request =
            multipart_request("/check_plagiarism", &[("comment", None, "unrelated field")]);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["error"], NO_TEXT_MESSAGE);
    }

    #[tokio::test]
    async fn compare_files_requires_both_files() {
        let app = test_router("http://127.0.0.1:1");

        let request = multipart_request(
            "/compare_files",
            &[("file1", Some("a.txt"), "Some content here.")],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["error"], "Two files are required");
    }

    #[tokio::test]
    async fn compare_files_skips_a_blank_filename_part() {
        let app = test_router("http://127.0.0.1:1");

        let request = multipart_request(
            "/compare_files",
            &[
                ("file1", Some(""), ""),
                ("file2", Some("b.txt"), "Some content here."),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["error"], "Two files are required");
    }

    #[tokio::test]
    async fn compare_files_reports_ratio_and_names() {
        let app = test_router("http://127.0.0.1:1");

        let request = multipart_request(
            "/compare_files",
            &[
                ("file1", Some("a.txt"), "The very same text."),
                ("file2", Some("b.txt"), "The very same text."),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["similarity"], 1.0);
        assert_eq!(body["file1_name"], "a.txt");
        assert_eq!(body["file2_name"], "b.txt");
    }
}
