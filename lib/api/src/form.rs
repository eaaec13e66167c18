// Search form: an `image` file part or an `imageUrl` field, sent as
// multipart, JSON or urlencoded
use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::http::header;
use actix_web::{dev, web, FromRequest, HttpRequest};
use futures_util::StreamExt;
use serde::Deserialize;
use thiserror::Error;
use vmatch_core::UploadInfo;

pub const IMAGE_FIELD: &str = "image";
pub const IMAGE_URL_FIELD: &str = "imageUrl";

/// Text parts longer than this are rejected
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("File size exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("Field '{0}' is too long")]
    FieldTooLong(&'static str),

    #[error("Field '{0}' is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Invalid request body: {0}")]
    Body(String),
}

#[derive(Debug, Default)]
pub struct SearchForm {
    pub upload: Option<UploadInfo>,
    pub image_url: Option<String>,
}

/// JSON / urlencoded body. Other fields are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UrlBody {
    image_url: Option<String>,
}

impl SearchForm {
    /// Read the form according to the request's content type.
    ///
    /// Requests with no body type we understand yield an empty form.
    pub async fn extract(
        req: &HttpRequest,
        mut payload: dev::Payload,
        max_upload_bytes: usize,
    ) -> Result<Self, FormError> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/") {
            Self::read(Multipart::new(req.headers(), payload), max_upload_bytes).await
        } else if content_type.starts_with("application/json") {
            let body = web::Json::<UrlBody>::from_request(req, &mut payload)
                .await
                .map_err(|e| FormError::Body(e.to_string()))?;
            Ok(Self::from_url(body.into_inner().image_url))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let body = web::Form::<UrlBody>::from_request(req, &mut payload)
                .await
                .map_err(|e| FormError::Body(e.to_string()))?;
            Ok(Self::from_url(body.into_inner().image_url))
        } else {
            Ok(Self::default())
        }
    }

    fn from_url(image_url: Option<String>) -> Self {
        Self {
            upload: None,
            image_url,
        }
    }

    /// Read a multipart form, keeping only metadata of the uploaded file.
    ///
    /// Image bytes are counted against `max_upload_bytes` and dropped. Unknown
    /// parts are drained and ignored.
    pub async fn read(mut payload: Multipart, max_upload_bytes: usize) -> Result<Self, FormError> {
        let mut form = SearchForm::default();

        while let Some(item) = payload.next().await {
            let mut field = item?;
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                IMAGE_FIELD => {
                    let filename = field
                        .content_disposition()
                        .and_then(|cd| cd.get_filename())
                        .map(str::to_string);
                    let mime_type = field.content_type().map(|m| m.to_string());
                    let size = count_bytes(&mut field, max_upload_bytes).await?;
                    form.upload = Some(UploadInfo {
                        filename,
                        mime_type,
                        size,
                    });
                }
                IMAGE_URL_FIELD => {
                    form.image_url = Some(read_text(&mut field, IMAGE_URL_FIELD).await?);
                }
                _ => {
                    while let Some(chunk) = field.next().await {
                        chunk?;
                    }
                }
            }
        }

        Ok(form)
    }
}

async fn count_bytes(field: &mut Field, limit: usize) -> Result<usize, FormError> {
    let mut size = 0usize;
    while let Some(chunk) = field.next().await {
        size += chunk?.len();
        if size > limit {
            return Err(FormError::TooLarge { limit });
        }
    }
    Ok(size)
}

async fn read_text(field: &mut Field, name: &'static str) -> Result<String, FormError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(FormError::FieldTooLong(name));
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf).map_err(|_| FormError::InvalidUtf8(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use serde_json::json;

    const BOUNDARY: &str = "formboundary";

    fn multipart_request(body: String) -> test::TestRequest {
        test::TestRequest::post()
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
    }

    #[actix_web::test]
    async fn test_multipart_upload_metadata() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"shoe.png\"\r\nContent-Type: image/png\r\n\r\n0123456789abcdef\r\n--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nignored\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        let (req, payload) = multipart_request(body).to_http_parts();
        let form = SearchForm::extract(&req, payload, 1024).await.unwrap();

        let upload = form.upload.unwrap();
        assert_eq!(upload.filename.as_deref(), Some("shoe.png"));
        assert_eq!(upload.mime_type.as_deref(), Some("image/png"));
        assert_eq!(upload.size, 16);
        assert!(form.image_url.is_none());
    }

    #[actix_web::test]
    async fn test_json_and_urlencoded_bodies() {
        let (req, payload) = test::TestRequest::post()
            .set_json(json!({"imageUrl": "https://example.com/lamp.png", "other": 1}))
            .to_http_parts();
        let form = SearchForm::extract(&req, payload, 1024).await.unwrap();
        assert_eq!(form.image_url.as_deref(), Some("https://example.com/lamp.png"));

        let (req, payload) = test::TestRequest::post()
            .set_form([("imageUrl", "https://example.com/shoe.png")])
            .to_http_parts();
        let form = SearchForm::extract(&req, payload, 1024).await.unwrap();
        assert_eq!(form.image_url.as_deref(), Some("https://example.com/shoe.png"));
    }

    #[actix_web::test]
    async fn test_malformed_json_rejected() {
        let (req, payload) = test::TestRequest::post()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"imageUrl\": ")
            .to_http_parts();
        let result = SearchForm::extract(&req, payload, 1024).await;
        assert!(matches!(result, Err(FormError::Body(_))));
    }

    #[actix_web::test]
    async fn test_unknown_body_is_empty_form() {
        let (req, payload) = test::TestRequest::post()
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .set_payload("imageUrl=https://example.com/a.png")
            .to_http_parts();
        let form = SearchForm::extract(&req, payload, 1024).await.unwrap();
        assert!(form.upload.is_none());
        assert!(form.image_url.is_none());
    }
}
