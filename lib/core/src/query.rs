use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Key used when an upload carries neither a filename nor a MIME type
pub const UPLOAD_FALLBACK_KEY: &str = "uploaded-file";

/// Identifying metadata of an uploaded image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadInfo {
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub size: usize,
}

/// String a search is scored against. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    /// Derive the key from a search request.
    ///
    /// An upload wins over a URL: its filename, else its MIME type, else
    /// [`UPLOAD_FALLBACK_KEY`]. Without an upload the URL is used as is.
    /// Empty strings count as absent.
    pub fn derive(upload: Option<&UploadInfo>, url: Option<&str>) -> Result<Self> {
        if let Some(upload) = upload {
            let key = non_empty(upload.filename.as_deref())
                .or_else(|| non_empty(upload.mime_type.as_deref()))
                .unwrap_or(UPLOAD_FALLBACK_KEY);
            return Ok(Self(key.to_string()));
        }

        non_empty(url)
            .map(|u| Self(u.to_string()))
            .ok_or(Error::MissingQueryKey)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
