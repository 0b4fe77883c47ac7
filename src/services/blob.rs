//! Blob upload client
//!
//! Opaque collaborator around the third-party image hosting service: takes
//! the uploaded bytes, posts them as multipart form data, returns the
//! publicly reachable URL from the response.

use serde::Deserialize;

use crate::utils::AppError;

/// Expected hosting response shape
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

#[derive(Debug, Clone)]
pub struct BlobClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl BlobClient {
    pub fn new(endpoint: Option<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    /// Upload image bytes, returning their public URL
    pub async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String, AppError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| AppError::internal("IMAGE_UPLOAD_URL is not configured"))?;

        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let filename = filename.to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime.as_ref())
            .map_err(|e| AppError::internal(format!("Invalid upload mime type: {e}")))?;

        let form = reqwest::multipart::Form::new().part("image", part);

        let mut request = self.http.post(endpoint);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Image hosting request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "Image hosting returned {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Bad image hosting response: {e}")))?;

        Ok(body.url)
    }
}
