use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use syllabix_logging::syllabix_info;
use thiserror::Error;

use crate::{ClientSettings, JobId};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    #[serde(default)]
    pub page_count: u32,
    pub file_id: String,
}

/// Server reply to an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    pub job_id: JobId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("at least one file is required")]
    NoFiles,
    #[error("only PDF files are supported: {}", .0.display())]
    NotPdf(PathBuf),
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
    #[error("upload rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Hands files to the job runner and returns the job to watch.
#[async_trait::async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit(&self, files: &[PathBuf]) -> Result<UploadReceipt, UploadError>;
}

/// Multipart `POST {server}/upload-files`.
#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: ClientSettings,
}

impl ReqwestSubmitter {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl JobSubmitter for ReqwestSubmitter {
    async fn submit(&self, files: &[PathBuf]) -> Result<UploadReceipt, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }
        if let Some(path) = files.iter().find(|path| !is_pdf(path)) {
            return Err(UploadError::NotPdf(path.clone()));
        }
        let url = self
            .settings
            .upload_url()
            .map_err(|err| UploadError::InvalidUrl(err.message))?;

        let mut form = Form::new();
        for path in files {
            let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
                path: path.clone(),
                source,
            })?;
            let part = Part::bytes(bytes)
                .file_name(file_name(path))
                .mime_str("application/pdf")?;
            form = form.part("files", part);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.upload_timeout)
            .build()?;
        let response = client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        let receipt: UploadReceipt = response.json().await?;
        syllabix_info!(
            "Uploaded {} file(s), job {}",
            receipt.files.len(),
            receipt.job_id
        );
        Ok(receipt)
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string())
}

/// Pulls `detail` out of an error body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_detection_is_case_insensitive() {
        assert!(is_pdf(Path::new("exam.PDF")));
        assert!(is_pdf(Path::new("dir/exam.pdf")));
        assert!(!is_pdf(Path::new("scan.png")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn error_detail_prefers_json_detail() {
        assert_eq!(
            error_detail(r#"{"detail":"Only PDF files are supported. Found: .png"}"#),
            "Only PDF files are supported. Found: .png"
        );
        assert_eq!(error_detail("  Bad Gateway \n"), "Bad Gateway");
    }
}
