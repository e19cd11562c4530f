//! Upload service models

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, Result};

/// Purpose of an uploaded file; selects the storage bucket and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "product.photo")]
    ProductPhoto,
    #[serde(rename = "product.video")]
    ProductVideo,
    #[serde(rename = "user.avatar")]
    UserAvatar,
    #[serde(rename = "user.cover")]
    UserCover,
    #[serde(rename = "vendor.cover")]
    VendorCover,
    #[serde(rename = "vendor.logo")]
    VendorLogo,
    #[serde(rename = "chat.photo")]
    ChatPhoto,
    #[serde(rename = "chat.video")]
    ChatVideo,
    #[serde(rename = "chat.voice")]
    ChatVoice,
    #[serde(rename = "chat.file")]
    ChatFile,
}

impl FileType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductPhoto => "product.photo",
            Self::ProductVideo => "product.video",
            Self::UserAvatar => "user.avatar",
            Self::UserCover => "user.cover",
            Self::VendorCover => "vendor.cover",
            Self::VendorLogo => "vendor.logo",
            Self::ChatPhoto => "chat.photo",
            Self::ChatVideo => "chat.video",
            Self::ChatVoice => "chat.voice",
            Self::ChatFile => "chat.file",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file to send as `multipart/form-data` to `POST /v3/files`
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFileRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_type: FileType,
    pub custom_unique_name: Option<String>,
    pub expire_minutes: Option<u32>,
}

impl fmt::Debug for UploadFileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFileRequest")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("file_type", &self.file_type)
            .field("custom_unique_name", &self.custom_unique_name)
            .field("expire_minutes", &self.expire_minutes)
            .finish()
    }
}

impl UploadFileRequest {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, file_type: FileType) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: None,
            file_type,
            custom_unique_name: None,
            expire_minutes: None,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn with_unique_name(mut self, name: impl Into<String>) -> Self {
        self.custom_unique_name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn expiring_after(mut self, minutes: u32) -> Self {
        self.expire_minutes = Some(minutes);
        self
    }

    /// Text fields sent alongside the `file` part.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("file_type".to_string(), self.file_type.as_str().to_string())];
        super::push_opt(&mut fields, "custom_unique_name", self.custom_unique_name.as_deref());
        super::push_opt(&mut fields, "expire_minutes", self.expire_minutes.as_ref());
        fields
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for an empty file or file name.
    pub fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() {
            return Err(DomainError::invalid("file_name", "must not be empty"));
        }
        if self.bytes.is_empty() {
            return Err(DomainError::invalid("file", "must not be empty"));
        }
        Ok(())
    }
}

/// Stored file metadata returned after an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: i64,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_name_alone: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub file_type: Option<i64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub urls: std::collections::BTreeMap<String, String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub creator_user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_file_type_wire_names() {
        assert_eq!(serde_json::to_value(FileType::ChatVoice).unwrap(), json!("chat.voice"));
        assert_eq!(FileType::VendorLogo.to_string(), "vendor.logo");
    }

    #[test]
    fn test_form_fields() {
        let request = UploadFileRequest::new("a.png", vec![1, 2, 3], FileType::ProductPhoto)
            .expiring_after(30);
        assert_eq!(
            request.form_fields(),
            vec![
                ("file_type".to_string(), "product.photo".to_string()),
                ("expire_minutes".to_string(), "30".to_string())
            ]
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_upload_rejected() {
        let request = UploadFileRequest::new("a.png", Vec::new(), FileType::ProductPhoto);
        assert!(matches!(
            request.validate(),
            Err(DomainError::InvalidInput(msg)) if msg.starts_with("file")
        ));
    }

    #[test]
    fn test_debug_omits_bytes() {
        let request = UploadFileRequest::new("a.png", vec![0; 2048], FileType::ChatFile);
        assert!(format!("{request:?}").contains("bytes: 2048"));
    }

    #[test]
    fn test_uploaded_file_decoding() {
        let file: UploadedFile = serde_json::from_value(json!({
            "id": 8, "file_name": "a.png", "type": "image", "urls": {"small": "https://x/s.png"}
        }))
        .unwrap();
        assert_eq!(file.kind.as_deref(), Some("image"));
        assert_eq!(file.urls["small"], "https://x/s.png");
    }
}
