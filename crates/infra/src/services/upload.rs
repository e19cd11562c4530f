//! Upload service client

use basalam_common::http::{FilePart, HttpMethod};
use basalam_domain::types::upload::{UploadFileRequest, UploadedFile};
use tracing::instrument;

use crate::api::service::ServiceClient;
use crate::api::ApiResult;

/// Client for `uploadio.basalam.com`
#[derive(Debug, Clone)]
pub struct UploadService {
    client: ServiceClient,
}

impl UploadService {
    /// Wrap a client bound to the upload service.
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// The underlying request core, for endpoints without a typed method
    #[must_use]
    pub const fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Upload a file as `multipart/form-data`; the content travels in the
    /// `file` part and the options as text fields.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for an
    /// empty file; otherwise any error of the request.
    #[instrument(
        skip(self, upload),
        fields(
            file_name = %upload.file_name,
            file_type = %upload.file_type,
            size = upload.bytes.len()
        )
    )]
    pub async fn upload_file(&self, upload: UploadFileRequest) -> ApiResult<UploadedFile> {
        upload.validate()?;
        let fields = upload.form_fields();
        let file = FilePart {
            field: "file".to_string(),
            file_name: upload.file_name,
            content_type: upload.content_type,
            bytes: upload.bytes,
        };
        let request =
            self.client.request(HttpMethod::Post, "/v3/files")?.multipart(fields, vec![file]);
        self.client.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use basalam_common::http::RequestBody;
    use basalam_common::testing::MockTransport;
    use basalam_domain::config::Service;
    use basalam_domain::types::upload::FileType;
    use serde_json::json;

    use super::*;
    use crate::api::ApiError;
    use crate::services::test_support;

    const URL: &str = "https://uploadio.basalam.com/v3/files";

    fn service(transport: &MockTransport) -> UploadService {
        UploadService::new(test_support::client(Service::Upload, transport))
    }

    /// Validates the multipart upload.
    ///
    /// Assertions:
    /// - The file travels in the `file` part with its content type.
    /// - `file_type` and `expire_minutes` are sent as text fields.
    /// - The stored file metadata is decoded.
    #[tokio::test]
    async fn test_upload_file_multipart() {
        let transport = MockTransport::new();
        transport.push_json(
            URL,
            200,
            json!({"id": 900, "urls": {"primary": "https://cdn.example/900.jpg"}}),
        );

        let bytes = vec![0xFF, 0xD8, 0xFF];
        let upload = UploadFileRequest::new("cover.jpg", bytes, FileType::ProductPhoto)
            .with_content_type("image/jpeg")
            .expiring_after(30);
        let stored = service(&transport).upload_file(upload).await.unwrap();

        assert_eq!(stored.id, 900);
        assert_eq!(stored.urls["primary"], "https://cdn.example/900.jpg");
        let RequestBody::Multipart { fields, files } = transport.last_request().unwrap().body else {
            unreachable!("uploads are multipart");
        };
        assert!(fields.contains(&("file_type".to_string(), "product.photo".to_string())));
        assert!(fields.contains(&("expire_minutes".to_string(), "30".to_string())));
        assert_eq!(files[0].field, "file");
        assert_eq!(files[0].content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(files[0].bytes.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_file_rejected() {
        let transport = MockTransport::new();
        let upload = UploadFileRequest::new("empty.txt", Vec::new(), FileType::ProductPhoto);

        let uploads = service(&transport);
        assert!(matches!(uploads.upload_file(upload).await, Err(ApiError::InvalidInput(_))));
        assert_eq!(transport.total_requests(), 0);
    }
}
