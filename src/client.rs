use crate::check_response::{CheckListResponse, CheckResponse};
use crate::config::ClientConfig;
use crate::document_response::{DocumentListResponse, DocumentResponse};
use crate::envelope;
use crate::errors::{KycError, ResultExt};
use crate::models::{ImageType, ListChecksFilter};
use crate::validation;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, RequestBuilder, Url};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tokio_util::io::ReaderStream;

/// Crate version, sent in the `User-Agent` header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("DataFabric-KYC-SDK/", env!("CARGO_PKG_VERSION"));

/// Sent as `X-Api-Key`; header names are case-insensitive on the wire.
const API_KEY_HEADER: &str = "x-api-key";

/// Client for the DataFabric KYC API.
///
/// Each call builds its own request; the client holds no per-call state and
/// can be cloned cheaply.
#[derive(Clone)]
pub struct KycClient {
    client: reqwest::Client,
    base_url: String,
    checks_url: Url,
    test_mode: bool,
}

impl KycClient {
    /// Creates a client against the production host with default timeouts.
    pub fn new(api_key: impl Into<String>) -> Result<Self, KycError> {
        Self::from_config(ClientConfig::new(api_key))
    }

    /// Creates a client against a custom host (staging, local mock).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, KycError> {
        Self::from_config(ClientConfig::new(api_key).with_base_url(base_url))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, KycError> {
        config.validate()?;

        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            KycError::Validation("API key contains invalid header characters".to_string())
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .context("Failed to create KYC client")?;

        let base_url = config.normalized_base_url();
        let mut checks_url = Url::parse(&base_url)
            .map_err(|e| KycError::Validation(format!("Invalid base URL: {}", e)))?;
        checks_url
            .path_segments_mut()
            .map_err(|_| KycError::Validation(format!("Invalid base URL: {}", base_url)))?
            .pop_if_empty()
            .extend(["api", "v1", "kyc", "checks"]);
        let test_mode = config.is_test_mode();
        tracing::debug!("KYC client ready for {} (test mode: {})", base_url, test_mode);

        Ok(Self {
            client,
            base_url,
            checks_url,
            test_mode,
        })
    }

    /// Whether the API key is a sandbox key. Purely a prefix check.
    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates a new KYC check.
    ///
    /// # Arguments
    ///
    /// * `payload` - A [`CreateCheckRequest`](crate::models::CreateCheckRequest)
    ///   or any value serializing to a JSON object with the same fields.
    ///
    /// # Errors
    ///
    /// Validation failures are returned before any request is sent.
    pub async fn create_check<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<CheckResponse, KycError> {
        let body = match serde_json::to_value(payload) {
            Ok(Value::Object(map)) => map,
            _ => {
                return Err(KycError::Validation(
                    "Check payload must be a JSON object".to_string(),
                ))
            }
        };
        validation::validate_check_creation(&body)?;

        tracing::info!("Creating KYC check");
        let data = self
            .send(self.client.post(self.checks_url.clone()).json(&body))
            .await
            .context("Failed to create KYC check")?;

        let check = CheckResponse::new(data);
        tracing::info!("✓ KYC check created: {}", check.check_id());
        Ok(check)
    }

    /// Fetches a check by id.
    pub async fn get_check(&self, check_id: &str) -> Result<CheckResponse, KycError> {
        tracing::info!("Fetching KYC check {}", check_id);
        let data = self
            .send(self.client.get(self.check_url(check_id, None)))
            .await
            .context("Failed to get KYC check")?;

        Ok(CheckResponse::new(data))
    }

    /// Lists checks, optionally filtered and paginated.
    pub async fn list_checks(
        &self,
        filter: &ListChecksFilter,
    ) -> Result<CheckListResponse, KycError> {
        tracing::info!("Listing KYC checks");
        let data = self
            .send(self.client.get(self.checks_url.clone()).query(filter))
            .await
            .context("Failed to list KYC checks")?;

        let page = CheckListResponse::new(data);
        tracing::debug!(
            "Received page {} of {} ({} total)",
            page.current_page(),
            page.last_page(),
            page.total()
        );
        Ok(page)
    }

    /// Asks the server to run a failed check again.
    pub async fn reprocess_check(&self, check_id: &str) -> Result<CheckResponse, KycError> {
        tracing::info!("Reprocessing KYC check {}", check_id);
        let data = self
            .send(self.client.post(self.check_url(check_id, Some("reprocess"))))
            .await
            .context("Failed to reprocess KYC check")?;

        Ok(CheckResponse::new(data))
    }

    /// Uploads a document image for a check.
    ///
    /// The file is validated locally (existence, readability, size, sniffed
    /// content type) and then streamed, not buffered.
    ///
    /// # Arguments
    ///
    /// * `check_id` - The check the image belongs to.
    /// * `image_path` - Local JPEG, PNG or WebP file, at most 10 MiB.
    /// * `image_type` - Which side or kind of image this is.
    /// * `auto_extract` - Request OCR extraction on the server.
    pub async fn upload_document(
        &self,
        check_id: &str,
        image_path: impl AsRef<Path>,
        image_type: ImageType,
        auto_extract: bool,
    ) -> Result<DocumentResponse, KycError> {
        let path = image_path.as_ref();
        let checked = path.to_path_buf();
        let mime = tokio::task::spawn_blocking(move || {
            validation::validate_document_upload(&checked, image_type.as_str())
        })
        .await
        .map_err(|e| KycError::Io(std::io::Error::other(e)))??;

        tracing::info!(
            "Uploading {} image for KYC check {}",
            image_type.as_str(),
            check_id
        );

        let form = image_form(path, &mime, image_type, auto_extract)
            .await
            .context("Failed to upload document")?;

        let data = self
            .send(
                self.client
                    .post(self.check_url(check_id, Some("documents")))
                    .multipart(form),
            )
            .await
            .context("Failed to upload document")?;

        let document = DocumentResponse::new(data);
        tracing::info!(
            "✓ Document uploaded (id: {:?}, OCR: {})",
            document.id(),
            document.has_ocr_data()
        );
        Ok(document)
    }

    /// Lists the documents uploaded for a check.
    pub async fn get_documents(&self, check_id: &str) -> Result<DocumentListResponse, KycError> {
        tracing::info!("Fetching documents for KYC check {}", check_id);
        let data = self
            .send(self.client.get(self.check_url(check_id, Some("documents"))))
            .await
            .context("Failed to get documents")?;

        Ok(DocumentListResponse::new(data))
    }

    /// `{base}/api/v1/kyc/checks/{check_id}[/{suffix}]`, with the id
    /// percent-encoded as a single path segment.
    fn check_url(&self, check_id: &str, suffix: Option<&str>) -> Url {
        let mut url = self.checks_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(check_id).extend(suffix);
        }
        url
    }

    /// Sends a request and returns the normalized response object.
    async fn send(&self, request: RequestBuilder) -> Result<Map<String, Value>, KycError> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("{} {}", status, response.url());

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("KYC API returned {}: {}", status, body);
            return Err(KycError::Http { status, body });
        }

        let bytes = response.bytes().await?;
        let body = envelope::parse_object(&bytes)?;
        Ok(envelope::normalize(body))
    }
}

/// Builds the three-part upload form with the image streamed from disk.
async fn image_form(
    path: &Path,
    mime: &str,
    image_type: ImageType,
    auto_extract: bool,
) -> Result<Form, KycError> {
    let file = tokio::fs::File::open(path).await?;
    let length = file.metadata().await?.len();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let image = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), length)
        .file_name(file_name)
        .mime_str(mime)?;

    Ok(Form::new()
        .part("image", image)
        .text("image_type", image_type.as_str())
        .text("auto_extract", if auto_extract { "true" } else { "false" }))
}
