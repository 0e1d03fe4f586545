//! DataFabric KYC client library
//!
//! This library wraps the DataFabric identity-verification (KYC) HTTP API:
//! it validates request payloads locally, sends requests, and exposes the
//! server's heterogeneous response shapes through typed, read-only views.
//!
//! # Modules
//!
//! - `client`: The API client and its HTTP operations.
//! - `config`: Client configuration (API key, base URL, timeouts).
//! - `errors`: Error handling types.
//! - `envelope`: Response envelope normalization.
//! - `validation`: Client-side payload and upload checks.
//! - `models`: Request payloads and wire enums.
//! - `check_response`: Check and check-page views.
//! - `document_response`: Document, OCR and document-list views.
//!
//! # Example
//!
//! ```no_run
//! use datafabric_kyc::{CreateCheckRequest, DocumentType, KycClient};
//!
//! # async fn run() -> Result<(), datafabric_kyc::KycError> {
//! let client = KycClient::new("dfb_test_your_key")?;
//! let check = client
//!     .create_check(&CreateCheckRequest::new(
//!         "Jane",
//!         "Smith",
//!         "1985-03-20",
//!         DocumentType::DriversLicense,
//!         "DL123456",
//!     ))
//!     .await?;
//! println!("{} is {}", check.check_id(), check.status());
//! # Ok(())
//! # }
//! ```

pub mod check_response;
pub mod client;
pub mod config;
pub mod document_response;
pub mod envelope;
pub mod errors;
pub mod models;
pub mod validation;

pub use check_response::{CheckListResponse, CheckResponse};
pub use client::{KycClient, SDK_VERSION, USER_AGENT};
pub use config::ClientConfig;
pub use document_response::{DocumentListResponse, DocumentResponse, OcrExtraction};
pub use errors::{KycError, ResultExt};
pub use models::{
    Address, CheckStatus, CreateCheckRequest, DocumentType, ImageType, ListChecksFilter,
    RiskScore, VerificationResult,
};
