use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Declares a closed set of wire strings as an enum with `as_str`, `Display`,
/// `FromStr` and an `ALL` listing in declaration order.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Comma-separated wire values, used in validation messages.
            pub fn allowed_values() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    )),
                }
            }
        }
    };
}

wire_enum! {
    /// Identity document presented for a check.
    DocumentType {
        Passport => "passport",
        DriversLicense => "drivers_license",
        NationalId => "national_id",
        ResidencePermit => "residence_permit",
    }
}

wire_enum! {
    /// Which side or kind of image an upload carries.
    ImageType {
        Front => "front",
        Back => "back",
        Selfie => "selfie",
        ProofOfAddress => "proof_of_address",
    }
}

wire_enum! {
    /// Processing state of a check.
    CheckStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Failed => "failed",
    }
}

wire_enum! {
    /// Outcome of a check. Independent of [`CheckStatus`].
    VerificationResult {
        Approved => "approved",
        Rejected => "rejected",
        ReviewRequired => "review_required",
    }
}

wire_enum! {
    RiskScore {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

/// Postal address attached to a check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Body of `POST /api/v1/kyc/checks`.
///
/// `document_type` and `date_of_birth` stay plain strings so that bad values
/// reach client-side validation instead of failing at construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateCheckRequest {
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub document_type: String,
    pub document_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CreateCheckRequest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: impl Into<String>,
        document_type: DocumentType,
        document_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth: date_of_birth.into(),
            document_type: document_type.as_str().to_string(),
            document_number: document_number.into(),
            ..Default::default()
        }
    }

    pub fn with_user_reference(mut self, reference: impl Into<String>) -> Self {
        self.user_reference = Some(reference.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Query filters for `GET /api/v1/kyc/checks`. Unset fields are left out of
/// the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListChecksFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<VerificationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ListChecksFilter {
    pub fn status(mut self, status: CheckStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn result(mut self, result: VerificationResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn user_reference(mut self, reference: impl Into<String>) -> Self {
        self.user_reference = Some(reference.into());
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_values() {
        assert_eq!(DocumentType::DriversLicense.as_str(), "drivers_license");
        assert_eq!(
            "proof_of_address".parse::<ImageType>(),
            Ok(ImageType::ProofOfAddress)
        );
        assert!("selfie_video".parse::<ImageType>().is_err());
        assert_eq!(
            serde_json::to_value(CheckStatus::InProgress).unwrap(),
            json!("in_progress")
        );
        assert_eq!(
            DocumentType::allowed_values(),
            "passport, drivers_license, national_id, residence_permit"
        );
    }

    #[test]
    fn test_create_request_omits_unset_optionals() {
        let request = CreateCheckRequest::new(
            "Jane",
            "Smith",
            "1985-03-20",
            DocumentType::DriversLicense,
            "DL123456",
        )
        .with_user_reference("user_42");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "first_name": "Jane",
                "last_name": "Smith",
                "date_of_birth": "1985-03-20",
                "document_type": "drivers_license",
                "document_number": "DL123456",
                "user_reference": "user_42"
            })
        );
    }

    #[test]
    fn test_filter_serializes_only_set_fields() {
        let filter = ListChecksFilter::default()
            .status(CheckStatus::Completed)
            .per_page(5);
        let value = serde_json::to_value(&filter).unwrap();
        assert_eq!(value, json!({ "status": "completed", "per_page": 5 }));
    }
}
