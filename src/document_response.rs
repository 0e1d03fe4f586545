use crate::models::ImageType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured fields extracted from a document image by the OCR provider.
///
/// Each field is independent: a mistyped value reads as `None` without
/// affecting the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrExtraction {
    pub document_type: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub id_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    /// 0-100.
    pub confidence: Option<i64>,
    pub provider: Option<String>,
}

impl OcrExtraction {
    fn from_map(map: &Map<String, Value>) -> Self {
        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            document_type: text("document_type"),
            full_name: text("full_name"),
            first_name: text("first_name"),
            last_name: text("last_name"),
            id_number: text("id_number"),
            date_of_birth: text("date_of_birth"),
            gender: text("gender"),
            nationality: text("nationality"),
            address: text("address"),
            confidence: map.get("confidence").and_then(Value::as_i64),
            provider: text("provider"),
        }
    }
}

/// Result of a document upload, from a normalized response map.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResponse {
    id: Option<i64>,
    image_type: Option<String>,
    has_ocr_data: bool,
    ocr_data: Option<Map<String, Value>>,
    ocr: Option<OcrExtraction>,
    status: String,
    data: Map<String, Value>,
}

impl DocumentResponse {
    pub fn new(data: Map<String, Value>) -> Self {
        let empty = Map::new();
        let document = match data.get("document") {
            Some(Value::Object(doc)) => doc,
            _ => &empty,
        };

        let ocr_data = match document.get("ocr_data") {
            Some(Value::Object(ocr)) => Some(ocr.clone()),
            _ => None,
        };

        Self {
            id: document.get("id").and_then(Value::as_i64),
            image_type: document
                .get("image_type")
                .and_then(Value::as_str)
                .map(str::to_string),
            // Server flag, read verbatim; never inferred from `ocr_data`.
            has_ocr_data: document.get("has_ocr_data") == Some(&Value::Bool(true)),
            ocr: ocr_data.as_ref().map(OcrExtraction::from_map),
            ocr_data,
            status: data
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            data,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn image_type(&self) -> Option<&str> {
        self.image_type.as_deref()
    }

    pub fn has_ocr_data(&self) -> bool {
        self.has_ocr_data
    }

    /// The raw `ocr_data` object, if present.
    pub fn ocr_data(&self) -> Option<&Map<String, Value>> {
        self.ocr_data.as_ref()
    }

    pub fn ocr(&self) -> Option<&OcrExtraction> {
        self.ocr.as_ref()
    }

    pub fn extracted_document_type(&self) -> Option<&str> {
        self.ocr.as_ref()?.document_type.as_deref()
    }

    pub fn extracted_full_name(&self) -> Option<&str> {
        self.ocr.as_ref()?.full_name.as_deref()
    }

    pub fn extracted_first_name(&self) -> Option<&str> {
        self.ocr.as_ref()?.first_name.as_deref()
    }

    pub fn extracted_last_name(&self) -> Option<&str> {
        self.ocr.as_ref()?.last_name.as_deref()
    }

    pub fn extracted_id_number(&self) -> Option<&str> {
        self.ocr.as_ref()?.id_number.as_deref()
    }

    pub fn extracted_date_of_birth(&self) -> Option<&str> {
        self.ocr.as_ref()?.date_of_birth.as_deref()
    }

    pub fn extracted_gender(&self) -> Option<&str> {
        self.ocr.as_ref()?.gender.as_deref()
    }

    pub fn extracted_nationality(&self) -> Option<&str> {
        self.ocr.as_ref()?.nationality.as_deref()
    }

    pub fn extracted_address(&self) -> Option<&str> {
        self.ocr.as_ref()?.address.as_deref()
    }

    /// OCR confidence, 0-100.
    pub fn confidence(&self) -> Option<i64> {
        self.ocr.as_ref()?.confidence
    }

    pub fn provider(&self) -> Option<&str> {
        self.ocr.as_ref()?.provider.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_successful(&self) -> bool {
        self.status == "success"
    }

    pub fn raw_data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_raw_data(self) -> Map<String, Value> {
        self.data
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.data).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Documents attached to a check.
///
/// Entries are kept as raw maps since their shape varies between uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentListResponse {
    data: Vec<Value>,
}

impl DocumentListResponse {
    pub fn new(response: Map<String, Value>) -> Self {
        let data = match response.get("documents") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        Self { data }
    }

    /// Every entry as a map; non-object entries become empty maps.
    pub fn documents(&self) -> Vec<Map<String, Value>> {
        self.data
            .iter()
            .map(|doc| match doc {
                Value::Object(map) => map.clone(),
                _ => Map::new(),
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// True when any entry carries `has_ocr_data: true`.
    pub fn has_ocr_data(&self) -> bool {
        self.data
            .iter()
            .any(|doc| doc.get("has_ocr_data") == Some(&Value::Bool(true)))
    }

    pub fn documents_by_type(&self, image_type: ImageType) -> Vec<&Map<String, Value>> {
        self.data
            .iter()
            .filter_map(Value::as_object)
            .filter(|doc| doc.get("image_type").and_then(Value::as_str) == Some(image_type.as_str()))
            .collect()
    }

    pub fn raw_data(&self) -> &[Value] {
        &self.data
    }
}
