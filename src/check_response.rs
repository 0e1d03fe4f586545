use crate::models::{CheckStatus, RiskScore, VerificationResult};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

const DEFAULT_PER_PAGE: i64 = 20;

/// A single KYC check, read from a normalized response map.
///
/// Accessor fields are resolved once at construction; missing or mistyped
/// fields fall back to defaults instead of failing. The original map is kept
/// untouched for [`raw_data`](Self::raw_data).
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResponse {
    check_id: String,
    status: String,
    result: Option<String>,
    risk_score: Option<String>,
    verification_details: Map<String, Value>,
    expires_at: Option<String>,
    request_id: Option<String>,
    data: Map<String, Value>,
}

impl CheckResponse {
    pub fn new(data: Map<String, Value>) -> Self {
        let check_id = match data.get("check_id") {
            Some(Value::String(s)) => s.clone(),
            _ => match data.get("id") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
                _ => String::new(),
            },
        };

        // `kyc_status` wins over the envelope-level `status` when both exist.
        let status = match data.get("kyc_status").filter(|v| !v.is_null()) {
            Some(v) => v.as_str().unwrap_or_default().to_string(),
            None => string_field(&data, "status").unwrap_or_default(),
        };

        let verification_details = match data.get("verification_details") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        Self {
            check_id,
            status,
            result: string_field(&data, "result"),
            risk_score: string_field(&data, "risk_score"),
            verification_details,
            expires_at: string_field(&data, "expires_at"),
            request_id: string_field(&data, "request_id"),
            data,
        }
    }

    pub fn check_id(&self) -> &str {
        &self.check_id
    }

    /// `pending`, `in_progress`, `completed` or `failed`; empty when absent.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn check_status(&self) -> Option<CheckStatus> {
        self.status.parse().ok()
    }

    /// `approved`, `rejected` or `review_required`.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn verification_result(&self) -> Option<VerificationResult> {
        self.result.as_deref().and_then(|r| r.parse().ok())
    }

    /// `low`, `medium` or `high`.
    pub fn risk_score(&self) -> Option<&str> {
        self.risk_score.as_deref()
    }

    pub fn risk_level(&self) -> Option<RiskScore> {
        self.risk_score.as_deref().and_then(|r| r.parse().ok())
    }

    pub fn verification_details(&self) -> &Map<String, Value> {
        &self.verification_details
    }

    /// Server request id, useful when reporting issues.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn expires_at(&self) -> Option<&str> {
        self.expires_at.as_deref()
    }

    pub fn is_approved(&self) -> bool {
        self.verification_result() == Some(VerificationResult::Approved)
    }

    pub fn is_rejected(&self) -> bool {
        self.verification_result() == Some(VerificationResult::Rejected)
    }

    pub fn requires_review(&self) -> bool {
        self.verification_result() == Some(VerificationResult::ReviewRequired)
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self.check_status(),
            Some(CheckStatus::Pending | CheckStatus::InProgress)
        )
    }

    pub fn is_completed(&self) -> bool {
        self.check_status() == Some(CheckStatus::Completed)
    }

    /// True when `expires_at` is a timestamp strictly before now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a fixed clock.
    ///
    /// An absent or unparseable `expires_at` is never expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .as_deref()
            .and_then(parse_timestamp)
            .map_or(false, |expiry| expiry < now)
    }

    pub fn raw_data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_raw_data(self) -> Map<String, Value> {
        self.data
    }

    /// Pretty-printed JSON of the raw data.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.data).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A page of checks from `GET /api/v1/kyc/checks`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckListResponse {
    data: Vec<Value>,
    total: i64,
    per_page: i64,
    current_page: i64,
    last_page: i64,
}

impl CheckListResponse {
    pub fn new(response: Map<String, Value>) -> Self {
        let data = match response.get("data") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        let pagination = match response.get("pagination") {
            Some(Value::Object(p)) => p.clone(),
            _ => Map::new(),
        };

        Self {
            data,
            total: int_field(&pagination, "total").unwrap_or(0),
            per_page: int_field(&pagination, "per_page").unwrap_or(DEFAULT_PER_PAGE),
            current_page: int_field(&pagination, "current_page").unwrap_or(1),
            last_page: int_field(&pagination, "last_page").unwrap_or(1),
        }
    }

    /// Checks on this page. Entries that are not objects become empty checks.
    pub fn checks(&self) -> Vec<CheckResponse> {
        self.data
            .iter()
            .map(|item| match item {
                Value::Object(map) => CheckResponse::new(map.clone()),
                _ => CheckResponse::new(Map::new()),
            })
            .collect()
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    pub fn last_page(&self) -> i64 {
        self.last_page
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page
    }

    /// The raw `data` list as returned by the server.
    pub fn raw_data(&self) -> &[Value] {
        &self.data
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn int_field(map: &Map<String, Value>, key: &str) -> Option<i64> {
    map.get(key).and_then(Value::as_i64)
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DD`
/// values, the latter read as UTC.
fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn check(value: Value) -> CheckResponse {
        match value {
            Value::Object(map) => CheckResponse::new(map),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_flat_response() {
        let response = check(json!({"status": "success", "check_id": "X", "kyc_status": "pending"}));
        assert_eq!(response.check_id(), "X");
        assert_eq!(response.status(), "pending");
        assert!(response.is_pending());
    }

    #[test]
    fn test_check_id_fallbacks() {
        assert_eq!(check(json!({"id": "Y"})).check_id(), "Y");
        assert_eq!(check(json!({"id": 12345})).check_id(), "12345");
        assert_eq!(
            check(json!({"check_id": "chk_preferred", "id": "chk_fallback"})).check_id(),
            "chk_preferred"
        );
        assert_eq!(check(json!({"status": "pending"})).check_id(), "");
        assert_eq!(check(json!({"id": 1.5})).check_id(), "");
    }

    #[test]
    fn test_status_fallback() {
        assert_eq!(check(json!({"kyc_status": "completed", "status": "success"})).status(), "completed");
        assert_eq!(check(json!({"status": "in_progress"})).status(), "in_progress");
        assert_eq!(check(json!({})).status(), "");
        assert_eq!(check(json!({"status": 3})).status(), "");
    }

    #[test]
    fn test_result_predicates() {
        let approved = check(json!({"status": "completed", "result": "approved"}));
        assert!(approved.is_approved());
        assert!(!approved.is_rejected());
        assert!(!approved.requires_review());
        assert!(approved.is_completed());
        assert!(!approved.is_pending());

        let rejected = check(json!({"result": "rejected"}));
        assert!(rejected.is_rejected());
        assert!(!rejected.is_approved());

        let review = check(json!({"result": "review_required"}));
        assert!(review.requires_review());
        assert_eq!(review.verification_result(), Some(VerificationResult::ReviewRequired));
    }

    #[test]
    fn test_completed_without_result() {
        let response = check(json!({"kyc_status": "completed", "result": null}));
        assert!(response.is_completed());
        assert_eq!(response.result(), None);
        assert!(!response.is_approved());
    }

    #[test]
    fn test_optional_fields() {
        let details = json!({"checks_passed": ["identity", "document"], "checks_failed": ["address"]});
        let response = check(json!({
            "id": "chk_test_123",
            "risk_score": "medium",
            "request_id": "req_abc123",
            "verification_details": details.clone(),
            "expires_at": "2025-12-31T23:59:59Z"
        }));
        assert_eq!(response.risk_score(), Some("medium"));
        assert_eq!(response.risk_level(), Some(RiskScore::Medium));
        assert_eq!(response.request_id(), Some("req_abc123"));
        assert_eq!(Value::Object(response.verification_details().clone()), details);
        assert_eq!(response.expires_at(), Some("2025-12-31T23:59:59Z"));
    }

    #[test]
    fn test_expiry() {
        let future = (Utc::now() + Duration::days(365)).to_rfc3339();
        assert!(!check(json!({"expires_at": future})).is_expired());
        assert!(check(json!({"expires_at": "2020-01-01T00:00:00Z"})).is_expired());
        assert!(check(json!({"expires_at": "2020-01-01 00:00:00"})).is_expired());
        assert!(!check(json!({"id": "chk"})).is_expired());
        assert!(!check(json!({"expires_at": "not a date"})).is_expired());
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let response = check(json!({"expires_at": now.to_rfc3339()}));
        let parsed = parse_timestamp(&now.to_rfc3339()).unwrap();
        assert!(!response.is_expired_at(parsed));
        assert!(response.is_expired_at(parsed + Duration::seconds(1)));
    }

    #[test]
    fn test_raw_data_round_trip() {
        let data = json!({"id": "chk_test_123", "status": "pending", "custom_field": "custom_value"});
        let response = check(data.clone());
        assert_eq!(Value::Object(response.raw_data().clone()), data);
        let reparsed: Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(reparsed, data);
        assert_eq!(Value::Object(response.into_raw_data()), data);
    }

    #[test]
    fn test_list_pagination_defaults() {
        let list = CheckListResponse::new(Map::new());
        assert_eq!(list.total(), 0);
        assert_eq!(list.per_page(), 20);
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.last_page(), 1);
        assert!(!list.has_more_pages());
        assert!(list.checks().is_empty());
    }

    #[test]
    fn test_list_reads_checks_and_pagination() {
        let list = match json!({
            "status": "success",
            "data": [{"check_id": "A", "kyc_status": "pending"}, "garbage"],
            "pagination": {"total": 42, "per_page": 2, "current_page": 1, "last_page": 21}
        }) {
            Value::Object(map) => CheckListResponse::new(map),
            _ => unreachable!(),
        };
        let checks = list.checks();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].check_id(), "A");
        assert_eq!(checks[1].check_id(), "");
        assert_eq!(list.total(), 42);
        assert!(list.has_more_pages());
        assert_eq!(list.raw_data().len(), 2);
    }
}
