//! Error handling patterns: validation errors, retries with exponential
//! backoff, and concurrent batch creation. Retry policy lives here, in the
//! caller, not in the library.
use anyhow::Result;
use datafabric_kyc::{
    CheckResponse, CreateCheckRequest, DocumentType, KycClient, KycError,
};
use futures::future::join_all;
use serde_json::json;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const MAX_RETRIES: u32 = 3;

async fn create_check_with_retry(
    client: &KycClient,
    request: &CreateCheckRequest,
) -> Result<CheckResponse, KycError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match client.create_check(request).await {
            Ok(check) => return Ok(check),
            // Retrying cannot fix a local validation failure.
            Err(e) if e.is_validation() => return Err(e),
            Err(e) if attempt >= MAX_RETRIES => return Err(e),
            Err(e) => {
                let wait = Duration::from_secs(2u64.pow(attempt));
                tracing::warn!(
                    "Attempt {} failed ({}), retrying in {:?}",
                    attempt,
                    e,
                    wait
                );
                tokio::time::sleep(wait).await;
            }
        }
    }
}

fn user_friendly_message(error: &KycError) -> &'static str {
    let message = error.to_string();
    if message.contains("Missing required field") {
        "Please fill in all required fields."
    } else if message.contains("Invalid document_type") {
        "Please select a valid document type."
    } else if message.contains("Invalid date") {
        "Please enter a valid date of birth (YYYY-MM-DD)."
    } else {
        match error.code() {
            Some(401) | Some(403) => "The API key was rejected.",
            Some(429) => "Too many requests, please slow down.",
            _ => "An unexpected error occurred. Please try again later.",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let api_key =
        std::env::var("DATAFABRIC_API_KEY").unwrap_or_else(|_| "dfb_test_key".to_string());
    let client = KycClient::new(api_key)?;

    println!("=== Error Handling Examples ===\n");

    println!("1. Validation errors (no request is sent)...");
    let invalid_payloads = [
        json!({"first_name": "", "last_name": "Test", "date_of_birth": "1990-01-01",
               "document_type": "passport", "document_number": "T0"}),
        json!({"first_name": "Test", "last_name": "User", "date_of_birth": "1990-01-01",
               "document_type": "invalid_type", "document_number": "T1"}),
        json!({"first_name": "Test", "last_name": "User", "date_of_birth": "invalid-date",
               "document_type": "passport", "document_number": "T2"}),
    ];
    for payload in &invalid_payloads {
        if let Err(e) = client.create_check(payload).await {
            println!("   ✗ {}", e);
            println!("     → {}", user_friendly_message(&e));
        }
    }

    println!("\n2. Retry with exponential backoff...");
    let request = CreateCheckRequest::new(
        "Retry",
        "Test",
        "1990-01-01",
        DocumentType::Passport,
        "RETRY123",
    );
    match create_check_with_retry(&client, &request).await {
        Ok(check) => println!("   ✓ Created after retries: {}", check.check_id()),
        Err(e) => println!(
            "   ✗ All retries failed: {} (code: {:?})",
            e,
            e.code()
        ),
    }

    println!("\n3. Concurrent batch creation...");
    let people = [
        ("Alice", "Williams", DocumentType::NationalId, "NI111111"),
        ("Bob", "Brown", DocumentType::Passport, "P222222"),
        ("Carol", "Davis", DocumentType::DriversLicense, "DL333333"),
    ];
    let requests: Vec<CreateCheckRequest> = people
        .iter()
        .enumerate()
        .map(|(i, (first, last, doc_type, number))| {
            CreateCheckRequest::new(*first, *last, "1990-01-01", *doc_type, *number)
                .with_user_reference(format!("batch_{}", i))
        })
        .collect();

    let results = join_all(requests.iter().map(|r| client.create_check(r))).await;
    let mut created = 0;
    for ((first, last, _, _), result) in people.iter().zip(results) {
        match result {
            Ok(check) => {
                created += 1;
                println!("   ✓ {} {}: {}", first, last, check.check_id());
            }
            Err(e) => println!("   ✗ {} {}: {}", first, last, e),
        }
    }
    println!("   Created {} of {} checks", created, people.len());

    Ok(())
}
