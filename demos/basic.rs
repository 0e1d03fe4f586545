//! Full check lifecycle: create, upload documents, poll for the result.
//!
//! Reads `DATAFABRIC_API_KEY` (and optionally `DATAFABRIC_BASE_URL`) from the
//! environment or a `.env` file.
use anyhow::Result;
use datafabric_kyc::{
    ClientConfig, CreateCheckRequest, DocumentType, ImageType, KycClient,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn load_client() -> Result<KycClient> {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("DATAFABRIC_API_KEY")
        .map_err(|_| anyhow::anyhow!("DATAFABRIC_API_KEY environment variable required"))?;
    let mut config = ClientConfig::new(api_key);
    if let Ok(url) = std::env::var("DATAFABRIC_BASE_URL") {
        config = config.with_base_url(url);
    }

    Ok(KycClient::from_config(config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = load_client()?;
    println!("=== DataFabric KYC ===");
    println!(
        "Mode: {}\n",
        if client.is_test_mode() { "test" } else { "live" }
    );

    println!("Creating KYC check...");
    let check = client
        .create_check(
            &CreateCheckRequest::new(
                "John",
                "Doe",
                "1990-05-15",
                DocumentType::Passport,
                "AB1234567",
            )
            .with_user_reference("user_12345")
            .with_email("john.doe@example.com"),
        )
        .await?;
    println!("✓ Check created: {}", check.check_id());
    println!("  Status: {}\n", check.status());

    for (path, image_type) in [
        ("passport_front.jpg", ImageType::Front),
        ("selfie.jpg", ImageType::Selfie),
    ] {
        match client
            .upload_document(check.check_id(), path, image_type, true)
            .await
        {
            Ok(document) => {
                println!("✓ Uploaded {} (document {:?})", image_type, document.id());
                if document.has_ocr_data() {
                    println!(
                        "  OCR: {} ({}% confidence)",
                        document.extracted_full_name().unwrap_or("-"),
                        document.confidence().unwrap_or(0)
                    );
                }
            }
            Err(e) => println!("✗ {}: {}", image_type, e),
        }
    }

    println!("\nWaiting for verification...");
    for attempt in 1..=10 {
        let current = client.get_check(check.check_id()).await?;
        if !current.is_pending() {
            println!("✓ Finished with status {}", current.status());
            if current.is_approved() {
                println!("  Result: approved");
            } else if current.is_rejected() {
                println!("  Result: rejected");
            } else if current.requires_review() {
                println!("  Result: manual review required");
            }
            if let Some(risk) = current.risk_score() {
                println!("  Risk: {}", risk);
            }
            return Ok(());
        }
        println!("  [{}/10] still {}", attempt, current.status());
        tokio::time::sleep(Duration::from_secs(3)).await;
    }

    println!("✗ Check still pending, try again later");
    Ok(())
}
