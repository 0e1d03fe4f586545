//! Uploading a document image and reading the OCR extraction.
//!
//! Usage: `cargo run --example upload_document -- <check_id> <image_path> [image_type]`
use anyhow::{Context, Result};
use datafabric_kyc::{ImageType, KycClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let check_id = args.next().context("missing <check_id> argument")?;
    let image_path = args.next().context("missing <image_path> argument")?;
    let image_type: ImageType = args
        .next()
        .unwrap_or_else(|| "front".to_string())
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let api_key = std::env::var("DATAFABRIC_API_KEY")
        .context("DATAFABRIC_API_KEY environment variable required")?;
    let client = KycClient::new(api_key)?;

    println!("Uploading {} as {}...", image_path, image_type);
    let document = client
        .upload_document(&check_id, &image_path, image_type, true)
        .await?;

    println!("✓ Upload status: {}", document.status());
    println!("  Document id: {:?}", document.id());

    if document.has_ocr_data() {
        println!("\nExtracted data:");
        let fields = [
            ("Document type", document.extracted_document_type()),
            ("Full name", document.extracted_full_name()),
            ("First name", document.extracted_first_name()),
            ("Last name", document.extracted_last_name()),
            ("ID number", document.extracted_id_number()),
            ("Date of birth", document.extracted_date_of_birth()),
            ("Gender", document.extracted_gender()),
            ("Nationality", document.extracted_nationality()),
            ("Address", document.extracted_address()),
            ("Provider", document.provider()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                println!("  {}: {}", label, value);
            }
        }
        if let Some(confidence) = document.confidence() {
            println!("  Confidence: {}%", confidence);
        }
    } else {
        println!("  No OCR data returned");
    }

    let documents = client.get_documents(&check_id).await?;
    println!("\n✓ Check {} now has {} documents", check_id, documents.count());

    Ok(())
}
