//! Listing, filtering and paging through checks.
use anyhow::Result;
use datafabric_kyc::{CheckStatus, KycClient, ListChecksFilter, VerificationResult};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let api_key = std::env::var("DATAFABRIC_API_KEY")
        .map_err(|_| anyhow::anyhow!("DATAFABRIC_API_KEY environment variable required"))?;
    let client = KycClient::new(api_key)?;

    println!("=== Listing KYC Checks ===\n");

    let first = client.list_checks(&ListChecksFilter::default()).await?;
    println!("Total: {}", first.total());
    println!("Page: {} of {}", first.current_page(), first.last_page());
    println!("Per page: {}", first.per_page());
    println!(
        "Has more: {}\n",
        if first.has_more_pages() { "yes" } else { "no" }
    );

    let approved = client
        .list_checks(
            &ListChecksFilter::default()
                .status(CheckStatus::Completed)
                .result(VerificationResult::Approved)
                .per_page(5),
        )
        .await?;
    println!("Completed & approved: {}", approved.total());
    for check in approved.checks().iter().take(3) {
        println!(
            "  - {} (risk: {})",
            check.check_id(),
            check.risk_score().unwrap_or("n/a")
        );
    }

    println!("\nWalking through pages...");
    let mut page = 1;
    let mut processed = 0;
    loop {
        let response = client
            .list_checks(&ListChecksFilter::default().per_page(5).page(page))
            .await?;
        processed += response.checks().len();
        println!("  page {}: {} checks", page, response.checks().len());

        if !response.has_more_pages() || page >= 3 {
            break;
        }
        page += 1;
    }
    println!("✓ Processed {} checks", processed);

    Ok(())
}
