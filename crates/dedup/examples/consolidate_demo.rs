//! Consolidation Demo
//!
//! Merges listings of the same businesses gathered from a mapping service, a
//! review site and a social page.
//!
//! This example shows:
//! - Building records from each source
//! - Running the consolidator with a custom configuration
//! - Reading the run report and cumulative metrics
//!
//! Run with `RUST_LOG=debug` to see every accepted match.

use local_business_dedup::{
    BusinessStatus, Consolidator, DedupConfig, MapsListing, OpeningHours, Record, ReviewListing,
    SocialPage, Source,
};
use tracing_subscriber::EnvFilter;

fn sample_records() -> Vec<Record> {
    vec![
        Record::new("maps-1", "Green Leaf Cafe", Source::MapsService)
            .with_category("Cafe")
            .with_address("7 River Rd, Portland")
            .with_phone("(503) 222-3333")
            .with_opening_hours(OpeningHours {
                monday: Some("08:00-16:00".to_string()),
                ..OpeningHours::default()
            })
            .with_maps_listing(MapsListing {
                rating: Some(4.4),
                review_count: Some(210),
                place_id: Some("ChIJ-green-leaf".to_string()),
            })
            .with_confidence(0.85),
        Record::new("maps-2", "Harbor Bike Repair", Source::MapsService)
            .with_category("Bicycle shop")
            .with_address("301 Dock St, Portland")
            .with_website("https://harborbikes.example")
            .with_confidence(0.8),
        Record::new("reviews-1", "Harbor Bike Repair", Source::ReviewSite)
            .with_address("301 Dock Street, Portland")
            .with_website("https://harborbikes.example/reviews")
            .with_review_listing(ReviewListing {
                rating: Some(4.8),
                review_count: Some(64),
                listing_id: Some("harbor-bike-repair-portland".to_string()),
            })
            .with_confidence(0.9),
        Record::new("reviews-2", "Night Owl Books", Source::ReviewSite)
            .with_address("55 Alder Ave, Portland")
            .with_status(BusinessStatus::TemporarilyClosed)
            .with_confidence(0.7),
        Record::new("social-1", "Green Leaf Café", Source::SocialPage)
            .with_address("7 River Road, Portland")
            .with_phone("+1 503.222.3333")
            .with_email("hello@greenleaf.example")
            .with_social_page(SocialPage {
                page_url: Some("https://social.example/greenleaf".to_string()),
                page_id: Some("greenleaf".to_string()),
                verified: Some(true),
            })
            .with_confidence(0.6),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    println!("\n═══════════════════════════════════════════════════════════════");
    println!("  Local Business Consolidation Demo");
    println!("═══════════════════════════════════════════════════════════════\n");

    let records = sample_records();
    let consolidator = Consolidator::with_config(DedupConfig::new().with_parallel(false))?;

    let output = consolidator.consolidate(&records);

    for record in &output.records {
        let origin = if record.is_merged() {
            format!("merged from {}", record.merged_from.join(" + "))
        } else {
            record.source.to_string()
        };
        println!(
            "• {} [{}] ({:.0}% quality)",
            record.name,
            origin,
            record.confidence * 100.0
        );
    }

    println!("\n{}", output.report);
    println!("{}", consolidator.metrics().snapshot());

    println!("{}", serde_json::to_string_pretty(&output.records)?);

    Ok(())
}
