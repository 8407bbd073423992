pub mod catalog;
pub mod config;
pub mod recommend;
pub mod tags;

pub use catalog::show_catalog_stats;
pub use recommend::run_recommend;
pub use tags::run_tags;

use consonance_core::model::Recommendation;

/// Print recommendations as a numbered list, or as pretty JSON.
pub(crate) fn print_recommendations(recommendations: &[Recommendation], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(recommendations)?);
        return Ok(());
    }

    if recommendations.is_empty() {
        println!("No recommendations.");
        return Ok(());
    }

    for rec in recommendations {
        println!("  {}. {} ({:.2}%)", rec.position, rec.name, rec.score);
        if let Some(url) = &rec.image_url {
            println!("     {}", url);
        }
    }

    Ok(())
}
