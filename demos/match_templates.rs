//! Scores every content slide of a deck against a template library and prints
//! the ranking.
//!
//! Paths come from `TEMPLATES_PATH` / `DECK_PATH` (a `.env` file works too) and
//! default to the bundled demo data. Run with `RUST_LOG=debug` for per-dimension
//! breakdowns.

use std::env;

use anyhow::Context;
use dotenvy::dotenv;
use slides_template_engine::models::{ContentSlide, SlideType, Template};
use slides_template_engine::TemplateMatchingService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let templates_path = env::var("TEMPLATES_PATH").unwrap_or_else(|_| "demos/data/templates.json".to_string());
    let deck_path = env::var("DECK_PATH").unwrap_or_else(|_| "demos/data/deck.json".to_string());

    let templates: Vec<Template> = serde_json::from_str(
        &tokio::fs::read_to_string(&templates_path)
            .await
            .with_context(|| format!("reading {templates_path}"))?,
    )
    .with_context(|| format!("parsing {templates_path}"))?;
    let deck: Vec<ContentSlide> = serde_json::from_str(
        &tokio::fs::read_to_string(&deck_path)
            .await
            .with_context(|| format!("reading {deck_path}"))?,
    )
    .with_context(|| format!("parsing {deck_path}"))?;

    let service = TemplateMatchingService::default();
    service.initialize();
    println!("{}", serde_json::to_string_pretty(&service.service_status())?);

    let content_templates: Vec<Template> = templates
        .into_iter()
        .filter(|t| t.slide_type == Some(SlideType::Content))
        .collect();

    for slide in deck.iter().filter(|s| s.slide_type == SlideType::Content) {
        println!("\n== {} ({} items)", slide.title, slide.items.len());

        let results = service.detailed_match(slide, &content_templates)?;
        if results.is_empty() {
            println!("   no semantic features, fallback picks at random");
        }
        for result in &results {
            let dims: Vec<String> = result
                .dimension_scores
                .iter()
                .map(|d| match d.score {
                    Some(score) => format!("{}={:.2}", d.dimension_id, score),
                    None => format!("{}=n/a", d.dimension_id),
                })
                .collect();
            println!("   {:<24} {:.3}  [{}]", result.template.id, result.total_score, dims.join(" "));
        }

        let chosen = service.find_best_match(slide, &content_templates);
        println!("   -> {}", chosen.id);
    }

    Ok(())
}
