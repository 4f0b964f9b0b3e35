//! Paginates a deck and plans every resulting slide.
//!
//! Usage: cargo run --example paginate_deck -- [deck.json] [templates.json] [config.json]

use std::env;
use std::sync::Arc;

use anyhow::{bail, Context};
use slides_template_engine::models::{ContentSlide, Template};
use slides_template_engine::pagination::{conservation_report, pagination_stats};
use slides_template_engine::text_fit::CharWidthMeasurer;
use slides_template_engine::{validate_pagination, EngineConfig, PaginationProcessor, SlidePlanner};

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let deck_path = args.first().map(String::as_str).unwrap_or("demos/data/deck.json");
    let templates_path = args.get(1).map(String::as_str).unwrap_or("demos/data/templates.json");
    let config = match args.get(2) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let deck: Vec<ContentSlide> = read_json(deck_path)?;
    let templates: Vec<Template> = read_json(templates_path)?;

    let processor = PaginationProcessor::new(config.rule_manager()?);
    let paginated = processor.process_pagination(&deck);
    let stats = pagination_stats(&paginated);
    println!(
        "{} slides in, {} out, {} carry an offset",
        deck.len(),
        stats.total_slides,
        stats.paginated_slides
    );
    if !validate_pagination(&deck, &paginated) {
        eprintln!("{}", conservation_report(&deck, &paginated));
        bail!("pagination lost or reordered items");
    }

    let planner = SlidePlanner::from_config(&config)?.with_measurer(Arc::new(CharWidthMeasurer::default()));
    let plans = planner.plan(&deck, &templates)?;
    for plan in &plans {
        println!(
            "\n#{} {} -> {}{}",
            plan.slide_index,
            plan.slide_type.as_str(),
            plan.template_id,
            plan.layout.map(|l| format!(" ({l:?})")).unwrap_or_default()
        );
        for assignment in &plan.assignments {
            println!(
                "   {:<14} {:>5} {}",
                assignment.element_id,
                assignment.font_size.map(|s| format!("{s}px")).unwrap_or_default(),
                assignment.text
            );
        }
        if !plan.removed.is_empty() {
            println!("   removed: {}", plan.removed.join(", "));
        }
    }

    Ok(())
}
