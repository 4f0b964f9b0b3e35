//! Prints the detected layout of every content template and how a sample set of
//! items would be paired onto it.

use std::env;

use anyhow::Context;
use slides_template_engine::models::{ContentItem, SlideType, Template, TextRole};
use slides_template_engine::{LayoutAnalyzer, PairingEngine};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = env::args().nth(1).unwrap_or_else(|| "demos/data/templates.json".to_string());
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let templates: Vec<Template> = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;

    let analyzer = LayoutAnalyzer::default();
    let pairing = PairingEngine::default();

    for template in templates.iter().filter(|t| t.slide_type == Some(SlideType::Content)) {
        let titles = template.elements_with_role(TextRole::ItemTitle);
        let texts = template.elements_with_role(TextRole::Item);
        let analysis = analyzer.analyze_template_layout(&titles, &texts);
        println!(
            "\n{}: {:?} ({} titles, {} texts, capacity {})",
            template.id,
            analysis.layout_type,
            titles.len(),
            texts.len(),
            template.item_capacity()
        );

        let mut items = vec![ContentItem::new("", "Overview sentence")];
        items.extend((1..=titles.len()).map(|i| ContentItem::new(format!("Point {i}"), format!("Detail {i}"))));

        for pair in pairing.build_paired_elements(&analysis, &titles, &texts, &items) {
            let score = pair
                .title
                .map(|title| pairing.scorer().score(title, pair.text))
                .map(|s| format!("{s:.1}"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "   {:<10} + {:<10} <- {:<18} score {}",
                pair.title.map(|t| t.id.as_str()).unwrap_or("-"),
                pair.text.id,
                pair.data_item.text,
                score
            );
        }
    }

    Ok(())
}
