//! JSON-in / JSON-out bindings for the browser editor.
//!
//! Every export takes and returns JSON strings so the JS side can pass the same
//! documents it already stores. An optional `config` argument holds an
//! [`EngineConfig`] document; omitted or empty means defaults.

use std::sync::Once;

use log::Level;
use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::errors::Result;
use crate::layout::LayoutAnalyzer;
use crate::matching::service::TemplateMatchingService;
use crate::models::{ContentSlide, Template};
use crate::pagination::{validate_pagination, PaginationProcessor};
use crate::planner::SlidePlanner;

static INIT: Once = Once::new();

/// Routes `log` output to the browser console and installs the panic hook.
/// Safe to call more than once.
#[wasm_bindgen(js_name = initEngine)]
pub fn init_engine(debug: bool) {
    INIT.call_once(|| {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let level = if debug { Level::Debug } else { Level::Info };
        // Fails only when another logger is already installed.
        let _ = console_log::init_with_level(level);
    });
}

fn load_config(config: Option<String>) -> Result<EngineConfig> {
    match config.as_deref().map(str::trim) {
        None | Some("") => Ok(EngineConfig::default()),
        Some(json) => {
            let config = EngineConfig::from_json_str(json)?;
            config.validate()?;
            Ok(config)
        }
    }
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

pub fn find_best_match_json(slide: &str, templates: &str, config: Option<String>) -> Result<String> {
    let config = load_config(config)?;
    let slide: ContentSlide = serde_json::from_str(slide)?;
    let templates: Vec<Template> = serde_json::from_str(templates)?;
    let service = TemplateMatchingService::from_config(&config)?;
    let template = service.find_best_match(&slide, &templates);
    Ok(serde_json::to_string(template.as_ref())?)
}

pub fn analyze_layout_json(template: &str, config: Option<String>) -> Result<String> {
    let config = load_config(config)?;
    let template: Template = serde_json::from_str(template)?;
    let analysis = LayoutAnalyzer::new(config.layout_analysis).analyze_template(&template);
    Ok(serde_json::to_string(&analysis)?)
}

pub fn paginate_json(slides: &str, config: Option<String>) -> Result<String> {
    let config = load_config(config)?;
    let slides: Vec<ContentSlide> = serde_json::from_str(slides)?;
    let processor = PaginationProcessor::new(config.rule_manager()?);
    Ok(serde_json::to_string(&processor.process_pagination(&slides))?)
}

pub fn validate_pagination_json(original: &str, paginated: &str) -> Result<bool> {
    let original: Vec<ContentSlide> = serde_json::from_str(original)?;
    let paginated: Vec<ContentSlide> = serde_json::from_str(paginated)?;
    Ok(validate_pagination(&original, &paginated))
}

pub fn plan_slides_json(slides: &str, templates: &str, config: Option<String>) -> Result<String> {
    let config = load_config(config)?;
    let slides: Vec<ContentSlide> = serde_json::from_str(slides)?;
    let templates: Vec<Template> = serde_json::from_str(templates)?;
    let plans = SlidePlanner::from_config(&config)?.plan(&slides, &templates)?;
    Ok(serde_json::to_string(&plans)?)
}

/// Best template for one slide. Only malformed input throws.
#[wasm_bindgen(js_name = findBestMatch)]
pub fn find_best_match(slide: &str, templates: &str, config: Option<String>) -> std::result::Result<String, JsValue> {
    find_best_match_json(slide, templates, config).map_err(to_js_error)
}

#[wasm_bindgen(js_name = analyzeLayout)]
pub fn analyze_layout(template: &str, config: Option<String>) -> std::result::Result<String, JsValue> {
    analyze_layout_json(template, config).map_err(to_js_error)
}

#[wasm_bindgen(js_name = paginate)]
pub fn paginate(slides: &str, config: Option<String>) -> std::result::Result<String, JsValue> {
    paginate_json(slides, config).map_err(to_js_error)
}

#[wasm_bindgen(js_name = validatePagination)]
pub fn validate_pagination_js(original: &str, paginated: &str) -> std::result::Result<bool, JsValue> {
    validate_pagination_json(original, paginated).map_err(to_js_error)
}

#[wasm_bindgen(js_name = planSlides)]
pub fn plan_slides(slides: &str, templates: &str, config: Option<String>) -> std::result::Result<String, JsValue> {
    plan_slides_json(slides, templates, config).map_err(to_js_error)
}
