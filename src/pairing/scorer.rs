use crate::config::MatchScoreConfig;
use crate::models::TemplateElement;

/// Rates how plausibly `text` is the body belonging to `title`.
///
/// Zero is a hard reject: the text is in another column, above the title, too
/// far below it, or off-center. Any positive score is only meaningful relative
/// to other candidates.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    config: MatchScoreConfig,
}

impl MatchScorer {
    pub fn new(config: MatchScoreConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, title: &TemplateElement, text: &TemplateElement) -> f64 {
        let cfg = &self.config;
        let decay = |distance: f64| (-distance / cfg.decay_factor).exp();

        let horizontal_distance = (title.left - text.left).abs();
        if horizontal_distance > cfg.horizontal_threshold {
            return 0.0;
        }
        let horizontal = 100.0 * decay(horizontal_distance);

        let vertical_distance = text.top - title.top;
        if vertical_distance <= 0.0 || vertical_distance >= cfg.vertical_max_distance {
            return 0.0;
        }
        let vertical = 100.0 * decay((vertical_distance - cfg.ideal_vertical_gap).abs());

        let wider = title.width.max(text.width);
        let width = if wider > 0.0 {
            50.0 * title.width.min(text.width) / wider
        } else {
            0.0
        };

        let center_distance = (title.center_x() - text.center_x()).abs();
        if center_distance > cfg.center_threshold {
            return 0.0;
        }
        let center = 50.0 * decay(center_distance);

        let w = &cfg.weights;
        horizontal * w.horizontal + vertical * w.vertical + width * w.width + center * w.center
    }
}

/// [`MatchScorer::score`] with the default configuration.
pub fn calculate_layout_match_score(title: &TemplateElement, text: &TemplateElement) -> f64 {
    MatchScorer::default().score(title, text)
}
