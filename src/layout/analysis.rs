use log::debug;
use serde::Serialize;

use crate::config::LayoutAnalysisConfig;
use crate::models::{Template, TemplateElement, TextRole};

/// Geometric classification of a template's title/text placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Two titled columns side by side, with optional captions above and below.
    Comparison,
    /// One row of three or more titled columns, with an optional caption above.
    HorizontalList,
    /// No structure detected.
    Generic,
}

/// A partition of a template's title and text placeholders by geometric role.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutAnalysis<'a> {
    pub layout_type: LayoutKind,
    pub left_titles: Vec<&'a TemplateElement>,
    pub right_titles: Vec<&'a TemplateElement>,
    pub left_texts: Vec<&'a TemplateElement>,
    pub right_texts: Vec<&'a TemplateElement>,
    pub top_texts: Vec<&'a TemplateElement>,
    pub bottom_texts: Vec<&'a TemplateElement>,
    /// List titles sorted by `left`. Present only for horizontal lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_titles: Option<Vec<&'a TemplateElement>>,
    /// The text paired with each list title, in the same order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_texts: Option<Vec<&'a TemplateElement>>,
}

impl<'a> LayoutAnalysis<'a> {
    pub fn generic() -> Self {
        Self {
            layout_type: LayoutKind::Generic,
            left_titles: Vec::new(),
            right_titles: Vec::new(),
            left_texts: Vec::new(),
            right_texts: Vec::new(),
            top_texts: Vec::new(),
            bottom_texts: Vec::new(),
            list_titles: None,
            list_texts: None,
        }
    }
}

/// Detects comparison and horizontal-list arrangements from placeholder geometry.
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    config: LayoutAnalysisConfig,
}

impl LayoutAnalyzer {
    pub fn new(config: LayoutAnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutAnalysisConfig {
        &self.config
    }

    /// Analyzes the `itemTitle` and `item` placeholders of a template.
    pub fn analyze_template<'a>(&self, template: &'a Template) -> LayoutAnalysis<'a> {
        let titles = template.elements_with_role(TextRole::ItemTitle);
        let texts = template.elements_with_role(TextRole::Item);
        self.analyze_template_layout(&titles, &texts)
    }

    /// Classifies the arrangement of `titles` and `texts`.
    ///
    /// Horizontal lists are tried before comparisons, and comparisons before the
    /// generic layout. Elements that cannot carry text are ignored.
    pub fn analyze_template_layout<'a>(
        &self,
        titles: &[&'a TemplateElement],
        texts: &[&'a TemplateElement],
    ) -> LayoutAnalysis<'a> {
        let titles: Vec<&TemplateElement> = titles.iter().copied().filter(|el| el.is_text_bearing()).collect();
        let texts: Vec<&TemplateElement> = texts.iter().copied().filter(|el| el.is_text_bearing()).collect();

        let rows = self.group_by_vertical_position(&titles);
        let single_row = match rows.as_slice() {
            [row] => Some(row),
            _ => None,
        };

        if let Some(row) = single_row {
            if row.len() >= self.config.horizontal_list.min_title_count {
                if let Some(analysis) = self.detect_horizontal_list(row, &texts) {
                    debug!("Detected horizontal list with {} columns", row.len());
                    return analysis;
                }
            }
            if row.len() == self.config.comparison.title_count {
                if let Some(analysis) = self.detect_comparison(row, &texts) {
                    debug!("Detected comparison layout");
                    return analysis;
                }
            }
        }

        debug!(
            "Generic layout: {} title rows, {} titles, {} texts",
            rows.len(),
            titles.len(),
            texts.len()
        );
        LayoutAnalysis::generic()
    }

    /// Clusters elements into rows. An element joins the first row holding any
    /// member whose `top` is within the grouping threshold.
    pub fn group_by_vertical_position<'a>(&self, elements: &[&'a TemplateElement]) -> Vec<Vec<&'a TemplateElement>> {
        let threshold = self.config.vertical_grouping_threshold;
        let mut rows: Vec<Vec<&TemplateElement>> = Vec::new();

        for &element in elements {
            let row = rows
                .iter_mut()
                .find(|row| row.iter().any(|member| (member.top - element.top).abs() < threshold));
            match row {
                Some(row) => row.push(element),
                None => rows.push(vec![element]),
            }
        }
        rows
    }

    fn detect_horizontal_list<'a>(
        &self,
        row: &[&'a TemplateElement],
        texts: &[&'a TemplateElement],
    ) -> Option<LayoutAnalysis<'a>> {
        let cfg = &self.config.horizontal_list;
        let mut sorted_titles = row.to_vec();
        sorted_titles.sort_by(|a, b| a.left.total_cmp(&b.left));

        let mut paired: Vec<&TemplateElement> = Vec::with_capacity(sorted_titles.len());
        for title in &sorted_titles {
            let found = texts.iter().copied().find(|text| {
                (text.left - title.left).abs() < cfg.match_threshold
                    && text.top > title.top
                    && !paired.iter().any(|p| std::ptr::eq(*p, *text))
            });
            paired.push(found?);
        }

        let first_top = sorted_titles.first()?.top;
        let top_texts = texts
            .iter()
            .copied()
            .filter(|text| text.top < first_top && text.width > cfg.top_text_min_width)
            .collect();

        Some(LayoutAnalysis {
            layout_type: LayoutKind::HorizontalList,
            top_texts,
            list_titles: Some(sorted_titles),
            list_texts: Some(paired),
            ..LayoutAnalysis::generic()
        })
    }

    fn detect_comparison<'a>(
        &self,
        row: &[&'a TemplateElement],
        texts: &[&'a TemplateElement],
    ) -> Option<LayoutAnalysis<'a>> {
        let cfg = &self.config.comparison;
        let mut sorted = row.to_vec();
        sorted.sort_by(|a, b| a.left.total_cmp(&b.left));
        let (left_title, right_title) = match sorted.as_slice() {
            [left, right] => (*left, *right),
            _ => return None,
        };

        let below = |title: &TemplateElement, text: &TemplateElement| {
            (text.left - title.left).abs() < cfg.match_threshold && text.top > title.top
        };
        let left_text = texts.iter().copied().find(|text| below(left_title, text))?;
        let right_text = texts
            .iter()
            .copied()
            .find(|text| !std::ptr::eq(*text, left_text) && below(right_title, text))?;

        let chosen = |text: &TemplateElement| std::ptr::eq(text, left_text) || std::ptr::eq(text, right_text);
        let top_texts = texts
            .iter()
            .copied()
            .filter(|text| !chosen(text) && text.top < left_title.top && text.width > cfg.wide_text_min_width)
            .collect();
        let bottom_texts = texts
            .iter()
            .copied()
            .filter(|text| !chosen(text) && text.top > right_text.top && text.width > cfg.wide_text_min_width)
            .collect();

        Some(LayoutAnalysis {
            layout_type: LayoutKind::Comparison,
            left_titles: vec![left_title],
            right_titles: vec![right_title],
            left_texts: vec![left_text],
            right_texts: vec![right_text],
            top_texts,
            bottom_texts,
            ..LayoutAnalysis::generic()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElementKind, SlideType};

    fn title(id: &str, left: f64, top: f64) -> TemplateElement {
        TemplateElement::text(id, TextRole::ItemTitle, left, top, 200.0, 40.0)
    }

    fn text(id: &str, left: f64, top: f64, width: f64) -> TemplateElement {
        TemplateElement::text(id, TextRole::Item, left, top, width, 120.0)
    }

    fn ids(elements: &[&TemplateElement]) -> Vec<String> {
        elements.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_two_titled_columns_are_a_comparison() {
        let template = Template::new(
            "cmp",
            SlideType::Content,
            vec![
                text("intro", 40.0, 90.0, 880.0),
                title("lt", 80.0, 150.0),
                title("rt", 520.0, 152.0),
                text("lx", 85.0, 220.0, 360.0),
                text("rx", 515.0, 220.0, 360.0),
                text("outro", 40.0, 420.0, 880.0),
            ],
        );

        let analysis = LayoutAnalyzer::default().analyze_template(&template);

        assert_eq!(analysis.layout_type, LayoutKind::Comparison);
        assert_eq!(ids(&analysis.left_titles), vec!["lt"]);
        assert_eq!(ids(&analysis.right_titles), vec!["rt"]);
        assert_eq!(ids(&analysis.left_texts), vec!["lx"]);
        assert_eq!(ids(&analysis.right_texts), vec!["rx"]);
        assert_eq!(ids(&analysis.top_texts), vec!["intro"]);
        assert_eq!(ids(&analysis.bottom_texts), vec!["outro"]);
        assert!(analysis.list_titles.is_none());
    }

    #[test]
    fn test_title_order_in_input_does_not_matter() {
        let rt = title("rt", 520.0, 150.0);
        let lt = title("lt", 80.0, 150.0);
        let rx = text("rx", 520.0, 220.0, 360.0);
        let lx = text("lx", 80.0, 220.0, 360.0);

        let analysis = LayoutAnalyzer::default().analyze_template_layout(&[&rt, &lt], &[&rx, &lx]);

        assert_eq!(analysis.layout_type, LayoutKind::Comparison);
        assert_eq!(ids(&analysis.left_texts), vec!["lx"]);
        assert_eq!(ids(&analysis.right_texts), vec!["rx"]);
    }

    #[test]
    fn test_three_titles_in_a_row_are_a_horizontal_list() {
        let elements = vec![
            text("caption", 40.0, 80.0, 900.0),
            title("t3", 700.0, 160.0),
            title("t1", 60.0, 150.0),
            title("t2", 380.0, 170.0),
            text("x1", 70.0, 230.0, 250.0),
            text("x2", 390.0, 230.0, 250.0),
            text("x3", 690.0, 230.0, 250.0),
        ];
        let template = Template::new("hl", SlideType::Content, elements);

        let analysis = LayoutAnalyzer::default().analyze_template(&template);

        assert_eq!(analysis.layout_type, LayoutKind::HorizontalList);
        assert_eq!(ids(analysis.list_titles.as_deref().unwrap()), vec!["t1", "t2", "t3"]);
        assert_eq!(ids(analysis.list_texts.as_deref().unwrap()), vec!["x1", "x2", "x3"]);
        assert_eq!(ids(&analysis.top_texts), vec!["caption"]);
        assert!(analysis.left_titles.is_empty());
    }

    #[test]
    fn test_missing_column_text_is_generic() {
        let t1 = title("t1", 60.0, 150.0);
        let t2 = title("t2", 380.0, 150.0);
        let t3 = title("t3", 700.0, 150.0);
        let x1 = text("x1", 60.0, 230.0, 250.0);
        let x2 = text("x2", 380.0, 230.0, 250.0);

        let analysis = LayoutAnalyzer::default().analyze_template_layout(&[&t1, &t2, &t3], &[&x1, &x2]);
        assert_eq!(analysis.layout_type, LayoutKind::Generic);
    }

    #[test]
    fn test_grid_of_titles_is_generic() {
        let titles = [
            title("a", 80.0, 100.0),
            title("b", 520.0, 100.0),
            title("c", 80.0, 300.0),
            title("d", 520.0, 300.0),
        ];
        let texts = [
            text("w", 80.0, 160.0, 300.0),
            text("x", 520.0, 160.0, 300.0),
            text("y", 80.0, 360.0, 300.0),
            text("z", 520.0, 360.0, 300.0),
        ];
        let title_refs: Vec<&TemplateElement> = titles.iter().collect();
        let text_refs: Vec<&TemplateElement> = texts.iter().collect();

        let analyzer = LayoutAnalyzer::default();
        assert_eq!(analyzer.group_by_vertical_position(&title_refs).len(), 2);
        assert_eq!(
            analyzer.analyze_template_layout(&title_refs, &text_refs).layout_type,
            LayoutKind::Generic
        );
    }

    #[test]
    fn test_text_above_title_does_not_pair() {
        let lt = title("lt", 80.0, 300.0);
        let rt = title("rt", 520.0, 300.0);
        let lx = text("lx", 80.0, 100.0, 360.0);
        let rx = text("rx", 520.0, 360.0, 360.0);

        let analysis = LayoutAnalyzer::default().analyze_template_layout(&[&lt, &rt], &[&lx, &rx]);
        assert_eq!(analysis.layout_type, LayoutKind::Generic);
    }

    #[test]
    fn test_rows_chain_through_members() {
        let a = title("a", 0.0, 100.0);
        let b = title("b", 100.0, 140.0);
        let c = title("c", 200.0, 180.0);
        let rows = LayoutAnalyzer::default().group_by_vertical_position(&[&a, &b, &c]);
        assert_eq!(rows.len(), 1, "c is within the threshold of b, which already joined a's row");
    }

    #[test]
    fn test_non_text_elements_are_ignored() {
        let lt = title("lt", 80.0, 150.0);
        let rt = title("rt", 520.0, 150.0);
        let mut pic = title("pic", 300.0, 150.0);
        pic.kind = ElementKind::Image;
        let lx = text("lx", 80.0, 220.0, 360.0);
        let rx = text("rx", 520.0, 220.0, 360.0);

        let analysis = LayoutAnalyzer::default().analyze_template_layout(&[&lt, &pic, &rt], &[&lx, &rx]);
        assert_eq!(analysis.layout_type, LayoutKind::Comparison);
    }

    #[test]
    fn test_custom_threshold_changes_detection() {
        let mut config = LayoutAnalysisConfig::default();
        config.comparison.match_threshold = 10.0;
        let lt = title("lt", 80.0, 150.0);
        let rt = title("rt", 520.0, 150.0);
        let lx = text("lx", 110.0, 220.0, 360.0);
        let rx = text("rx", 520.0, 220.0, 360.0);

        let analysis = LayoutAnalyzer::new(config).analyze_template_layout(&[&lt, &rt], &[&lx, &rx]);
        assert_eq!(analysis.layout_type, LayoutKind::Generic);
    }
}
