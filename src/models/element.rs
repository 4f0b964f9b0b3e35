use serde::{Deserialize, Serialize};

/// The kind of a template element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// A plain text box.
    Text,
    /// A geometric shape, optionally carrying text.
    Shape,
    /// A raster or vector image.
    Image,
    /// A line or connector.
    Line,
    /// A chart.
    Chart,
    /// A table.
    Table,
    /// Any other element (video, audio, latex, ...).
    #[serde(other)]
    Other,
}

/// Semantic role tag carried by a text-bearing placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextRole {
    /// Slide title.
    Title,
    /// Slide subtitle.
    Subtitle,
    /// Free body text (single-item slides, cover/transition text, captions).
    Content,
    /// Body text of one list item.
    Item,
    /// Title of one list item.
    ItemTitle,
    /// Decorative notes.
    Notes,
    /// Page header.
    Header,
    /// Page footer.
    Footer,
    /// Section number on transition slides.
    PartNumber,
    /// Ordinal of one list item.
    ItemNumber,
}

/// Semantic role tag carried by an image placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageRole {
    /// Illustration for the whole page.
    PageFigure,
    /// Illustration attached to one list item.
    ItemFigure,
    /// Background picture.
    Background,
}

/// The text payload of a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeText {
    /// Role tag of the text inside the shape.
    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<TextRole>,
    /// Rich-text (HTML) content of the shape.
    #[serde(default)]
    pub content: String,
}

/// A placeholder element of a template slide.
///
/// Geometry is expressed in canvas pixels with the origin at the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateElement {
    /// Unique id of the element inside its template.
    pub id: String,

    /// The element kind.
    #[serde(rename = "type")]
    pub kind: ElementKind,

    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,

    /// Role tag of a text element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_type: Option<TextRole>,

    /// Text payload of a shape element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ShapeText>,

    /// Rich-text (HTML) content of a text element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Group the element belongs to; grouped elements are removed together.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    /// Nominal font size in pixels, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    /// Role tag of an image element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageRole>,
}

impl TemplateElement {
    /// Creates a text element with the given role and geometry.
    pub fn text(
        id: impl Into<String>,
        role: TextRole,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::Text,
            left,
            top,
            width,
            height,
            text_type: Some(role),
            text: None,
            content: None,
            group_id: None,
            font_size: None,
            image_type: None,
        }
    }

    /// Creates a shape element whose text carries the given role.
    pub fn shape(
        id: impl Into<String>,
        role: TextRole,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            kind: ElementKind::Shape,
            text_type: None,
            text: Some(ShapeText {
                role: Some(role),
                content: String::new(),
            }),
            ..Self::text(id, role, left, top, width, height)
        }
    }

    /// Sets the group id.
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Sets the nominal font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Returns the text role of the element.
    ///
    /// Text elements carry it in `textType`; shapes carry it inside their text payload.
    /// Every other kind has no text role.
    pub fn role(&self) -> Option<TextRole> {
        match self.kind {
            ElementKind::Text => self.text_type,
            ElementKind::Shape => self.text.as_ref().and_then(|t| t.role),
            _ => None,
        }
    }

    /// Returns true if the element is a text or shape element tagged with `role`.
    pub fn has_role(&self, role: TextRole) -> bool {
        self.role() == Some(role)
    }

    /// Returns true for element kinds that can hold replaceable text.
    pub fn is_text_bearing(&self) -> bool {
        matches!(self.kind, ElementKind::Text | ElementKind::Shape)
    }

    /// Horizontal center of the element.
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Reading-order key: left-to-right, then top-to-bottom with rows weighted double.
    pub fn reading_order_key(&self) -> f64 {
        self.left + self.top * 2.0
    }

    /// Rich-text content regardless of whether the element is a text box or a shape.
    pub fn rich_text(&self) -> Option<&str> {
        match self.kind {
            ElementKind::Text => self.content.as_deref(),
            ElementKind::Shape => self.text.as_ref().map(|t| t.content.as_str()),
            _ => None,
        }
    }
}

/// Sorts placeholders into reading order (`left + 2 * top`), stable on ties.
pub fn sort_by_reading_order(elements: &mut [&TemplateElement]) {
    elements.sort_by(|a, b| a.reading_order_key().total_cmp(&b.reading_order_key()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_text_and_shape_json() {
        let json = r#"[
            {"id": "a", "type": "text", "left": 10, "top": 20, "width": 100, "height": 30, "textType": "itemTitle"},
            {"id": "b", "type": "shape", "left": 10, "top": 80, "width": 100, "height": 60,
             "text": {"type": "item", "content": "<p>body</p>"}},
            {"id": "c", "type": "image", "left": 0, "top": 0, "width": 960, "height": 540, "imageType": "background"},
            {"id": "d", "type": "video", "left": 0, "top": 0}
        ]"#;

        let elements: Vec<TemplateElement> =
            serde_json::from_str(json).expect("elements should deserialize");

        assert_eq!(elements[0].role(), Some(TextRole::ItemTitle));
        assert_eq!(elements[1].role(), Some(TextRole::Item));
        assert_eq!(elements[1].rich_text(), Some("<p>body</p>"));
        assert_eq!(elements[2].role(), None);
        assert_eq!(elements[2].image_type, Some(ImageRole::Background));
        assert_eq!(elements[3].kind, ElementKind::Other);
        assert_eq!(elements[3].width, 0.0);
    }

    #[test]
    fn test_image_never_has_text_role() {
        let mut image = TemplateElement::text("img", TextRole::Title, 0.0, 0.0, 10.0, 10.0);
        image.kind = ElementKind::Image;
        assert!(!image.has_role(TextRole::Title));
        assert!(!image.is_text_bearing());
    }

    #[test]
    fn test_reading_order_prefers_rows() {
        let right_top = TemplateElement::text("rt", TextRole::Item, 500.0, 100.0, 100.0, 50.0);
        let left_low = TemplateElement::text("ll", TextRole::Item, 50.0, 400.0, 100.0, 50.0);
        let left_top = TemplateElement::text("lt", TextRole::Item, 50.0, 100.0, 100.0, 50.0);

        let mut ordered = vec![&left_low, &right_top, &left_top];
        sort_by_reading_order(&mut ordered);

        let ids: Vec<&str> = ordered.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["lt", "rt", "ll"]);
    }
}
