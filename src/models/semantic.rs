use serde::{Deserialize, Serialize};

/// Pedagogical category of a content slide, as tagged by the content generator
/// or annotated on a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    LearningObjective,
    LessonIntroduction,
    ProblemGuidance,
    ConceptExplanation,
    CaseAnalysis,
    ComparisonAnalysis,
    InquiryPractice,
    ProblemDiscussion,
    ClassExercise,
    ContentSummary,
    ExtensionEnrichment,
    HomeworkAssignment,
    /// A tag this engine does not know. Carries no matching signal.
    #[serde(other)]
    Unrecognized,
}

/// Visual arrangement recommended for a content slide or annotated on a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    // Lists
    VerticalList,
    HorizontalList,
    MultiColumnList,
    // Processes
    HorizontalProcess,
    VerticalProcess,
    StepProcess,
    AlternatingProcess,
    // Cycles
    BasicCycle,
    // Hierarchies
    GeneralSpecific,
    GeneralSpecificGeneral,
    TreeStructure,
    // Relationships
    Balance,
    Funnel,
    Intersecting,
    // Matrices
    BasicMatrix,
    // Pyramids
    Pyramid,
    InvertedPyramid,
    // Pictures
    PictureGrid,
    PictureCollage,
    // Timelines
    HorizontalTimeline,
    VerticalTimeline,
    // Others
    Comparison,
    ProCon,
    BeforeAfter,
    SwotAnalysis,
    CauseEffect,
    MindMap,
    /// A tag this engine does not know. Carries no matching signal.
    #[serde(other)]
    Unrecognized,
}

/// Categorical tags that can be compared between content and template.
pub trait SemanticTag: Copy + PartialEq {
    /// Returns false for tags that carry no matching signal.
    fn is_recognized(&self) -> bool;
}

impl SemanticTag for ContentType {
    fn is_recognized(&self) -> bool {
        *self != ContentType::Unrecognized
    }
}

impl SemanticTag for LayoutType {
    fn is_recognized(&self) -> bool {
        *self != LayoutType::Unrecognized
    }
}

/// Semantic signals attached to a content slide by the content generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<LayoutType>,
}

/// Categorical annotation attached to a template by a template author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<LayoutType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tags_are_unrecognized() {
        let features: SemanticFeatures = serde_json::from_str(
            r#"{"contentType": "concept_explanation", "layoutType": "spiral_galaxy"}"#,
        )
        .expect("features should deserialize");

        assert_eq!(features.content_type, Some(ContentType::ConceptExplanation));
        assert_eq!(features.layout_type, Some(LayoutType::Unrecognized));
        assert!(!LayoutType::Unrecognized.is_recognized());
    }

    #[test]
    fn test_tags_serialize_snake_case() {
        let json = serde_json::to_string(&LayoutType::SwotAnalysis).unwrap();
        assert_eq!(json, "\"swot_analysis\"");
        let json = serde_json::to_string(&ContentType::HomeworkAssignment).unwrap();
        assert_eq!(json, "\"homework_assignment\"");
    }
}
