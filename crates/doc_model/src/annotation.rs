//! Annotation model - typographic decorations layered over paragraph text
//!
//! An annotation never touches the paragraph text. It records a character
//! range (or a single anchor point, for inline icons) inside one paragraph
//! together with the decoration to draw there. Three shapes exist:
//! - span annotations style a run of text (bold, highlight, border, ...)
//! - callouts decorate the whole paragraph container
//! - inline icons are zero-width anchors that insert a graphic

use crate::{AnnotationId, DocModelError, Document, HexColor, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn length_pattern() -> &'static regex_lite::Regex {
    static PATTERN: OnceLock<regex_lite::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex_lite::Regex::new(r"^-?\d+(\.\d+)?(px|pt|em|rem|%)$").expect("length pattern is valid")
    })
}

/// Text-level style carried by a span annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpanStyle {
    Bold,
    Italic,
    Underline,
    WavyUnderline,
    Strikethrough,
    Overline,
    Highlight,
    TextColor,
    Border,
    Circle,
    FontSize,
    LetterSpacing,
    Superscript,
    Subscript,
    SansSerif,
    Serif,
    Mono,
    Rounded,
    Handwriting,
    SmallCaps,
    DropCap,
}

impl SpanStyle {
    /// Every span style, in toolbar order
    pub const ALL: [SpanStyle; 21] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::WavyUnderline,
        Self::Strikethrough,
        Self::Overline,
        Self::Highlight,
        Self::TextColor,
        Self::Border,
        Self::Circle,
        Self::FontSize,
        Self::LetterSpacing,
        Self::Superscript,
        Self::Subscript,
        Self::SansSerif,
        Self::Serif,
        Self::Mono,
        Self::Rounded,
        Self::Handwriting,
        Self::SmallCaps,
        Self::DropCap,
    ];

    /// Wire name of the style
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::WavyUnderline => "wavyUnderline",
            Self::Strikethrough => "strikethrough",
            Self::Overline => "overline",
            Self::Highlight => "highlight",
            Self::TextColor => "textColor",
            Self::Border => "border",
            Self::Circle => "circle",
            Self::FontSize => "fontSize",
            Self::LetterSpacing => "letterSpacing",
            Self::Superscript => "superscript",
            Self::Subscript => "subscript",
            Self::SansSerif => "sansSerif",
            Self::Serif => "serif",
            Self::Mono => "mono",
            Self::Rounded => "rounded",
            Self::Handwriting => "handwriting",
            Self::SmallCaps => "smallCaps",
            Self::DropCap => "dropCap",
        }
    }

    /// Whether the style's value is a size rather than a color
    pub fn takes_size(&self) -> bool {
        matches!(self, Self::FontSize | Self::LetterSpacing)
    }

    /// Whether the style's value is painted as a color
    pub fn takes_color(&self) -> bool {
        matches!(
            self,
            Self::Underline
                | Self::WavyUnderline
                | Self::Strikethrough
                | Self::Overline
                | Self::Highlight
                | Self::TextColor
                | Self::Border
                | Self::Circle
                | Self::DropCap
        )
    }

    /// Check a value for this style.
    ///
    /// Colors must be `#rrggbb` and sizes a CSS length such as `18px`. Other
    /// styles ignore their value.
    pub fn accepts(&self, value: &str) -> bool {
        if self.takes_size() {
            length_pattern().is_match(value)
        } else if self.takes_color() {
            HexColor::is_valid(value)
        } else {
            true
        }
    }

    /// Whether the style selects a font family
    pub fn is_font_family(&self) -> bool {
        matches!(
            self,
            Self::SansSerif | Self::Serif | Self::Mono | Self::Rounded | Self::Handwriting
        )
    }
}

impl std::fmt::Display for SpanStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpanStyle {
    type Err = DocModelError;

    fn from_str(s: &str) -> Result<Self> {
        // "textcolor" is the legacy spelling still found in older documents
        if s == "textcolor" {
            return Ok(Self::TextColor);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| DocModelError::UnknownAnnotationType(s.to_string()))
    }
}

/// The type tag of any annotation, as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationType {
    Span(SpanStyle),
    Callout,
    InlineIcon,
}

impl AnnotationType {
    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Span(style) => style.as_str(),
            Self::Callout => "callout",
            Self::InlineIcon => "inlineIcon",
        }
    }
}

impl std::fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnnotationType {
    type Err = DocModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "callout" => Ok(Self::Callout),
            "inlineIcon" => Ok(Self::InlineIcon),
            other => other.parse().map(Self::Span),
        }
    }
}

/// Graphic inserted by an inline icon annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPayload {
    /// Human-readable icon name
    pub icon_name: String,
    /// Raster image data (usually a data URL)
    pub icon_data: Option<String>,
    /// Inline SVG markup
    pub svg_code: Option<String>,
}

impl IconPayload {
    pub fn new(icon_name: impl Into<String>) -> Self {
        Self {
            icon_name: icon_name.into(),
            icon_data: None,
            svg_code: None,
        }
    }

    pub fn with_svg(mut self, svg_code: impl Into<String>) -> Self {
        self.svg_code = Some(svg_code.into());
        self
    }

    pub fn with_data(mut self, icon_data: impl Into<String>) -> Self {
        self.icon_data = Some(icon_data.into());
        self
    }
}

/// Kind-specific payload of an annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationKind {
    /// Styles a run of text; `value` is a hex color or a size/spacing value
    Span { style: SpanStyle, value: String },
    /// Decorates the whole paragraph container
    Callout { border_color: String, background: String },
    /// Zero-width graphic anchored at a single offset
    InlineIcon(IconPayload),
}

/// A typographic decoration attached to a range (or point) of one paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AnnotationRecord", into = "AnnotationRecord")]
pub struct Annotation {
    /// Unique, stable id
    pub id: AnnotationId,
    /// What to draw
    pub kind: AnnotationKind,
    /// Snapshot of the covered text at creation time
    pub text: String,
    /// Paragraph the annotation belongs to
    pub para_index: usize,
    /// Start char offset (inclusive)
    pub start_offset: usize,
    /// End char offset (exclusive)
    pub end_offset: usize,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Annotation {
    fn with_kind(
        kind: AnnotationKind,
        para_index: usize,
        start_offset: usize,
        end_offset: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: AnnotationId::new(),
            kind,
            text: text.into(),
            para_index,
            start_offset,
            end_offset,
            created_at: Utc::now(),
        }
    }

    /// Create a span annotation
    pub fn span(
        style: SpanStyle,
        value: impl Into<String>,
        para_index: usize,
        start_offset: usize,
        end_offset: usize,
        text: impl Into<String>,
    ) -> Self {
        let kind = AnnotationKind::Span {
            style,
            value: value.into(),
        };
        Self::with_kind(kind, para_index, start_offset, end_offset, text)
    }

    /// Create a callout annotation
    pub fn callout(
        border_color: impl Into<String>,
        background: impl Into<String>,
        para_index: usize,
        start_offset: usize,
        end_offset: usize,
        text: impl Into<String>,
    ) -> Self {
        let kind = AnnotationKind::Callout {
            border_color: border_color.into(),
            background: background.into(),
        };
        Self::with_kind(kind, para_index, start_offset, end_offset, text)
    }

    /// Create an inline icon anchored at `offset`
    pub fn inline_icon(icon: IconPayload, para_index: usize, offset: usize) -> Self {
        let text = icon.icon_name.clone();
        Self::with_kind(AnnotationKind::InlineIcon(icon), para_index, offset, offset, text)
    }

    /// Replace the generated id (used when restoring persisted annotations)
    pub fn with_id(mut self, id: impl Into<AnnotationId>) -> Self {
        self.id = id.into();
        self
    }

    /// Replace the creation time
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Get the type tag
    pub fn annotation_type(&self) -> AnnotationType {
        match &self.kind {
            AnnotationKind::Span { style, .. } => AnnotationType::Span(*style),
            AnnotationKind::Callout { .. } => AnnotationType::Callout,
            AnnotationKind::InlineIcon(_) => AnnotationType::InlineIcon,
        }
    }

    /// Get the span style, if this is a span annotation
    pub fn span_style(&self) -> Option<SpanStyle> {
        match &self.kind {
            AnnotationKind::Span { style, .. } => Some(*style),
            _ => None,
        }
    }

    /// The `color` field: span value, callout border color, empty for icons
    pub fn value(&self) -> &str {
        match &self.kind {
            AnnotationKind::Span { value, .. } => value,
            AnnotationKind::Callout { border_color, .. } => border_color,
            AnnotationKind::InlineIcon(_) => "",
        }
    }

    /// Callout background color
    pub fn background(&self) -> Option<&str> {
        match &self.kind {
            AnnotationKind::Callout { background, .. } => Some(background),
            _ => None,
        }
    }

    /// Icon payload of an inline icon
    pub fn icon(&self) -> Option<&IconPayload> {
        match &self.kind {
            AnnotationKind::InlineIcon(icon) => Some(icon),
            _ => None,
        }
    }

    /// Whether this is a zero-width point annotation
    pub fn is_point(&self) -> bool {
        matches!(self.kind, AnnotationKind::InlineIcon(_))
    }

    /// Whether this is a paragraph-level block annotation
    pub fn is_block(&self) -> bool {
        matches!(self.kind, AnnotationKind::Callout { .. })
    }

    /// Check whether another annotation has the same type over the same range
    pub fn same_target(&self, other: &Annotation) -> bool {
        self.annotation_type() == other.annotation_type()
            && self.para_index == other.para_index
            && self.start_offset == other.start_offset
            && self.end_offset == other.end_offset
    }

    /// Replace the value in place (keep-selection recolor).
    ///
    /// Only span values and callout colors change; icons carry no value.
    pub fn recolor(&mut self, value: impl Into<String>, background: Option<String>) {
        match &mut self.kind {
            AnnotationKind::Span { value: current, .. } => *current = value.into(),
            AnnotationKind::Callout {
                border_color,
                background: current_bg,
            } => {
                *border_color = value.into();
                if let Some(bg) = background {
                    *current_bg = bg;
                }
            }
            AnnotationKind::InlineIcon(_) => {}
        }
    }

    /// Validate the annotation's range against a document
    pub fn validate(&self, document: &Document) -> Result<()> {
        let (para, start, end) = (self.para_index, self.start_offset, self.end_offset);
        let paragraph = document.paragraph(para).ok_or_else(|| {
            DocModelError::invalid_range(
                para,
                start,
                end,
                format!("document has {} paragraphs", document.len()),
            )
        })?;

        if self.is_point() && start != end {
            return Err(DocModelError::invalid_range(
                para,
                start,
                end,
                "inline icons must be zero-width",
            ));
        }
        if start > end {
            return Err(DocModelError::invalid_range(para, start, end, "start is after end"));
        }
        let len = paragraph.len();
        if end > len {
            return Err(DocModelError::invalid_range(
                para,
                start,
                end,
                format!("paragraph length is {}", len),
            ));
        }
        self.validate_values()
    }

    /// Check that every value that ends up in CSS is well formed
    pub fn validate_values(&self) -> Result<()> {
        match &self.kind {
            AnnotationKind::Span { style, value } if !style.accepts(value) => {
                Err(DocModelError::InvalidStyleValue {
                    style: style.as_str().to_string(),
                    value: value.clone(),
                })
            }
            AnnotationKind::Callout {
                border_color,
                background,
            } => {
                HexColor::parse(border_color)?;
                HexColor::parse(background)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Flat wire representation shared with the document service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotationRecord {
    id: AnnotationId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    color: String,
    para_index: usize,
    start_offset: usize,
    end_offset: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    svg_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon_name: Option<String>,
    #[serde(default = "Utc::now", alias = "created_at")]
    created_at: DateTime<Utc>,
}

impl TryFrom<AnnotationRecord> for Annotation {
    type Error = DocModelError;

    fn try_from(record: AnnotationRecord) -> Result<Self> {
        let kind = match record.kind.parse::<AnnotationType>()? {
            AnnotationType::Span(style) => AnnotationKind::Span {
                style,
                value: record.color,
            },
            AnnotationType::Callout => AnnotationKind::Callout {
                border_color: record.color,
                background: record.bg_color.unwrap_or_default(),
            },
            AnnotationType::InlineIcon => AnnotationKind::InlineIcon(IconPayload {
                icon_name: record.icon_name.unwrap_or_default(),
                icon_data: record.icon_data,
                svg_code: record.svg_code,
            }),
        };
        Ok(Self {
            id: record.id,
            kind,
            text: record.text,
            para_index: record.para_index,
            start_offset: record.start_offset,
            end_offset: record.end_offset,
            created_at: record.created_at,
        })
    }
}

impl From<Annotation> for AnnotationRecord {
    fn from(annotation: Annotation) -> Self {
        let kind = annotation.annotation_type().as_str().to_string();
        let mut record = AnnotationRecord {
            id: annotation.id,
            kind,
            text: annotation.text,
            color: String::new(),
            para_index: annotation.para_index,
            start_offset: annotation.start_offset,
            end_offset: annotation.end_offset,
            bg_color: None,
            icon_data: None,
            svg_code: None,
            icon_name: None,
            created_at: annotation.created_at,
        };
        match annotation.kind {
            AnnotationKind::Span { value, .. } => record.color = value,
            AnnotationKind::Callout {
                border_color,
                background,
            } => {
                record.color = border_color;
                record.bg_color = Some(background);
            }
            AnnotationKind::InlineIcon(icon) => {
                record.icon_name = Some(icon.icon_name);
                record.icon_data = icon.icon_data;
                record.svg_code = icon.svg_code;
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hello_doc() -> Document {
        Document::from_texts(["Hello world", "Second"])
    }

    #[test]
    fn test_span_style_names_roundtrip() {
        for style in SpanStyle::ALL {
            assert_eq!(style.as_str().parse::<SpanStyle>().unwrap(), style);
        }
        assert_eq!("textcolor".parse::<SpanStyle>().unwrap(), SpanStyle::TextColor);
        assert!("blink".parse::<SpanStyle>().is_err());
    }

    #[test]
    fn test_annotation_type_parse() {
        assert_eq!("callout".parse::<AnnotationType>().unwrap(), AnnotationType::Callout);
        assert_eq!(
            "inlineIcon".parse::<AnnotationType>().unwrap(),
            AnnotationType::InlineIcon
        );
        assert_eq!(
            "wavyUnderline".parse::<AnnotationType>().unwrap(),
            AnnotationType::Span(SpanStyle::WavyUnderline)
        );
    }

    #[test]
    fn test_validate_accepts_in_bounds() {
        let doc = hello_doc();
        let a = Annotation::span(SpanStyle::Highlight, "#ffeb3b", 0, 0, 5, "Hello");
        assert!(a.validate(&doc).is_ok());

        let whole = Annotation::span(SpanStyle::Bold, "#000000", 0, 0, 11, "Hello world");
        assert!(whole.validate(&doc).is_ok());

        let icon = Annotation::inline_icon(IconPayload::new("star"), 0, 11);
        assert!(icon.validate(&doc).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let doc = Document::from_texts(["0123456789"]);
        let a = Annotation::span(SpanStyle::Bold, "#000000", 0, 50, 55, "");
        let err = a.validate(&doc).unwrap_err();
        assert!(err.is_invalid_range());

        let bad_para = Annotation::span(SpanStyle::Bold, "#000000", 3, 0, 1, "");
        assert!(bad_para.validate(&doc).unwrap_err().is_invalid_range());

        let inverted = Annotation::span(SpanStyle::Bold, "#000000", 0, 6, 2, "");
        assert!(inverted.validate(&doc).unwrap_err().is_invalid_range());
    }

    #[test]
    fn test_validate_rejects_css_in_values() {
        let doc = hello_doc();
        let smuggled = Annotation::span(SpanStyle::Highlight, "#fff;position:fixed", 0, 0, 5, "Hello");
        assert_eq!(
            smuggled.validate(&doc),
            Err(DocModelError::InvalidStyleValue {
                style: "highlight".to_string(),
                value: "#fff;position:fixed".to_string(),
            })
        );

        let size = Annotation::span(SpanStyle::FontSize, "18px;color:red", 0, 0, 5, "Hello");
        assert!(size.validate(&doc).is_err());
        let size = Annotation::span(SpanStyle::FontSize, "18px", 0, 0, 5, "Hello");
        assert!(size.validate(&doc).is_ok());

        let callout = Annotation::callout("#1976d2", "red}body{display:none", 0, 0, 5, "Hello");
        assert!(matches!(
            callout.validate(&doc),
            Err(DocModelError::InvalidColor(_))
        ));

        // Bold never paints its value
        let bold = Annotation::span(SpanStyle::Bold, "", 0, 0, 5, "Hello");
        assert!(bold.validate(&doc).is_ok());
    }

    #[test]
    fn test_validate_rejects_wide_icon() {
        let doc = hello_doc();
        let mut icon = Annotation::inline_icon(IconPayload::new("star"), 0, 2);
        icon.end_offset = 4;
        assert!(icon.validate(&doc).is_err());
    }

    #[test]
    fn test_wire_format_span() {
        let a = Annotation::span(SpanStyle::TextColor, "#e53935", 1, 2, 4, "co")
            .with_id("style-1-abcdefghi");
        let value = serde_json::to_value(&a).unwrap();
        assert_eq!(value["id"], "style-1-abcdefghi");
        assert_eq!(value["type"], "textColor");
        assert_eq!(value["color"], "#e53935");
        assert_eq!(value["paraIndex"], 1);
        assert_eq!(value["startOffset"], 2);
        assert_eq!(value["endOffset"], 4);
        assert!(value.get("bgColor").is_none());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_wire_format_callout_and_icon() {
        let callout = Annotation::callout("#1976d2", "#e3f2fd", 0, 0, 5, "Hello");
        let value = serde_json::to_value(&callout).unwrap();
        assert_eq!(value["type"], "callout");
        assert_eq!(value["bgColor"], "#e3f2fd");

        let icon = Annotation::inline_icon(IconPayload::new("star").with_svg("<svg/>"), 0, 3);
        let value = serde_json::to_value(&icon).unwrap();
        assert_eq!(value["type"], "inlineIcon");
        assert_eq!(value["iconName"], "star");
        assert_eq!(value["svgCode"], "<svg/>");
        assert_eq!(value["startOffset"], value["endOffset"]);

        let back: Annotation = serde_json::from_value(value).unwrap();
        assert_eq!(back, icon);
    }

    #[test]
    fn test_decodes_legacy_record() {
        let legacy = json!({
            "id": "style-1700000000000-k3j2h1g0f",
            "type": "textcolor",
            "text": "Hello",
            "color": "#E53935",
            "paraIndex": 0,
            "startOffset": 0,
            "endOffset": 5,
            "created_at": "2024-01-02T03:04:05Z"
        });
        let a: Annotation = serde_json::from_value(legacy).unwrap();
        assert_eq!(a.span_style(), Some(SpanStyle::TextColor));
        assert_eq!(a.value(), "#E53935");
        assert_eq!(a.created_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let record = json!({
            "id": "x", "type": "sparkle", "paraIndex": 0, "startOffset": 0, "endOffset": 1
        });
        assert!(serde_json::from_value::<Annotation>(record).is_err());
    }

    #[test]
    fn test_recolor() {
        let mut span = Annotation::span(SpanStyle::Highlight, "#ffeb3b", 0, 0, 5, "Hello");
        span.recolor("#00ff00", None);
        assert_eq!(span.value(), "#00ff00");

        let mut callout = Annotation::callout("#1976d2", "#e3f2fd", 0, 0, 5, "Hello");
        callout.recolor("#000000", Some("#ffffff".to_string()));
        assert_eq!(callout.value(), "#000000");
        assert_eq!(callout.background(), Some("#ffffff"));
    }

    #[test]
    fn test_same_target() {
        let a = Annotation::span(SpanStyle::Bold, "#000000", 0, 1, 4, "ell");
        let b = Annotation::span(SpanStyle::Bold, "#ff0000", 0, 1, 4, "ell");
        let c = Annotation::span(SpanStyle::Italic, "#000000", 0, 1, 4, "ell");
        assert!(a.same_target(&b));
        assert!(!a.same_target(&c));
    }
}
