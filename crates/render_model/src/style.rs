//! Visual attributes resolved from the annotations active on a segment

use doc_model::{Annotation, AnnotationKind, SpanStyle};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A decoration line drawn through or around text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDecoration {
    Underline,
    WavyUnderline,
    LineThrough,
    Overline,
}

impl TextDecoration {
    /// CSS `text-decoration-line` keyword
    pub fn css_line(&self) -> &'static str {
        match self {
            TextDecoration::Underline | TextDecoration::WavyUnderline => "underline",
            TextDecoration::LineThrough => "line-through",
            TextDecoration::Overline => "overline",
        }
    }
}

/// Shape of a border drawn around text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderShape {
    Box,
    Pill,
}

/// Border color and shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderStyle {
    pub color: String,
    pub shape: BorderShape,
}

/// Baseline shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    Super,
    Sub,
}

/// Font family override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    SansSerif,
    Serif,
    Mono,
    Rounded,
    Handwriting,
}

impl FontFamily {
    fn from_style(style: SpanStyle) -> Option<Self> {
        match style {
            SpanStyle::SansSerif => Some(FontFamily::SansSerif),
            SpanStyle::Serif => Some(FontFamily::Serif),
            SpanStyle::Mono => Some(FontFamily::Mono),
            SpanStyle::Rounded => Some(FontFamily::Rounded),
            SpanStyle::Handwriting => Some(FontFamily::Handwriting),
            _ => None,
        }
    }

    /// CSS font stack
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::SansSerif => "'Inter', 'Helvetica Neue', Arial, sans-serif",
            FontFamily::Serif => "Georgia, 'Times New Roman', serif",
            FontFamily::Mono => "'JetBrains Mono', Menlo, Consolas, monospace",
            FontFamily::Rounded => "'Nunito', 'Varela Round', sans-serif",
            FontFamily::Handwriting => "'Caveat', 'Comic Sans MS', cursive",
        }
    }
}

/// Flattened visual attributes of a styled segment.
///
/// Built by folding the active annotations in insertion order, so when two
/// annotations set the same attribute the later one wins. Decoration lines
/// accumulate; only their color collides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualStyle {
    pub bold: bool,
    pub italic: bool,
    pub decorations: Vec<TextDecoration>,
    pub decoration_color: Option<String>,
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub border: Option<BorderStyle>,
    pub font_size: Option<String>,
    pub letter_spacing: Option<String>,
    pub vertical_align: Option<VerticalAlign>,
    pub font_family: Option<FontFamily>,
    pub small_caps: bool,
    /// Color of the enlarged first grapheme. Only set on the segment where a
    /// drop cap annotation starts.
    pub drop_cap: Option<String>,
}

impl VisualStyle {
    /// Resolve the style of a segment starting at char offset `start` from
    /// its active annotations
    pub fn resolve(annotations: &[Annotation], start: usize) -> Self {
        let mut style = VisualStyle::default();
        for annotation in annotations {
            if let AnnotationKind::Span { style: kind, value } = &annotation.kind {
                if *kind == SpanStyle::DropCap && annotation.start_offset != start {
                    continue;
                }
                style.apply(*kind, value);
            }
        }
        style
    }

    fn apply(&mut self, kind: SpanStyle, value: &str) {
        let value = value.to_string();
        match kind {
            SpanStyle::Bold => self.bold = true,
            SpanStyle::Italic => self.italic = true,
            SpanStyle::Underline => self.decorate(TextDecoration::Underline, value),
            SpanStyle::WavyUnderline => self.decorate(TextDecoration::WavyUnderline, value),
            SpanStyle::Strikethrough => self.decorate(TextDecoration::LineThrough, value),
            SpanStyle::Overline => self.decorate(TextDecoration::Overline, value),
            SpanStyle::Highlight => self.background = Some(value),
            SpanStyle::TextColor => self.foreground = Some(value),
            SpanStyle::Border => {
                self.border = Some(BorderStyle {
                    color: value,
                    shape: BorderShape::Box,
                })
            }
            SpanStyle::Circle => {
                self.border = Some(BorderStyle {
                    color: value,
                    shape: BorderShape::Pill,
                })
            }
            SpanStyle::FontSize => self.font_size = Some(value),
            SpanStyle::LetterSpacing => self.letter_spacing = Some(value),
            SpanStyle::Superscript => self.vertical_align = Some(VerticalAlign::Super),
            SpanStyle::Subscript => self.vertical_align = Some(VerticalAlign::Sub),
            SpanStyle::SmallCaps => self.small_caps = true,
            SpanStyle::DropCap => self.drop_cap = Some(value),
            family => self.font_family = FontFamily::from_style(family),
        }
    }

    fn decorate(&mut self, line: TextDecoration, color: String) {
        // Plain and wavy underline share one line; the later one decides the look
        self.decorations.retain(|d| d.css_line() != line.css_line());
        self.decorations.push(line);
        self.decoration_color = Some(color);
    }

    /// Whether no attribute is set
    pub fn is_empty(&self) -> bool {
        *self == VisualStyle::default()
    }

    /// Inline CSS declarations for the segment (drop cap excluded)
    pub fn css_declarations(&self) -> Vec<String> {
        let mut css = Vec::new();
        if self.bold {
            css.push("font-weight:700".to_string());
        }
        if self.italic {
            css.push("font-style:italic".to_string());
        }
        if !self.decorations.is_empty() {
            let lines: Vec<&str> = self.decorations.iter().map(TextDecoration::css_line).collect();
            css.push(format!("text-decoration-line:{}", lines.join(" ")));
            if self.decorations.contains(&TextDecoration::WavyUnderline) {
                css.push("text-decoration-style:wavy".to_string());
            }
            if let Some(color) = &self.decoration_color {
                css.push(format!("text-decoration-color:{}", color));
            }
        }
        if let Some(bg) = &self.background {
            css.push(format!("background-color:{}", bg));
        }
        if let Some(fg) = &self.foreground {
            css.push(format!("color:{}", fg));
        }
        if let Some(border) = &self.border {
            css.push(format!("border:2px solid {}", border.color));
            css.push(match border.shape {
                BorderShape::Box => "border-radius:3px".to_string(),
                BorderShape::Pill => "border-radius:100px".to_string(),
            });
        }
        if let Some(size) = &self.font_size {
            css.push(format!("font-size:{}", size));
        }
        if let Some(spacing) = &self.letter_spacing {
            css.push(format!("letter-spacing:{}", spacing));
        }
        match self.vertical_align {
            Some(VerticalAlign::Super) => css.push("vertical-align:super;font-size:smaller".to_string()),
            Some(VerticalAlign::Sub) => css.push("vertical-align:sub;font-size:smaller".to_string()),
            None => {}
        }
        if let Some(family) = &self.font_family {
            css.push(format!("font-family:{}", family.css_stack()));
        }
        if self.small_caps {
            css.push("font-variant:small-caps".to_string());
        }
        css
    }
}

/// Split off the first user-perceived character for drop-cap rendering
pub fn split_first_grapheme(text: &str) -> (&str, &str) {
    match text.graphemes(true).next() {
        Some(first) => text.split_at(first.len()),
        None => ("", ""),
    }
}
