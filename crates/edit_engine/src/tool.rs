//! Styling tools and the values they apply

use doc_model::{Annotation, AnnotationId, ColorCategory, DocModelError, HexColor, SpanStyle, TextSelection};

/// A tool the user can apply to a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Style a run of text
    Span(SpanStyle),
    /// Decorate the whole paragraph
    Callout,
}

impl Tool {
    /// Wire name of the annotation type the tool creates
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Span(style) => style.as_str(),
            Tool::Callout => "callout",
        }
    }

    /// Color history category the tool's color belongs to
    pub fn color_category(&self) -> ColorCategory {
        match self {
            Tool::Span(SpanStyle::Highlight) => ColorCategory::Background,
            Tool::Span(SpanStyle::TextColor) => ColorCategory::Text,
            _ => ColorCategory::Border,
        }
    }

    /// Single-key tool shortcut (without modifiers)
    pub fn from_shortcut(key: char) -> Option<Self> {
        let style = match key.to_ascii_lowercase() {
            'h' => SpanStyle::Highlight,
            't' => SpanStyle::TextColor,
            'r' => SpanStyle::Border,
            'c' => SpanStyle::Circle,
            'b' => SpanStyle::Bold,
            'i' => SpanStyle::Italic,
            'u' => SpanStyle::Underline,
            _ => return None,
        };
        Some(Tool::Span(style))
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tool {
    type Err = DocModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "callout" => Ok(Tool::Callout),
            other => other.parse().map(Tool::Span),
        }
    }
}

/// What applying a tool did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// A new annotation was added
    Added(AnnotationId),
    /// An annotation on the same range was recolored in place
    Updated(AnnotationId),
    /// The selection was collapsed or blank
    Ignored,
}

/// Current color and size for every tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPalette {
    pub highlight_color: String,
    pub text_color: String,
    pub border_color: String,
    pub callout_background: String,
    pub font_size: String,
    pub letter_spacing: String,
}

impl Default for ToolPalette {
    fn default() -> Self {
        Self {
            highlight_color: "#ffeb3b".to_string(),
            text_color: "#e53935".to_string(),
            border_color: "#1976d2".to_string(),
            callout_background: "#e3f2fd".to_string(),
            font_size: "18px".to_string(),
            letter_spacing: "0.1em".to_string(),
        }
    }
}

impl ToolPalette {
    /// Set the color of a category.
    ///
    /// Malformed colors are discarded and the previous value is kept.
    pub fn set_color(&mut self, category: ColorCategory, value: &str) -> bool {
        let Ok(color) = HexColor::parse(value) else {
            tracing::debug!("Ignoring invalid {} color {:?}", category.as_str(), value);
            return false;
        };
        let slot = match category {
            ColorCategory::Text => &mut self.text_color,
            ColorCategory::Background => &mut self.highlight_color,
            ColorCategory::Border => &mut self.border_color,
        };
        *slot = color.as_str().to_string();
        true
    }

    /// Set the callout background; malformed colors are discarded
    pub fn set_callout_background(&mut self, value: &str) -> bool {
        match HexColor::parse(value) {
            Ok(color) => {
                self.callout_background = color.as_str().to_string();
                true
            }
            Err(_) => false,
        }
    }

    /// Set the font size used by the font size tool (e.g. `18px`)
    pub fn set_font_size(&mut self, value: &str) -> bool {
        if !SpanStyle::FontSize.accepts(value) {
            return false;
        }
        self.font_size = value.to_string();
        true
    }

    /// Set the tracking used by the letter spacing tool (e.g. `0.1em`)
    pub fn set_letter_spacing(&mut self, value: &str) -> bool {
        if !SpanStyle::LetterSpacing.accepts(value) {
            return false;
        }
        self.letter_spacing = value.to_string();
        true
    }

    /// Color for a category
    pub fn color(&self, category: ColorCategory) -> &str {
        match category {
            ColorCategory::Text => &self.text_color,
            ColorCategory::Background => &self.highlight_color,
            ColorCategory::Border => &self.border_color,
        }
    }

    /// Value a tool writes into the annotation it creates
    pub fn value_for(&self, tool: Tool) -> &str {
        match tool {
            Tool::Span(SpanStyle::FontSize) => &self.font_size,
            Tool::Span(SpanStyle::LetterSpacing) => &self.letter_spacing,
            other => self.color(other.color_category()),
        }
    }

    /// Build the annotation a tool would create for a selection
    pub fn annotation_for(&self, tool: Tool, selection: &TextSelection) -> Annotation {
        let (para, start, end) = (
            selection.para_index,
            selection.start_offset,
            selection.end_offset,
        );
        match tool {
            Tool::Span(style) => {
                Annotation::span(style, self.value_for(tool), para, start, end, selection.text.clone())
            }
            Tool::Callout => Annotation::callout(
                self.border_color.clone(),
                self.callout_background.clone(),
                para,
                start,
                end,
                selection.text.clone(),
            ),
        }
    }
}
