//! HTML presentation of rendered paragraphs
//!
//! Used for the enriched export page. Text is always escaped; icon SVG markup
//! comes from the icon service and is embedded as-is.

use crate::style::split_first_grapheme;
use crate::{RenderedParagraph, Segment};
use doc_model::Annotation;

/// Escape text for use in HTML content and attribute values
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Markup for a single paragraph
pub fn paragraph_html(paragraph: &RenderedParagraph) -> String {
    let mut html = String::new();

    match &paragraph.decoration {
        Some(decoration) => html.push_str(&format!(
            r#"<p class="callout" data-style-id="{}" style="border-color:{};background-color:{}">"#,
            escape_html(decoration.annotation_id.as_str()),
            escape_html(&decoration.border_color),
            escape_html(&decoration.background)
        )),
        None => html.push_str("<p>"),
    }

    for segment in &paragraph.segments {
        match segment {
            Segment::Plain { text, .. } => html.push_str(&escape_html(text)),
            Segment::Styled { text, annotations, .. } => {
                write_styled(&mut html, segment, text, annotations)
            }
            Segment::Icon { annotation, .. } => write_icon(&mut html, annotation),
        }
    }

    html.push_str("</p>");
    html
}

fn write_styled(html: &mut String, segment: &Segment, text: &str, annotations: &[Annotation]) {
    let style = segment.visual_style().unwrap_or_default();

    let mut classes = vec!["styled-text"];
    for annotation in annotations {
        let name = annotation.annotation_type().as_str();
        if !classes.contains(&name) {
            classes.push(name);
        }
    }

    html.push_str(&format!(r#"<span class="{}""#, classes.join(" ")));
    if !annotations.is_empty() {
        let ids: Vec<&str> = annotations.iter().map(|a| a.id.as_str()).collect();
        html.push_str(&format!(r#" data-style-id="{}""#, escape_html(&ids.join(","))));
    }
    let css = style.css_declarations();
    if !css.is_empty() {
        html.push_str(&format!(r#" style="{}""#, escape_html(&css.join(";"))));
    }
    html.push('>');

    match &style.drop_cap {
        Some(color) => {
            let (first, rest) = split_first_grapheme(text);
            html.push_str(&format!(
                r#"<span class="drop-cap" style="color:{}">{}</span>"#,
                escape_html(color),
                escape_html(first)
            ));
            html.push_str(&escape_html(rest));
        }
        None => html.push_str(&escape_html(text)),
    }

    html.push_str("</span>");
}

fn write_icon(html: &mut String, annotation: &Annotation) {
    let Some(icon) = annotation.icon() else {
        return;
    };
    html.push_str(&format!(
        r#"<span class="inline-icon" data-style-id="{}" title="{}" contenteditable="false">"#,
        escape_html(annotation.id.as_str()),
        escape_html(&icon.icon_name)
    ));
    if let Some(svg) = &icon.svg_code {
        html.push_str(svg);
    } else if let Some(data) = &icon.icon_data {
        html.push_str(&format!(
            r#"<img src="{}" alt="{}">"#,
            escape_html(data),
            escape_html(&icon.icon_name)
        ));
    }
    html.push_str("</span>");
}

const PAGE_CSS: &str = "\
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:'Inter',-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;font-size:14px;line-height:1.5;color:#1a1a1a;background:#fafafa}
.document-container{max-width:800px;margin:24px auto;background:#fff;border:1px solid #e0e0e0;border-radius:8px}
.document-title{padding:16px 48px;border-bottom:1px solid #e0e0e0;font-size:13px;color:#666}
.document-content{padding:32px 48px;font-size:15px;line-height:1.8}
.document-content p{margin-bottom:1em;position:relative}
.document-content p:last-child{margin-bottom:0}
.document-content p.callout{border:2px solid;border-radius:6px;padding:12px 16px}
.styled-text{position:relative;display:inline}
.styled-text.highlight{padding:0 2px;border-radius:2px}
.styled-text.border{padding:0 4px;margin:0 2px}
.styled-text.circle{padding:0 6px;margin:0 2px}
.styled-text.underline,.styled-text.wavyUnderline,.styled-text.strikethrough,.styled-text.overline{text-decoration-thickness:2px;text-underline-offset:2px}
.drop-cap{float:left;font-size:3em;line-height:.9;padding-right:4px;font-weight:700}
.inline-icon{display:inline-block;width:1.2em;height:1.2em;vertical-align:-.2em;margin:0 2px}
.inline-icon svg,.inline-icon img{width:100%;height:100%}
";

/// A complete standalone HTML page for export
pub fn render_document_page(title: &str, paragraphs: &[RenderedParagraph]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(PAGE_CSS);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"document-container\">");
    html.push_str(&format!(
        r#"<div class="document-title">{}</div>"#,
        escape_html(title)
    ));
    html.push_str(r#"<div class="document-content">"#);
    for paragraph in paragraphs {
        html.push_str(&paragraph_html(paragraph));
    }
    html.push_str("</div></div>\n</body>\n</html>\n");
    html
}
