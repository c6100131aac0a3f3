//! Interactive editing commands

use crate::state::AppState;
use anyhow::{anyhow, bail, Context, Result};
use doc_model::{AnnotationId, ColorCategory, IconPayload, TextSelection};
use edit_engine::{EditingSession, Tool, ToolOutcome};
use render_model::html::paragraph_html;
use std::io::Write;
use std::path::PathBuf;
use store::{DocumentBackend, IconRequest, StylesRequest};

pub const HELP: &str = "\
apply <tool> <para> <start> <end>   style a range (tool name or shortcut h/t/r/c/b/i/u)
icon svg <name> <file>              pick an SVG icon to place
icon gen <description>              ask the document service for an icon
place <para> <offset>               place the picked icon
cancel                              abandon icon placement
delete <style-id>                   remove one style
clear                               remove every style
undo | redo
color <text|background|border|callout> <#rrggbb>
size <value> | spacing <value>      font size / letter spacing tool values
render [para]                       print paragraphs as HTML
styles                              list styles
save | export | help | quit";

/// One parsed REPL line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Apply { tool: Tool, para: usize, start: usize, end: usize },
    IconSvg { name: String, path: PathBuf },
    IconGenerate { description: String },
    Place { para: usize, offset: usize },
    Cancel,
    Delete(AnnotationId),
    Clear,
    Undo,
    Redo,
    Color { category: ColorCategory, value: String },
    CalloutBackground(String),
    FontSize(String),
    LetterSpacing(String),
    Render(Option<usize>),
    Styles,
    Save,
    Export,
    Help,
    Quit,
}

/// Whether the REPL keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn number(word: Option<&str>, what: &str) -> Result<usize> {
    let word = word.ok_or_else(|| anyhow!("missing {}", what))?;
    word.parse()
        .with_context(|| format!("{} must be a number, got {:?}", what, word))
}

fn parse_tool(word: &str) -> Result<Tool> {
    let mut chars = word.chars();
    if let (Some(key), None) = (chars.next(), chars.next()) {
        return Tool::from_shortcut(key).ok_or_else(|| anyhow!("no tool on shortcut '{}'", key));
    }
    Ok(word.parse()?)
}

/// Parse one line; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb {
        "apply" => {
            let tool = parse_tool(words.next().ok_or_else(|| anyhow!("missing tool"))?)?;
            ReplCommand::Apply {
                tool,
                para: number(words.next(), "paragraph")?,
                start: number(words.next(), "start offset")?,
                end: number(words.next(), "end offset")?,
            }
        }
        "icon" => match words.next() {
            Some("svg") => {
                let name = words.next().ok_or_else(|| anyhow!("missing icon name"))?;
                let path = words.next().ok_or_else(|| anyhow!("missing SVG file"))?;
                ReplCommand::IconSvg {
                    name: name.to_string(),
                    path: PathBuf::from(path),
                }
            }
            Some("gen") => {
                let description = words.collect::<Vec<_>>().join(" ");
                if description.is_empty() {
                    bail!("missing icon description");
                }
                ReplCommand::IconGenerate { description }
            }
            _ => bail!("usage: icon svg <name> <file> | icon gen <description>"),
        },
        "place" => ReplCommand::Place {
            para: number(words.next(), "paragraph")?,
            offset: number(words.next(), "offset")?,
        },
        "cancel" | "esc" => ReplCommand::Cancel,
        "delete" => ReplCommand::Delete(AnnotationId::from(
            words.next().ok_or_else(|| anyhow!("missing style id"))?,
        )),
        "clear" => ReplCommand::Clear,
        "undo" => ReplCommand::Undo,
        "redo" => ReplCommand::Redo,
        "color" => {
            let target = words.next().ok_or_else(|| anyhow!("missing color category"))?;
            let value = words
                .next()
                .ok_or_else(|| anyhow!("missing color"))?
                .to_string();
            if target == "callout" {
                ReplCommand::CalloutBackground(value)
            } else {
                ReplCommand::Color {
                    category: target.parse()?,
                    value,
                }
            }
        }
        "size" => ReplCommand::FontSize(words.next().ok_or_else(|| anyhow!("missing size"))?.to_string()),
        "spacing" => ReplCommand::LetterSpacing(
            words.next().ok_or_else(|| anyhow!("missing spacing"))?.to_string(),
        ),
        "render" => ReplCommand::Render(match words.next() {
            Some(word) => Some(number(Some(word), "paragraph")?),
            None => None,
        }),
        "styles" => ReplCommand::Styles,
        "save" => ReplCommand::Save,
        "export" => ReplCommand::Export,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => bail!("unknown command '{}' (try 'help')", other),
    };
    Ok(Some(command))
}

fn doc_id(session: &EditingSession) -> Result<String> {
    session
        .document()
        .doc_id()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("document has no id; import it first"))
}

/// Print every style in insertion order
pub fn write_styles(session: &EditingSession, out: &mut impl Write) -> Result<()> {
    if session.annotations().is_empty() {
        writeln!(out, "no styles")?;
    }
    for annotation in session.annotations().all() {
        writeln!(
            out,
            "{}  {:<14} p{} {}..{}  {}  {:?}",
            annotation.id,
            annotation.annotation_type().as_str(),
            annotation.para_index,
            annotation.start_offset,
            annotation.end_offset,
            annotation.value(),
            annotation.text
        )?;
    }
    Ok(())
}

/// Run one command against the session
pub async fn execute(
    state: &mut AppState,
    session: &mut EditingSession,
    command: ReplCommand,
    out: &mut impl Write,
) -> Result<Flow> {
    match command {
        ReplCommand::Apply { tool, para, start, end } => {
            let selection = TextSelection::in_document(session.document(), para, start, end);
            match session.apply_tool(&selection, tool)? {
                ToolOutcome::Added(id) => writeln!(out, "added {} {}", tool, id)?,
                ToolOutcome::Updated(id) => writeln!(out, "recolored {}", id)?,
                ToolOutcome::Ignored => writeln!(out, "nothing selected")?,
            }
        }
        ReplCommand::IconSvg { name, path } => {
            let svg = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            session.begin_icon_placement(IconPayload::new(name).with_svg(svg));
            writeln!(out, "icon ready: place <para> <offset>")?;
        }
        ReplCommand::IconGenerate { description } => {
            let payload = state
                .backend
                .generate_icon(&IconRequest { description })
                .await?
                .into_payload()?;
            session.begin_icon_placement(payload);
            writeln!(out, "icon ready: place <para> <offset>")?;
        }
        ReplCommand::Place { para, offset } => {
            let id = session.place_icon(para, offset)?;
            writeln!(out, "placed icon {}", id)?;
        }
        ReplCommand::Cancel => {
            if session.handle_escape() {
                writeln!(out, "icon placement cancelled")?;
            }
        }
        ReplCommand::Delete(id) => match session.remove(&id) {
            Some(removed) => writeln!(out, "deleted {} {}", removed.annotation_type().as_str(), id)?,
            None => writeln!(out, "no style {}", id)?,
        },
        ReplCommand::Clear => {
            let count = session.clear();
            writeln!(out, "cleared {} styles", count)?;
        }
        ReplCommand::Undo => {
            if !session.undo() {
                writeln!(out, "nothing to undo")?;
            }
        }
        ReplCommand::Redo => {
            if !session.redo() {
                writeln!(out, "nothing to redo")?;
            }
        }
        ReplCommand::Color { category, value } => {
            if session.palette_mut().set_color(category, &value) {
                state.colors.add(category, &value);
            } else {
                writeln!(out, "invalid color {:?}, keeping {}", value, session.palette().color(category))?;
            }
        }
        ReplCommand::CalloutBackground(value) => {
            if session.palette_mut().set_callout_background(&value) {
                state.colors.add(ColorCategory::Background, &value);
            } else {
                writeln!(out, "invalid color {:?}", value)?;
            }
        }
        ReplCommand::FontSize(value) => {
            if !session.palette_mut().set_font_size(&value) {
                writeln!(out, "invalid size {:?}", value)?;
            }
        }
        ReplCommand::LetterSpacing(value) => {
            if !session.palette_mut().set_letter_spacing(&value) {
                writeln!(out, "invalid spacing {:?}", value)?;
            }
        }
        ReplCommand::Render(Some(index)) => {
            let rendered = session
                .render_paragraph(index)
                .ok_or_else(|| anyhow!("no paragraph {}", index))?;
            writeln!(out, "{}", paragraph_html(&rendered))?;
        }
        ReplCommand::Render(None) => {
            for rendered in session.render_document() {
                writeln!(out, "{}", paragraph_html(&rendered))?;
            }
        }
        ReplCommand::Styles => write_styles(session, out)?,
        ReplCommand::Save => {
            let doc_id = doc_id(session)?;
            let response = state
                .backend
                .save_styles(&doc_id, &StylesRequest::new(session.styles_payload()))
                .await?
                .into_result()?;
            writeln!(out, "{}", response.message.unwrap_or_default())?;
        }
        ReplCommand::Export => {
            let doc_id = doc_id(session)?;
            let response = state
                .backend
                .export(&doc_id, &StylesRequest::new(session.styles_payload()))
                .await?
                .into_result()?;
            writeln!(out, "exported to {}", response.download_url.unwrap_or_default())?;
        }
        ReplCommand::Help => writeln!(out, "{}", HELP)?,
        ReplCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Document, SpanStyle};
    use tempfile::TempDir;

    #[test]
    fn test_parse_apply() {
        assert_eq!(
            parse_line("apply h 0 0 5").unwrap(),
            Some(ReplCommand::Apply {
                tool: Tool::Span(SpanStyle::Highlight),
                para: 0,
                start: 0,
                end: 5
            })
        );
        assert_eq!(
            parse_line("  apply callout 2 7 3 ").unwrap(),
            Some(ReplCommand::Apply {
                tool: Tool::Callout,
                para: 2,
                start: 7,
                end: 3
            })
        );
        assert!(parse_line("apply sparkle 0 0 5").is_err());
        assert!(parse_line("apply bold 0 zero 5").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("render").unwrap(), Some(ReplCommand::Render(None)));
        assert_eq!(parse_line("render 3").unwrap(), Some(ReplCommand::Render(Some(3))));
        assert_eq!(
            parse_line("color bg #00FF00").unwrap(),
            Some(ReplCommand::Color {
                category: ColorCategory::Background,
                value: "#00FF00".to_string()
            })
        );
        assert_eq!(
            parse_line("icon gen a small rocket").unwrap(),
            Some(ReplCommand::IconGenerate {
                description: "a small rocket".to_string()
            })
        );
        assert!(parse_line("icon").is_err());
        assert!(parse_line("frobnicate").is_err());
    }

    async fn run(state: &mut AppState, session: &mut EditingSession, line: &str) -> String {
        let mut out = Vec::new();
        let command = parse_line(line).unwrap().unwrap();
        execute(state, session, command, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_editing_flow() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = AppState::open(temp_dir.path().to_path_buf()).await.unwrap();
        let mut session = state.new_session();
        session.load_document(Document::from_texts(["Hello world"]));

        assert!(run(&mut state, &mut session, "apply b 0 0 5").await.starts_with("added bold"));
        assert!(run(&mut state, &mut session, "render 0").await.contains("styled-text bold"));
        run(&mut state, &mut session, "undo").await;
        assert_eq!(run(&mut state, &mut session, "styles").await, "no styles\n");

        run(&mut state, &mut session, "color text #123456").await;
        assert_eq!(state.colors.recent(ColorCategory::Text), &["#123456"]);
        assert!(run(&mut state, &mut session, "color text red").await.contains("invalid color"));

        assert_eq!(
            run(&mut state, &mut session, "quit").await,
            ""
        );
    }

    #[tokio::test]
    async fn test_save_requires_document_id() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = AppState::open(temp_dir.path().to_path_buf()).await.unwrap();
        let mut session = state.new_session();
        let mut out = Vec::new();

        let result = execute(&mut state, &mut session, ReplCommand::Save, &mut out).await;
        assert!(result.is_err());
    }
}
