//! doc-typography - layer typographic styles over uploaded Word documents.
//!
//! # Usage
//!
//! ```bash
//! doc-typography import report.docx
//! doc-typography list
//! doc-typography edit <doc-id>
//! doc-typography show <doc-id> --html > report.html
//! ```

mod commands;
mod state;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use doc_model::ColorCategory;
use edit_engine::EditingSession;
use render_model::html::render_document_page;
use store::DocumentBackend;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{execute, parse_line, write_styles, Flow};
use state::AppState;

/// Layer typographic styles over uploaded Word documents
#[derive(Parser, Debug)]
#[command(name = "doc-typography", version, about, long_about = None)]
struct Cli {
    /// Directory holding settings, uploads and document records
    #[arg(long, value_name = "DIR", default_value = "doc-typography-data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a Word document and extract its text
    Import {
        /// The .docx file to upload
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// List uploaded documents, most recent first
    List,
    /// Print a document with its saved styles
    Show {
        doc_id: String,

        /// Print the standalone HTML page instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Edit the styles of a document interactively
    Edit { doc_id: String },
    /// Show recently used colors
    Colors,
}

async fn open_session(state: &AppState, doc_id: &str) -> Result<EditingSession> {
    let record = state.backend.fetch(doc_id).await?;
    let mut session = state.new_session();
    let saved = record.annotations();
    let total = saved.len();
    let kept = session.restore(record.document(), saved);
    if kept < total {
        tracing::warn!("{} of {} saved styles no longer fit the document", total - kept, total);
    }
    Ok(session)
}

async fn run_repl(state: &mut AppState, session: &mut EditingSession) -> Result<()> {
    let mut stdout = std::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let flow = match parse_line(&line) {
            Ok(Some(command)) => match execute(state, session, command, &mut stdout).await {
                Ok(flow) => flow,
                Err(e) => {
                    writeln!(stdout, "error: {:#}", e)?;
                    Flow::Continue
                }
            },
            Ok(None) => Flow::Continue,
            Err(e) => {
                writeln!(stdout, "error: {:#}", e)?;
                Flow::Continue
            }
        };

        state.flush_action_log(session).await;
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut state = AppState::open(cli.data_dir).await?;

    match cli.command {
        Commands::Import { file } => {
            let result = state.backend.upload(&file).await?;
            let doc_id = result.doc_id.clone().unwrap_or_default();
            println!("{}", result.message.as_deref().unwrap_or("uploaded"));
            println!("doc id: {}", doc_id);
            for block in &result.content {
                println!("  {:<10} {}", block.id, block.text);
            }
        }
        Commands::List => {
            let limit = usize::from(state.settings.get().general.recent_documents_count);
            for summary in state.backend.list().await?.into_iter().take(limit) {
                println!(
                    "{}  {}  updated {}",
                    summary.doc_id,
                    summary.filename,
                    summary.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Commands::Show { doc_id, html } => {
            let session = open_session(&state, &doc_id).await?;
            if html {
                let title = session.document().filename().unwrap_or(&doc_id).to_string();
                print!("{}", render_document_page(&title, &session.render_document()));
            } else {
                for paragraph in session.document().paragraphs() {
                    println!("[{}] {}", paragraph.index, paragraph.text);
                }
                write_styles(&session, &mut std::io::stdout())?;
            }
        }
        Commands::Edit { doc_id } => {
            let mut session = open_session(&state, &doc_id).await?;
            println!(
                "editing {} ({} paragraphs, {} styles); 'help' lists commands",
                doc_id,
                session.document().len(),
                session.annotations().len()
            );
            run_repl(&mut state, &mut session).await?;
        }
        Commands::Colors => {
            for category in ColorCategory::ALL {
                println!("{:<10} {}", category.as_str(), state.colors.recent(category).join(" "));
            }
        }
    }

    Ok(())
}
