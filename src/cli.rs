//! CLI interface for the case bot.
//!
//! `casebot` with no subcommand starts an interactive chat. The other
//! subcommands are non-interactive: arguments in, plain output out.
//!
//! - `casebot [--page <id>] [--session <name>] chat` runs the dialogue.
//! - `casebot draft show|clear` inspects or drops the stored draft.
//! - `casebot pages` lists the known page contexts.

mod format;

use std::time::Duration;

use clap::{Parser, Subcommand};
use jiff::Timestamp;
use tracing::info;

use crate::bridge::{Bridge, FormBridge};
use crate::chat;
use crate::config::Config;
use crate::engine::Engine;
use crate::page::{self, PageContext};
use crate::storage::{DraftStore, FileStore, MemoryStore, SessionStore};

use format::{format_draft, format_pages};

/// Casebot: a guided dialogue that turns a conversation into a CRM case.
#[derive(Debug, Parser)]
#[command(name = "casebot", after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Page the visitor is on (e.g. `services.html` or `/ai-initiatives.html`).
    /// Overrides `CASEBOT_PAGE` and the configured page.
    #[arg(long, global = true)]
    page: Option<String>,

    /// Session name. Each session keeps its own draft.
    #[arg(long, global = true, default_value = "default")]
    session: String,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

const USAGE_HELP: &str = r"Chat controls:
  1, 2, ...   pick a quick action
  /submit     create the case (once every step is answered)
  /back       go back one step
  /restart    start over and drop the draft
  /open /close /history /quit

Examples:
  casebot --page services.html
  casebot chat --ephemeral --dry-run
  casebot --session acme draft show";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive chat (the default).
    Chat {
        /// Keep the draft in memory only; nothing survives the process.
        #[arg(long)]
        ephemeral: bool,

        /// Write submissions to the outbox directory instead of posting them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect or drop the stored draft for the session.
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },

    /// List known pages and what each one seeds.
    Pages,
}

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    /// Print the stored draft as JSON. Expired drafts are removed, not shown.
    Show,

    /// Delete the stored draft.
    Clear,
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli, config: &Config) -> Result<(), String> {
    let command = cli.command.unwrap_or(Command::Chat {
        ephemeral: false,
        dry_run: false,
    });

    match command {
        Command::Chat { ephemeral, dry_run } => {
            let page_id = page::resolve_page(cli.page.as_deref(), config.page.as_deref());
            cmd_chat(config, &cli.session, &page_id, ephemeral, dry_run)
        }
        Command::Draft { command } => {
            let drafts = DraftStore::new(open_session(config, &cli.session)?);
            match command {
                DraftCommand::Show => cmd_draft_show(&drafts),
                DraftCommand::Clear => {
                    drafts.clear();
                    println!("Draft cleared");
                    Ok(())
                }
            }
        }
        Command::Pages => {
            print!("{}", format_pages(page::known_pages()));
            Ok(())
        }
    }
}

fn cmd_chat(
    config: &Config,
    session: &str,
    page_id: &str,
    ephemeral: bool,
    dry_run: bool,
) -> Result<(), String> {
    let bridge = Bridge::from_config(&config.bridge, dry_run, config.outbox_dir())
        .map_err(|e| format!("case bot disabled: {e}"))?;
    let page = PageContext::lookup(page_id);

    if ephemeral {
        return chat_with(config, page, DraftStore::new(MemoryStore::new()), bridge);
    }

    let drafts = match open_session(config, session) {
        Ok(store) => DraftStore::new(store),
        Err(e) => {
            info!(error = %e, "draft storage unavailable, continuing without it");
            DraftStore::disabled()
        }
    };
    chat_with(config, page, drafts, bridge)
}

fn chat_with<S: SessionStore, B: FormBridge>(
    config: &Config,
    page: PageContext,
    drafts: DraftStore<S>,
    bridge: B,
) -> Result<(), String> {
    let mut engine = Engine::new(page, config.assistant_name.as_str(), drafts, bridge);
    chat::run(
        &mut engine,
        &config.assistant_name,
        Duration::from_millis(config.typing_delay_ms),
    )
    .map_err(|e| format!("chat failed: {e}"))
}

fn cmd_draft_show(drafts: &DraftStore<FileStore>) -> Result<(), String> {
    match drafts.load() {
        Some(record) => {
            let text = format_draft(&record, Timestamp::now())
                .map_err(|e| format!("failed to format draft: {e}"))?;
            println!("{text}");
        }
        None => println!("No draft"),
    }
    Ok(())
}

/// Open the file store for `session` under the configured sessions directory.
fn open_session(config: &Config, session: &str) -> Result<FileStore, String> {
    let valid = !session.is_empty()
        && session
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(format!("invalid session name: {session:?}"));
    }

    let root = config
        .sessions_dir()
        .ok_or("could not determine sessions directory")?;
    FileStore::new(root.join(session)).map_err(|e| format!("failed to open session: {e}"))
}
