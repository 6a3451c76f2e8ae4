//! bizzy: command-line shell over the Bizzy core.
//!
//! Every command prints one JSON document on stdout. Storage and logging
//! are configured through `BIZZY_*` environment variables.

use anyhow::{anyhow, bail, Context, Result};
use bizzy_core::db::open_target;
use bizzy_core::time::today_utc;
use bizzy_core::{
    annotate_note, classify_query, core_version, init_logging, route, CaptureService,
    CoreConfig, InboxItemKind, InboxWindow, KnowledgeFilter, NoteService,
    SqliteInboxRepository, SqliteKnowledgeRepository, SqliteNoteRepository, SqliteUnitOfWork,
};
use clap::{Parser, Subcommand};
use log::info;
use rusqlite::Connection;
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "bizzy")]
#[command(version, about = "Bizzy farm assistant core tools")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a query to quick answer or generation
    Classify {
        query: String,
    },

    /// Annotate a note without storing it
    Annotate {
        #[arg(short, long, default_value = "")]
        title: String,

        /// Note file; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Annotate a note and file it in the inbox and hub
    Process {
        #[arg(short, long, default_value = "")]
        title: String,

        /// Note file; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Route a query and record its answer in the inbox
    Ask {
        #[arg(short, long)]
        query: String,

        #[arg(short, long, default_value = "")]
        answer: String,
    },

    /// Manage notes
    Notes {
        #[command(subcommand)]
        command: NotesCommand,
    },

    /// Browse the inbox feed
    Inbox {
        #[command(subcommand)]
        command: InboxCommand,
    },

    /// Browse and update the knowledge hub
    Hub {
        #[command(subcommand)]
        command: HubCommand,
    },

    /// Print the core version
    Version,
}

#[derive(Subcommand)]
enum NotesCommand {
    /// Create an empty note
    New,

    /// Replace a note's title and content
    Save {
        id: String,

        #[arg(short, long, default_value = "")]
        title: String,

        /// Note file; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List notes, newest first; every note unless --limit is given
    List {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        limit: Option<u32>,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Delete a note
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum InboxCommand {
    /// List inbox items, newest first
    List {
        /// note|ai-query|voice|photo|email|webclip
        #[arg(short, long)]
        kind: Option<String>,

        /// today|this-week|this-month|all
        #[arg(short, long, default_value = "all")]
        window: String,
    },

    /// Delete an inbox item
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum HubCommand {
    /// List knowledge items in insertion order
    List {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        module: Option<String>,

        /// Keep items carrying any of these tags (can repeat)
        #[arg(short = 'g', long = "tag")]
        tags: Vec<String>,
    },

    /// Mark a hub task as completed
    Complete {
        id: String,
    },

    /// Delete a hub item
    Delete {
        id: String,
    },

    /// Publish a Forge output
    Publish {
        #[arg(short, long)]
        title: String,

        /// Content file; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(short = 'g', long = "tag")]
        tags: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Classify { query } => {
            let decision = classify_query(&query);
            print_json(&json!({ "query": query, "decision": decision }))
        }
        Commands::Annotate { title, file } => {
            let content = read_input(file.as_deref())?;
            print_json(&annotate_note(&content, &title))
        }
        Commands::Version => print_json(&json!({ "version": core_version() })),
        command => {
            let conn = open_storage()?;
            run_stored(&conn, command)
        }
    }
}

fn run_stored(conn: &Connection, command: Commands) -> Result<()> {
    match command {
        Commands::Process { title, file } => {
            let content = read_input(file.as_deref())?;
            let processed = capture_service(conn)?.process_note(&content, &title)?;
            print_json(&processed)
        }
        Commands::Ask { query, answer } => {
            let decision = route(&query)?;
            let item = capture_service(conn)?.capture_answer(&query, &answer)?;
            print_json(&json!({ "decision": decision, "item": item }))
        }
        Commands::Notes { command } => run_notes(conn, command),
        Commands::Inbox { command } => run_inbox(conn, command),
        Commands::Hub { command } => run_hub(conn, command),
        Commands::Classify { .. } | Commands::Annotate { .. } | Commands::Version => {
            bail!("command does not use storage")
        }
    }
}

fn run_notes(conn: &Connection, command: NotesCommand) -> Result<()> {
    let service = NoteService::new(SqliteNoteRepository::try_new(conn)?);
    match command {
        NotesCommand::New => print_json(&service.create_note()?),
        NotesCommand::Save { id, title, file } => {
            let id = parse_id(&id)?;
            let content = read_input(file.as_deref())?;
            print_json(&service.save_note(id, &title, content)?)
        }
        NotesCommand::List {
            search,
            limit,
            offset,
        } => {
            let listed = service.list_notes(search, limit, offset)?;
            print_json(&json!({
                "items": listed.items,
                "applied_limit": listed.applied_limit,
            }))
        }
        NotesCommand::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete_note(id)?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn run_inbox(conn: &Connection, command: InboxCommand) -> Result<()> {
    match command {
        InboxCommand::List { kind, window } => {
            let kind = kind
                .map(|value| {
                    InboxItemKind::parse(&value)
                        .ok_or_else(|| anyhow!("unknown inbox kind `{value}`"))
                })
                .transpose()?;
            let window = InboxWindow::parse(&window)
                .ok_or_else(|| anyhow!("unknown inbox window `{window}`"))?;
            let today = today_utc();
            print_json(&capture_service(conn)?.list_inbox(kind, window, today)?)
        }
        InboxCommand::Delete { id } => {
            let id = parse_id(&id)?;
            capture_service(conn)?.delete_inbox_item(id)?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn run_hub(conn: &Connection, command: HubCommand) -> Result<()> {
    let service = capture_service(conn)?;
    match command {
        HubCommand::List {
            search,
            module,
            tags,
        } => {
            let filter = KnowledgeFilter {
                text: search,
                module,
                tags,
            };
            print_json(&service.list_knowledge(&filter)?)
        }
        HubCommand::Complete { id } => {
            let id = parse_id(&id)?;
            print_json(&service.complete_task(id)?)
        }
        HubCommand::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete_knowledge_item(id)?;
            print_json(&json!({ "deleted": id }))
        }
        HubCommand::Publish { title, file, tags } => {
            let content = read_input(file.as_deref())?;
            print_json(&service.publish_to_hub(&title, &content, tags)?)
        }
    }
}

fn open_storage() -> Result<Connection> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| anyhow!("log dir is not valid UTF-8: {}", log_dir.display()))?;
        init_logging(&config.log_level, log_dir)?;
    }
    let conn = open_target(&config.storage)
        .with_context(|| format!("failed to open storage {:?}", config.storage))?;
    info!("event=cli_storage_ready module=cli status=ok");
    Ok(conn)
}

type SqliteCaptureService<'conn> = CaptureService<
    SqliteInboxRepository<'conn>,
    SqliteKnowledgeRepository<'conn>,
    SqliteUnitOfWork<'conn>,
>;

fn capture_service(conn: &Connection) -> Result<SqliteCaptureService<'_>> {
    Ok(CaptureService::new(
        SqliteInboxRepository::try_new(conn)?,
        SqliteKnowledgeRepository::try_new(conn)?,
        SqliteUnitOfWork::try_new(conn)?,
    ))
}

fn parse_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).with_context(|| format!("invalid id `{value}`"))
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            Ok(content)
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
