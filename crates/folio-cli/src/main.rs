// Folio CLI - capture and review portfolio artefacts from the terminal

mod remote;
mod render;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use folio_core::{
    import, recent, Artefact, ArtefactEdit, ArtefactGateway, CaptureForm, LocalGateway,
    ReviewOutcome, ReviewSession, Session, Unit, UserId, RECENT_LIMIT,
};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use remote::HttpGateway;

/// Folio - e-portfolio artefact manager
#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Signed-in user id
    #[arg(long, global = true, env = "FOLIO_USER_ID")]
    user: Option<UserId>,

    /// Keep artefacts in a local JSON document instead of the server
    #[arg(long, global = true, env = "FOLIO_LOCAL_PATH")]
    local: Option<PathBuf>,

    /// Base URL of the folio server
    #[arg(
        long,
        global = true,
        env = "FOLIO_SERVER_URL",
        default_value = "http://localhost:3000"
    )]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a new artefact
    Add {
        /// Course unit (1-12)
        #[arg(short, long)]
        unit: i64,

        #[arg(short, long, default_value = "")]
        title: String,

        /// Artefact type
        #[arg(long = "type", default_value = "Design")]
        kind: String,

        #[arg(short, long, default_value = "")]
        link: String,

        #[arg(short, long, default_value = "")]
        summary: String,

        /// Reflection notes to save straight away
        #[arg(short, long)]
        notes: Option<String>,

        /// Mark the new artefact as reviewed
        #[arg(long)]
        reviewed: bool,
    },
    /// List artefacts, newest first
    List {
        /// Only show this unit
        #[arg(short, long)]
        unit: Option<i64>,
    },
    /// Per-unit overview
    Units,
    /// Most recently captured artefacts
    Recent {
        #[arg(short, long, default_value_t = RECENT_LIMIT)]
        limit: usize,
    },
    /// Show one artefact
    Show {
        /// Artefact id or id prefix
        id: String,
    },
    /// Replace the reflection notes of an artefact
    Notes {
        /// Artefact id or id prefix
        id: String,
        text: String,
    },
    /// Mark an artefact as reviewed
    Review {
        /// Artefact id or id prefix
        id: String,

        /// Notes to save with the review
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Edit the descriptive fields of an artefact
    Edit {
        /// Artefact id or id prefix
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long = "type")]
        kind: Option<String>,

        /// New link; an empty value clears it
        #[arg(short, long)]
        link: Option<String>,

        #[arg(short, long)]
        summary: Option<String>,
    },
    /// Import a local-only portfolio document
    Import {
        /// Path to the legacy JSON array
        path: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // A local document wins over the server.
    let gateway: Arc<dyn ArtefactGateway> = match &cli.local {
        Some(path) => Arc::new(LocalGateway::new(path.clone())),
        None => Arc::new(HttpGateway::new(&cli.server)),
    };
    let session = Session::start(cli.user, gateway)
        .await
        .context("failed to load artefacts")?;

    let result = match cli.command {
        Commands::Add {
            unit,
            title,
            kind,
            link,
            summary,
            notes,
            reviewed,
        } => {
            let mut form = CaptureForm::for_unit(Unit::new(unit)?);
            form.title = title;
            form.kind = kind;
            form.link = link;
            form.summary = summary;
            handle_add(&session, form, notes, reviewed).await
        }
        Commands::List { unit } => handle_list(&session, unit).await,
        Commands::Units => handle_units(&session).await,
        Commands::Recent { limit } => handle_recent(&session, limit).await,
        Commands::Show { id } => handle_show(&session, &id).await,
        Commands::Notes { id, text } => handle_notes(&session, &id, text).await,
        Commands::Review { id, notes } => handle_review(&session, &id, notes).await,
        Commands::Edit {
            id,
            title,
            kind,
            link,
            summary,
        } => {
            let edit = ArtefactEdit {
                title,
                kind,
                link,
                summary,
            };
            handle_edit(&session, &id, edit).await
        }
        Commands::Import { path } => handle_import(&session, &path).await,
    };

    session.end();
    result
}

async fn handle_add(
    session: &Session,
    mut form: CaptureForm,
    notes: Option<String>,
    reviewed: bool,
) -> anyhow::Result<()> {
    let store = session.store();
    let mut review = form.submit(store).await?;

    if reviewed {
        if let Some(notes) = notes {
            review.edit_notes(notes);
        }
        review.mark_reviewed(store).await?;
    } else if let Some(notes) = notes {
        review.edit_notes(notes);
        review.save_notes(store).await?;
    }

    println!("{} Artefact captured", "✓".green().bold());
    println!();
    println!("{}", render::artefact_detail(review.artefact()));
    Ok(())
}

async fn handle_list(session: &Session, unit: Option<i64>) -> anyhow::Result<()> {
    let unit = unit.map(Unit::new).transpose()?;
    let current = session.store().current().await;
    let shown: Vec<&Artefact> = current
        .iter()
        .filter(|a| unit.map_or(true, |u| a.unit() == u))
        .collect();

    if shown.is_empty() {
        println!("{}", "No artefacts yet.".dimmed());
        return Ok(());
    }
    for artefact in shown {
        println!("{}", render::artefact_line(artefact));
    }
    Ok(())
}

async fn handle_units(session: &Session) -> anyhow::Result<()> {
    let grouping = session.grouping().await;
    for bucket in grouping.iter() {
        println!("{}", render::unit_line(bucket));
    }
    println!();
    println!(
        "  {} of {} artefacts reviewed",
        grouping.reviewed_count(),
        grouping.total()
    );
    Ok(())
}

async fn handle_recent(session: &Session, limit: usize) -> anyhow::Result<()> {
    let current = session.store().current().await;
    let latest = recent(&current, limit);
    if latest.is_empty() {
        println!("{}", "No artefacts yet.".dimmed());
    }
    for artefact in latest {
        println!("{}", render::artefact_line(artefact));
    }
    Ok(())
}

async fn handle_show(session: &Session, id: &str) -> anyhow::Result<()> {
    let artefact = resolve(session, id).await?;
    println!("{}", render::artefact_detail(&artefact));
    Ok(())
}

async fn handle_notes(session: &Session, id: &str, text: String) -> anyhow::Result<()> {
    let mut review = ReviewSession::open(resolve(session, id).await?);
    review.edit_notes(text);
    review.save_notes(session.store()).await?;
    println!("{} Notes saved", "✓".green().bold());
    Ok(())
}

async fn handle_review(session: &Session, id: &str, notes: Option<String>) -> anyhow::Result<()> {
    let mut review = ReviewSession::open(resolve(session, id).await?);
    if let Some(notes) = notes {
        review.edit_notes(notes);
    }

    match review.mark_reviewed(session.store()).await? {
        ReviewOutcome::Reviewed => {
            println!("{} Marked as reviewed", "✓".green().bold());
        }
        ReviewOutcome::AlreadyReviewed => {
            println!("{}", "Already reviewed; nothing changed.".yellow());
        }
    }
    println!();
    println!("{}", render::artefact_detail(review.artefact()));
    Ok(())
}

async fn handle_edit(session: &Session, id: &str, edit: ArtefactEdit) -> anyhow::Result<()> {
    if edit == ArtefactEdit::default() {
        return Err(anyhow!(
            "Nothing to change. Pass at least one of --title, --type, --link, --summary"
        ));
    }

    let mut artefact = resolve(session, id).await?;
    artefact.apply_edit(edit);
    session.store().save(&artefact).await?;

    let stored = session.store().find(artefact.id()).await.unwrap_or(artefact);
    println!("{} Artefact updated", "✓".green().bold());
    println!();
    println!("{}", render::artefact_detail(&stored));
    Ok(())
}

async fn handle_import(session: &Session, path: &std::path::Path) -> anyhow::Result<()> {
    let artefacts = import::read_legacy(path).await?;
    let report = import::import_into(session.store(), artefacts).await?;

    println!("{} Import complete", "✓".green().bold());
    println!("  Imported: {}", report.imported);
    println!("  Skipped:  {} (already present)", report.skipped);
    Ok(())
}

/// Looks an artefact up by full id or by a unique id prefix.
async fn resolve(session: &Session, id: &str) -> anyhow::Result<Artefact> {
    let current = session.store().current().await;
    find_by_id(&current, id)?
        .cloned()
        .ok_or_else(|| anyhow!("No artefact matches '{}'", id))
}

fn find_by_id<'a>(artefacts: &'a [Artefact], id: &str) -> anyhow::Result<Option<&'a Artefact>> {
    let id = id.trim();
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(artefacts.iter().find(|a| a.id() == uuid));
    }

    let prefix = id.replace('-', "").to_ascii_lowercase();
    if prefix.is_empty() {
        return Err(anyhow!("Artefact id must not be empty"));
    }
    let mut matches = artefacts
        .iter()
        .filter(|a| a.id().simple().to_string().starts_with(&prefix));
    match (matches.next(), matches.next()) {
        (Some(_), Some(_)) => Err(anyhow!("Id prefix '{}' is ambiguous", id)),
        (found, _) => Ok(found),
    }
}
