//! BriefDeck command-line front end.
//!
//! # Responsibility
//! - Wire configuration, logging, storage and the list controller together.
//! - Render the brief list and controller notices as plain text.

use briefdeck_core::db::open_db;
use briefdeck_core::{
    init_logging, load_theme, open_brief_repository, save_theme, AppConfig, Brief, BriefId,
    BriefInput, BriefListController, BriefRepository, BriefStatus, SqliteKeyValueStore,
    StatusFilter, Theme,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "briefdeck")]
#[command(about = "Manage creative briefs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check core linkage
    Ping,

    /// List briefs, optionally filtered
    List {
        /// Case-insensitive text matched against title, description and tags
        #[arg(short, long, default_value = "")]
        query: String,

        /// Status to keep: all, idea, in-progress, completed
        #[arg(short, long, default_value = "all")]
        status: String,
    },

    /// Show one brief in full
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Create a brief
    Add {
        #[arg(value_name = "TITLE")]
        title: String,

        #[command(flatten)]
        fields: BriefFields,
    },

    /// Replace fields of an existing brief
    Edit {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[command(flatten)]
        fields: BriefFields,
    },

    /// Delete a brief
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Show or change the display theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(clap::Args)]
struct BriefFields {
    #[arg(short, long)]
    description: Option<String>,

    /// Comma-separated color swatches, e.g. `#0f172a,#facc15`
    #[arg(short, long, value_delimiter = ',')]
    colors: Option<Vec<String>>,

    /// Comma-separated reference links
    #[arg(short, long, value_delimiter = ',')]
    references: Option<Vec<String>>,

    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    tags: Option<Vec<String>>,

    /// idea, in-progress, completed
    #[arg(short, long)]
    status: Option<String>,
}

impl BriefFields {
    fn into_input(self, title: Option<String>) -> BriefInput {
        BriefInput {
            title,
            description: self.description,
            colors: self.colors,
            references: self.references,
            tags: self.tags,
            status: self.status.as_deref().map(BriefStatus::parse),
            ..BriefInput::default()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Dark,
    Light,
    Toggle,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Commands::Ping = cli.command {
        println!("briefdeck_core ping={}", briefdeck_core::ping());
        println!("briefdeck_core version={}", briefdeck_core::core_version());
        return Ok(());
    }

    let config = AppConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let store = Arc::new(SqliteKeyValueStore::new(open_db(&config.db_path)?));
    let theme = load_theme(store.as_ref())?;
    log::debug!(
        "event=cli_start module=cli status=ok backend={} theme={}",
        config.storage_mode.as_str(),
        theme
    );

    if let Commands::Theme { action } = cli.command {
        let next = match action {
            None => theme,
            Some(ThemeAction::Dark) => Theme::Dark,
            Some(ThemeAction::Light) => Theme::Light,
            Some(ThemeAction::Toggle) => theme.toggled(),
        };
        if next != theme {
            save_theme(store.as_ref(), next)?;
        }
        println!("theme: {next}");
        return Ok(());
    }

    let repo = open_brief_repository(&config, store)?;
    let mut controller = BriefListController::new(repo);

    match cli.command {
        Commands::List { query, status } => {
            controller.load().await?;
            let counts = controller.status_counts();
            let visible = controller.filter(query, StatusFilter::parse(&status));
            for brief in visible {
                print_row(brief);
            }
            println!(
                "{} shown / {} total (idea {}, in-progress {}, completed {})",
                visible.len(),
                counts.total,
                counts.idea,
                counts.in_progress,
                counts.completed
            );
        }
        Commands::Show { id } => match controller.fetch(&BriefId::new(id)).await? {
            Some(brief) => print_detail(&brief),
            None => println!("no such brief"),
        },
        Commands::Add { title, fields } => {
            let result = controller.submit(None, fields.into_input(Some(title))).await;
            report(&mut controller, result.map(|brief| print_row(&brief)))?;
        }
        Commands::Edit { id, title, fields } => {
            let id = BriefId::new(id);
            let Some(existing) = controller.fetch(&id).await? else {
                return Err(format!("no brief with id `{id}`").into());
            };
            let input = fields.into_input(title).fill_from(existing.to_input());
            let result = controller.submit(Some(&id), input).await;
            report(&mut controller, result.map(|brief| print_row(&brief)))?;
        }
        Commands::Delete { id } => {
            let result = controller.delete(&BriefId::new(id)).await;
            report(&mut controller, result.map(|_| ()))?;
        }
        Commands::Ping | Commands::Theme { .. } => {}
    }
    Ok(())
}

/// Prints the pending notice, then hands back the operation result.
fn report<R, E>(controller: &mut BriefListController<R>, result: Result<(), E>) -> Result<(), E>
where
    R: BriefRepository,
{
    if let Some(notice) = controller.take_notice() {
        if notice.is_error() {
            eprintln!("{}", notice.message());
        } else {
            println!("{}", notice.message());
        }
    }
    result
}

fn print_row(brief: &Brief) {
    let marker = if brief.is_valid() { "" } else { " (untitled)" };
    println!(
        "{:<16} {:<12} {}{}",
        brief.id, brief.status, brief.title, marker
    );
}

fn print_detail(brief: &Brief) {
    println!("id:          {}", brief.id);
    println!("title:       {}", brief.title);
    println!("status:      {}", brief.status);
    println!("created:     {}", brief.created_at);
    println!("description: {}", brief.description);
    println!("colors:      {}", brief.colors.join(", "));
    println!("references:  {}", brief.references.join(", "));
    println!("tags:        {}", brief.tags.join(", "));
}
