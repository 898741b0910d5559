//! CLI entry point for postmatter

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postmatter::commands;
use postmatter::Site;

#[derive(Parser)]
#[command(name = "postmatter")]
#[command(version)]
#[command(about = "Parse, check and render front-matter blog posts", long_about = None)]
struct Cli {
    /// Site directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create `_config.yml` and the posts directory
    Init {
        /// Directory to initialize (defaults to the site directory)
        folder: Option<PathBuf>,
    },

    /// Parse every post and report all failures
    Check,

    /// List posts, newest first
    #[command(alias = "ls")]
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Render one content file to HTML
    Render {
        /// Content file to render
        file: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the rendered post with its metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Layout to use (defaults to `default_layout`)
        #[arg(short, long)]
        layout: Option<String>,

        /// Background image path
        #[arg(short, long)]
        background: Option<String>,

        /// Post date, YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, postmatter::content::DATE_FORMAT)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postmatter=debug,info"
    } else {
        "postmatter=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = match folder {
                Some(folder) if folder.is_absolute() => folder,
                Some(folder) => base_dir.join(folder),
                None => base_dir,
            };
            commands::init::init_site(&target_dir)?;
            println!("Initialized empty blog in {:?}", target_dir);
        }

        Commands::Check => {
            let site = Site::new(&base_dir)?;
            commands::check::run(&site)?;
        }

        Commands::List { json } => {
            let site = Site::new(&base_dir)?;
            commands::list::run(&site, json)?;
        }

        Commands::Render { file, output, json } => {
            let site = Site::new(&base_dir)?;
            commands::render::run(&site, &file, output.as_deref(), json)?;
        }

        Commands::New {
            title,
            layout,
            background,
            date,
        } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = commands::new::create_post(
                &site,
                &commands::new::NewPost {
                    title: &title,
                    layout: layout.as_deref(),
                    background: background.as_deref(),
                    date,
                },
            )?;
            println!("Created: {:?}", path);
        }
    }

    Ok(())
}
