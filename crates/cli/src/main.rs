mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio-kit")]
#[command(version, about = "Content and configuration toolkit for portfolio sites", long_about = None)]
struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize new site directory
    Init {
        /// Path to site directory (created if missing)
        path: PathBuf,

        /// Site name
        #[arg(long)]
        name: Option<String>,

        /// Author name
        #[arg(long)]
        author: Option<String>,

        /// Contact email
        #[arg(long)]
        email: Option<String>,
    },

    /// Validate site configuration, project catalog and content
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// List the project catalog
    Projects {
        /// Path to site directory
        path: PathBuf,

        /// Only projects carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List content entries that pass the schema
    Content {
        /// Path to site directory
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show site metadata
    Metadata {
        /// Path to site directory
        path: PathBuf,

        /// Print schema.org structured data
        #[arg(long)]
        json_ld: bool,
    },

    /// Resolve the class string for a component slot
    Theme {
        /// Path to site directory
        path: PathBuf,

        /// Component name (e.g. card)
        component: String,

        /// Slot name (e.g. body)
        slot: String,

        /// Color (primary, secondary, success, info, warning, error, neutral)
        #[arg(short, long, default_value = "primary")]
        color: String,

        /// Variant (solid, outline, soft, subtle)
        #[arg(long, default_value = "solid")]
        variant: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Init {
            path,
            name,
            author,
            email,
        } => commands::init::run(path, name, author, email),
        Command::Validate { path } => commands::validate::run(path),
        Command::Projects { path, tag, json } => commands::projects::run(path, tag, json),
        Command::Content { path, json } => commands::content::run(path, json),
        Command::Metadata { path, json_ld } => commands::metadata::run(path, json_ld),
        Command::Theme {
            path,
            component,
            slot,
            color,
            variant,
        } => commands::theme::run(path, &component, &slot, &color, &variant),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "folio-kit", &mut io::stdout());
            Ok(())
        }
    }
}
