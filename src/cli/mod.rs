pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use crate::error::Result;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "newsgrab")]
#[command(about = "Extract structured posts from news articles")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NEWSGRAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a single article page into a post
    Extract {
        /// Article URL
        url: String,

        /// Post title (defaults to the page <title>)
        #[arg(long)]
        title: Option<String>,

        /// Explicit description; disables the generated one
        #[arg(long)]
        description: Option<String>,

        /// Lead image URL
        #[arg(long)]
        image: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Harvest posts from configured feeds
    Harvest {
        /// Specific feed name (if not provided, harvest all)
        feed: Option<String>,

        /// Maximum articles per feed
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = commands::load_config(self.config.clone())?;
        let _guard = commands::init_logging(&config.logging, self.debug, self.verbose)?;

        match self.command {
            Commands::Extract { url, title, description, image, format } => {
                let request = commands::ExtractRequest { url, title, description, image };
                commands::extract(request, format, &config).await
            }
            Commands::Harvest { feed, limit, format } => {
                commands::harvest(feed, limit, format, &config).await
            }
            Commands::Init { force } => {
                commands::init(self.config, force)
            }
            Commands::Completions { shell } => {
                commands::generate_completions(shell);
                Ok(())
            }
        }
    }
}
