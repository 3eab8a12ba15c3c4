use std::fs;
use std::path::{Path, PathBuf};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::cli::{Cli, OutputFormat};
use crate::config::{Config, LoggingConfig};
use crate::content::text::normalize_spaces;
use crate::content::{ContentExtractor, DocumentTree};
use crate::error::{Error, Result};
use crate::feed::{FeedSource, PageFetcher};
use crate::harvest::{HarvestReport, Harvester};
use crate::post::{Post, PostAssembler, PreviewMetadata};

/// Metadata given on the command line for a single extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractRequest {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Fetch one article page and print the assembled post.
pub async fn extract(request: ExtractRequest, format: OutputFormat, config: &Config) -> Result<()> {
    info!("Extracting {}", request.url);

    let fetcher = PageFetcher::from_settings(&config.fetch);
    let html = fetcher.fetch_page(&request.url).await?;
    let post = extract_post(&request, &html, config)?;

    println!("{}", render_post(&post, format)?);
    Ok(())
}

/// Build a post from already downloaded page HTML.
pub fn extract_post(request: &ExtractRequest, html: &str, config: &Config) -> Result<Post> {
    let extractor = ContentExtractor::with_selectors(config.selectors.clone())?
        .with_limits(config.extraction.depth_limits());
    let items = extractor.extract_page(html, &request.url)?;

    let title = request
        .title
        .clone()
        .or_else(|| page_title(html))
        .unwrap_or_default();
    let mut metadata = PreviewMetadata::new(title, request.url.clone());
    metadata.description = request.description.clone();
    metadata.image = request.image.clone();

    PostAssembler::new(source_id_for(&request.url))
        .with_description_length(config.extraction.description_length)
        .assemble(metadata, items)
}

/// Harvest every configured feed, or only the named one.
pub async fn harvest(
    feed: Option<String>,
    limit: Option<usize>,
    format: OutputFormat,
    config: &Config,
) -> Result<()> {
    let feeds: Vec<(&String, &String)> = match &feed {
        Some(name) => {
            let entry = config
                .feeds
                .get_key_value(name)
                .ok_or_else(|| Error::NotFound(format!("Feed '{}' not found", name)))?;
            vec![entry]
        }
        None => config.feeds.iter().collect(),
    };

    if feeds.is_empty() {
        println!("📋 No feeds configured yet.");
        println!("   Add feeds to the [feeds] table of your config file.");
        return Ok(());
    }

    let harvester = Harvester::from_config(config)?;
    let fetcher = PageFetcher::from_settings(&config.fetch);
    let limit = limit.unwrap_or(config.extraction.max_articles);
    let mut combined = HarvestReport::default();

    for (name, url) in feeds {
        let source = FeedSource::new(name.as_str(), url.as_str(), fetcher.clone());
        match harvester.harvest(&source, limit).await {
            Ok(report) => {
                combined.posts.extend(report.posts);
                combined.failures.extend(report.failures);
            }
            Err(e) => warn!("Failed to harvest feed {}: {}", name, e),
        }
    }

    info!(
        "Harvest finished: {} posts, {} failures",
        combined.posts.len(),
        combined.failures.len()
    );

    match format {
        OutputFormat::Text => {
            for post in &combined.posts {
                println!("{}", post.to_text());
            }
            for failure in &combined.failures {
                eprintln!("✗ {}: {}", failure.uri, failure.error);
            }
        }
        _ => println!("{}", render(&combined, format)?),
    }

    Ok(())
}

/// Write a default configuration file.
pub fn init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_file = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if config_file.exists() && !force {
        warn!("Configuration file already exists: {}", config_file.display());
        println!("Configuration already exists: {}", config_file.display());
        println!("   Use --force to overwrite it.");
        return Ok(());
    }

    if let Some(parent) = config_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    Config::default().save(&config_file)?;
    info!("Created default configuration: {}", config_file.display());

    println!("✅ newsgrab initialized successfully!");
    println!("   Config file: {}", config_file.display());
    println!();
    println!("Next steps:");
    println!("   1. Add feeds under [feeds] as name = \"url\"");
    println!("   2. Harvest them: newsgrab harvest");

    Ok(())
}

/// Generate shell completions
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let cmd_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, cmd_name, &mut std::io::stdout());
}

/// Load the configuration file when it exists, defaults otherwise.
pub fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let config_file = match config_path {
        Some(path) => path,
        None => match Config::default_path() {
            Ok(path) => path,
            Err(_) => return Ok(Config::default()),
        },
    };

    if config_file.exists() {
        Config::load_with_env(&config_file)
    } else {
        Ok(Config::default())
    }
}

/// Initialize logging. `--debug` and `--verbose` override the configured
/// level. The returned guard must live until exit when logging to a file.
pub fn init_logging(
    logging: &LoggingConfig,
    debug: bool,
    verbose: bool,
) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let (writer, guard) = if logging.log_to_file {
        let (writer, guard) = file_writer(Path::new(&logging.log_file))?;
        (writer, Some(guard))
    } else {
        (BoxMakeWriter::new(std::io::stderr), None)
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(debug)
        .with_line_number(debug)
        .with_writer(writer);

    let result = if logging.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized");
    Ok(guard)
}

fn file_writer(path: &Path) -> Result<(BoxMakeWriter, WorkerGuard)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Config(format!("Invalid log file: {}", path.display())))?;
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(directory)?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    Ok((BoxMakeWriter::new(non_blocking), guard))
}

fn render_post(post: &Post, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(post.to_text()),
        _ => render(post, format),
    }
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        _ => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// The document `<title>`, whitespace-normalized.
fn page_title(html: &str) -> Option<String> {
    let tree = DocumentTree::parse(html);
    let title = (0..tree.len())
        .filter_map(|index| tree.node_id(index))
        .find(|node| tree.tag(*node) == Some("title"))?;
    Some(normalize_spaces(&tree.text_content(title))).filter(|t| !t.is_empty())
}

fn source_id_for(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "cli".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentItem;
    use tempfile::TempDir;

    const PAGE: &str = "<html><head><title> Daily  News </title></head><body>\
        <nav><a href=\"/\">Home</a></nav>\
        <article><img src=\"/lead.jpg\"><p>First paragraph.</p><h2>More</h2></article>\
        </body></html>";

    #[test]
    fn test_extract_post_uses_page_title() {
        let request = ExtractRequest {
            url: "https://news.example.com/story".to_string(),
            ..ExtractRequest::default()
        };

        let post = extract_post(&request, PAGE, &Config::default()).unwrap();

        assert_eq!(post.title, "Daily News");
        assert_eq!(post.source_id, "news.example.com");
        assert_eq!(post.lead_image.as_deref(), Some("https://news.example.com/lead.jpg"));
        assert_eq!(post.description, "First paragraph. More");
        assert!(post.items.is_empty());
    }

    #[test]
    fn test_extract_post_explicit_metadata() {
        let request = ExtractRequest {
            url: "https://news.example.com/story".to_string(),
            title: Some("Given".to_string()),
            description: Some("Summary".to_string()),
            image: None,
        };

        let post = extract_post(&request, PAGE, &Config::default()).unwrap();

        assert_eq!(post.title, "Given");
        assert_eq!(post.description, "Summary");
        assert_eq!(
            post.items,
            vec![ContentItem::text("First paragraph."), ContentItem::heading("More", 2)]
        );
    }

    #[test]
    fn test_extract_post_without_title_fails() {
        let request = ExtractRequest {
            url: "https://news.example.com/story".to_string(),
            ..ExtractRequest::default()
        };

        let result = extract_post(&request, "<p>No head</p>", &Config::default());
        assert!(matches!(result, Err(Error::InvalidTitle(_))));
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        init(Some(config_file.clone()), false).unwrap();
        assert!(config_file.exists());

        let config = load_config(Some(config_file.clone())).unwrap();
        assert_eq!(config.extraction.description_length, 200);

        // Second run leaves the file alone.
        init(Some(config_file), false).unwrap();
    }

    #[test]
    fn test_load_config_missing_file_defaults() {
        let config = load_config(Some(PathBuf::from("/nonexistent/newsgrab.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_render_formats() {
        let post = extract_post(
            &ExtractRequest {
                url: "https://news.example.com/story".to_string(),
                ..ExtractRequest::default()
            },
            PAGE,
            &Config::default(),
        )
        .unwrap();

        assert!(render_post(&post, OutputFormat::Json).unwrap().contains("\"title\": \"Daily News\""));
        assert!(render_post(&post, OutputFormat::Yaml).unwrap().contains("title: Daily News"));
        assert!(render_post(&post, OutputFormat::Text).unwrap().starts_with("Title: Daily News"));
    }
}
