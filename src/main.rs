use chrono::Utc;
use clap::{Parser, Subcommand};
use research_hub::indexing::{self, GoogleIndexing};
use research_hub::{audit, config, content, generate, output, server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "research-hub")]
#[command(about = "Categorized article site with SEO feeds and search indexing")]
#[command(long_about = "\
Categorized article site with SEO feeds and search indexing

Articles are MDX files with YAML front-matter. The filename is the slug and
the slug decides the category.

Content structure:

  content/
  ├── ivermectin-dosage-guide.mdx   # /dosage-administration/ivermectin-dosage-guide
  └── ivermectin-myths-and-facts.mdx
  pages/
  └── about.md                      # /about
  images/
  └── ivermectin-dosage-guide-hero.webp

Front-matter:
  title, publishedAt (YYYY-MM-DD) and summary are required;
  author and image are optional. Future publish dates stay hidden.

Environment:
  SITE_URL                      overrides site.base_url
  CRON_SECRET                   bearer token for the indexing endpoint
  GOOGLE_SERVICE_ACCOUNT_JSON   service-account key for the Indexing API
  RUST_LOG                      log filter (default: info)

Run 'research-hub gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (optional; stock defaults apply when missing)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the site over HTTP
    Serve,
    /// Export the whole site as static files
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Load and audit content without building
    Check {
        /// Exit non-zero when the audit reports warnings
        #[arg(long)]
        strict: bool,
    },
    /// Submit today's articles to the Google Indexing API once
    Index,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let site_config = config::load_config(&cli.config)?;
            server::serve(site_config).await?;
        }
        Command::Build { output: output_dir } => {
            let site_config = config::load_config(&cli.config)?;
            let summary = generate::build(&site_config, &output_dir, Utc::now())?;
            output::print_build_output(&summary, &output_dir);
        }
        Command::Check { strict } => {
            let site_config = config::load_config(&cli.config)?;
            let articles = content::load_all(&site_config.content.dir)?;
            let report = audit::audit(&articles);
            output::print_check_output(&articles, Utc::now().date_naive(), &report);
            if strict && report.has_warnings() {
                return Err("audit reported warnings".into());
            }
        }
        Command::Index => {
            let site_config = config::load_config(&cli.config)?;
            let today = Utc::now().date_naive();
            let articles = content::published(&site_config.content.dir, today)?;
            let client = GoogleIndexing::new(&site_config)?;
            let report = indexing::run(&client, &site_config, &articles, today).await?;
            output::print_index_output(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
