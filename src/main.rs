use clap::{Parser, Subcommand};
use notefolio::{config, generate, output, store};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "notefolio")]
#[command(about = "Static site generator for personal note collections")]
#[command(long_about = "\
Static site generator for personal note collections

A single content.toml is the data source. Categories group note records,
optionally nested under topics, and a markdown file becomes the about page.

Content structure:

  content/
  ├── content.toml                 # Categories, topics, and records
  ├── config.toml                  # Site config (optional)
  ├── about.md                     # About page (optional)
  └── assets/                      # Note documents → copied to output root
      └── physics/
          └── classical-mechanics.html

Pages are written flat at the output root (index.html, {category}.html,
about.html) so record paths resolve the same way from every page.

Run 'notefolio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".notefolio-temp", global = true)]
    temp_dir: PathBuf,

    /// Log level for diagnostics on stderr (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory into a manifest
    Scan,
    /// Produce the final HTML site from a scanned manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate record paths against assets without building
    Check,
    /// Print per-category and total note counts
    Stats,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Handle must outlive main or buffered records are dropped.
    let _logger = flexi_logger::Logger::try_with_env_or_str(&cli.log_level)?.start()?;

    match cli.command {
        Command::Scan => {
            let manifest = store::scan(&cli.source)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let manifest_content = std::fs::read_to_string(&manifest_path)?;
            let manifest: store::Manifest = serde_json::from_str(&manifest_content)?;
            init_thread_pool(&manifest.config.processing);
            let report = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&manifest, &report);
        }
        Command::Build => {
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = store::scan(&cli.source)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            let report = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&manifest, &report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = store::scan(&cli.source)?;
            output::print_scan_output(&manifest);
            let broken = store::check_paths(&manifest.store, &cli.source)?;
            output::print_check_output(&broken);
            if !broken.is_empty() {
                std::process::exit(1);
            }
        }
        Command::Stats => {
            let manifest = store::scan(&cli.source)?;
            output::print_stats_output(&manifest.store);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
