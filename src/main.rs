use clap::{Parser, Subcommand};
use obsidiosaurus::config::{self, Config};
use obsidiosaurus::imaging::RustBackend;
use obsidiosaurus::{cleanup, convert, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "obsidiosaurus")]
#[command(about = "Convert an Obsidian vault into a Docusaurus site")]
#[command(long_about = "\
Convert an Obsidian vault into a Docusaurus site

Top-level vault folders decide where notes go:

  vault/
  ├── .obsidian/                   # Ignored
  ├── docs/                        # → website/docs/
  │   └── guide/
  │       ├── 01-Intro/
  │       │   ├── Intro__en.md     # Folder note → docs/guide/01-Intro.md
  │       │   └── Intro__de.md     # → i18n/de/docusaurus-plugin-content-docs/current/...
  │       └── _category_.yml.md    # Copied as _category_.yml
  ├── blog/                        # → website/blog/
  ├── news__blog/                  # Extra blog instance → website/news/
  └── assets/                      # Attachments → website/static/assets/

Callouts become admonitions, embedded images are resized, SVGs get light
and dark variants, and relative note links become site paths.

Every generated file is logged; the next run removes them before writing,
so hand-written pages in the site are left alone.

Run 'obsidiosaurus gen-config' to generate a documented obsidiosaurus.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./obsidiosaurus.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Obsidian vault directory (overrides directories.vault)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Docusaurus site directory (overrides directories.docusaurus)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Show debug diagnostics
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the vault and print where every note will go
    Scan {
        /// Print the manifest as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clean the previous run, then convert notes and assets
    Convert {
        /// Keep the files written by the previous run
        #[arg(long)]
        no_clean: bool,
    },
    /// Remove the files written by the previous run
    Clean,
    /// Validate config and vault without writing anything
    Check,
    /// Print a stock obsidiosaurus.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = resolve_config(
        cli.config.as_deref(),
        cli.source.as_deref(),
        cli.output.as_deref(),
    )?;
    run(cli.command, &config)
}

fn run(command: Command, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let vault_root = PathBuf::from(&config.directories.vault);
    let docusaurus_root = PathBuf::from(&config.directories.docusaurus);

    match command {
        Command::Scan { json } => {
            let manifest = scan::scan(&vault_root, config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                output::print_scan_output(&manifest);
            }
        }
        Command::Convert { no_clean } => {
            println!("==> Scanning {}", vault_root.display());
            let manifest = scan::scan(&vault_root, config)?;

            if !no_clean {
                println!("==> Cleaning previous run");
                let report = cleanup::clean_previous_run(&docusaurus_root, &config.log_path())?;
                output::print_cleanup_output(&report);
            }

            println!("==> Converting → {}", docusaurus_root.display());
            init_thread_pool(&config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_convert_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = convert::convert(&manifest, config, &RustBackend::new(), Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            output::print_conversion_summary(&result?);
        }
        Command::Clean => {
            let report = cleanup::clean_previous_run(&docusaurus_root, &config.log_path())?;
            output::print_cleanup_output(&report);
        }
        Command::Check => {
            println!("==> Checking {}", vault_root.display());
            let manifest = scan::scan(&vault_root, config)?;
            for line in output::format_check_output(&manifest, &vault_root) {
                println!("{}", line);
            }
            println!("==> Vault is valid");
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

/// Install the stderr diagnostics subscriber.
///
/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Load the config named by `--config`, or `./obsidiosaurus.toml` when it
/// exists, or the stock defaults. CLI directory flags override the file.
fn resolve_config(
    config_path: Option<&Path>,
    source: Option<&Path>,
    output: Option<&Path>,
) -> Result<Config, config::ConfigError> {
    let mut config = match config_path {
        Some(path) => config::load_config(path)?,
        None => {
            let default_path = Path::new(config::DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                config::load_config(default_path)?
            } else {
                Config::default()
            }
        }
    };
    if let Some(source) = source {
        config.directories.vault = source.to_string_lossy().into_owned();
    }
    if let Some(output) = output {
        config.directories.docusaurus = output.to_string_lossy().into_owned();
    }
    Ok(config)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
