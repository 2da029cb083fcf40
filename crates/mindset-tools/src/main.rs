//! Mindset CLI - Next.js app scaffolding and code generators

mod generators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use scaffolder_core::tui::CreateArgs;
use scaffolder_core::{PackageManager, Settings};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "MINDSET_LOG";

/// Template directory for new projects
const APP_TEMPLATE_SUBDIR: &str = "next-app";

/// Templates bundled with the source tree
const DEFAULT_TEMPLATE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");

#[derive(Parser, Debug)]
#[command(name = "mindset")]
#[command(about = "CLI for creating Mindset Next.js apps and generating their building blocks")]
#[command(version)]
pub struct Args {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Next.js project
    Create(CliCreateArgs),
    /// Run a generator inside an existing project
    Generate(GenerateArgs),
    /// List the available generators
    List,
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project name (npm package name rules apply)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Package manager to use (npm, pnpm or yarn)
    #[arg(short, long = "package-manager")]
    pub package_manager: Option<PackageManager>,

    /// Directory the project folder is created in
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<&CliCreateArgs> for CreateArgs {
    fn from(args: &CliCreateArgs) -> Self {
        CreateArgs {
            name: args.name.clone(),
            package_manager: args.package_manager,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Generator to run; a menu is shown when omitted
    pub name: Option<String>,

    /// Project root the generator writes into
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Answer a prompt up front as KEY=VALUE (repeatable; lists are comma-separated)
    #[arg(short, long = "answer", value_name = "KEY=VALUE", value_parser = parse_answer)]
    pub answers: Vec<(String, String)>,
}

fn parse_answer(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn absolute(dir: Option<PathBuf>) -> PathBuf {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match dir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    }
}

fn list_generators() -> Result<()> {
    let registry = generators::registry()?;
    for (name, description) in registry.list() {
        println!("  {:<12} {}", name, description);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);
    tracing::debug!(command = ?args.command, "starting mindset");

    let default_root = Path::new(DEFAULT_TEMPLATE_ROOT);

    let result = match args.command {
        Some(Command::Create(create_args)) => {
            let settings = Settings::resolve(
                create_args.template_dir.clone(),
                absolute(create_args.directory.clone()),
                default_root,
            );
            scaffolder_core::run_create((&create_args).into(), &settings, APP_TEMPLATE_SUBDIR).await
        }
        Some(Command::Generate(generate_args)) => {
            let registry = generators::registry()?;
            let settings = Settings::resolve(
                generate_args.template_dir,
                absolute(generate_args.cwd),
                default_root,
            );
            scaffolder_core::run_generate(
                &registry,
                generate_args.name.as_deref(),
                &generate_args.answers,
                &settings,
                generators::TEMPLATE_SUBDIR,
            )
            .await
        }
        Some(Command::List) => list_generators(),
        None => {
            // No subcommand provided, default to the generator menu
            let registry = generators::registry()?;
            let settings = Settings::resolve(None, absolute(None), default_root);
            scaffolder_core::run_generate(
                &registry,
                None,
                &[],
                &settings,
                generators::TEMPLATE_SUBDIR,
            )
            .await
        }
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
