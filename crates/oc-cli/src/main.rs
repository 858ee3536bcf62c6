use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use oc_core::{SystemClock, TimeWindow};
use tracing_subscriber::EnvFilter;

use oc_cli::commands::util::{OrgFile, read_org_file};
use oc_cli::commands::{cancel, clock_in, clock_out, recalc, report, status};
use oc_cli::{Cli, Commands, Config};

/// Resolves the org file from `--file` or the configured default.
fn org_path(cli: &Cli, config: &Config) -> Result<PathBuf> {
    cli.file
        .clone()
        .or_else(|| config.default_file.clone())
        .context("no org file given; pass --file or set default_file in config")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output stays clean.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let path = org_path(&cli, &config)?;
    let clock = SystemClock;
    let mut stdout = io::stdout().lock();

    match command {
        Commands::In { line } => {
            let mut org = OrgFile::open(&path)?;
            clock_in::run(&mut stdout, &mut org.buffer, *line, config.indent, &clock)?;
            org.save()?;
        }
        Commands::Out => {
            let mut org = OrgFile::open(&path)?;
            clock_out::run(&mut stdout, &mut org.buffer, &clock)?;
            org.save()?;
        }
        Commands::Cancel => {
            let mut org = OrgFile::open(&path)?;
            cancel::run(&mut stdout, &mut org.buffer)?;
            org.save()?;
        }
        Commands::Recalc { line } => {
            let mut org = OrgFile::open(&path)?;
            recalc::run(&mut stdout, &mut org.buffer, *line)?;
            org.save()?;
        }
        Commands::Status { json } => {
            let doc = read_org_file(&path)?;
            status::run(&mut stdout, &doc, &clock, *json)?;
        }
        Commands::Report { from, to, json } => {
            let window =
                (from.is_some() || to.is_some()).then(|| TimeWindow::bounded(*from, *to));
            let doc = read_org_file(&path)?;
            report::run(&mut stdout, &doc, window, &clock, *json)?;
        }
    }

    Ok(())
}
