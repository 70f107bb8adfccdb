mod app;
mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use labeler_core::{LabelStore, SessionExit, SessionOutcome, WorkQueue};
use rfd::FileDialog;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli::Cli::parse()) {
        tracing::error!("{e:#}");
        eprintln!("Labeler stopped with error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: cli::Cli) -> Result<()> {
    let mut config = cli::resolve_config(&args)?;
    if args.pick_folder {
        match FileDialog::new().set_directory(".").pick_folder() {
            Some(dir) => config.folder = dir,
            None => bail!("no folder selected"),
        }
    }
    let classes = config.class_list().context("no classes configured")?;

    let store = LabelStore::new(config.labels_path());
    let prior = store
        .load()
        .with_context(|| format!("cannot read labels from {}", store.path().display()))?;
    let queue = WorkQueue::from_folder(
        &config.folder,
        config.scan_options(),
        &prior,
        Some(store.path()),
    )
    .with_context(|| format!("cannot list {}", config.folder.display()))?;

    let outcome = if queue.is_empty() {
        tracing::info!("nothing left to label in {}", config.folder.display());
        SessionOutcome {
            labels: prior,
            exit: SessionExit::Completed,
        }
    } else {
        app::run_window(
            queue,
            classes,
            prior,
            config.session_options(),
            store.clone(),
        )?
    };

    let saved = store
        .save(&outcome.labels)
        .with_context(|| format!("cannot write labels to {}", store.path().display()))?;
    tracing::info!(
        exit = ?outcome.exit,
        "{} labels stored in {}",
        saved.len(),
        store.path().display()
    );
    Ok(())
}
