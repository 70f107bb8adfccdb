//! Command line flags and configuration resolution.

use anyhow::{Context, Result};
use clap::Parser;
use labeler_core::LabelerConfig;
use std::path::PathBuf;

const CONFIG_FILE_NAME: &str = "labeler.toml";

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML); defaults to labeler.toml in the user config dir
    #[arg(long, env = "LABELER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Folder with the images to label
    #[arg(long)]
    pub folder: Option<PathBuf>,

    /// Choose the folder with a dialog instead
    #[arg(long, conflicts_with = "folder")]
    pub pick_folder: bool,

    /// Class names, comma separated; keys 1-9 select them in order
    #[arg(long, value_delimiter = ',')]
    pub classes: Option<Vec<String>>,

    /// Label file (defaults to Classification.csv inside the folder)
    #[arg(long)]
    pub labels_file: Option<PathBuf>,

    /// Show images in grayscale
    #[arg(long)]
    pub gray: bool,

    /// Input polling interval in milliseconds
    #[arg(long)]
    pub poll_ms: Option<u64>,

    /// Offer only files with a known image extension
    #[arg(long)]
    pub images_only: bool,
}

/// Loads the base configuration and applies the command line on top.
pub fn resolve_config(cli: &Cli) -> Result<LabelerConfig> {
    let base = match &cli.config {
        Some(path) => LabelerConfig::load(path)
            .with_context(|| format!("cannot load configuration {}", path.display()))?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => LabelerConfig::load(&path)
                .with_context(|| format!("cannot load configuration {}", path.display()))?,
            None => LabelerConfig::default(),
        },
    };
    Ok(apply_overrides(cli, base))
}

fn default_config_path() -> Option<PathBuf> {
    directories_next::ProjectDirs::from("nl", "labeler", "Labeler")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn apply_overrides(cli: &Cli, mut cfg: LabelerConfig) -> LabelerConfig {
    if let Some(folder) = &cli.folder {
        cfg.folder = folder.clone();
    }
    if let Some(classes) = &cli.classes {
        cfg.classes = classes
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
    }
    if let Some(labels) = &cli.labels_file {
        cfg.labels_file = Some(labels.clone());
    }
    if cli.gray {
        cfg.grayscale = true;
    }
    if let Some(ms) = cli.poll_ms {
        cfg.poll_interval_ms = ms;
    }
    if cli.images_only {
        cfg.images_only = true;
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn no_flags_keep_base_config() {
        let cfg = apply_overrides(&Cli::default(), LabelerConfig::default());
        assert_eq!(cfg, LabelerConfig::default());
    }

    #[test]
    fn flags_override_base_config() {
        let cli = Cli::try_parse_from([
            "Labeler",
            "--folder",
            "photos",
            "--classes",
            "Cat, Dog,,Bird",
            "--gray",
            "--poll-ms",
            "50",
            "--images-only",
        ])
        .unwrap();
        let cfg = apply_overrides(&cli, LabelerConfig::default());
        assert_eq!(cfg.folder, Path::new("photos"));
        assert_eq!(cfg.classes, vec!["Cat", "Dog", "Bird"]);
        assert!(cfg.grayscale);
        assert_eq!(cfg.poll_interval_ms, 50);
        assert!(cfg.images_only);
        assert_eq!(cfg.labels_path(), Path::new("photos").join("Classification.csv"));
    }

    #[rstest]
    #[case(&["Labeler", "--folder", "a", "--pick-folder"])]
    #[case(&["Labeler", "--poll-ms", "soon"])]
    fn invalid_flag_combinations_are_rejected(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn explicit_config_file_is_loaded() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("labeler.toml");
        fs::write(&path, "folder = \"shots\"\nclasses = [\"A\"]\n")?;
        let cli = Cli {
            config: Some(path),
            labels_file: Some("out.csv".into()),
            ..Default::default()
        };

        let cfg = resolve_config(&cli)?;
        assert_eq!(cfg.folder, Path::new("shots"));
        assert_eq!(cfg.classes, vec!["A"]);
        assert_eq!(cfg.labels_path(), Path::new("out.csv"));
        Ok(())
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli {
            config: Some("does/not/exist.toml".into()),
            ..Default::default()
        };
        assert!(resolve_config(&cli).is_err());
    }
}
