//! Command-line arguments of the `contrast-evaluate` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "contrast-evaluate")]
#[command(version)]
#[command(about = "Resolve evaluation modules and preview the dataset columns they receive")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the rows a module would receive for a run configuration
    Preview {
        /// Run configuration (JSON)
        config: PathBuf,
    },

    /// Print the split that would be evaluated for a dataset
    Split {
        /// Root directory holding one directory per dataset
        data_dir: PathBuf,

        /// Dataset name
        dataset: String,

        /// Optional subset (configuration) of the dataset
        subset: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("contrast-evaluate").chain(args.iter().copied()))
    }

    #[test]
    fn test_preview_takes_config_path() {
        let cli = parse(&["preview", "run.json"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Preview {
                config: PathBuf::from("run.json")
            }
        );
    }

    #[test]
    fn test_split_without_subset() {
        let cli = parse(&["split", "data", "squad"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Split {
                data_dir: PathBuf::from("data"),
                dataset: "squad".to_string(),
                subset: None,
            }
        );
    }

    #[test]
    fn test_split_with_subset() {
        let cli = parse(&["split", "data", "glue", "mrpc"]).unwrap();
        match cli.command {
            Command::Split { subset, .. } => assert_eq!(subset.as_deref(), Some("mrpc")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_arguments_are_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["preview"]).is_err());
        assert!(parse(&["split", "data"]).is_err());
        assert!(parse(&["split", "data", "glue", "mrpc", "extra"]).is_err());
        assert!(parse(&["score", "run.json"]).is_err());
    }
}
