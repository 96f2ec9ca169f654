// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line with `clap`, loads the config and hands
// the run to Layer 2. A training failure has already been
// reported to the sinks by the time it gets here, so both
// outcomes end the process normally. Only problems before any
// sink exists (unreadable config, invalid values, result
// directory not creatable) make the process fail.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::TrainArgs;

use crate::application::{config::RunConfig, train_use_case::TrainUseCase};
use crate::ml::trainer::RunOutcome;

#[derive(Parser, Debug)]
#[command(
    name = "detector-trainer",
    version,
    about = "Train a detection model on top of a frozen main model."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: TrainArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config_path = self.args.config.clone();
        let config      = RunConfig::load(&config_path, self.args.into())?;

        match TrainUseCase::new(config).execute()? {
            RunOutcome::Completed(summary) => {
                println!(
                    "Training complete after {} epochs. Best accuracy: {:.2}%",
                    summary.history.len(),
                    summary.best_accuracy
                );
            }
            RunOutcome::Failed(err) => {
                println!("Training stopped: {err}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::ConfigOverrides;
    use commands::normalize_short_flags;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_short_flags(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_override_nothing() {
        let cli = parse(&["detector-trainer"]);
        assert_eq!(cli.args.config, std::path::PathBuf::from("config.json"));

        let o: ConfigOverrides = cli.args.into();
        assert!(o.detection_model.is_none() && o.main_model.is_none() && o.dataset.is_none());
        assert!(o.debug.is_none() && o.wandb.is_none() && o.log.is_none() && o.tag.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = parse(&[
            "detector-trainer", "-c", "runs/a.json", "-dm", "linear", "-mm", "identity",
            "-ds", "jsonl", "--debug", "--wandb", "false", "--log", "true", "-t", "v2",
        ]);
        let a = &cli.args;
        assert_eq!(a.config, std::path::PathBuf::from("runs/a.json"));
        assert_eq!(a.detection_model.as_deref(), Some("linear"));
        assert_eq!(a.main_model.as_deref(), Some("identity"));
        assert_eq!(a.dataset.as_deref(), Some("jsonl"));
        assert_eq!(a.debug, Some(true));
        assert_eq!(a.wandb, Some(false));
        assert_eq!(a.log, Some(true));
        assert_eq!(a.tag.as_deref(), Some("v2"));
    }

    #[test]
    fn test_bad_bool_is_rejected() {
        let res = Cli::try_parse_from(["detector-trainer", "--wandb", "maybe"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_missing_config_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.json");
        let cli = parse(&["detector-trainer", "-c", missing.to_str().unwrap()]);
        let err = cli.run().unwrap_err();
        assert!(format!("{err:#}").contains("Cannot read config file"));
    }
}
