// ============================================================
// Layer 1 — CLI Arguments
// ============================================================
// Flags for a training run. Everything except --config is an
// override: a flag that is not given leaves the config file's
// value alone.
//
//   detector-trainer -c config.json -dm linear -mm identity \
//                    -ds jsonl --wandb false -t baseline
//
// Boolean flags take an optional value, so `--debug` and
// `--debug true` mean the same thing.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::Args;
use std::{ffi::OsString, path::PathBuf};

use crate::application::config::ConfigOverrides;

/// Multi-letter short flags clap cannot express, and the long
/// flag each one stands for.
const SHORT_ALIASES: [(&str, &str); 3] = [
    ("-dm", "--detection_model"),
    ("-mm", "--main_model"),
    ("-ds", "--dataset"),
];

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// JSON config file with at least epochs, checkpoint_epoch and lr
    #[arg(short = 'c', long, default_value = "config.json")]
    pub config: PathBuf,

    /// Detection model name (-dm)
    #[arg(long = "detection_model")]
    pub detection_model: Option<String>,

    /// Main model name (-mm)
    #[arg(long = "main_model")]
    pub main_model: Option<String>,

    /// Dataset name (-ds)
    #[arg(long)]
    pub dataset: Option<String>,

    /// Debug run: turns off tracking and the run log
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub debug: Option<bool>,

    /// Experiment tracking on/off
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub wandb: Option<bool>,

    /// Run log on/off
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub log: Option<bool>,

    /// Suffix for the result directory name
    #[arg(short = 't', long)]
    pub tag: Option<String>,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for ConfigOverrides {
    fn from(a: TrainArgs) -> Self {
        ConfigOverrides {
            detection_model: a.detection_model,
            main_model:      a.main_model,
            dataset:         a.dataset,
            debug:           a.debug,
            wandb:           a.wandb,
            log:             a.log,
            tag:             a.tag,
        }
    }
}

/// Rewrite `-dm`, `-mm` and `-ds` (also in `-dm=value` form) to
/// their long flags. Everything else passes through untouched.
pub fn normalize_short_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str().and_then(expand_alias) {
            Some(long) => OsString::from(long),
            None => arg,
        })
        .collect()
}

fn expand_alias(arg: &str) -> Option<String> {
    SHORT_ALIASES.iter().find_map(|(short, long)| {
        if arg == *short {
            return Some((*long).to_string());
        }
        arg.strip_prefix(short)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|value| format!("{long}={value}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_aliases_become_long_flags() {
        let out = normalize_short_flags(["prog", "-dm", "linear", "-mm=identity", "-ds", "jsonl", "-c", "x.json"]);
        assert_eq!(
            out,
            vec!["prog", "--detection_model", "linear", "--main_model=identity", "--dataset", "jsonl", "-c", "x.json"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_values_that_look_like_aliases_are_kept() {
        // Only whole arguments are rewritten
        let out = normalize_short_flags(["prog", "-t", "-dmx"]);
        assert_eq!(out[2], OsString::from("-dmx"));
    }
}
