// ============================================================
// Layer 4 — Sample Loaders
// ============================================================
// Two ways to get labelled samples into memory:
//
//   load_jsonl         — one JSON object per line:
//                        {"features": [0.1, -0.3, ...], "label": 1}
//                        e.g. hidden states dumped by another tool
//   synthetic_clusters — seeded Gaussian blobs, one per class;
//                        handy for smoke runs and tests
//
// Reference: rand crate documentation (StdRng, SeedableRng)

use anyhow::{Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fs, path::Path};

use crate::data::dataset::LabeledSample;

/// Spread of each synthetic cluster around its centre
const CLUSTER_STD: f32 = 0.5;

/// Range of the synthetic cluster centres along every axis
const CENTRE_RANGE: f32 = 2.0;

pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Vec<LabeledSample>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read dataset file '{}'", path.display()))?;

    let mut samples = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let sample: LabeledSample = serde_json::from_str(line).with_context(|| {
            format!("Invalid sample at {}:{}", path.display(), lineno + 1)
        })?;
        samples.push(sample);
    }

    tracing::info!("Loaded {} samples from '{}'", samples.len(), path.display());
    Ok(samples)
}

/// `num_samples` points spread round-robin over `num_classes`
/// clusters in `dim` dimensions. Same seed, same samples.
pub fn synthetic_clusters(
    num_samples: usize,
    dim:         usize,
    num_classes: usize,
    seed:        u64,
) -> Vec<LabeledSample> {
    if num_classes == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let centres: Vec<Vec<f32>> = (0..num_classes)
        .map(|_| (0..dim).map(|_| rng.gen_range(-CENTRE_RANGE..CENTRE_RANGE)).collect())
        .collect();

    (0..num_samples)
        .map(|i| {
            let label    = i % num_classes;
            let features = centres[label]
                .iter()
                .map(|c| c + CLUSTER_STD * standard_normal(&mut rng))
                .collect();
            LabeledSample { features, label }
        })
        .collect()
}

// Box-Muller transform
fn standard_normal(rng: &mut impl Rng) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_jsonl_skips_blank_lines() {
        let tmp  = tempdir().unwrap();
        let path = tmp.path().join("states.jsonl");
        fs::write(
            &path,
            "{\"features\": [0.5, 1.0], \"label\": 1}\n\n{\"features\": [0.0, -1.0], \"label\": 0}\n",
        )
        .unwrap();

        let samples = load_jsonl(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], LabeledSample { features: vec![0.5, 1.0], label: 1 });
    }

    #[test]
    fn test_jsonl_reports_bad_line() {
        let tmp  = tempdir().unwrap();
        let path = tmp.path().join("bad.jsonl");
        fs::write(&path, "{\"features\": [1.0], \"label\": 0}\nnot json\n").unwrap();

        let err = load_jsonl(&path).unwrap_err();
        assert!(format!("{err:#}").contains(":2"));
    }

    #[test]
    fn test_synthetic_is_seeded_and_balanced() {
        let a = synthetic_clusters(30, 4, 3, 7);
        let b = synthetic_clusters(30, 4, 3, 7);
        let c = synthetic_clusters(30, 4, 3, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);

        assert!(a.iter().all(|s| s.features.len() == 4));
        for class in 0..3 {
            assert_eq!(a.iter().filter(|s| s.label == class).count(), 10);
        }
    }
}
