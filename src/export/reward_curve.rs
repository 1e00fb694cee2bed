//! Cumulative reward curve of a learner's reward trace

use std::{fs::File, io::Write, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One row of the exported curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardPoint {
    /// Zero-based index into the reward trace
    pub step: usize,
    pub reward: f64,
    /// Sum of rewards up to and including `step`
    pub cumulative: f64,
}

/// Running sum of `trace`.
pub fn cumulative_rewards(trace: &[f64]) -> Vec<f64> {
    trace
        .iter()
        .scan(0.0, |total, &reward| {
            *total += reward;
            Some(*total)
        })
        .collect()
}

pub fn reward_curve(trace: &[f64]) -> Vec<RewardPoint> {
    trace
        .iter()
        .zip(cumulative_rewards(trace))
        .enumerate()
        .map(|(step, (&reward, cumulative))| RewardPoint {
            step,
            reward,
            cumulative,
        })
        .collect()
}

/// Write the curve as CSV with a `step,reward,cumulative` header.
///
/// Returns the number of rows written.
pub fn write_reward_curve<W: Write>(trace: &[f64], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let points = reward_curve(trace);
    if points.is_empty() {
        csv_writer.write_record(["step", "reward", "cumulative"])?;
    }
    for point in &points {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush().map_err(|source| Error::Io {
        operation: "flush reward curve".to_string(),
        source,
    })?;
    Ok(points.len())
}

/// [`write_reward_curve`] into a new file at `path`.
pub fn write_reward_curve_to_path(trace: &[f64], path: &Path) -> Result<usize> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create file {path:?}"),
        source,
    })?;
    let rows = write_reward_curve(trace, file)?;
    log::debug!("wrote {rows} reward points to {}", path.display());
    Ok(rows)
}
