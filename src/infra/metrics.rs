// ============================================================
// Layer 6 — Training History Logger
// ============================================================
// Appends one CSV row per epoch to {dir}/history.csv so training
// runs leave a permanent, plottable record:
//
//   epoch,train_loss,val_loss,val_accuracy
//   1,11.214500,10.893200,0.013000
//   2,9.841100,9.752300,0.029000
//
// val_accuracy is the probability mass the model puts on the true
// span endpoints, not exact-match accuracy.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One row of history for a single training epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,

    /// Average negative-log loss over all training batches
    pub train_loss: f64,

    /// Average negative-log loss on the validation set
    pub val_loss: f64,

    /// Average probability mass on the true endpoints, in [0, 1]
    pub val_accuracy: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, val_accuracy: f64) -> Self {
        Self {
            epoch,
            train_loss,
            val_loss,
            val_accuracy,
        }
    }

    /// True if this epoch's validation loss beats the previous best.
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Appends epoch metrics to a CSV history file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the logger, writing the CSV header only if the file is
    /// new so repeated runs append to one history.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("history.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,val_loss,val_accuracy")?;
            tracing::debug!("Created history CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.val_loss, m.val_accuracy,
        )?;

        tracing::debug!(
            "Logged epoch {}: train_loss={:.4}, val_loss={:.4}, val_accuracy={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
            m.val_accuracy,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 9.5, 9.3, 0.2);
        assert!(m.is_improvement(10.0));
        assert!(!m.is_improvement(9.0));
    }

    #[test]
    fn test_rows_append_under_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();

        logger.log(&EpochMetrics::new(1, 11.2, 10.9, 0.01)).unwrap();
        logger.log(&EpochMetrics::new(2, 9.8, 9.7, 0.03)).unwrap();

        let content = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,train_loss,val_loss,val_accuracy");
        assert!(lines[1].starts_with("1,11.2"));
        assert!(lines[2].starts_with("2,9.8"));
    }
}
