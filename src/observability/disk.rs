//! Disk usage reporter.
//!
//! Samples the filesystem holding a path on a fixed interval and publishes
//! two gauges. Only the latest sample is kept; there is no history.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use nix::errno::Errno;
use nix::sys::statvfs::statvfs;
use tokio::time;

use crate::observability::metrics::DiskGauges;

/// One reading of the sampled filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeSample {
    pub taken_at: SystemTime,
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl GaugeSample {
    /// Build a sample from raw block counts.
    ///
    /// Used is `blocks - blocks_free`: blocks reserved for the superuser count
    /// as free, not as used.
    pub fn from_blocks(blocks: u64, blocks_free: u64, fragment_size: u64) -> Self {
        Self {
            taken_at: SystemTime::now(),
            used_bytes: blocks.saturating_sub(blocks_free).saturating_mul(fragment_size),
            total_bytes: blocks.saturating_mul(fragment_size),
        }
    }
}

/// Background loop feeding [`DiskGauges`].
#[derive(Debug)]
pub struct DiskSampler {
    path: PathBuf,
    interval: Duration,
    gauges: DiskGauges,
}

impl DiskSampler {
    pub fn new(path: PathBuf, interval: Duration, gauges: DiskGauges) -> Self {
        Self { path, interval, gauges }
    }

    /// Read the filesystem that holds the sampled path. Relative paths resolve
    /// against the working directory.
    pub fn sample(&self) -> Result<GaugeSample, Errno> {
        let stat = statvfs(self.path.as_path())?;
        Ok(GaugeSample::from_blocks(
            stat.blocks() as u64,
            stat.blocks_free() as u64,
            stat.fragment_size() as u64,
        ))
    }

    /// Overwrite both gauges with `sample`.
    pub fn publish(&self, sample: &GaugeSample) {
        self.gauges.used.set(sample.used_bytes as f64);
        self.gauges.quota.set(sample.total_bytes as f64);
    }

    /// Sample forever. There is no shutdown signal; the task lives as long as the process.
    pub async fn run(self) {
        tracing::info!(
            path = %self.path.display(),
            interval_secs = self.interval.as_secs(),
            "Disk sampler starting"
        );

        let mut ticker = time::interval(self.interval);
        loop {
            ticker.tick().await;
            match self.sample() {
                Ok(sample) => {
                    self.publish(&sample);
                    tracing::debug!(
                        used_bytes = sample.used_bytes,
                        total_bytes = sample.total_bytes,
                        "Disk usage sampled"
                    );
                }
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "Disk sample failed");
                }
            }
        }
    }
}
