//! Time sampling descriptors for archive properties.

use crate::util::Chrono;

/// Type of time sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeSamplingType {
    /// Single static sample at time 0.
    Identity,

    /// Uniform sampling: `start_time + index * time_per_cycle`.
    Uniform {
        time_per_cycle: Chrono,
        start_time: Chrono,
    },
}

/// Time sampling information shared by every schema in one archive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSampling {
    pub sampling_type: TimeSamplingType,
}

impl TimeSampling {
    /// Identity time sampling (single sample at time 0).
    pub const IDENTITY: Self = Self {
        sampling_type: TimeSamplingType::Identity,
    };

    /// Create uniform time sampling.
    pub fn uniform(time_per_cycle: Chrono, start_time: Chrono) -> Self {
        Self {
            sampling_type: TimeSamplingType::Uniform {
                time_per_cycle,
                start_time,
            },
        }
    }

    /// Uniform sampling at a fixed frame rate, starting at time 0.
    pub fn from_fps(fps: Chrono) -> Self {
        Self::uniform(1.0 / fps, 0.0)
    }

    /// Time of the given sample index.
    pub fn sample_time(&self, index: usize) -> Chrono {
        match self.sampling_type {
            TimeSamplingType::Identity => 0.0,
            TimeSamplingType::Uniform {
                time_per_cycle,
                start_time,
            } => start_time + index as Chrono * time_per_cycle,
        }
    }
}

impl Default for TimeSampling {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sample_times() {
        let ts = TimeSampling::from_fps(24.0);
        assert_eq!(ts.sample_time(0), 0.0);
        assert!((ts.sample_time(24) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_identity() {
        assert_eq!(TimeSampling::IDENTITY.sample_time(10), 0.0);
    }
}
