//! Per-stat sampling distributions.
//!
//! | stat kind                              | family                              |
//! |----------------------------------------|-------------------------------------|
//! | continuous rate (possessions, ppp, ...) | normal, resampled below lower bound |
//! | count with variance <= mean            | Poisson                             |
//! | count with variance > mean             | negative binomial (gamma-Poisson)   |
//!
//! Out-of-domain normal draws are thrown away and drawn again rather than
//! clamped, so the accepted values follow the normal truncated at the bound
//! instead of piling up mass on it.

use rand::Rng;
use rand_distr::{Distribution, Gamma, Normal, Poisson};

use crate::domain::StatDistribution;
use crate::error::SimulationError;

/// A ready-to-sample distribution for one stat.
#[derive(Debug, Clone)]
pub enum StatSampler {
    Normal {
        stat: String,
        normal: Normal<f64>,
        lower: f64,
    },
    Poisson(Poisson<f64>),
    /// Poisson with a gamma-distributed rate.
    NegativeBinomial(Gamma<f64>),
    /// A count stat with zero mean.
    Zero,
}

impl StatSampler {
    /// Normal sampler accepting only draws at or above `lower`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidDistribution`] if the parameters do
    /// not describe a normal distribution.
    pub fn continuous(
        stat: &str,
        dist: StatDistribution,
        lower: f64,
    ) -> Result<Self, SimulationError> {
        let normal = Normal::new(dist.mean, dist.std_dev()).map_err(|e| invalid(stat, e))?;
        Ok(Self::Normal {
            stat: stat.to_string(),
            normal,
            lower,
        })
    }

    /// Count sampler: Poisson, or negative binomial when over-dispersed.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidDistribution`] if the parameters do
    /// not describe a count distribution.
    pub fn count(stat: &str, dist: StatDistribution) -> Result<Self, SimulationError> {
        if dist.mean <= 0.0 {
            return Ok(Self::Zero);
        }
        if dist.variance > dist.mean {
            // Gamma(k, θ) with k θ = mean and k θ² = variance - mean.
            let excess = dist.variance - dist.mean;
            let shape = dist.mean * dist.mean / excess;
            let scale = excess / dist.mean;
            let gamma = Gamma::new(shape, scale).map_err(|e| invalid(stat, e))?;
            Ok(Self::NegativeBinomial(gamma))
        } else {
            let poisson = Poisson::new(dist.mean).map_err(|e| invalid(stat, e))?;
            Ok(Self::Poisson(poisson))
        }
    }

    /// Draw one value.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::ResampleExhausted`] when `max_attempts`
    /// normal draws in a row all fall below the lower bound.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        max_attempts: usize,
    ) -> Result<f64, SimulationError> {
        match self {
            Self::Normal {
                stat,
                normal,
                lower,
            } => {
                for _ in 0..max_attempts {
                    let x = normal.sample(rng);
                    if x >= *lower {
                        return Ok(x);
                    }
                }
                Err(SimulationError::ResampleExhausted {
                    stat: stat.clone(),
                    attempts: max_attempts,
                })
            }
            Self::Poisson(poisson) => Ok(poisson.sample(rng)),
            Self::NegativeBinomial(gamma) => {
                let rate = gamma.sample(rng);
                if rate <= 0.0 || !rate.is_finite() {
                    return Ok(0.0);
                }
                match Poisson::new(rate) {
                    Ok(poisson) => Ok(poisson.sample(rng)),
                    Err(_) => Ok(0.0),
                }
            }
            Self::Zero => Ok(0.0),
        }
    }

    /// Draw a count, as used for goals and runs.
    ///
    /// # Errors
    ///
    /// See [`StatSampler::sample`].
    pub fn sample_count<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        max_attempts: usize,
    ) -> Result<u32, SimulationError> {
        let x = self.sample(rng, max_attempts)?;
        Ok(x.round().max(0.0) as u32)
    }
}

fn invalid(stat: &str, err: impl std::fmt::Display) -> SimulationError {
    SimulationError::InvalidDistribution {
        stat: stat.to_string(),
        reason: err.to_string(),
    }
}
