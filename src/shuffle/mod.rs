//! Album ordering algorithms.
//!
//! Every algorithm returns a permutation of its input. Randomness comes only
//! from the caller's RNG, so a seeded `StdRng` reproduces an ordering exactly.

mod spiral;
mod weighted;

use rand::{Rng, seq::SliceRandom};

use crate::{error::ConfigError, types::Album};

pub use spiral::spiral_dance;
pub use weighted::{chronological, weighted_by_year};

pub const DEFAULT_JITTER: f64 = 0.15;
pub const DEFAULT_FLIP_PROBABILITY: f64 = 0.4;
pub const DEFAULT_PIVOT_YEAR: i32 = 2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShuffleAlgorithm {
    #[default]
    Random,
    WeightedNewer,
    WeightedOlder,
    Chronological,
    SpiralDance,
}

impl ShuffleAlgorithm {
    pub const ALL: [ShuffleAlgorithm; 5] = [
        ShuffleAlgorithm::Random,
        ShuffleAlgorithm::WeightedNewer,
        ShuffleAlgorithm::WeightedOlder,
        ShuffleAlgorithm::Chronological,
        ShuffleAlgorithm::SpiralDance,
    ];

    /// Parses an algorithm name. Unknown names fall back to `Random`.
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "random" => ShuffleAlgorithm::Random,
            "weighted-newer" => ShuffleAlgorithm::WeightedNewer,
            "weighted-older" => ShuffleAlgorithm::WeightedOlder,
            "chronological" => ShuffleAlgorithm::Chronological,
            "spiral-dance" => ShuffleAlgorithm::SpiralDance,
            other => {
                log::warn!("Unknown shuffle algorithm '{}', using random", other);
                ShuffleAlgorithm::Random
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShuffleAlgorithm::Random => "random",
            ShuffleAlgorithm::WeightedNewer => "weighted-newer",
            ShuffleAlgorithm::WeightedOlder => "weighted-older",
            ShuffleAlgorithm::Chronological => "chronological",
            ShuffleAlgorithm::SpiralDance => "spiral-dance",
        }
    }
}

impl std::fmt::Display for ShuffleAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tunables shared by the randomized algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShuffleConfig {
    jitter: f64,
    flip_probability: f64,
    pivot_year: i32,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            jitter: DEFAULT_JITTER,
            flip_probability: DEFAULT_FLIP_PROBABILITY,
            pivot_year: DEFAULT_PIVOT_YEAR,
        }
    }
}

impl ShuffleConfig {
    pub fn new(jitter: f64, flip_probability: f64, pivot_year: i32) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.set_jitter(jitter)?;
        config.set_flip_probability(flip_probability)?;
        config.set_pivot_year(pivot_year)?;
        Ok(config)
    }

    /// Relative perturbation of chronological keys, in `0.0..=1.0`.
    pub fn set_jitter(&mut self, jitter: f64) -> Result<&mut Self, ConfigError> {
        check_unit_interval("jitter", jitter)?;
        self.jitter = jitter;
        Ok(self)
    }

    /// Chance per spiral-dance pick to switch between head and tail.
    pub fn set_flip_probability(&mut self, probability: f64) -> Result<&mut Self, ConfigError> {
        check_unit_interval("flip_probability", probability)?;
        self.flip_probability = probability;
        Ok(self)
    }

    /// Year that older-first weights are measured against.
    pub fn set_pivot_year(&mut self, year: i32) -> Result<&mut Self, ConfigError> {
        if !(1000..=9999).contains(&year) {
            return Err(ConfigError::OutOfRange {
                field: "pivot_year",
                value: year as f64,
                min: 1000.0,
                max: 9999.0,
            });
        }
        self.pivot_year = year;
        Ok(self)
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    pub fn flip_probability(&self) -> f64 {
        self.flip_probability
    }

    pub fn pivot_year(&self) -> i32 {
        self.pivot_year
    }
}

fn check_unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

/// Orders albums with the given algorithm.
///
/// # Arguments
///
/// * `albums` - The album pool, in discovery order
/// * `algorithm` - Which ordering to apply
/// * `config` - Jitter, flip probability and pivot year for the algorithms
///   that use them
/// * `rng` - Randomness source; a seeded rng gives a repeatable order
///
/// # Returns
///
/// A new vector with every album exactly once. An empty pool gives an empty
/// vector.
///
/// # Example
///
/// ```
/// let mut rng = StdRng::seed_from_u64(7);
/// let ordered = order(&pool.albums, ShuffleAlgorithm::SpiralDance, &ShuffleConfig::default(), &mut rng);
/// ```
pub fn order<R>(
    albums: &[Album],
    algorithm: ShuffleAlgorithm,
    config: &ShuffleConfig,
    rng: &mut R,
) -> Vec<Album>
where
    R: Rng + ?Sized,
{
    if albums.is_empty() {
        return Vec::new();
    }

    match algorithm {
        ShuffleAlgorithm::Random => {
            let mut shuffled = albums.to_vec();
            shuffled.shuffle(rng);
            shuffled
        }
        ShuffleAlgorithm::WeightedNewer => weighted_by_year(albums, true, config.pivot_year, rng),
        ShuffleAlgorithm::WeightedOlder => weighted_by_year(albums, false, config.pivot_year, rng),
        ShuffleAlgorithm::Chronological => chronological(albums, config.jitter, rng),
        ShuffleAlgorithm::SpiralDance => spiral_dance(albums, config.flip_probability, rng),
    }
}
