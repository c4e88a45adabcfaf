//! Read-only collaborators consumed by the core.
//!
//! Terrain records describe the static map, the RNG oracle supplies combat
//! rolls, and [`GameEnv`] bundles the oracle with the rule configuration so the
//! engine can reach both without owning either.
mod map;
mod rng;

pub use map::{MapDimensions, Terrain, TerrainKind, UnitClass, UnitClasses};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};

use crate::config::GameConfig;

/// Aggregates the read-only inputs required by the engine.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    config: &'a GameConfig,
    rng: &'a dyn RngOracle,
}

impl<'a> GameEnv<'a> {
    pub fn new(config: &'a GameConfig, rng: &'a dyn RngOracle) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }
}

impl core::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
