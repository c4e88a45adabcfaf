/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Damage multiplier applied when a strike lands as a critical.
    pub crit_multiplier: u32,

    /// When set, a team whose designated boss dies is routed: every remaining
    /// member leaves the field and the team counts as defeated.
    pub rout_on_boss_defeat: bool,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Weapons a single unit can carry.
    pub const MAX_INVENTORY_SLOTS: usize = 5;

    // ===== progression =====
    /// Experience needed to gain one level. Experience wraps at this value.
    pub const EXPERIENCE_PER_LEVEL: u32 = 100;
    /// Upper bound of experience awarded by a single battle.
    pub const MAX_EXPERIENCE_GAIN: u32 = 100;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CRIT_MULTIPLIER: u32 = 3;

    pub fn new() -> Self {
        Self {
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            rout_on_boss_defeat: false,
        }
    }

    pub fn with_crit_multiplier(mut self, crit_multiplier: u32) -> Self {
        self.crit_multiplier = crit_multiplier;
        self
    }

    pub fn with_boss_rout(mut self, enabled: bool) -> Self {
        self.rout_on_boss_defeat = enabled;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
