use super::{TeamId, UnitId};

/// Diplomatic standing between two teams, derived from their relation values.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Alliance {
    Allied,
    Neutral,
    Enemy,
}

impl Alliance {
    /// `|a - b| == 0` allied, `== 1` neutral, `> 1` enemies.
    pub fn from_relations(a: i32, b: i32) -> Self {
        match a.abs_diff(b) {
            0 => Alliance::Allied,
            1 => Alliance::Neutral,
            _ => Alliance::Enemy,
        }
    }

    pub fn is_hostile(self) -> bool {
        matches!(self, Alliance::Enemy)
    }
}

/// A side in the battle and its roster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Presentation color key, opaque to the core.
    pub color: String,
    pub relation: i32,
    pub boss: Option<UnitId>,
    /// Background music key, opaque to the core.
    pub music: Option<String>,
    units: Vec<UnitId>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, relation: i32) -> Self {
        Self {
            id,
            name: name.into(),
            color: String::new(),
            relation,
            boss: None,
            music: None,
            units: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_boss(mut self, boss: UnitId) -> Self {
        self.boss = Some(boss);
        self
    }

    pub fn with_music(mut self, music: impl Into<String>) -> Self {
        self.music = Some(music.into());
        self
    }

    pub fn alliance_with(&self, other: &Team) -> Alliance {
        Alliance::from_relations(self.relation, other.relation)
    }

    /// Roster in enlistment order.
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.units.contains(&unit)
    }

    pub(crate) fn enlist(&mut self, unit: UnitId) {
        if !self.units.contains(&unit) {
            self.units.push(unit);
        }
    }

    pub(crate) fn discharge(&mut self, unit: UnitId) -> bool {
        match self.units.iter().position(|member| *member == unit) {
            Some(index) => {
                self.units.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.units.is_empty()
    }
}
