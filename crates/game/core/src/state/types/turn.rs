use super::{Team, TeamId};

/// Turn bookkeeping: the ordered teams, which one is acting, and the roll
/// nonce that keeps combat deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    teams: Vec<Team>,

    /// Index into `teams` of the acting team.
    pub active: usize,

    /// Full rotations completed, starting at 1.
    pub round: u32,

    /// Sequential roll identifier, advanced once per combat strike.
    pub nonce: u64,

    /// Set once a single undefeated team remains; rotation stops afterwards.
    pub winner: Option<TeamId>,
}

impl TurnState {
    pub fn new(teams: Vec<Team>) -> Self {
        Self {
            teams,
            active: 0,
            round: 1,
            nonce: 0,
            winner: None,
        }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    pub(crate) fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|team| team.id == id)
    }

    pub fn active_team(&self) -> Option<&Team> {
        self.teams.get(self.active)
    }

    pub fn active_team_id(&self) -> Option<TeamId> {
        self.active_team().map(|team| team.id)
    }

    pub fn is_active(&self, team: TeamId) -> bool {
        self.active_team_id() == Some(team)
    }

    pub fn undefeated(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter().filter(|team| !team.is_defeated())
    }

    /// Index of the next undefeated team after `from`, wrapping around.
    ///
    /// Returns `from` itself when it is the only team standing, and `None` when
    /// every team is defeated.
    pub fn next_undefeated_after(&self, from: usize) -> Option<usize> {
        let count = self.teams.len();
        (1..=count)
            .map(|offset| (from + offset) % count)
            .find(|&index| !self.teams[index].is_defeated())
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }
}
