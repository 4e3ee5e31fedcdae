// Snake-draft state machine: serpentine turn order, rosters, pick log.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::DraftConfig;
use crate::player::{PlayerId, PlayerRecord};

/// Team identifier: the team's slot in the first-round order (1-based).
pub type TeamId = u32;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A pick that cannot be recorded. The caller treats this as a no-op and
/// re-prompts for a valid pick; the draft session itself is unaffected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidPickError {
    #[error("player {player_id} has already been drafted")]
    AlreadyDrafted { player_id: PlayerId },

    #[error("team {team_id} roster is already at capacity ({capacity})")]
    RosterFull { team_id: TeamId, capacity: usize },

    #[error("team {team_id} is not part of this draft")]
    UnknownTeam { team_id: TeamId },

    #[error("the draft is complete; no further picks may be recorded")]
    DraftComplete,
}

// ---------------------------------------------------------------------------
// Pick log
// ---------------------------------------------------------------------------

/// A single recorded pick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPick {
    /// Sequential overall pick number (1-indexed).
    pub overall: u32,
    /// Round the pick was made in.
    pub round: u32,
    pub team_id: TeamId,
    pub player_id: PlayerId,
}

// ---------------------------------------------------------------------------
// Draft state
// ---------------------------------------------------------------------------

/// The complete state of a snake draft.
///
/// Created once at draft start and mutated only through
/// [`record_pick`](DraftState::record_pick) /
/// [`advance_pick`](DraftState::advance_pick) (always called as a pair; see
/// [`apply_pick`](DraftState::apply_pick)). Once every roster reaches
/// capacity the state is frozen: further picks are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftState {
    /// Number of teams in the draft.
    pub num_teams: u32,
    /// The user's slot in the first-round order.
    pub user_draft_slot: u32,
    /// Roster capacity per team.
    pub roster_size: usize,
    /// Current round (starts at 1).
    pub round: u32,
    /// The team currently on the clock.
    pub current_pick_team: TeamId,
    /// All drafted player ids in chronological order.
    pub drafted_players: Vec<PlayerId>,
    /// Per-team rosters in pick order.
    pub team_rosters: BTreeMap<TeamId, Vec<PlayerId>>,
    /// The current snake order; reversed in place at the end of each round.
    pub draft_order: Vec<TeamId>,
    /// Full pick log with round/overall numbers.
    pub picks: Vec<DraftPick>,
    /// Human-readable note about the most recent pick.
    pub status_message: String,
}

impl DraftState {
    /// Create a fresh draft state with empty rosters, round 1, and the
    /// first-round order 1..=N.
    pub fn new(config: &DraftConfig) -> Self {
        let draft_order: Vec<TeamId> = (1..=config.num_teams).collect();
        let team_rosters = draft_order.iter().map(|&t| (t, Vec::new())).collect();
        DraftState {
            num_teams: config.num_teams,
            user_draft_slot: config.user_draft_slot,
            roster_size: config.roster_size,
            round: 1,
            current_pick_team: 1,
            drafted_players: Vec::new(),
            team_rosters,
            draft_order,
            picks: Vec::new(),
            status_message: String::new(),
        }
    }

    /// The user's team id (equal to their draft slot).
    pub fn user_team_id(&self) -> TeamId {
        self.user_draft_slot
    }

    /// The user's current roster.
    pub fn user_roster(&self) -> &[PlayerId] {
        self.roster(self.user_team_id()).unwrap_or(&[])
    }

    /// A team's roster, if the team exists.
    pub fn roster(&self, team_id: TeamId) -> Option<&[PlayerId]> {
        self.team_rosters.get(&team_id).map(|r| r.as_slice())
    }

    /// True once every roster has reached capacity.
    pub fn is_complete(&self) -> bool {
        self.team_rosters
            .values()
            .all(|roster| roster.len() >= self.roster_size)
    }

    /// Record a pick for a team.
    ///
    /// Fails if the draft is complete, the team is unknown, the player was
    /// already drafted, or the team's roster is full. On success the pick is
    /// appended to the team's roster, the global drafted list, and the pick
    /// log; the turn cursor is NOT advanced (see [`advance_pick`]).
    ///
    /// [`advance_pick`]: DraftState::advance_pick
    pub fn record_pick(
        &mut self,
        player_id: PlayerId,
        team_id: TeamId,
    ) -> Result<(), InvalidPickError> {
        if self.is_complete() {
            return Err(InvalidPickError::DraftComplete);
        }
        if !self.team_rosters.contains_key(&team_id) {
            return Err(InvalidPickError::UnknownTeam { team_id });
        }
        if self.drafted_players.contains(&player_id) {
            return Err(InvalidPickError::AlreadyDrafted { player_id });
        }
        let capacity = self.roster_size;
        let roster = self
            .team_rosters
            .get_mut(&team_id)
            .ok_or(InvalidPickError::UnknownTeam { team_id })?;
        if roster.len() >= capacity {
            return Err(InvalidPickError::RosterFull { team_id, capacity });
        }

        roster.push(player_id);
        self.drafted_players.push(player_id);
        let overall = self.drafted_players.len() as u32;
        self.picks.push(DraftPick {
            overall,
            round: self.round,
            team_id,
            player_id,
        });
        debug!(overall, round = self.round, team_id, player_id, "recorded pick");
        Ok(())
    }

    /// Advance to the next pick using serpentine logic: next team in the
    /// current order, or at the end of a round reverse the order in place,
    /// increment the round, and start from the new order's front.
    pub fn advance_pick(&mut self) {
        let idx = self
            .draft_order
            .iter()
            .position(|&t| t == self.current_pick_team)
            .unwrap_or(0);
        if idx + 1 < self.draft_order.len() {
            self.current_pick_team = self.draft_order[idx + 1];
        } else {
            self.round += 1;
            self.draft_order.reverse();
            self.current_pick_team = self.draft_order[0];
        }
    }

    /// Record a pick and advance the cursor as one operation. On error the
    /// cursor does not move. Also refreshes the status message.
    pub fn apply_pick(
        &mut self,
        player: &PlayerRecord,
        team_id: TeamId,
    ) -> Result<(), InvalidPickError> {
        self.record_pick(player.player_id, team_id)?;
        self.status_message = format!("Team {team_id} drafted {}!", player.name);
        self.advance_pick();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DraftConfig;

    fn state(num_teams: u32, slot: u32, roster_size: usize) -> DraftState {
        DraftState::new(&DraftConfig::new(num_teams, slot, roster_size).unwrap())
    }

    fn make_player(id: PlayerId, name: &str) -> PlayerRecord {
        PlayerRecord {
            player_id: id,
            name: name.to_string(),
            team: "BOS".to_string(),
            position: "PG".to_string(),
            total_z_score: 1.0,
            z_points: 0.0,
            z_rebounds: 0.0,
            z_assists: 0.0,
            z_steals: 0.0,
            z_blocks: 0.0,
            z_turnovers: 0.0,
            z_fg_pct: 0.0,
            z_ft_pct: 0.0,
            z_three_pm: 0.0,
            adp: None,
            age: None,
            games_played: None,
            usage_rate: None,
            true_shooting_pct: None,
            player_efficiency_rating: None,
        }
    }

    #[test]
    fn fresh_state() {
        let state = state(10, 4, 13);
        assert_eq!(state.round, 1);
        assert_eq!(state.current_pick_team, 1);
        assert_eq!(state.draft_order, (1..=10).collect::<Vec<_>>());
        assert_eq!(state.user_team_id(), 4);
        assert!(state.drafted_players.is_empty());
        assert!(!state.is_complete());
    }

    #[test]
    fn snake_order_four_teams() {
        let mut state = state(4, 1, 13);
        assert_eq!(state.draft_order, vec![1, 2, 3, 4]);
        assert_eq!(state.current_pick_team, 1);

        for _ in 0..4 {
            state.advance_pick();
        }
        assert_eq!(state.draft_order, vec![4, 3, 2, 1]);
        assert_eq!(state.current_pick_team, 4);
        assert_eq!(state.round, 2);

        for _ in 0..4 {
            state.advance_pick();
        }
        assert_eq!(state.draft_order, vec![1, 2, 3, 4]);
        assert_eq!(state.current_pick_team, 1);
        assert_eq!(state.round, 3);
    }

    #[test]
    fn serpentine_returns_after_two_rounds() {
        // 2N advances from the start of a round land back on the same team
        // with the round incremented by exactly 2.
        for n in [2u32, 4, 8, 12] {
            let mut state = state(n, 1, 13);
            let start_team = state.current_pick_team;
            let start_round = state.round;
            for _ in 0..(2 * n) {
                state.advance_pick();
            }
            assert_eq!(state.current_pick_team, start_team, "n = {n}");
            assert_eq!(state.round, start_round + 2, "n = {n}");
        }
    }

    #[test]
    fn consecutive_picks_at_the_turn() {
        // The last team in round 1 also opens round 2.
        let mut state = state(4, 1, 13);
        for _ in 0..3 {
            state.advance_pick();
        }
        assert_eq!(state.current_pick_team, 4);
        state.advance_pick();
        assert_eq!(state.current_pick_team, 4);
        assert_eq!(state.round, 2);
    }

    #[test]
    fn record_pick_updates_roster_and_log() {
        let mut state = state(4, 1, 13);
        state.record_pick(101, 1).unwrap();
        assert_eq!(state.drafted_players, vec![101]);
        assert_eq!(state.roster(1).unwrap(), &[101]);
        assert_eq!(state.picks.len(), 1);
        assert_eq!(state.picks[0].overall, 1);
        assert_eq!(state.picks[0].round, 1);
        assert_eq!(state.picks[0].team_id, 1);
    }

    #[test]
    fn record_pick_rejects_duplicate_player() {
        let mut state = state(4, 1, 13);
        state.record_pick(101, 1).unwrap();
        let err = state.record_pick(101, 2).unwrap_err();
        assert_eq!(err, InvalidPickError::AlreadyDrafted { player_id: 101 });
        // The failed pick left no trace.
        assert_eq!(state.drafted_players.len(), 1);
        assert!(state.roster(2).unwrap().is_empty());
    }

    #[test]
    fn record_pick_rejects_full_roster() {
        let mut state = state(2, 1, 2);
        state.record_pick(1, 1).unwrap();
        state.record_pick(2, 1).unwrap();
        let err = state.record_pick(3, 1).unwrap_err();
        assert_eq!(
            err,
            InvalidPickError::RosterFull {
                team_id: 1,
                capacity: 2
            }
        );
    }

    #[test]
    fn record_pick_rejects_unknown_team() {
        let mut state = state(4, 1, 13);
        let err = state.record_pick(101, 9).unwrap_err();
        assert_eq!(err, InvalidPickError::UnknownTeam { team_id: 9 });
    }

    #[test]
    fn completed_draft_is_frozen() {
        let mut state = state(2, 1, 1);
        state.record_pick(1, 1).unwrap();
        state.record_pick(2, 2).unwrap();
        assert!(state.is_complete());
        let err = state.record_pick(3, 1).unwrap_err();
        assert_eq!(err, InvalidPickError::DraftComplete);
    }

    #[test]
    fn completion_requires_every_roster() {
        let mut state = state(2, 1, 2);
        state.record_pick(1, 1).unwrap();
        state.record_pick(2, 1).unwrap();
        assert!(!state.is_complete());
        state.record_pick(3, 2).unwrap();
        state.record_pick(4, 2).unwrap();
        assert!(state.is_complete());
    }

    #[test]
    fn apply_pick_records_and_advances() {
        let mut state = state(4, 1, 13);
        let player = make_player(101, "Nikola Jokic");
        state.apply_pick(&player, 1).unwrap();
        assert_eq!(state.current_pick_team, 2);
        assert_eq!(state.status_message, "Team 1 drafted Nikola Jokic!");
    }

    #[test]
    fn apply_pick_does_not_advance_on_error() {
        let mut state = state(4, 1, 13);
        let player = make_player(101, "Nikola Jokic");
        state.apply_pick(&player, 1).unwrap();
        assert_eq!(state.current_pick_team, 2);
        // Re-picking the same player must leave the cursor alone.
        let err = state.apply_pick(&player, 2).unwrap_err();
        assert_eq!(err, InvalidPickError::AlreadyDrafted { player_id: 101 });
        assert_eq!(state.current_pick_team, 2);
    }

    #[test]
    fn roster_exclusivity_over_full_draft() {
        let mut state = state(3, 2, 4);
        let mut next_player: PlayerId = 1;
        while !state.is_complete() {
            let team = state.current_pick_team;
            let player = make_player(next_player, &format!("Player {next_player}"));
            state.apply_pick(&player, team).unwrap();
            next_player += 1;
        }

        // Every drafted id appears exactly once globally.
        let mut seen = std::collections::HashSet::new();
        for &id in &state.drafted_players {
            assert!(seen.insert(id), "player {id} drafted twice");
        }
        // ... and in exactly one roster.
        let roster_total: usize =
            state.team_rosters.values().map(|r| r.len()).sum();
        assert_eq!(roster_total, state.drafted_players.len());
        assert_eq!(roster_total, 12);
        for roster in state.team_rosters.values() {
            assert_eq!(roster.len(), 4);
        }
    }
}
