// Automated pick policies for non-user teams.

use crate::player::{PlayerId, PlayerRecord};

/// Strategy seam for automated opponents. The driving loop asks the policy
/// for a pick whenever a non-user team is on the clock.
pub trait OpponentPolicy {
    /// Choose a player from the available pool, or `None` when nothing
    /// remains to draft.
    fn choose(&self, available: &[&PlayerRecord]) -> Option<PlayerId>;
}

/// The trivial policy: take the best remaining player by composite rating.
/// Ties keep the earlier pool entry, so picks are deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestAvailable;

impl OpponentPolicy for BestAvailable {
    fn choose(&self, available: &[&PlayerRecord]) -> Option<PlayerId> {
        available
            .iter()
            .copied()
            .reduce(|best, p| {
                if p.total_z_score > best.total_z_score {
                    p
                } else {
                    best
                }
            })
            .map(|p| p.player_id)
    }
}
