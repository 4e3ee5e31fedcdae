// Draft configuration and heuristic tuning constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation error for field `{field}`: {message}")]
    Validation { field: &'static str, message: String },

    #[error("failed to parse tuning overrides: {source}")]
    TuningParse {
        #[from]
        source: toml::de::Error,
    },
}

// ---------------------------------------------------------------------------
// Draft configuration
// ---------------------------------------------------------------------------

/// League-level draft parameters, validated at construction.
///
/// A draft whose configuration changes mid-flight (team count, slot) must be
/// rebuilt from a fresh `DraftConfig` rather than patched in place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DraftConfig {
    /// Number of teams in the league.
    pub num_teams: u32,
    /// The user's slot in the first-round order (1-based).
    pub user_draft_slot: u32,
    /// Roster capacity per team.
    pub roster_size: usize,
}

impl DraftConfig {
    pub fn new(
        num_teams: u32,
        user_draft_slot: u32,
        roster_size: usize,
    ) -> Result<Self, ConfigError> {
        if num_teams < 2 {
            return Err(ConfigError::Validation {
                field: "num_teams",
                message: format!("need at least 2 teams, got {num_teams}"),
            });
        }
        if user_draft_slot < 1 || user_draft_slot > num_teams {
            return Err(ConfigError::Validation {
                field: "user_draft_slot",
                message: format!(
                    "draft slot {user_draft_slot} is outside 1..={num_teams}"
                ),
            });
        }
        if roster_size == 0 {
            return Err(ConfigError::Validation {
                field: "roster_size",
                message: "roster size must be positive".into(),
            });
        }
        Ok(DraftConfig {
            num_teams,
            user_draft_slot,
            roster_size,
        })
    }
}

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

/// Heuristic thresholds used across the analysis modules.
///
/// The defaults reproduce the tuned values the engine shipped with; none of
/// them are load-bearing invariants, so they can be overridden from a TOML
/// table per league.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub standing: StandingTuning,
    pub punt: PuntTuning,
    pub risk: RiskTuning,
    pub suggest: SuggestTuning,
    pub grade: GradeTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            standing: StandingTuning::default(),
            punt: PuntTuning::default(),
            risk: RiskTuning::default(),
            suggest: SuggestTuning::default(),
            grade: GradeTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from a TOML document. Missing tables and keys
    /// keep their default values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Category-standing classification thresholds.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct StandingTuning {
    /// Rank percentile at or above which a category counts as strong.
    pub strong_percentile: f64,
    /// Rank percentile below which a category counts as weak.
    pub weak_percentile: f64,
    /// Single-team fallback: total at or above which a category is strong.
    pub absolute_strong: f64,
    /// Single-team fallback: total at or above which a category is average.
    pub absolute_average: f64,
}

impl Default for StandingTuning {
    fn default() -> Self {
        StandingTuning {
            strong_percentile: 0.67,
            weak_percentile: 0.33,
            absolute_strong: 3.0,
            absolute_average: 0.0,
        }
    }
}

/// Punt-detection thresholds. Deliberately conservative: small rosters
/// produce false positives, so every rule errs toward "no punt".
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PuntTuning {
    /// Minimum rostered players before any determination is made.
    pub min_players: usize,
    /// Minimum number of ranked teams for league-relative rules.
    pub min_ranked_teams: usize,
    /// Rank fraction defining the bottom quintile (rank >= frac * teams).
    pub bottom_quintile: f64,
    /// Last-place total below which a medium-confidence punt is flagged.
    pub last_place_total: f64,
    /// Isolated-team total below which a medium-confidence punt is flagged.
    pub isolated_total: f64,
    /// Minimum rostered players for the percentage-category rule.
    pub pct_min_players: usize,
    /// Share of rostered players that must be weak in a percentage category.
    pub pct_player_share: f64,
    /// Individual z-score below which a player counts as weak in FG%/FT%.
    pub pct_player_z: f64,
}

impl Default for PuntTuning {
    fn default() -> Self {
        PuntTuning {
            min_players: 3,
            min_ranked_teams: 6,
            bottom_quintile: 0.80,
            last_place_total: -2.0,
            isolated_total: -4.0,
            pct_min_players: 6,
            pct_player_share: 0.75,
            pct_player_z: -1.0,
        }
    }
}

/// Roster-risk check thresholds.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RiskTuning {
    /// Games-played cutoff and count for a high-severity durability warning.
    pub games_high_cutoff: u32,
    pub games_high_count: usize,
    /// Games-played cutoff and count for a medium-severity durability warning.
    pub games_medium_cutoff: u32,
    pub games_medium_count: usize,
    /// Age cutoff and count for a high-severity age warning.
    pub age_high_cutoff: u32,
    pub age_high_count: usize,
    /// Age cutoff and count for a medium-severity age warning.
    pub age_medium_cutoff: u32,
    pub age_medium_count: usize,
    /// Roster share at which a single position class is overloaded.
    pub imbalance_share: f64,
    /// Absolute count at which a single position class is overloaded.
    pub imbalance_count: usize,
    /// Minimum roster size before missing position coverage is flagged.
    pub gap_min_roster: usize,
    /// Usage-rate cutoff and count for a high-severity usage conflict.
    pub usage_high_cutoff: f64,
    pub usage_high_count: usize,
    /// Usage-rate cutoff and count for a medium-severity usage conflict.
    pub usage_medium_cutoff: f64,
    pub usage_medium_count: usize,
    /// True-shooting cutoff and count for a high-severity efficiency warning.
    pub ts_high_cutoff: f64,
    pub ts_high_count: usize,
    /// True-shooting cutoff and count for a medium-severity efficiency warning.
    pub ts_medium_cutoff: f64,
    pub ts_medium_count: usize,
    /// Players from one NBA team at which concentration is flagged.
    pub concentration_count: usize,
}

impl Default for RiskTuning {
    fn default() -> Self {
        RiskTuning {
            games_high_cutoff: 30,
            games_high_count: 2,
            games_medium_cutoff: 50,
            games_medium_count: 3,
            age_high_cutoff: 35,
            age_high_count: 2,
            age_medium_cutoff: 33,
            age_medium_count: 4,
            imbalance_share: 0.40,
            imbalance_count: 4,
            gap_min_roster: 6,
            usage_high_cutoff: 0.32,
            usage_high_count: 3,
            usage_medium_cutoff: 0.28,
            usage_medium_count: 4,
            ts_high_cutoff: 0.45,
            ts_high_count: 3,
            ts_medium_cutoff: 0.50,
            ts_medium_count: 5,
            concentration_count: 3,
        }
    }
}

/// Pick-suggestion thresholds. The per-signal point values live as named
/// constants next to the signal functions; these are the comparison cuts.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SuggestTuning {
    /// How deep into the available list candidates are scanned.
    pub scan_depth: usize,
    /// Maximum suggestions returned.
    pub max_suggestions: usize,
    /// Composite rating above which a player counts as elite for scarcity.
    pub elite_rating: f64,
    /// Non-punt z-sum cuts for the strong/good/decent punt-fit tiers.
    pub punt_fit_strong: f64,
    pub punt_fit_good: f64,
    pub punt_fit_decent: f64,
    /// Candidate z-score above which a weak category counts as addressed.
    pub need_z: f64,
    /// ADP-value cuts for excellent value, good value, and reaching.
    pub adp_excellent: f64,
    pub adp_good: f64,
    pub adp_reach: f64,
    /// Composite-rating cuts for the elite/high/solid tiers.
    pub tier_elite: f64,
    pub tier_high: f64,
    pub tier_solid: f64,
    /// Rating drop to the next candidate that counts as a tier cliff.
    pub tier_cliff: f64,
    /// Picks until the user's next turn above which urgency is flagged.
    pub long_wait: u32,
}

impl Default for SuggestTuning {
    fn default() -> Self {
        SuggestTuning {
            scan_depth: 10,
            max_suggestions: 5,
            elite_rating: 5.0,
            punt_fit_strong: 6.0,
            punt_fit_good: 4.0,
            punt_fit_decent: 2.0,
            need_z: 1.0,
            adp_excellent: 12.0,
            adp_good: 6.0,
            adp_reach: -6.0,
            tier_elite: 10.0,
            tier_high: 7.0,
            tier_solid: 4.0,
            tier_cliff: 2.0,
            long_wait: 20,
        }
    }
}

/// Team-projection scoring components.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GradeTuning {
    /// Baseline every team starts from.
    pub base: f64,
    /// Points per strong / average category (weak adds nothing).
    pub strong_points: f64,
    pub average_points: f64,
    /// Bonus for a detected punt strategy by confidence.
    pub punt_high_bonus: f64,
    pub punt_medium_bonus: f64,
    /// Balance bonus at >=7 / >=5 / >=3 strong categories.
    pub strong7_bonus: f64,
    pub strong5_bonus: f64,
    pub strong3_bonus: f64,
    /// Construction penalty by overall risk level.
    pub risk_high_penalty: f64,
    pub risk_medium_penalty: f64,
    pub risk_low_penalty: f64,
    /// Extra penalty at >=6 / >=4 weak categories.
    pub weak6_penalty: f64,
    pub weak4_penalty: f64,
}

impl Default for GradeTuning {
    fn default() -> Self {
        GradeTuning {
            base: 35.0,
            strong_points: 8.0,
            average_points: 3.0,
            punt_high_bonus: 6.0,
            punt_medium_bonus: 3.0,
            strong7_bonus: 10.0,
            strong5_bonus: 5.0,
            strong3_bonus: 2.0,
            risk_high_penalty: 30.0,
            risk_medium_penalty: 20.0,
            risk_low_penalty: 10.0,
            weak6_penalty: 15.0,
            weak4_penalty: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config() {
        let config = DraftConfig::new(10, 5, 13).unwrap();
        assert_eq!(config.num_teams, 10);
        assert_eq!(config.user_draft_slot, 5);
        assert_eq!(config.roster_size, 13);
    }

    #[test]
    fn rejects_single_team() {
        let err = DraftConfig::new(1, 1, 13).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation { field: "num_teams", .. }
        ));
    }

    #[test]
    fn rejects_out_of_range_slot() {
        assert!(DraftConfig::new(10, 0, 13).is_err());
        assert!(DraftConfig::new(10, 11, 13).is_err());
        assert!(DraftConfig::new(10, 10, 13).is_ok());
    }

    #[test]
    fn rejects_zero_roster() {
        let err = DraftConfig::new(10, 5, 0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation { field: "roster_size", .. }
        ));
    }

    #[test]
    fn tuning_defaults() {
        let tuning = Tuning::default();
        assert_eq!(tuning.punt.min_players, 3);
        assert_eq!(tuning.suggest.scan_depth, 10);
        assert!((tuning.standing.strong_percentile - 0.67).abs() < 1e-9);
        assert!((tuning.grade.base - 35.0).abs() < 1e-9);
    }

    #[test]
    fn tuning_partial_override() {
        let tuning = Tuning::from_toml_str(
            r#"
            [punt]
            min_players = 5

            [suggest]
            long_wait = 15
            "#,
        )
        .unwrap();
        assert_eq!(tuning.punt.min_players, 5);
        assert_eq!(tuning.suggest.long_wait, 15);
        // Untouched tables and keys keep their defaults.
        assert_eq!(tuning.punt.min_ranked_teams, 6);
        assert_eq!(tuning.risk.concentration_count, 3);
    }

    #[test]
    fn tuning_rejects_malformed_toml() {
        assert!(Tuning::from_toml_str("[punt\nmin_players = 5").is_err());
    }
}
