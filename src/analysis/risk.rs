// Roster-construction risk: six independent checks over durability, age,
// position balance, usage, efficiency, and team concentration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{RiskTuning, Tuning};
use crate::player::{PlayerId, PlayerPool, PlayerRecord, Position, PositionClass};

// ---------------------------------------------------------------------------
// Warning types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    InjuryRisk,
    AgeRisk,
    PositionImbalance,
    PositionGap,
    UsageConflict,
    EfficiencyRisk,
    TeamConcentration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

/// Overall roster risk, rolled up from the individual warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    None,
}

/// A single roster-construction finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
    /// Names of the players behind the finding.
    pub players: Vec<String>,
}

/// All findings for one roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub risk_level: RiskLevel,
    pub warnings: Vec<Warning>,
    /// How many rostered players the checks actually saw.
    pub players_analyzed: usize,
    /// Set when the roster was too small to analyze.
    pub insufficient_data: bool,
}

impl RiskReport {
    fn insufficient(players_analyzed: usize) -> Self {
        RiskReport {
            risk_level: RiskLevel::None,
            warnings: Vec::new(),
            players_analyzed,
            insufficient_data: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Minimum roster size before any risk determination is made.
const MIN_PLAYERS: usize = 3;

pub struct RosterRiskAnalyzer<'a> {
    pool: &'a PlayerPool,
    tuning: RiskTuning,
}

impl<'a> RosterRiskAnalyzer<'a> {
    pub fn new(pool: &'a PlayerPool) -> Self {
        RosterRiskAnalyzer {
            pool,
            tuning: RiskTuning::default(),
        }
    }

    pub fn with_tuning(pool: &'a PlayerPool, tuning: &Tuning) -> Self {
        RosterRiskAnalyzer {
            pool,
            tuning: tuning.risk,
        }
    }

    /// Run all six checks over a roster. Rosters with fewer than three
    /// resolvable players return an insufficient-data report, not an error.
    pub fn analyze(&self, roster: &[PlayerId]) -> RiskReport {
        let members = self.pool.resolve(roster);
        if members.len() < MIN_PLAYERS {
            return RiskReport::insufficient(members.len());
        }

        let mut warnings = Vec::new();
        if let Some(w) = self.check_durability(&members) {
            warnings.push(w);
        }
        if let Some(w) = self.check_age(&members) {
            warnings.push(w);
        }
        if let Some(w) = self.check_position_balance(&members) {
            warnings.push(w);
        }
        if let Some(w) = self.check_position_gaps(&members) {
            warnings.push(w);
        }
        if let Some(w) = self.check_usage(&members) {
            warnings.push(w);
        }
        if let Some(w) = self.check_efficiency(&members) {
            warnings.push(w);
        }
        if let Some(w) = self.check_team_concentration(&members) {
            warnings.push(w);
        }

        let risk_level = overall_risk(&warnings);
        RiskReport {
            risk_level,
            warnings,
            players_analyzed: members.len(),
            insufficient_data: false,
        }
    }

    fn check_durability(&self, members: &[&PlayerRecord]) -> Option<Warning> {
        let t = &self.tuning;
        let fragile = names_where(members, |p| {
            p.games_played.is_some_and(|gp| gp < t.games_high_cutoff)
        });
        if fragile.len() >= t.games_high_count {
            return Some(Warning {
                kind: WarningKind::InjuryRisk,
                severity: Severity::High,
                message: format!(
                    "{} players appeared in fewer than {} games last season",
                    fragile.len(),
                    t.games_high_cutoff
                ),
                recommendation:
                    "Prioritize durable players with your remaining picks"
                        .to_string(),
                players: fragile,
            });
        }
        let shaky = names_where(members, |p| {
            p.games_played.is_some_and(|gp| gp < t.games_medium_cutoff)
        });
        if shaky.len() >= t.games_medium_count {
            return Some(Warning {
                kind: WarningKind::InjuryRisk,
                severity: Severity::Medium,
                message: format!(
                    "{} players missed significant time (under {} games)",
                    shaky.len(),
                    t.games_medium_cutoff
                ),
                recommendation:
                    "Add a dependable every-night player as insurance"
                        .to_string(),
                players: shaky,
            });
        }
        None
    }

    fn check_age(&self, members: &[&PlayerRecord]) -> Option<Warning> {
        let t = &self.tuning;
        let old = names_where(members, |p| {
            p.age.is_some_and(|a| a >= t.age_high_cutoff)
        });
        if old.len() >= t.age_high_count {
            return Some(Warning {
                kind: WarningKind::AgeRisk,
                severity: Severity::High,
                message: format!(
                    "{} players are {} or older",
                    old.len(),
                    t.age_high_cutoff
                ),
                recommendation: "Balance the veteran core with younger legs"
                    .to_string(),
                players: old,
            });
        }
        let aging = names_where(members, |p| {
            p.age.is_some_and(|a| a >= t.age_medium_cutoff)
        });
        if aging.len() >= t.age_medium_count {
            return Some(Warning {
                kind: WarningKind::AgeRisk,
                severity: Severity::Medium,
                message: format!(
                    "{} players are {} or older",
                    aging.len(),
                    t.age_medium_cutoff
                ),
                recommendation: "Target some younger upside late".to_string(),
                players: aging,
            });
        }
        None
    }

    fn check_position_balance(
        &self,
        members: &[&PlayerRecord],
    ) -> Option<Warning> {
        let t = &self.tuning;
        let mut by_position: BTreeMap<&'static str, Vec<String>> =
            BTreeMap::new();
        for player in members {
            by_position
                .entry(player.primary_position().display_str())
                .or_default()
                .push(player.name.clone());
        }

        // Flag the most overloaded position, if any crosses a threshold.
        let (label, names) = by_position
            .into_iter()
            .max_by_key(|(_, names)| names.len())?;
        let share = names.len() as f64 / members.len() as f64;
        if names.len() >= t.imbalance_count || share >= t.imbalance_share {
            return Some(Warning {
                kind: WarningKind::PositionImbalance,
                severity: Severity::Medium,
                message: format!(
                    "{} of {} roster spots are {}s",
                    names.len(),
                    members.len(),
                    label
                ),
                recommendation: "Diversify positions with upcoming picks"
                    .to_string(),
                players: names,
            });
        }
        None
    }

    fn check_position_gaps(&self, members: &[&PlayerRecord]) -> Option<Warning> {
        if members.len() < self.tuning.gap_min_roster {
            return None;
        }
        // Any position a hyphenated listing covers counts as coverage.
        let covered: std::collections::HashSet<PositionClass> = members
            .iter()
            .flat_map(|p| Position::all(&p.position))
            .map(|pos| pos.class())
            .collect();
        let missing: Vec<&'static str> = PositionClass::ALL
            .iter()
            .filter(|c| !covered.contains(c))
            .map(|c| c.label())
            .collect();
        if missing.is_empty() {
            return None;
        }
        Some(Warning {
            kind: WarningKind::PositionGap,
            severity: Severity::Medium,
            message: format!("No {} coverage on the roster", missing.join(" or ")),
            recommendation: format!(
                "Draft a {} before the pool thins out",
                missing.join(" or ")
            ),
            players: Vec::new(),
        })
    }

    fn check_usage(&self, members: &[&PlayerRecord]) -> Option<Warning> {
        let t = &self.tuning;
        let heavy = names_where(members, |p| {
            p.usage_rate.is_some_and(|u| u > t.usage_high_cutoff)
        });
        if heavy.len() >= t.usage_high_count {
            return Some(Warning {
                kind: WarningKind::UsageConflict,
                severity: Severity::High,
                message: format!(
                    "{} players demand over {:.0}% usage; not enough possessions to go around",
                    heavy.len(),
                    t.usage_high_cutoff * 100.0
                ),
                recommendation:
                    "Add low-usage specialists who produce without the ball"
                        .to_string(),
                players: heavy,
            });
        }
        let elevated = names_where(members, |p| {
            p.usage_rate.is_some_and(|u| u > t.usage_medium_cutoff)
        });
        if elevated.len() >= t.usage_medium_count {
            return Some(Warning {
                kind: WarningKind::UsageConflict,
                severity: Severity::Medium,
                message: format!(
                    "{} players carry above-average usage loads",
                    elevated.len()
                ),
                recommendation: "Watch for diminishing returns on ball-dominant adds"
                    .to_string(),
                players: elevated,
            });
        }
        None
    }

    fn check_efficiency(&self, members: &[&PlayerRecord]) -> Option<Warning> {
        let t = &self.tuning;
        let poor = names_where(members, |p| {
            p.true_shooting_pct.is_some_and(|ts| ts < t.ts_high_cutoff)
        });
        if poor.len() >= t.ts_high_count {
            return Some(Warning {
                kind: WarningKind::EfficiencyRisk,
                severity: Severity::High,
                message: format!(
                    "{} players shoot below {:.0}% true shooting",
                    poor.len(),
                    t.ts_high_cutoff * 100.0
                ),
                recommendation: "Your percentages need efficient scorers urgently"
                    .to_string(),
                players: poor,
            });
        }
        let below = names_where(members, |p| {
            p.true_shooting_pct.is_some_and(|ts| ts < t.ts_medium_cutoff)
        });
        if below.len() >= t.ts_medium_count {
            return Some(Warning {
                kind: WarningKind::EfficiencyRisk,
                severity: Severity::Medium,
                message: format!(
                    "{} players sit below {:.0}% true shooting",
                    below.len(),
                    t.ts_medium_cutoff * 100.0
                ),
                recommendation: "Mix in efficient finishers to protect FG%"
                    .to_string(),
                players: below,
            });
        }
        None
    }

    fn check_team_concentration(
        &self,
        members: &[&PlayerRecord],
    ) -> Option<Warning> {
        let mut by_team: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for player in members {
            by_team
                .entry(player.team.as_str())
                .or_default()
                .push(player.name.clone());
        }
        let mut offending: Vec<(&str, Vec<String>)> = by_team
            .into_iter()
            .filter(|(_, names)| names.len() >= self.tuning.concentration_count)
            .collect();
        if offending.is_empty() {
            return None;
        }
        offending.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        let teams: Vec<&str> = offending.iter().map(|(team, _)| *team).collect();
        let players: Vec<String> =
            offending.into_iter().flat_map(|(_, names)| names).collect();
        Some(Warning {
            kind: WarningKind::TeamConcentration,
            severity: Severity::Medium,
            message: format!(
                "{} roster players share one NBA team ({})",
                players.len(),
                teams.join(", ")
            ),
            recommendation:
                "One bad schedule week or injury wave hits several roster spots at once"
                    .to_string(),
            players,
        })
    }
}

fn names_where(
    members: &[&PlayerRecord],
    predicate: impl Fn(&PlayerRecord) -> bool,
) -> Vec<String> {
    members
        .iter()
        .filter(|p| predicate(p))
        .map(|p| p.name.clone())
        .collect()
}

fn overall_risk(warnings: &[Warning]) -> RiskLevel {
    let high = warnings
        .iter()
        .filter(|w| w.severity == Severity::High)
        .count();
    let medium = warnings
        .iter()
        .filter(|w| w.severity == Severity::Medium)
        .count();
    if high >= 2 {
        RiskLevel::High
    } else if high >= 1 || medium >= 3 {
        RiskLevel::Medium
    } else if !warnings.is_empty() {
        RiskLevel::Low
    } else {
        RiskLevel::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PlayerSpec {
        position: &'static str,
        team: &'static str,
        age: Option<u32>,
        games: Option<u32>,
        usage: Option<f64>,
        ts: Option<f64>,
    }

    impl Default for PlayerSpec {
        fn default() -> Self {
            PlayerSpec {
                position: "SF",
                team: "BOS",
                age: Some(26),
                games: Some(72),
                usage: Some(0.22),
                ts: Some(0.57),
            }
        }
    }

    fn build_pool(specs: Vec<PlayerSpec>) -> (PlayerPool, Vec<PlayerId>) {
        let players: Vec<PlayerRecord> = specs
            .iter()
            .enumerate()
            .map(|(idx, spec)| PlayerRecord {
                player_id: idx as PlayerId + 1,
                name: format!("Player {}", idx + 1),
                team: spec.team.to_string(),
                position: spec.position.to_string(),
                total_z_score: 2.0,
                z_points: 0.2,
                z_rebounds: 0.2,
                z_assists: 0.2,
                z_steals: 0.2,
                z_blocks: 0.2,
                z_turnovers: 0.2,
                z_fg_pct: 0.2,
                z_ft_pct: 0.2,
                z_three_pm: 0.4,
                adp: None,
                age: spec.age,
                games_played: spec.games,
                usage_rate: spec.usage,
                true_shooting_pct: spec.ts,
                player_efficiency_rating: None,
            })
            .collect();
        let ids: Vec<PlayerId> = players.iter().map(|p| p.player_id).collect();
        (PlayerPool::new(players), ids)
    }

    /// A balanced five-man roster that trips no checks.
    fn clean_specs() -> Vec<PlayerSpec> {
        ["PG", "SG", "SF", "PF", "C"]
            .iter()
            .enumerate()
            .map(|(i, pos)| PlayerSpec {
                position: pos,
                team: ["BOS", "DEN", "MIL", "PHX", "OKC"][i],
                ..PlayerSpec::default()
            })
            .collect()
    }

    #[test]
    fn small_roster_is_insufficient_data() {
        let (pool, ids) = build_pool(clean_specs());
        let analyzer = RosterRiskAnalyzer::new(&pool);
        let report = analyzer.analyze(&ids[..2]);
        assert!(report.insufficient_data);
        assert_eq!(report.risk_level, RiskLevel::None);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn clean_roster_has_no_warnings() {
        let (pool, ids) = build_pool(clean_specs());
        let analyzer = RosterRiskAnalyzer::new(&pool);
        let report = analyzer.analyze(&ids);
        assert_eq!(report.risk_level, RiskLevel::None);
        assert!(report.warnings.is_empty());
        assert!(!report.insufficient_data);
        assert_eq!(report.players_analyzed, 5);
    }

    #[test]
    fn durability_high_at_two_fragile_players() {
        let mut specs = clean_specs();
        specs[0].games = Some(25);
        specs[1].games = Some(18);
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        let warning = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::InjuryRisk)
            .expect("injury warning");
        assert_eq!(warning.severity, Severity::High);
        assert_eq!(warning.players.len(), 2);
        assert_eq!(report.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn durability_medium_at_three_shaky_players() {
        let mut specs = clean_specs();
        specs[0].games = Some(45);
        specs[1].games = Some(40);
        specs[2].games = Some(48);
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        let warning = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::InjuryRisk)
            .expect("injury warning");
        assert_eq!(warning.severity, Severity::Medium);
        assert_eq!(warning.players.len(), 3);
    }

    #[test]
    fn age_thresholds() {
        let mut specs = clean_specs();
        specs[0].age = Some(36);
        specs[1].age = Some(35);
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        let warning = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::AgeRisk)
            .expect("age warning");
        assert_eq!(warning.severity, Severity::High);

        let mut specs = clean_specs();
        for spec in specs.iter_mut().take(4) {
            spec.age = Some(33);
        }
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        let warning = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::AgeRisk)
            .expect("age warning");
        assert_eq!(warning.severity, Severity::Medium);
    }

    #[test]
    fn position_imbalance_by_count() {
        let mut specs = clean_specs();
        for spec in specs.iter_mut().take(4) {
            spec.position = "PG";
        }
        // 4 guards of 5 players: over both the count and share thresholds.
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        let warning = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::PositionImbalance)
            .expect("imbalance warning");
        assert_eq!(warning.severity, Severity::Medium);
        assert_eq!(warning.players.len(), 4);
    }

    #[test]
    fn position_gap_needs_six_players() {
        // Five guards/forwards: imbalance perhaps, but no gap check yet.
        let specs: Vec<PlayerSpec> = (0..5)
            .map(|_| PlayerSpec {
                position: "PG",
                ..PlayerSpec::default()
            })
            .collect();
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        assert!(report
            .warnings
            .iter()
            .all(|w| w.kind != WarningKind::PositionGap));

        // Six players with no center coverage trips the gap.
        let specs: Vec<PlayerSpec> = ["PG", "SG", "SF", "PF", "PG", "SF"]
            .iter()
            .map(|pos| PlayerSpec {
                position: pos,
                ..PlayerSpec::default()
            })
            .collect();
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        let warning = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::PositionGap)
            .expect("gap warning");
        assert!(warning.message.contains("center"));
    }

    #[test]
    fn hyphenated_positions_count_as_coverage() {
        let specs: Vec<PlayerSpec> = ["PG", "SG", "SF", "PF", "SG", "Forward-Center"]
            .iter()
            .map(|pos| PlayerSpec {
                position: pos,
                ..PlayerSpec::default()
            })
            .collect();
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        assert!(report
            .warnings
            .iter()
            .all(|w| w.kind != WarningKind::PositionGap));
    }

    #[test]
    fn usage_conflict_thresholds() {
        let mut specs = clean_specs();
        for spec in specs.iter_mut().take(3) {
            spec.usage = Some(0.34);
        }
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        let warning = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::UsageConflict)
            .expect("usage warning");
        assert_eq!(warning.severity, Severity::High);
    }

    #[test]
    fn efficiency_thresholds() {
        let mut specs = clean_specs();
        for spec in specs.iter_mut().take(3) {
            spec.ts = Some(0.43);
        }
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        let warning = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::EfficiencyRisk)
            .expect("efficiency warning");
        assert_eq!(warning.severity, Severity::High);
    }

    #[test]
    fn team_concentration() {
        let mut specs = clean_specs();
        specs[0].team = "DEN";
        specs[1].team = "DEN";
        specs[2].team = "DEN";
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        let warning = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::TeamConcentration)
            .expect("concentration warning");
        assert_eq!(warning.severity, Severity::Medium);
        assert!(warning.message.contains("DEN"));
        assert_eq!(warning.players.len(), 3);
    }

    #[test]
    fn overall_risk_rollup() {
        // Two high-severity findings push the roster to high risk.
        let mut specs = clean_specs();
        specs[0].games = Some(20);
        specs[1].games = Some(22);
        for spec in specs.iter_mut().take(3) {
            spec.usage = Some(0.35);
        }
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        let highs = report
            .warnings
            .iter()
            .filter(|w| w.severity == Severity::High)
            .count();
        assert!(highs >= 2);
        assert_eq!(report.risk_level, RiskLevel::High);
    }

    #[test]
    fn single_medium_warning_is_low_risk() {
        let mut specs = clean_specs();
        specs[0].team = "DEN";
        specs[1].team = "DEN";
        specs[2].team = "DEN";
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn missing_attributes_are_skipped_not_flagged() {
        let specs: Vec<PlayerSpec> = (0..5)
            .map(|i| PlayerSpec {
                position: ["PG", "SG", "SF", "PF", "C"][i],
                team: ["BOS", "DEN", "MIL", "PHX", "OKC"][i],
                age: None,
                games: None,
                usage: None,
                ts: None,
            })
            .collect();
        let (pool, ids) = build_pool(specs);
        let report = RosterRiskAnalyzer::new(&pool).analyze(&ids);
        assert_eq!(report.risk_level, RiskLevel::None);
    }
}
