// Post-draft analytics: per-team projections and letter grades, league-wide
// competitive balance, and strategic insights. Runs once over a completed
// draft state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::categories::{
    roster_total, CategoryAnalyzer, CategoryStanding, CategoryStatus, LeagueView,
};
use crate::analysis::punt::{PuntAnalysis, PuntConfidence, PuntStrategyDetector};
use crate::analysis::risk::{RiskLevel, RiskReport, RosterRiskAnalyzer};
use crate::config::{GradeTuning, Tuning};
use crate::draft::state::{DraftState, TeamId};
use crate::player::{Category, PlayerPool, PositionClass};

// ---------------------------------------------------------------------------
// Per-team results
// ---------------------------------------------------------------------------

/// Roster-level aggregates for one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStats {
    pub roster_size: usize,
    pub total_z_score: f64,
    pub avg_z_score: f64,
    /// Highest-rated player on the roster.
    pub top_player: Option<String>,
    pub is_user_team: bool,
}

/// A team's 0-100 projection with its component scores kept for
/// explainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProjection {
    pub final_score: f64,
    pub grade: String,
    pub outlook: String,
    pub category_score: f64,
    pub punt_bonus: f64,
    pub balance_bonus: f64,
    pub construction_penalty: f64,
    pub strong_categories: usize,
    pub weak_categories: usize,
}

/// Everything the recap computed for one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAnalysis {
    pub team_id: TeamId,
    pub team_stats: TeamStats,
    pub standings: Vec<CategoryStanding>,
    pub punt: PuntAnalysis,
    pub risk: RiskReport,
    pub projection: TeamProjection,
}

// ---------------------------------------------------------------------------
// League-wide results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueStats {
    /// Teams that drafted at least one player.
    pub teams: usize,
    pub total_picks: usize,
    pub rounds_completed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStanding {
    pub rank: usize,
    pub total_teams: usize,
    /// 0-100; higher is better.
    pub percentile: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueLeaders {
    pub best_team: TeamId,
    pub best_score: f64,
    pub worst_team: TeamId,
    pub worst_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryLeader {
    pub team_id: TeamId,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueAverages {
    pub total_z_score: f64,
    pub avg_z_score_per_player: f64,
    pub projection_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueInsights {
    pub user_standing: Option<UserStanding>,
    pub league_leaders: Option<LeagueLeaders>,
    pub category_leaders: BTreeMap<Category, CategoryLeader>,
    pub league_averages: LeagueAverages,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitiveBalance {
    /// `max(0, 100 - 2 * stdev)` over the projection scores.
    pub balance_score: f64,
    pub competitiveness: String,
    pub score_spread: f64,
    pub std_deviation: f64,
}

/// Trends only count when at least two teams support them; single-team
/// patterns are noise at league scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategicInsights {
    pub draft_trends: Vec<String>,
    pub strategic_observations: Vec<String>,
    pub user_recommendations: Vec<String>,
}

/// The complete post-draft recap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRecap {
    pub league_stats: LeagueStats,
    pub team_analyses: BTreeMap<TeamId, TeamAnalysis>,
    pub league_insights: LeagueInsights,
    pub competitive_balance: CompetitiveBalance,
    pub strategic_insights: StrategicInsights,
    pub user_team_id: TeamId,
}

// ---------------------------------------------------------------------------
// Analytics engine
// ---------------------------------------------------------------------------

pub struct DraftAnalytics<'a> {
    pool: &'a PlayerPool,
    tuning: Tuning,
}

impl<'a> DraftAnalytics<'a> {
    pub fn new(pool: &'a PlayerPool) -> Self {
        DraftAnalytics {
            pool,
            tuning: Tuning::default(),
        }
    }

    pub fn with_tuning(pool: &'a PlayerPool, tuning: Tuning) -> Self {
        DraftAnalytics { pool, tuning }
    }

    /// Build the full recap for a (typically completed) draft state.
    pub fn generate_recap(&self, state: &DraftState) -> DraftRecap {
        let analyzer = CategoryAnalyzer::with_tuning(self.pool, &self.tuning);
        let detector = PuntStrategyDetector::with_tuning(self.pool, &self.tuning);
        let risk_analyzer =
            RosterRiskAnalyzer::with_tuning(self.pool, &self.tuning);

        let mut team_analyses: BTreeMap<TeamId, TeamAnalysis> = BTreeMap::new();
        for (&team_id, roster) in &state.team_rosters {
            let members = self.pool.resolve(roster);
            if members.is_empty() {
                continue;
            }
            let view = LeagueView {
                rosters: &state.team_rosters,
                team_id,
            };
            let standings = analyzer.analyze(roster, Some(view));
            let punt = detector.detect(roster, Some(view));
            let risk = risk_analyzer.analyze(roster);
            let projection =
                project_team(&standings, &punt, &risk, &self.tuning.grade);
            debug!(
                team_id,
                score = projection.final_score,
                grade = %projection.grade,
                "projected team"
            );

            let total_z: f64 = members.iter().map(|p| p.total_z_score).sum();
            let top_player = members
                .iter()
                .copied()
                .reduce(|best, p| {
                    if p.total_z_score > best.total_z_score {
                        p
                    } else {
                        best
                    }
                })
                .map(|p| p.name.clone());
            let team_stats = TeamStats {
                roster_size: members.len(),
                total_z_score: total_z,
                avg_z_score: total_z / members.len() as f64,
                top_player,
                is_user_team: team_id == state.user_team_id(),
            };

            team_analyses.insert(
                team_id,
                TeamAnalysis {
                    team_id,
                    team_stats,
                    standings,
                    punt,
                    risk,
                    projection,
                },
            );
        }

        let league_stats = LeagueStats {
            teams: team_analyses.len(),
            total_picks: state.drafted_players.len(),
            rounds_completed: if state.num_teams > 0 {
                state.drafted_players.len() as u32 / state.num_teams
            } else {
                0
            },
        };

        let league_insights =
            self.league_insights(state, &team_analyses);
        let competitive_balance = competitive_balance(&team_analyses);
        let strategic_insights = self.strategic_insights(
            state,
            &team_analyses,
        );

        DraftRecap {
            league_stats,
            team_analyses,
            league_insights,
            competitive_balance,
            strategic_insights,
            user_team_id: state.user_team_id(),
        }
    }

    fn league_insights(
        &self,
        state: &DraftState,
        analyses: &BTreeMap<TeamId, TeamAnalysis>,
    ) -> LeagueInsights {
        let ranked = ranked_by_projection(analyses);
        let total_teams = ranked.len();

        let user_standing = ranked
            .iter()
            .position(|&(team_id, _)| team_id == state.user_team_id())
            .map(|idx| {
                let rank = idx + 1;
                UserStanding {
                    rank,
                    total_teams,
                    percentile: (total_teams - rank + 1) as f64
                        / total_teams as f64
                        * 100.0,
                }
            });

        let league_leaders = match (ranked.first(), ranked.last()) {
            (Some(&(best_team, best_score)), Some(&(worst_team, worst_score))) => {
                Some(LeagueLeaders {
                    best_team,
                    best_score,
                    worst_team,
                    worst_score,
                })
            }
            _ => None,
        };

        let mut category_leaders = BTreeMap::new();
        for category in Category::ALL {
            let leader = analyses
                .keys()
                .map(|&team_id| {
                    let total = roster_total(
                        self.pool,
                        &state.team_rosters[&team_id],
                        category,
                    );
                    (team_id, total)
                })
                .reduce(|best, entry| if entry.1 > best.1 { entry } else { best });
            if let Some((team_id, total)) = leader {
                category_leaders
                    .insert(category, CategoryLeader { team_id, total });
            }
        }

        let teams = analyses.len().max(1) as f64;
        let total_players: usize = analyses
            .values()
            .map(|a| a.team_stats.roster_size)
            .sum();
        let sum_z: f64 = analyses
            .values()
            .map(|a| a.team_stats.total_z_score)
            .sum();
        let league_averages = LeagueAverages {
            total_z_score: sum_z / teams,
            avg_z_score_per_player: if total_players > 0 {
                sum_z / total_players as f64
            } else {
                0.0
            },
            projection_score: analyses
                .values()
                .map(|a| a.projection.final_score)
                .sum::<f64>()
                / teams,
        };

        LeagueInsights {
            user_standing,
            league_leaders,
            category_leaders,
            league_averages,
        }
    }

    fn strategic_insights(
        &self,
        state: &DraftState,
        analyses: &BTreeMap<TeamId, TeamAnalysis>,
    ) -> StrategicInsights {
        let punts: Vec<(TeamId, &PuntAnalysis)> = analyses
            .values()
            .map(|a| (a.team_id, &a.punt))
            .collect();
        let draft_trends = punt_trends(&punts);

        let mut strategic_observations = Vec::new();
        let mut heavy_counts: BTreeMap<PositionClass, usize> = BTreeMap::new();
        for analysis in analyses.values() {
            let members =
                self.pool.resolve(&state.team_rosters[&analysis.team_id]);
            if members.is_empty() {
                continue;
            }
            for class in PositionClass::ALL {
                let count = members
                    .iter()
                    .filter(|p| p.primary_position().class() == class)
                    .count();
                if count as f64 / members.len() as f64 >= 0.4 {
                    *heavy_counts.entry(class).or_insert(0) += 1;
                }
            }
        }
        for (class, teams) in heavy_counts {
            if teams >= 2 {
                strategic_observations.push(format!(
                    "{teams} teams built {}-heavy rosters",
                    class.label()
                ));
            }
        }

        let user_recommendations = analyses
            .get(&state.user_team_id())
            .map(user_recommendations)
            .unwrap_or_default();

        StrategicInsights {
            draft_trends,
            strategic_observations,
            user_recommendations,
        }
    }
}

// ---------------------------------------------------------------------------
// Projection scoring
// ---------------------------------------------------------------------------

/// Score a team from its standings, punt analysis, and risk report.
fn project_team(
    standings: &[CategoryStanding],
    punt: &PuntAnalysis,
    risk: &RiskReport,
    t: &GradeTuning,
) -> TeamProjection {
    let strong = standings
        .iter()
        .filter(|s| s.status == CategoryStatus::Strong)
        .count();
    let weak = standings
        .iter()
        .filter(|s| s.status == CategoryStatus::Weak)
        .count();

    let category_score: f64 = standings
        .iter()
        .map(|s| match s.status {
            CategoryStatus::Strong => t.strong_points,
            CategoryStatus::Average => t.average_points,
            CategoryStatus::Weak => 0.0,
        })
        .sum();

    let punt_bonus = match punt.confidence {
        PuntConfidence::High => t.punt_high_bonus,
        PuntConfidence::Medium => t.punt_medium_bonus,
        _ => 0.0,
    };

    let balance_bonus = if strong >= 7 {
        t.strong7_bonus
    } else if strong >= 5 {
        t.strong5_bonus
    } else if strong >= 3 {
        t.strong3_bonus
    } else {
        0.0
    };

    let risk_penalty = match risk.risk_level {
        RiskLevel::High => t.risk_high_penalty,
        RiskLevel::Medium => t.risk_medium_penalty,
        RiskLevel::Low => t.risk_low_penalty,
        RiskLevel::None => 0.0,
    };
    let weakness_penalty = if weak >= 6 {
        t.weak6_penalty
    } else if weak >= 4 {
        t.weak4_penalty
    } else {
        0.0
    };
    let construction_penalty = risk_penalty + weakness_penalty;

    let final_score = (t.base + category_score + punt_bonus + balance_bonus
        - construction_penalty)
        .clamp(0.0, 100.0);

    TeamProjection {
        final_score,
        grade: letter_grade(final_score).to_string(),
        outlook: outlook(final_score).to_string(),
        category_score,
        punt_bonus,
        balance_bonus,
        construction_penalty,
        strong_categories: strong,
        weak_categories: weak,
    }
}

/// Letter grade in fixed 5-point bands from F (<35) to A+ (>=90).
fn letter_grade(score: f64) -> &'static str {
    if score >= 90.0 {
        "A+"
    } else if score >= 85.0 {
        "A"
    } else if score >= 80.0 {
        "A-"
    } else if score >= 75.0 {
        "B+"
    } else if score >= 70.0 {
        "B"
    } else if score >= 65.0 {
        "B-"
    } else if score >= 60.0 {
        "C+"
    } else if score >= 55.0 {
        "C"
    } else if score >= 50.0 {
        "C-"
    } else if score >= 45.0 {
        "D+"
    } else if score >= 40.0 {
        "D"
    } else if score >= 35.0 {
        "D-"
    } else {
        "F"
    }
}

/// Qualitative outlook label by score band.
fn outlook(score: f64) -> &'static str {
    if score >= 85.0 {
        "Championship Contender"
    } else if score >= 75.0 {
        "Playoff Contender"
    } else if score >= 65.0 {
        "Competitive"
    } else if score >= 55.0 {
        "Average"
    } else if score >= 40.0 {
        "Developing"
    } else {
        "Rebuilding"
    }
}

// ---------------------------------------------------------------------------
// League helpers
// ---------------------------------------------------------------------------

/// Teams sorted by projection score descending; ties keep team-id order.
fn ranked_by_projection(
    analyses: &BTreeMap<TeamId, TeamAnalysis>,
) -> Vec<(TeamId, f64)> {
    let mut ranked: Vec<(TeamId, f64)> = analyses
        .values()
        .map(|a| (a.team_id, a.projection.final_score))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

fn competitive_balance(
    analyses: &BTreeMap<TeamId, TeamAnalysis>,
) -> CompetitiveBalance {
    let scores: Vec<f64> = analyses
        .values()
        .map(|a| a.projection.final_score)
        .collect();
    let std_deviation = stdev(&scores);
    let balance_score = (100.0 - 2.0 * std_deviation).max(0.0);
    let score_spread = match (
        scores.iter().cloned().reduce(f64::max),
        scores.iter().cloned().reduce(f64::min),
    ) {
        (Some(max), Some(min)) => max - min,
        _ => 0.0,
    };
    CompetitiveBalance {
        balance_score,
        competitiveness: competitiveness_label(balance_score).to_string(),
        score_spread,
        std_deviation,
    }
}

/// Population standard deviation; 0.0 for an empty slice.
fn stdev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

fn competitiveness_label(balance_score: f64) -> &'static str {
    if balance_score >= 80.0 {
        "Very High"
    } else if balance_score >= 65.0 {
        "High"
    } else if balance_score >= 50.0 {
        "Moderate"
    } else if balance_score >= 35.0 {
        "Low"
    } else {
        "Very Low"
    }
}

/// Punt categories adopted by at least two teams, most popular first.
fn punt_trends(punts: &[(TeamId, &PuntAnalysis)]) -> Vec<String> {
    let mut by_category: BTreeMap<Category, usize> = BTreeMap::new();
    for (_, punt) in punts {
        for category in punt.punted_categories() {
            *by_category.entry(category).or_insert(0) += 1;
        }
    }
    let mut adopted: Vec<(Category, usize)> = by_category
        .into_iter()
        .filter(|&(_, teams)| teams >= 2)
        .collect();
    adopted.sort_by(|a, b| b.1.cmp(&a.1));
    adopted
        .into_iter()
        .map(|(category, teams)| {
            format!("{teams} teams are punting {}", category.short())
        })
        .collect()
}

/// Recommendations for the user's team, from its projection, risk report,
/// and punt analysis.
fn user_recommendations(analysis: &TeamAnalysis) -> Vec<String> {
    let mut recommendations = Vec::new();
    let score = analysis.projection.final_score;

    if score >= 85.0 {
        recommendations.push(
            "Championship-caliber roster - stay the course on the waiver wire"
                .to_string(),
        );
    } else if score >= 70.0 {
        recommendations.push(
            "Strong foundation - shore up your weakest categories early in the season"
                .to_string(),
        );
    } else if score >= 55.0 {
        recommendations.push(
            "Solid base - stream your weakest categories week to week"
                .to_string(),
        );
    } else {
        recommendations.push(
            "Rebuilding year - trade veterans for upside and play the long game"
                .to_string(),
        );
    }

    if matches!(
        analysis.risk.risk_level,
        RiskLevel::High | RiskLevel::Medium
    ) {
        if let Some(warning) = analysis.risk.warnings.first() {
            recommendations
                .push(format!("Address roster risk: {}", warning.recommendation));
        }
    }

    if analysis.punt.is_active() {
        let shorts: Vec<&str> = analysis
            .punt
            .punted_categories()
            .iter()
            .map(|c| c.short())
            .collect();
        recommendations.push(format!(
            "Commit to the {} punt when setting weekly lineups",
            shorts.join(", ")
        ));
    }

    recommendations
}
