// Category standings: where a roster sits in each of the nine scoring
// categories, relative to the rest of the league when league context is
// available.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{StandingTuning, Tuning};
use crate::draft::state::TeamId;
use crate::player::{Category, PlayerId, PlayerPool};

// ---------------------------------------------------------------------------
// Standing types
// ---------------------------------------------------------------------------

/// Three-level classification of a team's standing in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    Strong,
    Average,
    Weak,
}

impl CategoryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryStatus::Strong => "strong",
            CategoryStatus::Average => "average",
            CategoryStatus::Weak => "weak",
        }
    }
}

/// A team's standing in a single category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStanding {
    pub category: Category,
    /// Sum of the roster's z-scores in this category.
    pub team_total: f64,
    /// Mean z-score per rostered player (0 for an empty roster).
    pub team_avg: f64,
    /// Rank among ranked teams (1 = best); `None` without league context.
    pub rank: Option<usize>,
    /// Number of teams that were ranked (1 without league context).
    pub total_teams: usize,
    pub status: CategoryStatus,
}

impl CategoryStanding {
    /// Ordinal rank label for display ("1st", "2nd", "11th").
    pub fn rank_label(&self) -> Option<String> {
        self.rank.map(ordinal)
    }
}

fn ordinal(rank: usize) -> String {
    let suffix = match rank % 100 {
        11..=13 => "th",
        _ => match rank % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{rank}{suffix}")
}

// ---------------------------------------------------------------------------
// League context
// ---------------------------------------------------------------------------

/// All teams' rosters plus the team the analysis is about. Supplying this
/// switches the analyzer from absolute thresholds to league-relative ranks.
#[derive(Debug, Clone, Copy)]
pub struct LeagueView<'a> {
    pub rosters: &'a BTreeMap<TeamId, Vec<PlayerId>>,
    pub team_id: TeamId,
}

/// Dense-rank every team with at least one resolvable player by its category
/// total, descending (all categories are higher-is-better, turnovers
/// included). Ties share a rank; equal totals keep team-id order from the
/// stable sort. Returns the rank map and the number of ranked teams.
pub(crate) fn rank_teams_for_category(
    pool: &PlayerPool,
    rosters: &BTreeMap<TeamId, Vec<PlayerId>>,
    category: Category,
) -> (BTreeMap<TeamId, usize>, usize) {
    let mut totals: Vec<(TeamId, f64)> = rosters
        .iter()
        .filter(|(_, roster)| !pool.resolve(roster).is_empty())
        .map(|(&team_id, roster)| (team_id, roster_total(pool, roster, category)))
        .collect();

    totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = BTreeMap::new();
    let mut rank = 0usize;
    let mut prev: Option<f64> = None;
    for &(team_id, total) in &totals {
        if prev.map_or(true, |p| total < p) {
            rank += 1;
            prev = Some(total);
        }
        ranks.insert(team_id, rank);
    }

    let ranked = totals.len();
    (ranks, ranked)
}

/// Sum of a roster's z-scores in one category, skipping unknown ids.
pub(crate) fn roster_total(
    pool: &PlayerPool,
    roster: &[PlayerId],
    category: Category,
) -> f64 {
    pool.resolve(roster).iter().map(|p| p.zscore(category)).sum()
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Computes a roster's standing in all nine categories.
pub struct CategoryAnalyzer<'a> {
    pool: &'a PlayerPool,
    tuning: StandingTuning,
}

impl<'a> CategoryAnalyzer<'a> {
    pub fn new(pool: &'a PlayerPool) -> Self {
        CategoryAnalyzer {
            pool,
            tuning: StandingTuning::default(),
        }
    }

    pub fn with_tuning(pool: &'a PlayerPool, tuning: &Tuning) -> Self {
        CategoryAnalyzer {
            pool,
            tuning: tuning.standing,
        }
    }

    /// Analyze a roster's standing in every category.
    ///
    /// With league context, teams with at least one player are dense-ranked
    /// by category total and the status comes from the rank percentile.
    /// Without it, absolute total thresholds apply. An empty roster yields
    /// neutral/average standings in every category, never an error.
    pub fn analyze(
        &self,
        roster: &[PlayerId],
        league: Option<LeagueView<'_>>,
    ) -> Vec<CategoryStanding> {
        let members = self.pool.resolve(roster);
        if members.is_empty() {
            return Category::ALL
                .iter()
                .map(|&category| CategoryStanding {
                    category,
                    team_total: 0.0,
                    team_avg: 0.0,
                    rank: None,
                    total_teams: 1,
                    status: CategoryStatus::Average,
                })
                .collect();
        }

        Category::ALL
            .iter()
            .map(|&category| {
                let team_total: f64 =
                    members.iter().map(|p| p.zscore(category)).sum();
                let team_avg = team_total / members.len() as f64;

                let (rank, total_teams) = match league {
                    Some(view) => {
                        let (ranks, ranked) = rank_teams_for_category(
                            self.pool,
                            view.rosters,
                            category,
                        );
                        (ranks.get(&view.team_id).copied(), ranked.max(1))
                    }
                    None => (None, 1),
                };

                let status = match rank {
                    Some(rank) if total_teams > 1 => {
                        self.status_relative(rank, total_teams)
                    }
                    _ if league.is_some() => CategoryStatus::Average,
                    _ => self.status_absolute(team_total),
                };

                CategoryStanding {
                    category,
                    team_total,
                    team_avg,
                    rank,
                    total_teams,
                    status,
                }
            })
            .collect()
    }

    /// Categories the roster is weak in: the analyzer's priority needs.
    pub fn priority_needs(
        &self,
        roster: &[PlayerId],
        league: Option<LeagueView<'_>>,
    ) -> Vec<Category> {
        self.analyze(roster, league)
            .into_iter()
            .filter(|s| s.status == CategoryStatus::Weak)
            .map(|s| s.category)
            .collect()
    }

    fn status_relative(&self, rank: usize, total_teams: usize) -> CategoryStatus {
        let percentile = (total_teams - rank + 1) as f64 / total_teams as f64;
        if percentile >= self.tuning.strong_percentile {
            CategoryStatus::Strong
        } else if percentile >= self.tuning.weak_percentile {
            CategoryStatus::Average
        } else {
            CategoryStatus::Weak
        }
    }

    fn status_absolute(&self, team_total: f64) -> CategoryStatus {
        if team_total >= self.tuning.absolute_strong {
            CategoryStatus::Strong
        } else if team_total >= self.tuning.absolute_average {
            CategoryStatus::Average
        } else {
            CategoryStatus::Weak
        }
    }
}
