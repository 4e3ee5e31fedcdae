// Punt-strategy detection: separates categories a team is deliberately
// conceding from incidental weaknesses.
//
// Small rosters make this noisy, so every rule is conservative: without
// strong evidence the detector returns "none" rather than guessing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::categories::{
    rank_teams_for_category, roster_total, LeagueView,
};
use crate::config::{PuntTuning, Tuning};
use crate::player::{Category, PlayerId, PlayerPool, PlayerRecord};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Confidence tier of a punt determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuntConfidence {
    High,
    Medium,
    Low,
    None,
}

impl PuntConfidence {
    pub fn label(&self) -> &'static str {
        match self {
            PuntConfidence::High => "high",
            PuntConfidence::Medium => "medium",
            PuntConfidence::Low => "low",
            PuntConfidence::None => "none",
        }
    }
}

/// A single category flagged as a likely punt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuntCandidate {
    pub category: Category,
    /// Per-category confidence; the detection rules only produce high or
    /// medium here.
    pub confidence: PuntConfidence,
    /// Human-readable evidence backing the determination.
    pub reason: String,
    pub team_total: f64,
    pub rank: Option<usize>,
}

/// The full punt analysis for one roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuntAnalysis {
    /// Aggregate confidence across all candidate categories.
    pub confidence: PuntConfidence,
    pub candidates: Vec<PuntCandidate>,
    /// One-line summary for display.
    pub message: String,
    /// Static strategy tips for the recommended punt categories.
    pub recommendations: Vec<String>,
}

impl PuntAnalysis {
    fn none(message: &str) -> Self {
        PuntAnalysis {
            confidence: PuntConfidence::None,
            candidates: Vec::new(),
            message: message.to_string(),
            recommendations: Vec::new(),
        }
    }

    /// Whether a punt strategy is confirmed enough to steer pick
    /// suggestions (aggregate confidence high or medium).
    pub fn is_active(&self) -> bool {
        matches!(
            self.confidence,
            PuntConfidence::High | PuntConfidence::Medium
        )
    }

    /// The categories being punted, when the strategy is active.
    pub fn punted_categories(&self) -> Vec<Category> {
        if !self.is_active() {
            return Vec::new();
        }
        self.candidates.iter().map(|c| c.category).collect()
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// Classifies structural category weaknesses as deliberate punts.
pub struct PuntStrategyDetector<'a> {
    pool: &'a PlayerPool,
    tuning: PuntTuning,
}

impl<'a> PuntStrategyDetector<'a> {
    pub fn new(pool: &'a PlayerPool) -> Self {
        PuntStrategyDetector {
            pool,
            tuning: PuntTuning::default(),
        }
    }

    pub fn with_tuning(pool: &'a PlayerPool, tuning: &Tuning) -> Self {
        PuntStrategyDetector {
            pool,
            tuning: tuning.punt,
        }
    }

    /// Detect punt candidates for a roster.
    ///
    /// Per category the rules fire in priority order, first match wins:
    /// 1. With >= `min_ranked_teams` ranked teams: high confidence in the
    ///    bottom quintile with a negative total; medium in last place with a
    ///    total below `last_place_total`.
    /// 2. Without that context: medium when the total is below
    ///    `isolated_total`.
    /// 3. FG%/FT% with enough rostered players: medium when at least
    ///    `pct_player_share` of them sit below `pct_player_z`.
    pub fn detect(
        &self,
        roster: &[PlayerId],
        league: Option<LeagueView<'_>>,
    ) -> PuntAnalysis {
        let members = self.pool.resolve(roster);
        if members.len() < self.tuning.min_players {
            return PuntAnalysis::none(
                "Too few players drafted for punt detection",
            );
        }

        let mut candidates = Vec::new();
        for &category in &Category::ALL {
            let team_total: f64 =
                members.iter().map(|p| p.zscore(category)).sum();

            let ranking = league.map(|view| {
                let (ranks, ranked) =
                    rank_teams_for_category(self.pool, view.rosters, category);
                (ranks.get(&view.team_id).copied(), ranked)
            });

            let candidate = self.classify_category(
                category,
                team_total,
                &members,
                ranking,
            );
            if let Some(candidate) = candidate {
                debug!(
                    category = candidate.category.short(),
                    confidence = candidate.confidence.label(),
                    total = candidate.team_total,
                    "punt candidate"
                );
                candidates.push(candidate);
            }
        }

        let highs = candidates
            .iter()
            .filter(|c| c.confidence == PuntConfidence::High)
            .count();
        let confidence = if highs >= 2 {
            PuntConfidence::High
        } else if highs >= 1 {
            PuntConfidence::Medium
        } else if !candidates.is_empty() {
            PuntConfidence::Low
        } else {
            PuntConfidence::None
        };

        let recommendations = build_recommendations(&candidates);
        let message = build_message(confidence, &candidates);

        PuntAnalysis {
            confidence,
            candidates,
            message,
            recommendations,
        }
    }

    fn classify_category(
        &self,
        category: Category,
        team_total: f64,
        members: &[&PlayerRecord],
        ranking: Option<(Option<usize>, usize)>,
    ) -> Option<PuntCandidate> {
        let t = &self.tuning;

        // Rule 1: league-relative evidence, only with enough ranked teams.
        if let Some((Some(rank), ranked)) = ranking {
            if ranked >= t.min_ranked_teams {
                let bottom_quintile =
                    rank as f64 >= t.bottom_quintile * ranked as f64;
                if bottom_quintile && team_total < 0.0 {
                    return Some(PuntCandidate {
                        category,
                        confidence: PuntConfidence::High,
                        reason: format!(
                            "Ranked {rank} of {ranked} with a {team_total:.1} total"
                        ),
                        team_total,
                        rank: Some(rank),
                    });
                }
                if rank == ranked && team_total < t.last_place_total {
                    return Some(PuntCandidate {
                        category,
                        confidence: PuntConfidence::Medium,
                        reason: format!(
                            "Last of {ranked} teams with a {team_total:.1} total"
                        ),
                        team_total,
                        rank: Some(rank),
                    });
                }
                // Ranked leagues settle it either way; fall through only to
                // the percentage-profile rule.
                return self.classify_percentage_profile(
                    category, team_total, members, Some(rank),
                );
            }
        }

        // Rule 2: no usable league context, judge the total in isolation.
        if team_total < t.isolated_total {
            return Some(PuntCandidate {
                category,
                confidence: PuntConfidence::Medium,
                reason: format!("Team total {team_total:.1} is far below par"),
                team_total,
                rank: None,
            });
        }

        self.classify_percentage_profile(category, team_total, members, None)
    }

    /// Rule 3: a roster built almost entirely from players who are weak in a
    /// percentage category is punting it even if totals look survivable.
    fn classify_percentage_profile(
        &self,
        category: Category,
        team_total: f64,
        members: &[&PlayerRecord],
        rank: Option<usize>,
    ) -> Option<PuntCandidate> {
        let t = &self.tuning;
        if !category.is_percentage() || members.len() < t.pct_min_players {
            return None;
        }
        let weak = members
            .iter()
            .filter(|p| p.zscore(category) < t.pct_player_z)
            .count();
        if (weak as f64) < t.pct_player_share * members.len() as f64 {
            return None;
        }
        Some(PuntCandidate {
            category,
            confidence: PuntConfidence::Medium,
            reason: format!(
                "{weak} of {} rostered players are weak in {}",
                members.len(),
                category.short()
            ),
            team_total,
            rank,
        })
    }
}

// ---------------------------------------------------------------------------
// Messages and recommendations
// ---------------------------------------------------------------------------

fn build_message(
    confidence: PuntConfidence,
    candidates: &[PuntCandidate],
) -> String {
    if candidates.is_empty() {
        return "No punt strategy detected".to_string();
    }
    let shorts: Vec<&str> =
        candidates.iter().map(|c| c.category.short()).collect();
    match confidence {
        PuntConfidence::Low => {
            format!("Possible punt leaning: {}", shorts.join(", "))
        }
        _ => format!(
            "Punt strategy detected: {} ({} confidence)",
            shorts.join(", "),
            confidence.label()
        ),
    }
}

/// Tips for the top two high-confidence categories, or for the single best
/// medium candidate when no category reaches high confidence.
fn build_recommendations(candidates: &[PuntCandidate]) -> Vec<String> {
    let mut highs: Vec<&PuntCandidate> = candidates
        .iter()
        .filter(|c| c.confidence == PuntConfidence::High)
        .collect();
    highs.sort_by(|a, b| {
        a.team_total
            .partial_cmp(&b.team_total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let recommended: Vec<&PuntCandidate> = if !highs.is_empty() {
        highs.into_iter().take(2).collect()
    } else {
        candidates
            .iter()
            .filter(|c| c.confidence == PuntConfidence::Medium)
            .min_by(|a, b| {
                a.team_total
                    .partial_cmp(&b.team_total)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .into_iter()
            .collect()
    };

    recommended
        .iter()
        .flat_map(|c| category_tips(c.category).iter().map(|t| t.to_string()))
        .collect()
}

/// Static strategy tips per punted category.
fn category_tips(category: Category) -> &'static [&'static str] {
    match category {
        Category::FreeThrowPct => &[
            "Target high-volume bigs who dominate FG%, rebounds, and blocks",
            "Stop paying for elite free-throw shooters whose value lives at the line",
            "Stack the other eight categories with interior scorers",
        ],
        Category::FieldGoalPct => &[
            "Lean into high-volume guards and three-point specialists",
            "Chase points, threes, and assists without efficiency guilt",
        ],
        Category::Turnovers => &[
            "High-usage playmakers are no longer a liability; draft them freely",
            "Prioritize assists and steals from ball-dominant guards",
        ],
        Category::Points => &[
            "Build around defensive stats and efficiency instead of volume scoring",
            "Glue guys with steals, blocks, and low usage gain value",
        ],
        Category::Rebounds => &[
            "Skip traditional bigs and load up on perimeter production",
            "Guards with assists, steals, and threes carry this build",
        ],
        Category::Assists => &[
            "Deprioritize pure point guards; wings and bigs carry the build",
            "Look for scoring and defensive stats over playmaking",
        ],
        Category::Steals => &[
            "Favor scoring bigs over perimeter defenders",
            "Rebounds and blocks become your defensive backbone",
        ],
        Category::Blocks => &[
            "Skip shot-blocking centers and build a guard-heavy core",
            "Steals become your only defensive category; weight them up",
        ],
        Category::ThreePointersMade => &[
            "Interior scorers and slashers gain value over spot-up shooters",
            "Pair the build with FG% strength from close-range volume",
        ],
    }
}
