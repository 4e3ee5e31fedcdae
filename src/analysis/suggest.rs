// Pick suggestions: scores the top available candidates with independent
// additive signals and returns a ranked, explained shortlist.
//
// Each signal is a pure function (candidate, context) -> points + optional
// reason, so every contribution is auditable and testable on its own.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::categories::{CategoryAnalyzer, LeagueView};
use crate::analysis::punt::PuntStrategyDetector;
use crate::config::{SuggestTuning, Tuning};
use crate::player::{Category, PlayerId, PlayerPool, PlayerRecord, Position};

// ---------------------------------------------------------------------------
// Signal point values
// ---------------------------------------------------------------------------

const PUNT_FIT_STRONG_PTS: i32 = 15;
const PUNT_FIT_GOOD_PTS: i32 = 10;
const PUNT_FIT_DECENT_PTS: i32 = 5;
const SCARCITY_TIGHT_PTS: i32 = 15;
const SCARCITY_LIMITED_PTS: i32 = 10;
const CATEGORY_NEED_PTS: i32 = 20;
const ADP_EXCELLENT_PTS: i32 = 20;
const ADP_GOOD_PTS: i32 = 10;
const ADP_REACH_PTS: i32 = -5;
const POSITION_EMPTY_PTS: i32 = 12;
const POSITION_DEPTH_PTS: i32 = 8;
const TIER_ELITE_PTS: i32 = 15;
const TIER_HIGH_PTS: i32 = 10;
const TIER_SOLID_PTS: i32 = 5;
const TIER_CLIFF_PTS: i32 = 8;
const EARLY_ROUND_PTS: i32 = 10;
const MID_ROUND_PTS: i32 = 8;
const LATE_ROUND_PTS: i32 = 5;
const LONG_WAIT_PTS: i32 = 5;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A ranked pick recommendation with its reasoning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub player_id: PlayerId,
    pub player_name: String,
    pub position: String,
    pub total_z_score: f64,
    pub adp: Option<f64>,
    pub priority_score: i32,
    pub main_reason: String,
    pub additional_reasons: Vec<String>,
}

/// Draft context for a suggestion request.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionContext<'a> {
    pub user_roster: &'a [PlayerId],
    pub current_round: u32,
    pub draft_slot: u32,
    pub num_teams: u32,
    /// All teams' rosters, for league-relative weakness and punt analysis.
    pub league: Option<LeagueView<'a>>,
}

/// The outcome of one signal: points gained plus the reasons that fired.
#[derive(Debug, Clone, Default)]
struct SignalResult {
    points: i32,
    reasons: Vec<String>,
}

impl SignalResult {
    fn none() -> Self {
        SignalResult::default()
    }

    fn hit(points: i32, reason: String) -> Self {
        SignalResult {
            points,
            reasons: vec![reason],
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct PickSuggestionEngine<'a> {
    pool: &'a PlayerPool,
    tuning: Tuning,
}

impl<'a> PickSuggestionEngine<'a> {
    pub fn new(pool: &'a PlayerPool) -> Self {
        PickSuggestionEngine {
            pool,
            tuning: Tuning::default(),
        }
    }

    pub fn with_tuning(pool: &'a PlayerPool, tuning: Tuning) -> Self {
        PickSuggestionEngine { pool, tuning }
    }

    /// Generate up to `max_suggestions` ranked suggestions from the
    /// available players. Deterministic: identical inputs produce an
    /// identical ordered list.
    pub fn get_suggestions(
        &self,
        available: &[&PlayerRecord],
        ctx: &SuggestionContext<'_>,
    ) -> Vec<Suggestion> {
        let t = &self.tuning.suggest;
        if available.is_empty() {
            return Vec::new();
        }

        let analyzer = CategoryAnalyzer::with_tuning(self.pool, &self.tuning);
        let detector = PuntStrategyDetector::with_tuning(self.pool, &self.tuning);

        let weak = analyzer.priority_needs(ctx.user_roster, ctx.league);
        let punt = detector.detect(ctx.user_roster, ctx.league);
        let punted = punt.punted_categories();
        let needs: Vec<Category> = weak
            .into_iter()
            .filter(|cat| !punted.contains(cat))
            .collect();

        let user_position_counts = position_counts(self.pool, ctx.user_roster);
        let current_pick =
            (ctx.current_round - 1) * ctx.num_teams + ctx.draft_slot;
        let wait = picks_until_next_user_turn(
            ctx.current_round,
            ctx.draft_slot,
            ctx.num_teams,
        );

        // Only the deepest candidates by composite rating are ever surfaced.
        let mut candidates: Vec<&PlayerRecord> = available.to_vec();
        candidates.sort_by(|a, b| {
            b.total_z_score
                .partial_cmp(&a.total_z_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(t.scan_depth);

        let mut suggestions = Vec::new();
        for (idx, player) in candidates.iter().enumerate() {
            let next_rating = candidates
                .get(idx + 1)
                .map(|p| p.total_z_score)
                .unwrap_or(0.0);

            let mut points = 0i32;
            let mut reasons: Vec<String> = Vec::new();
            let signals = [
                punt_fit(player, &punted, t),
                position_scarcity(player, available, t),
                category_need(player, &needs, t),
                adp_value(player, current_pick, t),
                position_need(player, &user_position_counts),
                advanced_stats(player),
                tier(player, next_rating, t),
                round_stage(player, ctx.current_round, t),
                pick_distance(wait, t),
            ];
            for signal in signals {
                points += signal.points;
                reasons.extend(signal.reasons);
            }

            // A candidate with nothing to say for itself is not a suggestion.
            if reasons.is_empty() {
                continue;
            }
            debug!(
                player = %player.name,
                points,
                reasons = reasons.len(),
                "scored candidate"
            );

            let main_reason = reasons[0].clone();
            let additional_reasons: Vec<String> =
                reasons.into_iter().skip(1).take(2).collect();
            suggestions.push(Suggestion {
                player_id: player.player_id,
                player_name: player.name.clone(),
                position: player.position.clone(),
                total_z_score: player.total_z_score,
                adp: player.adp,
                priority_score: points,
                main_reason,
                additional_reasons,
            });
        }

        // Stable sort keeps composite-rating order among tied scores.
        suggestions.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
        suggestions.truncate(t.max_suggestions);
        suggestions
    }
}

// ---------------------------------------------------------------------------
// Context helpers
// ---------------------------------------------------------------------------

/// Count every position a rostered player is listed at (hyphenated listings
/// count at each position).
fn position_counts(
    pool: &PlayerPool,
    roster: &[PlayerId],
) -> HashMap<Position, usize> {
    let mut counts = HashMap::new();
    for player in pool.resolve(roster) {
        for position in Position::all(&player.position) {
            *counts.entry(position).or_insert(0) += 1;
        }
    }
    counts
}

/// Exact serpentine gap from the user's current pick to their next one.
fn picks_until_next_user_turn(round: u32, slot: u32, num_teams: u32) -> u32 {
    if round % 2 == 1 {
        2 * (num_teams - slot) + 1
    } else {
        2 * slot - 1
    }
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Punt fit: how much the candidate contributes outside the punted
/// categories.
fn punt_fit(
    player: &PlayerRecord,
    punted: &[Category],
    t: &SuggestTuning,
) -> SignalResult {
    if punted.is_empty() {
        return SignalResult::none();
    }
    let strength: f64 = Category::ALL
        .iter()
        .filter(|cat| !punted.contains(cat))
        .map(|&cat| player.zscore(cat).max(0.0))
        .sum();

    let points = if strength >= t.punt_fit_strong {
        PUNT_FIT_STRONG_PTS
    } else if strength >= t.punt_fit_good {
        PUNT_FIT_GOOD_PTS
    } else if strength >= t.punt_fit_decent {
        PUNT_FIT_DECENT_PTS
    } else {
        return SignalResult::none();
    };
    let shorts: Vec<&str> = punted.iter().map(|c| c.short()).collect();
    SignalResult::hit(
        points,
        format!("Strong in non-punt categories (punting {})", shorts.join(", ")),
    )
}

/// Position scarcity: how many elite players remain at the candidate's
/// primary position.
fn position_scarcity(
    player: &PlayerRecord,
    available: &[&PlayerRecord],
    t: &SuggestTuning,
) -> SignalResult {
    let position = player.primary_position();
    let elite_left = available
        .iter()
        .filter(|p| {
            p.primary_position() == position && p.total_z_score > t.elite_rating
        })
        .count();
    if elite_left <= 3 {
        SignalResult::hit(
            SCARCITY_TIGHT_PTS,
            format!("Only {elite_left} elite {position}s left"),
        )
    } else if elite_left <= 5 {
        SignalResult::hit(
            SCARCITY_LIMITED_PTS,
            format!("Limited elite {position} options remaining"),
        )
    } else {
        SignalResult::none()
    }
}

/// Category need: the candidate addresses weak, non-punted categories.
fn category_need(
    player: &PlayerRecord,
    needs: &[Category],
    t: &SuggestTuning,
) -> SignalResult {
    let addressed: Vec<&str> = needs
        .iter()
        .filter(|&&cat| player.zscore(cat) > t.need_z)
        .map(|cat| cat.short())
        .collect();
    if addressed.is_empty() {
        return SignalResult::none();
    }
    SignalResult {
        points: CATEGORY_NEED_PTS * addressed.len() as i32,
        reasons: vec![format!(
            "Addresses team weaknesses: {}",
            addressed.join(", ")
        )],
    }
}

/// ADP value: how far past their typical draft position the player has
/// fallen. Skipped when no ADP is on record.
fn adp_value(
    player: &PlayerRecord,
    current_pick: u32,
    t: &SuggestTuning,
) -> SignalResult {
    let Some(adp) = player.adp else {
        return SignalResult::none();
    };
    let value = adp - current_pick as f64;
    if value > t.adp_excellent {
        SignalResult::hit(
            ADP_EXCELLENT_PTS,
            format!(
                "Excellent value - typically drafted {:.0} picks later",
                value
            ),
        )
    } else if value > t.adp_good {
        SignalResult::hit(
            ADP_GOOD_PTS,
            format!("Good value - ADP suggests pick {adp:.0}"),
        )
    } else if value < t.adp_reach {
        SignalResult::hit(
            ADP_REACH_PTS,
            format!("Reaching early - ADP is pick {adp:.0}"),
        )
    } else {
        SignalResult::none()
    }
}

/// Position need: empty slots at the candidate's primary position, plus
/// depth at the foundational positions (C, PG).
fn position_need(
    player: &PlayerRecord,
    roster_counts: &HashMap<Position, usize>,
) -> SignalResult {
    let position = player.primary_position();
    let count = roster_counts.get(&position).copied().unwrap_or(0);
    if count == 0 {
        SignalResult::hit(POSITION_EMPTY_PTS, format!("Fills {position} need"))
    } else if count == 1 && position.is_foundational() {
        SignalResult::hit(POSITION_DEPTH_PTS, format!("Adds {position} depth"))
    } else {
        SignalResult::none()
    }
}

/// Advanced-stat bonuses: usage, efficiency, PER, age, and durability. At
/// most two insight strings are surfaced even when more sub-signals fire.
fn advanced_stats(player: &PlayerRecord) -> SignalResult {
    let mut points = 0i32;
    let mut insights: Vec<String> = Vec::new();

    if let Some(usage) = player.usage_rate {
        if usage > 0.28 {
            points += 3;
            insights.push("High usage player".to_string());
        } else if usage > 0.25 {
            points += 1;
            insights.push("Above average usage".to_string());
        }
    }

    if let Some(ts) = player.true_shooting_pct {
        if ts > 0.60 {
            points += 4;
            insights.push("Elite shooting efficiency".to_string());
        } else if ts > 0.55 {
            points += 2;
            insights.push("Good shooting efficiency".to_string());
        } else if ts < 0.50 {
            points -= 2;
            insights.push("Below average efficiency".to_string());
        }
    }

    if let Some(per) = player.player_efficiency_rating {
        if per > 25.0 {
            points += 3;
            insights.push("Elite PER".to_string());
        } else if per > 20.0 {
            points += 2;
            insights.push("Strong PER".to_string());
        } else if per > 15.0 {
            points += 1;
        }
    }

    if let Some(age) = player.age {
        if age <= 25 {
            points += 2;
            insights.push("Young with upside".to_string());
        } else if age <= 27 {
            points += 1;
            insights.push("Prime age".to_string());
        } else if age >= 32 {
            points -= 1;
            insights.push("Veteran (age risk)".to_string());
        }
    }

    if let Some(games) = player.games_played {
        if games >= 70 {
            points += 1;
            insights.push("Durable (70+ games)".to_string());
        } else if games < 50 {
            points -= 2;
            insights.push("Injury concerns".to_string());
        }
    }

    insights.truncate(2);
    SignalResult {
        points,
        reasons: insights,
    }
}

/// Composite-rating tier, plus a bonus when the next candidate is a steep
/// drop away.
fn tier(
    player: &PlayerRecord,
    next_rating: f64,
    t: &SuggestTuning,
) -> SignalResult {
    let mut result = SignalResult::none();
    let rating = player.total_z_score;
    if rating > t.tier_elite {
        result.points += TIER_ELITE_PTS;
        result.reasons.push("Elite tier player".to_string());
    } else if rating > t.tier_high {
        result.points += TIER_HIGH_PTS;
        result.reasons.push("High-tier option".to_string());
    } else if rating > t.tier_solid {
        result.points += TIER_SOLID_PTS;
        result.reasons.push("Solid contributor".to_string());
    }

    if rating - next_rating > t.tier_cliff {
        result.points += TIER_CLIFF_PTS;
        result
            .reasons
            .push("Significant tier drop after this pick".to_string());
    }
    result
}

/// Round-stage expectations: each stage of the draft rewards a different
/// rating floor.
fn round_stage(
    player: &PlayerRecord,
    round: u32,
    t: &SuggestTuning,
) -> SignalResult {
    let rating = player.total_z_score;
    if round <= 3 {
        if rating > 8.0 {
            return SignalResult::hit(
                EARLY_ROUND_PTS,
                "Top-tier talent for early rounds".to_string(),
            );
        }
    } else if round <= 6 {
        if rating > 5.0 {
            return SignalResult::hit(
                MID_ROUND_PTS,
                "Strong mid-round value".to_string(),
            );
        }
    } else if rating > 2.0 {
        return SignalResult::hit(
            LATE_ROUND_PTS,
            "Good late-round upside".to_string(),
        );
    }
    SignalResult::none()
}

/// Pick distance: a long wait until the next turn makes grabbing a falling
/// player now more urgent.
fn pick_distance(wait: u32, t: &SuggestTuning) -> SignalResult {
    if wait > t.long_wait {
        SignalResult::hit(
            LONG_WAIT_PTS,
            format!("Long wait until next pick ({wait} picks)"),
        )
    } else {
        SignalResult::none()
    }
}
