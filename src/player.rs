// Player pool: the closed category and position enumerations plus the
// per-season player records every analyzer reads.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Upstream player identifier.
pub type PlayerId = u32;

// ---------------------------------------------------------------------------
// Scoring categories
// ---------------------------------------------------------------------------

/// The nine scoring categories tracked by the engine.
///
/// All nine are higher-is-better: the turnover z-score is inverted upstream,
/// so the engine never applies a second sign flip anywhere.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Category {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    FieldGoalPct,
    FreeThrowPct,
    ThreePointersMade,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 9] = [
        Category::Points,
        Category::Rebounds,
        Category::Assists,
        Category::Steals,
        Category::Blocks,
        Category::Turnovers,
        Category::FieldGoalPct,
        Category::FreeThrowPct,
        Category::ThreePointersMade,
    ];

    /// Full display name.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Points => "Points",
            Category::Rebounds => "Rebounds",
            Category::Assists => "Assists",
            Category::Steals => "Steals",
            Category::Blocks => "Blocks",
            Category::Turnovers => "Turnovers",
            Category::FieldGoalPct => "Field Goal %",
            Category::FreeThrowPct => "Free Throw %",
            Category::ThreePointersMade => "3-Pointers Made",
        }
    }

    /// Short label used in reason strings and compact displays.
    pub fn short(&self) -> &'static str {
        match self {
            Category::Points => "PTS",
            Category::Rebounds => "REB",
            Category::Assists => "AST",
            Category::Steals => "STL",
            Category::Blocks => "BLK",
            Category::Turnovers => "TO",
            Category::FieldGoalPct => "FG%",
            Category::FreeThrowPct => "FT%",
            Category::ThreePointersMade => "3PM",
        }
    }

    /// Whether this is one of the two percentage categories, which get
    /// special treatment in punt detection.
    pub fn is_percentage(&self) -> bool {
        matches!(self, Category::FieldGoalPct | Category::FreeThrowPct)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Basketball positions used for scarcity and roster-balance analysis.
///
/// `Guard` and `Forward` cover pool rows that only carry a generic position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
    Guard,
    Forward,
}

/// Coarse position grouping for roster-balance checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PositionClass {
    Guard,
    Forward,
    Center,
}

impl Position {
    /// Parse a single position token. Handles both abbreviations ("PG",
    /// "C") and spelled-out forms ("Point Guard", "Forward").
    pub fn from_token(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PG" | "POINT GUARD" => Some(Position::PointGuard),
            "SG" | "SHOOTING GUARD" => Some(Position::ShootingGuard),
            "SF" | "SMALL FORWARD" => Some(Position::SmallForward),
            "PF" | "POWER FORWARD" => Some(Position::PowerForward),
            "C" | "CENTER" => Some(Position::Center),
            "G" | "GUARD" => Some(Position::Guard),
            "F" | "FORWARD" => Some(Position::Forward),
            _ => None,
        }
    }

    /// Primary position of a raw position string: the first hyphen-separated
    /// token ("Forward-Center" -> Forward). Unrecognized tokens fall back to
    /// the generic forward so the engine stays total on odd pool rows.
    pub fn primary(raw: &str) -> Self {
        raw.split('-')
            .next()
            .and_then(Position::from_token)
            .unwrap_or(Position::Forward)
    }

    /// Every position a raw (possibly hyphenated) string covers, in order.
    pub fn all(raw: &str) -> Vec<Self> {
        raw.split('-').filter_map(Position::from_token).collect()
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::PointGuard => "PG",
            Position::ShootingGuard => "SG",
            Position::SmallForward => "SF",
            Position::PowerForward => "PF",
            Position::Center => "C",
            Position::Guard => "G",
            Position::Forward => "F",
        }
    }

    /// Map to the coarse class used by roster-balance checks.
    pub fn class(&self) -> PositionClass {
        match self {
            Position::PointGuard | Position::ShootingGuard | Position::Guard => {
                PositionClass::Guard
            }
            Position::SmallForward | Position::PowerForward | Position::Forward => {
                PositionClass::Forward
            }
            Position::Center => PositionClass::Center,
        }
    }

    /// Centers and point guards anchor a roster: a second one is still
    /// worth a depth bonus where other positions are not.
    pub fn is_foundational(&self) -> bool {
        matches!(self, Position::Center | Position::PointGuard)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

impl PositionClass {
    pub const ALL: [PositionClass; 3] = [
        PositionClass::Guard,
        PositionClass::Forward,
        PositionClass::Center,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PositionClass::Guard => "guard",
            PositionClass::Forward => "forward",
            PositionClass::Center => "center",
        }
    }
}

// ---------------------------------------------------------------------------
// Player records
// ---------------------------------------------------------------------------

/// One player-season row of the pre-computed pool.
///
/// Z-scores arrive normalized per category/season; `total_z_score` is their
/// sum. The turnover z-score is already inverted upstream (higher = fewer
/// turnovers = better), matching the other eight categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    pub name: String,
    /// NBA team abbreviation (e.g. "DEN").
    pub team: String,
    /// Raw position string, possibly hyphenated (e.g. "Forward-Center").
    pub position: String,
    /// Composite rating: sum of the nine category z-scores.
    pub total_z_score: f64,
    pub z_points: f64,
    pub z_rebounds: f64,
    pub z_assists: f64,
    pub z_steals: f64,
    pub z_blocks: f64,
    /// Inverted upstream: higher is better, like every other category.
    pub z_turnovers: f64,
    pub z_fg_pct: f64,
    pub z_ft_pct: f64,
    pub z_three_pm: f64,
    /// Average draft position; absent for players outside reference drafts.
    #[serde(default)]
    pub adp: Option<f64>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub games_played: Option<u32>,
    #[serde(default)]
    pub usage_rate: Option<f64>,
    #[serde(default)]
    pub true_shooting_pct: Option<f64>,
    #[serde(default)]
    pub player_efficiency_rating: Option<f64>,
}

impl PlayerRecord {
    /// The player's z-score in a category.
    pub fn zscore(&self, category: Category) -> f64 {
        match category {
            Category::Points => self.z_points,
            Category::Rebounds => self.z_rebounds,
            Category::Assists => self.z_assists,
            Category::Steals => self.z_steals,
            Category::Blocks => self.z_blocks,
            Category::Turnovers => self.z_turnovers,
            Category::FieldGoalPct => self.z_fg_pct,
            Category::FreeThrowPct => self.z_ft_pct,
            Category::ThreePointersMade => self.z_three_pm,
        }
    }

    /// Primary position parsed from the raw position string.
    pub fn primary_position(&self) -> Position {
        Position::primary(&self.position)
    }
}

// ---------------------------------------------------------------------------
// Player pool
// ---------------------------------------------------------------------------

/// Immutable collection of player records for one season.
///
/// The pool is assumed deduplicated and z-score-normalized upstream; it is
/// materialized in memory before the draft begins and never mutated.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    players: Vec<PlayerRecord>,
    by_id: HashMap<PlayerId, usize>,
}

impl PlayerPool {
    /// Build a pool from records, preserving their order. Duplicate ids keep
    /// the first occurrence.
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        let mut by_id = HashMap::with_capacity(players.len());
        for (idx, player) in players.iter().enumerate() {
            if by_id.contains_key(&player.player_id) {
                warn!(
                    player_id = player.player_id,
                    name = %player.name,
                    "duplicate player id in pool; keeping first occurrence"
                );
                continue;
            }
            by_id.insert(player.player_id, idx);
        }
        PlayerPool { players, by_id }
    }

    /// Look up a player by id.
    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.by_id.get(&id).map(|&idx| &self.players[idx])
    }

    /// All players in pool order.
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players not yet drafted, in pool order.
    pub fn available(&self, drafted: &[PlayerId]) -> Vec<&PlayerRecord> {
        let taken: std::collections::HashSet<PlayerId> =
            drafted.iter().copied().collect();
        self.players
            .iter()
            .filter(|p| !taken.contains(&p.player_id))
            .collect()
    }

    /// Resolve a roster id list against the pool, skipping unknown ids.
    pub fn resolve(&self, roster: &[PlayerId]) -> Vec<&PlayerRecord> {
        roster.iter().filter_map(|&id| self.get(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_player(id: PlayerId, name: &str, position: &str) -> PlayerRecord {
        PlayerRecord {
            player_id: id,
            name: name.to_string(),
            team: "DEN".to_string(),
            position: position.to_string(),
            total_z_score: 5.0,
            z_points: 1.0,
            z_rebounds: 0.5,
            z_assists: 0.5,
            z_steals: 0.5,
            z_blocks: 0.5,
            z_turnovers: 0.5,
            z_fg_pct: 0.5,
            z_ft_pct: 0.5,
            z_three_pm: 0.5,
            adp: None,
            age: None,
            games_played: None,
            usage_rate: None,
            true_shooting_pct: None,
            player_efficiency_rating: None,
        }
    }

    #[test]
    fn category_short_labels() {
        assert_eq!(Category::Points.short(), "PTS");
        assert_eq!(Category::Turnovers.short(), "TO");
        assert_eq!(Category::FieldGoalPct.short(), "FG%");
        assert_eq!(Category::ThreePointersMade.short(), "3PM");
    }

    #[test]
    fn all_categories_listed_once() {
        assert_eq!(Category::ALL.len(), 9);
        let mut seen = std::collections::HashSet::new();
        for cat in Category::ALL {
            assert!(seen.insert(cat), "duplicate category {cat:?}");
        }
    }

    #[test]
    fn percentage_categories() {
        assert!(Category::FieldGoalPct.is_percentage());
        assert!(Category::FreeThrowPct.is_percentage());
        assert!(!Category::Turnovers.is_percentage());
        assert!(!Category::Points.is_percentage());
    }

    #[test]
    fn position_from_token_abbreviations() {
        assert_eq!(Position::from_token("PG"), Some(Position::PointGuard));
        assert_eq!(Position::from_token("sg"), Some(Position::ShootingGuard));
        assert_eq!(Position::from_token("C"), Some(Position::Center));
        assert_eq!(Position::from_token("XX"), None);
    }

    #[test]
    fn position_from_token_spelled_out() {
        assert_eq!(Position::from_token("Center"), Some(Position::Center));
        assert_eq!(Position::from_token("Guard"), Some(Position::Guard));
        assert_eq!(
            Position::from_token("Point Guard"),
            Some(Position::PointGuard)
        );
    }

    #[test]
    fn primary_position_hyphenated() {
        assert_eq!(Position::primary("Forward-Center"), Position::Forward);
        assert_eq!(Position::primary("PG-SG"), Position::PointGuard);
        assert_eq!(Position::primary("C"), Position::Center);
    }

    #[test]
    fn primary_position_unknown_falls_back() {
        assert_eq!(Position::primary("???"), Position::Forward);
        assert_eq!(Position::primary(""), Position::Forward);
    }

    #[test]
    fn all_positions_from_hybrid() {
        assert_eq!(
            Position::all("Guard-Forward"),
            vec![Position::Guard, Position::Forward]
        );
        assert_eq!(Position::all("C"), vec![Position::Center]);
    }

    #[test]
    fn position_classes() {
        assert_eq!(Position::PointGuard.class(), PositionClass::Guard);
        assert_eq!(Position::ShootingGuard.class(), PositionClass::Guard);
        assert_eq!(Position::SmallForward.class(), PositionClass::Forward);
        assert_eq!(Position::PowerForward.class(), PositionClass::Forward);
        assert_eq!(Position::Center.class(), PositionClass::Center);
    }

    #[test]
    fn foundational_positions() {
        assert!(Position::Center.is_foundational());
        assert!(Position::PointGuard.is_foundational());
        assert!(!Position::SmallForward.is_foundational());
    }

    #[test]
    fn zscore_accessor_covers_all_categories() {
        let mut player = make_player(1, "Test", "C");
        player.z_turnovers = 1.5;
        player.z_three_pm = -0.5;
        assert!((player.zscore(Category::Turnovers) - 1.5).abs() < 1e-9);
        assert!((player.zscore(Category::ThreePointersMade) + 0.5).abs() < 1e-9);
        assert!((player.zscore(Category::Points) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pool_lookup_and_order() {
        let pool = PlayerPool::new(vec![
            make_player(10, "A", "PG"),
            make_player(20, "B", "C"),
            make_player(30, "C", "SF"),
        ]);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(20).unwrap().name, "B");
        assert!(pool.get(99).is_none());
        let names: Vec<&str> =
            pool.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn pool_duplicate_ids_keep_first() {
        let pool = PlayerPool::new(vec![
            make_player(1, "First", "PG"),
            make_player(1, "Second", "C"),
        ]);
        assert_eq!(pool.get(1).unwrap().name, "First");
    }

    #[test]
    fn available_filters_drafted() {
        let pool = PlayerPool::new(vec![
            make_player(1, "A", "PG"),
            make_player(2, "B", "C"),
            make_player(3, "C", "SF"),
        ]);
        let available = pool.available(&[2]);
        let ids: Vec<PlayerId> = available.iter().map(|p| p.player_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(pool.available(&[]).len(), 3);
    }

    #[test]
    fn resolve_skips_unknown_ids() {
        let pool = PlayerPool::new(vec![make_player(1, "A", "PG")]);
        let resolved = pool.resolve(&[1, 99]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "A");
    }
}
