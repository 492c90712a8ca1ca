//! Level parameters.
//!
//! The engine treats a [`LevelConfig`] as read-only input: a new board is
//! created whenever the level changes. [`LevelConfig::for_level`] is the
//! built-in provider; the settings file may override individual levels.

use serde::{Deserialize, Serialize};

use crate::board::{Palette, TileKind};
use crate::constants::{
    KINDS_EARLY, KINDS_LATE, KINDS_MID, LATE_LEVEL, LEVEL_TIMER_SECONDS, MAX_LEVEL, MID_LEVEL,
    TARGET_SCORE_BASE, TARGET_SCORE_PER_LEVEL,
};
use crate::error::EngineError;

/// Parameters for one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level: u32,
    /// Kinds that appear on this level's board.
    pub kinds: Vec<TileKind>,
    pub target_score: u64,
    pub timer_seconds: u32,
}

impl LevelConfig {
    /// Built-in parameters for `level` (clamped to `1..=MAX_LEVEL`).
    ///
    /// More kinds make matches rarer: 4 kinds up to level 2, 5 up to level 9,
    /// then all 6. The target grows by a fixed step per level.
    pub fn for_level(level: u32) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        let count = if level >= LATE_LEVEL {
            KINDS_LATE
        } else if level >= MID_LEVEL {
            KINDS_MID
        } else {
            KINDS_EARLY
        };
        Self {
            level,
            kinds: TileKind::ALL[..count].to_vec(),
            target_score: TARGET_SCORE_BASE + TARGET_SCORE_PER_LEVEL * level as u64,
            timer_seconds: LEVEL_TIMER_SECONDS,
        }
    }

    /// Validated kind set for board creation and refill.
    pub fn palette(&self) -> Result<Palette, EngineError> {
        Palette::new(&self.kinds)
    }

    /// Whether `score` meets this level's target.
    pub fn is_won(&self, score: u64) -> bool {
        score >= self.target_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_counts_by_level() {
        assert_eq!(LevelConfig::for_level(1).kinds.len(), 4);
        assert_eq!(LevelConfig::for_level(2).kinds.len(), 4);
        assert_eq!(LevelConfig::for_level(3).kinds.len(), 5);
        assert_eq!(LevelConfig::for_level(9).kinds.len(), 5);
        assert_eq!(LevelConfig::for_level(10).kinds.len(), 6);
        assert_eq!(LevelConfig::for_level(500).kinds.len(), 6);
    }

    #[test]
    fn test_target_and_timer() {
        let cfg = LevelConfig::for_level(1);
        assert_eq!(cfg.target_score, 6000);
        assert_eq!(cfg.timer_seconds, 300);
        assert_eq!(LevelConfig::for_level(12).target_score, 17_000);
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(LevelConfig::for_level(0).level, 1);
        assert_eq!(LevelConfig::for_level(u32::MAX).level, MAX_LEVEL);
    }

    #[test]
    fn test_palette_follows_kinds() {
        let palette = LevelConfig::for_level(4).palette().unwrap();
        assert_eq!(palette.kinds(), &TileKind::ALL[..5]);
    }

    #[test]
    fn test_is_won() {
        let cfg = LevelConfig::for_level(1);
        assert!(!cfg.is_won(5999));
        assert!(cfg.is_won(6000));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let cfg: LevelConfig = toml::from_str(
            r#"
            level = 7
            kinds = ["red", "blue", "yellow"]
            target_score = 100
            timer_seconds = 60
            "#,
        )
        .unwrap();
        assert_eq!(cfg.kinds, vec![TileKind::Red, TileKind::Blue, TileKind::Yellow]);
        assert!(cfg.palette().is_ok());
    }
}
