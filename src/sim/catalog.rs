//! Item kinds, their score effects, and the spawn pattern

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The unit the default pattern repeats
pub const DEFAULT_PATTERN_UNIT: &str = "2ab0r";
/// How many times the unit repeats in the default pattern
pub const DEFAULT_PATTERN_REPEATS: usize = 15;

/// Kinds of falling items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    BigPrize,
    SmallPrizeA,
    SmallPrizeB,
    Penalty,
    Bomb,
}

/// What catching an item does to the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreEffect {
    Points(i32),
    /// Ends the round regardless of score
    InstantLoss,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::BigPrize,
        ItemKind::SmallPrizeA,
        ItemKind::SmallPrizeB,
        ItemKind::Penalty,
        ItemKind::Bomb,
    ];

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '2' => Some(ItemKind::BigPrize),
            'a' => Some(ItemKind::SmallPrizeA),
            'b' => Some(ItemKind::SmallPrizeB),
            'r' => Some(ItemKind::Penalty),
            '0' => Some(ItemKind::Bomb),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            ItemKind::BigPrize => '2',
            ItemKind::SmallPrizeA => 'a',
            ItemKind::SmallPrizeB => 'b',
            ItemKind::Penalty => 'r',
            ItemKind::Bomb => '0',
        }
    }

    pub fn score_effect(&self) -> ScoreEffect {
        match self {
            ItemKind::BigPrize => ScoreEffect::Points(2),
            ItemKind::SmallPrizeA | ItemKind::SmallPrizeB => ScoreEffect::Points(1),
            ItemKind::Penalty => ScoreEffect::Points(-1),
            ItemKind::Bomb => ScoreEffect::InstantLoss,
        }
    }

    /// Whether catching this kind ever helps the player
    pub fn is_prize(&self) -> bool {
        matches!(self.score_effect(), ScoreEffect::Points(p) if p > 0)
    }

    /// Index into per-kind tables (matches `ALL`)
    pub fn index(&self) -> usize {
        match self {
            ItemKind::BigPrize => 0,
            ItemKind::SmallPrizeA => 1,
            ItemKind::SmallPrizeB => 2,
            ItemKind::Penalty => 3,
            ItemKind::Bomb => 4,
        }
    }
}

/// Ordered, finite sequence of kinds consumed one per spawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPattern {
    kinds: Vec<ItemKind>,
}

impl SpawnPattern {
    /// Parse a string of kind codes. Unknown codes fail with their position.
    pub fn parse(codes: &str) -> Result<Self, ConfigError> {
        let kinds = codes
            .chars()
            .enumerate()
            .map(|(position, code)| {
                ItemKind::from_code(code)
                    .ok_or_else(|| ConfigError::UnknownKindCode { code, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { kinds })
    }

    pub fn default_codes() -> String {
        DEFAULT_PATTERN_UNIT.repeat(DEFAULT_PATTERN_REPEATS)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ItemKind> {
        self.kinds.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl Default for SpawnPattern {
    fn default() -> Self {
        let unit: Vec<ItemKind> = DEFAULT_PATTERN_UNIT
            .chars()
            .filter_map(ItemKind::from_code)
            .collect();
        Self {
            kinds: unit.repeat(DEFAULT_PATTERN_REPEATS),
        }
    }
}

/// Static lookup of score effects plus the pattern for this round setup
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    pattern: SpawnPattern,
}

impl ItemCatalog {
    pub fn new(pattern: SpawnPattern) -> Self {
        Self { pattern }
    }

    pub fn from_codes(codes: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(SpawnPattern::parse(codes)?))
    }

    pub fn score_delta_for(&self, kind: ItemKind) -> ScoreEffect {
        kind.score_effect()
    }

    pub fn pattern(&self) -> &SpawnPattern {
        &self.pattern
    }
}
