//! 国际象棋测试局面库
//!
//! 提供命名的指纹测试局面，方便测试和调试。
//! 指纹按行从第 8 横线到第 1 横线排列，大写为白方，小写为黑方，`0` 为空格。
//!
//! 命名规范:
//! - START: 初始局面
//! - END_*: 残局
//! - MATE_* / *_MATED: 杀棋测试
//! - 其他: 特殊规则测试（升变、易位、逼和）

use crate::fingerprint::START_FINGERPRINT;

// =============================================================================
// 开局
// =============================================================================

/// 初始局面
pub const START: &str = START_FINGERPRINT;

/// 白方 e2e4 之后
pub const EARLY_E4: &str = concat!(
    "rnbqkbnr",
    "pppppppp",
    "00000000",
    "00000000",
    "0000P000",
    "00000000",
    "PPPP0PPP",
    "RNBQKBNR",
);

// =============================================================================
// 战术
// =============================================================================

/// 白后 d1 与黑后 d5 同在 d 线，轮到谁走谁就能吃后
pub const HANGING_QUEEN: &str = concat!(
    "0000k000",
    "00000000",
    "00000000",
    "000q0000",
    "00000000",
    "00000000",
    "00000000",
    "000QK000",
);

/// 白方一步杀：Ra1-a8 底线杀
pub const MATE_IN_ONE: &str = concat!(
    "0000000k",
    "000000pp",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "R00000K0",
);

// =============================================================================
// 残局
// =============================================================================

/// 车王对兵王
pub const END_ROOK_VS_PAWN: &str = concat!(
    "0000k000",
    "0000000p",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "R000K000",
);

// =============================================================================
// 终局判定
// =============================================================================

/// 黑方被底线将死（轮到黑方走）
pub const BLACK_MATED: &str = concat!(
    "R000000k",
    "000000pp",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "0000K000",
);

/// 黑方无子可走但未被将军（轮到黑方走）
pub const STALEMATE: &str = concat!(
    "k0000000",
    "00Q00000",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "0000K000",
);

// =============================================================================
// 特殊规则
// =============================================================================

/// a7 白兵下一步升变
pub const PROMOTION: &str = concat!(
    "0000k000",
    "P0000000",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "0000K000",
);

/// 双方王车都在原位，可以两翼易位
pub const CASTLING: &str = concat!(
    "r000k00r",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "R000K00R",
);

/// 所有测试局面
pub const ALL_POSITIONS: &[(&str, &str)] = &[
    ("START", START),
    ("EARLY_E4", EARLY_E4),
    ("HANGING_QUEEN", HANGING_QUEEN),
    ("MATE_IN_ONE", MATE_IN_ONE),
    ("END_ROOK_VS_PAWN", END_ROOK_VS_PAWN),
    ("BLACK_MATED", BLACK_MATED),
    ("STALEMATE", STALEMATE),
    ("PROMOTION", PROMOTION),
    ("CASTLING", CASTLING),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::fingerprint::FINGERPRINT_LEN;
    use crate::types::Team;

    #[test]
    fn test_all_positions_parse() {
        for (name, fp) in ALL_POSITIONS {
            assert_eq!(fp.len(), FINGERPRINT_LEN, "{}", name);
            let board = Board::from_fingerprint(fp, Team::White);
            assert!(board.is_ok(), "Failed to parse {}", name);
            assert_eq!(board.unwrap().export(), *fp, "{}", name);
        }
    }

    #[test]
    fn test_every_position_has_both_kings() {
        for (name, fp) in ALL_POSITIONS {
            let board = Board::from_fingerprint(fp, Team::White).unwrap();
            assert!(board.find_king(Team::White).is_some(), "{}", name);
            assert!(board.find_king(Team::Black).is_some(), "{}", name);
        }
    }
}
