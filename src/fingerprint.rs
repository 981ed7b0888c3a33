//! 局面指纹
//!
//! 64 个字符，按行优先依次表示 a8..h8, a7..h7, ..., a1..h1：
//! - 白方棋子：K Q B N R P
//! - 黑方棋子：k q b n r p
//! - 空格：0
//!
//! 指纹既是评估缓存的键，也是棋谱回放的载荷，不记录棋子的移动次数和回合。

use crate::error::{EngineError, EngineResult};
use crate::piece::Piece;
use crate::types::{PieceKind, Position, Team};

/// 指纹长度
pub const FINGERPRINT_LEN: usize = 64;

/// 标准开局局面
pub const START_FINGERPRINT: &str = concat!(
    "rnbqkbnr",
    "pppppppp",
    "00000000",
    "00000000",
    "00000000",
    "00000000",
    "PPPPPPPP",
    "RNBQKBNR",
);

/// 由 64 格生成指纹
pub fn fingerprint_of(squares: &[Option<Piece>; 64]) -> String {
    squares
        .iter()
        .map(|sq| sq.map_or('0', |p| p.code()))
        .collect()
}

/// 解析指纹，返回所有棋子（移动次数均为 0）
pub fn parse_fingerprint(fp: &str) -> EngineResult<Vec<Piece>> {
    let chars: Vec<char> = fp.chars().collect();
    if chars.len() != FINGERPRINT_LEN {
        return Err(EngineError::InvalidFingerprint(format!(
            "expected {} characters, got {}",
            FINGERPRINT_LEN,
            chars.len()
        )));
    }

    let mut pieces = Vec::with_capacity(32);
    for (idx, ch) in chars.into_iter().enumerate() {
        if ch == '0' {
            continue;
        }
        let kind = PieceKind::from_code(ch).ok_or_else(|| {
            EngineError::InvalidFingerprint(format!("invalid piece char '{}' at {}", ch, idx))
        })?;
        let team = if ch.is_ascii_uppercase() {
            Team::White
        } else {
            Team::Black
        };
        pieces.push(Piece::new(team, kind, Position::from_index(idx)));
    }
    Ok(pieces)
}
