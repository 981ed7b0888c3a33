//! 棋谱记录
//!
//! 记谱格式：棋子字母（兵省略，白大写黑小写）+ 吃子标记 `x` + 目标格 + 升变后缀 `=Q`；
//! 任何王车易位都记为 `O-O`。

use crate::piece::Piece;
use crate::types::{Move, PieceKind, Position, Team};
use serde::Serialize;

/// 一条棋谱记录（只追加，不修改）
#[derive(Debug, Clone, Serialize)]
pub struct Notation {
    pub text: String,
    /// 走子后的局面指纹
    pub fingerprint: String,
    #[serde(rename = "move")]
    pub mv: Move,
    /// 走子方
    pub team: Team,
    pub captured: Option<Piece>,
}

/// 生成记谱文本
///
/// `mover` 是走子前的棋子（升变前仍是兵），`target` 是目标格原有的棋子。
/// 只要目标格有敌方棋子就加 `x`，与棋子类型无关。
pub fn notation_text(
    mover: &Piece,
    target: Option<&Piece>,
    to: Position,
    castling: bool,
    promotion: bool,
) -> String {
    if castling {
        return "O-O".to_string();
    }

    let mut text = String::with_capacity(6);
    if mover.kind != PieceKind::Pawn {
        text.push(mover.code());
    }
    if target.is_some_and(|t| t.team != mover.team) {
        text.push('x');
    }
    text.push_str(&to.to_algebraic());
    if promotion {
        text.push_str("=Q");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(team: Team, kind: PieceKind, sq: &str) -> Piece {
        Piece::new(team, kind, Position::from_algebraic(sq).unwrap())
    }

    #[test]
    fn test_quiet_moves() {
        let knight = piece(Team::White, PieceKind::Knight, "g1");
        let to = Position::from_algebraic("f3").unwrap();
        assert_eq!(notation_text(&knight, None, to, false, false), "Nf3");

        let pawn = piece(Team::White, PieceKind::Pawn, "e2");
        let to = Position::from_algebraic("e4").unwrap();
        assert_eq!(notation_text(&pawn, None, to, false, false), "e4");

        let bishop = piece(Team::Black, PieceKind::Bishop, "c8");
        let to = Position::from_algebraic("g4").unwrap();
        assert_eq!(notation_text(&bishop, None, to, false, false), "bg4");
    }

    #[test]
    fn test_capture_marker_for_every_kind() {
        let victim = piece(Team::Black, PieceKind::Pawn, "d5");
        let to = victim.position;

        let pawn = piece(Team::White, PieceKind::Pawn, "e4");
        assert_eq!(notation_text(&pawn, Some(&victim), to, false, false), "xd5");

        let queen = piece(Team::White, PieceKind::Queen, "d1");
        assert_eq!(notation_text(&queen, Some(&victim), to, false, false), "Qxd5");
    }

    #[test]
    fn test_castling_and_promotion() {
        let king = piece(Team::White, PieceKind::King, "e1");
        let to = Position::from_algebraic("c1").unwrap();
        assert_eq!(notation_text(&king, None, to, true, false), "O-O");

        let pawn = piece(Team::White, PieceKind::Pawn, "a7");
        let to = Position::from_algebraic("a8").unwrap();
        assert_eq!(notation_text(&pawn, None, to, false, true), "a8=Q");
    }
}
