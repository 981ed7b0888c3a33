//! 局面评估
//!
//! 两档评估：
//! - Simple：双方子力之差
//! - Extended：每个棋子累加 子力 + 位置分（仅兵，按前进格数）+ 攻防分 + 机动性分
//!
//! 评估结果按 (阵营, 指纹) 缓存，在策略实例的整个生命周期内不淘汰。

use crate::board::Board;
use crate::piece::{is_movable, Piece};
use crate::types::{PieceKind, Team};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 评估方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    Simple,
    Extended,
}

impl Evaluation {
    pub fn from_name(s: &str) -> Option<Evaluation> {
        match s.to_ascii_lowercase().as_str() {
            "simple" | "material" => Some(Evaluation::Simple),
            "extended" => Some(Evaluation::Extended),
            _ => None,
        }
    }
}

/// 子力差（己方 - 对方）
pub fn material_advantage(board: &Board, team: Team) -> f64 {
    (board.team_material(team) - board.team_material(team.opponent())) as f64
}

/// 扩展评估差（己方 - 对方）
pub fn extended_advantage(board: &Board, team: Team) -> f64 {
    extended_value(board, team) - extended_value(board, team.opponent())
}

/// 某方所有棋子的扩展评估之和
pub fn extended_value(board: &Board, team: Team) -> f64 {
    board
        .team_pieces(team)
        .iter()
        .map(|piece| {
            piece.value() as f64
                + position_value(piece)
                + attack_value(board, team, piece)
                + mobility_value(board, piece)
        })
        .sum()
}

/// 兵距离起始行前进的格数
fn position_value(piece: &Piece) -> f64 {
    if piece.kind != PieceKind::Pawn {
        return 0.0;
    }
    let start = piece.team.pawn_start_row();
    ((piece.position.row - start) * piece.team.pawn_direction()) as f64
}

/// 攻防分
///
/// 轮到 `team` 走时，看该棋子能吃到的最大价值棋子；否则看攻击它的最小价值棋子。结果减半。
fn attack_value(board: &Board, team: Team, piece: &Piece) -> f64 {
    let piece_value = piece.value() as f64;
    let enemies = board.team_pieces(team.opponent());

    let raw = if board.turn() == team {
        let max_target = enemies
            .iter()
            .filter(|e| is_movable(board, piece, e.position, false))
            .map(|e| e.value())
            .max();
        match max_target {
            Some(v) => v as f64 - piece_value / 3.0,
            None => 0.0,
        }
    } else {
        let min_attacker = enemies
            .iter()
            .filter(|e| is_movable(board, e, piece.position, false))
            .map(|e| e.value())
            .min();
        match min_attacker {
            Some(v) => v as f64 / 3.0 - piece_value,
            None => 0.0,
        }
    };
    raw / 2.0
}

/// 可走格数 / 3（不做威胁过滤）
fn mobility_value(board: &Board, piece: &Piece) -> f64 {
    board.available_moves(piece, false).len() as f64 / 3.0
}

/// 评估缓存
pub struct AdvantageCache {
    mode: Evaluation,
    entries: HashMap<(Team, String), f64>,
}

impl AdvantageCache {
    pub fn new(mode: Evaluation) -> Self {
        AdvantageCache {
            mode,
            entries: HashMap::new(),
        }
    }

    pub fn mode(&self) -> Evaluation {
        self.mode
    }

    /// `team` 视角的优势，先查缓存
    pub fn advantage(&mut self, board: &Board, team: Team) -> f64 {
        let key = (team, board.export());
        if let Some(&v) = self.entries.get(&key) {
            return v;
        }
        let v = match self.mode {
            Evaluation::Simple => material_advantage(board, team),
            Evaluation::Extended => extended_advantage(board, team),
        };
        self.entries.insert(key, v);
        v
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
