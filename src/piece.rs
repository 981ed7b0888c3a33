//! 棋子与走法合法性规则
//!
//! 所有棋子共享同一套前置检查，然后按 `PieceKind` 分派到各自的走法规则。

use crate::board::Board;
use crate::types::{Move, PieceKind, Position, Team};
use serde::{Deserialize, Serialize};

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub team: Team,
    pub kind: PieceKind,
    pub position: Position,
    /// 移动次数，用于判断能否王车易位
    pub move_count: u32,
}

impl Piece {
    pub fn new(team: Team, kind: PieceKind, position: Position) -> Self {
        Piece {
            team,
            kind,
            position,
            move_count: 0,
        }
    }

    /// 指纹字符：白方大写，黑方小写
    pub fn code(&self) -> char {
        match self.team {
            Team::White => self.kind.code(),
            Team::Black => self.kind.code().to_ascii_lowercase(),
        }
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.kind.value()
    }
}

/// 判断棋子能否走到 `to`
///
/// `threat_check` 为 true 时会在棋盘副本上试走，走后己方王被攻击则不合法（包括牵制）。
pub fn is_movable(board: &Board, piece: &Piece, to: Position, threat_check: bool) -> bool {
    let from = piece.position;
    if !to.is_valid() || from == to {
        return false;
    }
    if let Some(target) = board.piece_at(to) {
        if target.team == piece.team {
            return false;
        }
    }

    let shape_ok = match piece.kind {
        PieceKind::King => king_rule(board, piece, to),
        PieceKind::Queen => {
            let (dr, dc) = delta(from, to);
            (dr == 0 || dc == 0 || dr.abs() == dc.abs()) && path_clear(board, from, to)
        }
        PieceKind::Bishop => {
            let (dr, dc) = delta(from, to);
            dr.abs() == dc.abs() && path_clear(board, from, to)
        }
        PieceKind::Knight => {
            let (dr, dc) = delta(from, to);
            matches!((dr.abs(), dc.abs()), (2, 1) | (1, 2))
        }
        PieceKind::Rook => {
            let (dr, dc) = delta(from, to);
            (dr == 0 || dc == 0) && path_clear(board, from, to)
        }
        PieceKind::Pawn => pawn_rule(board, piece, to),
    };
    if !shape_ok {
        return false;
    }

    !(threat_check && board.is_threatened_after_move(piece, Move::new(from, to)))
}

#[inline]
fn delta(from: Position, to: Position) -> (i8, i8) {
    (to.row - from.row, to.col - from.col)
}

/// 直线/斜线路径上（不含两端）没有棋子
fn path_clear(board: &Board, from: Position, to: Position) -> bool {
    let (dr, dc) = delta(from, to);
    let (step_r, step_c) = (dr.signum(), dc.signum());
    let mut cur = from.offset(step_r, step_c);
    while cur != to {
        if board.piece_at(cur).is_some() {
            return false;
        }
        cur = cur.offset(step_r, step_c);
    }
    true
}

fn king_rule(board: &Board, king: &Piece, to: Position) -> bool {
    let (dr, dc) = delta(king.position, to);
    if dr.abs() <= 1 && dc.abs() <= 1 {
        return true;
    }

    // 王车易位：同一行横移两格，朝向未移动过的己方车，中间格子全空。
    // 不检查王经过的格子是否被攻击，也不检查王自身是否移动过。
    if dr != 0 || dc.abs() != 2 {
        return false;
    }
    let Some(rook_pos) = castling_rook_square(king.position, to) else {
        return false;
    };
    match board.piece_at(rook_pos) {
        Some(rook)
            if rook.kind == PieceKind::Rook
                && rook.team == king.team
                && rook.move_count == 0 => {}
        _ => return false,
    }
    let step = dc.signum();
    let mut col = king.position.col + step;
    while col != rook_pos.col {
        if board.piece_at(Position::new(king.position.row, col)).is_some() {
            return false;
        }
        col += step;
    }
    true
}

/// 易位时对应的车所在格（王向右走取 h 列，向左走取 a 列）
pub(crate) fn castling_rook_square(from: Position, to: Position) -> Option<Position> {
    if from.row != to.row || (to.col - from.col).abs() != 2 {
        return None;
    }
    let rook_col = if to.col > from.col { 7 } else { 0 };
    Some(Position::new(from.row, rook_col))
}

fn pawn_rule(board: &Board, pawn: &Piece, to: Position) -> bool {
    let from = pawn.position;
    let dir = pawn.team.pawn_direction();
    let (dr, dc) = delta(from, to);
    let target = board.piece_at(to);

    // 前进一格
    if dr == dir && dc == 0 && target.is_none() {
        return true;
    }

    // 起始行前进两格
    if from.row == pawn.team.pawn_start_row()
        && dr == 2 * dir
        && dc == 0
        && target.is_none()
        && board.piece_at(from.offset(dir, 0)).is_none()
    {
        return true;
    }

    // 斜吃（无吃过路兵）
    dr == dir && dc.abs() == 1 && target.is_some_and(|t| t.team != pawn.team)
}
