//! 国际象棋核心类型定义
//!
//! 定义阵营、棋子类型、坐标、走法与终局结果等基础数据类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    White,
    Black,
}

impl Team {
    /// 获取对方阵营
    pub fn opponent(&self) -> Team {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    /// 兵前进的行方向（白方朝第 0 行走）
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Team::White => -1,
            Team::Black => 1,
        }
    }

    /// 兵的起始行
    pub fn pawn_start_row(&self) -> i8 {
        match self {
            Team::White => 6,
            Team::Black => 1,
        }
    }

    /// 兵升变所在的底线
    pub fn promotion_row(&self) -> i8 {
        match self {
            Team::White => 0,
            Team::Black => 7,
        }
    }

    /// 小写名称，用于终局原因编码
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::White => "white",
            Team::Black => "black",
        }
    }

    pub fn from_name(s: &str) -> Option<Team> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Some(Team::White),
            "b" | "black" => Some(Team::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::White => write!(f, "WHITE"),
            Team::Black => write!(f, "BLACK"),
        }
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceKind {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Pawn,
    ];

    /// 从单字母代码解析（大小写均可）
    pub fn from_code(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'K' => Some(PieceKind::King),
            'Q' => Some(PieceKind::Queen),
            'B' => Some(PieceKind::Bishop),
            'N' => Some(PieceKind::Knight),
            'R' => Some(PieceKind::Rook),
            'P' => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    /// 单字母代码（大写）
    pub fn code(&self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Rook => 'R',
            PieceKind::Pawn => 'P',
        }
    }

    /// 子力价值
    pub fn value(&self) -> i32 {
        match self {
            PieceKind::King => 50,
            PieceKind::Queen => 9,
            PieceKind::Bishop => 3,
            PieceKind::Knight => 3,
            PieceKind::Rook => 5,
            PieceKind::Pawn => 1,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::King => "King",
            PieceKind::Queen => "Queen",
            PieceKind::Bishop => "Bishop",
            PieceKind::Knight => "Knight",
            PieceKind::Rook => "Rook",
            PieceKind::Pawn => "Pawn",
        };
        write!(f, "{}", name)
    }
}

/// 棋盘坐标 (row, col)
///
/// row: 0-7（0 是黑方底线，7 是白方底线）
/// col: 0-7（0 对应 a 列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查坐标是否在棋盘范围内
    pub fn is_valid(&self) -> bool {
        (0..8).contains(&self.row) && (0..8).contains(&self.col)
    }

    /// 坐标加偏移量
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 转换为数组索引（行优先）
    #[inline]
    pub fn to_index(&self) -> usize {
        (self.row as usize) * 8 + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Position {
        Position {
            row: (idx / 8) as i8,
            col: (idx % 8) as i8,
        }
    }

    /// 代数坐标（如 "e4"）
    pub fn to_algebraic(&self) -> String {
        let file = (b'a' + self.col as u8) as char;
        format!("{}{}", file, 8 - self.row)
    }

    /// 从代数坐标解析
    pub fn from_algebraic(s: &str) -> Option<Position> {
        let mut chars = s.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let col = match file {
            'a'..='h' => (file as i8) - ('a' as i8),
            _ => return None,
        };
        let row = match rank {
            '1'..='8' => 8 - ((rank as i8) - ('0' as i8)),
            _ => return None,
        };
        Some(Position { row, col })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }

    /// 按 (from_row, from_col, to_row, to_col) 构造
    pub fn from_coords(from_row: i8, from_col: i8, to_row: i8, to_col: i8) -> Self {
        Move {
            from: Position::new(from_row, from_col),
            to: Position::new(to_row, to_col),
        }
    }

    /// 坐标走法字符串，如 "e2e4"
    pub fn to_coord_str(&self) -> String {
        format!("{}{}", self.from.to_algebraic(), self.to.to_algebraic())
    }

    /// 从坐标走法字符串解析
    pub fn from_coord_str(s: &str) -> Option<Move> {
        let s = s.trim();
        if s.len() != 4 || !s.is_ascii() {
            return None;
        }
        let from = Position::from_algebraic(&s[0..2])?;
        let to = Position::from_algebraic(&s[2..4])?;
        Some(Move { from, to })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coord_str())
    }
}

/// 终局原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// 一方棋子全部被吃
    AllDead,
    /// 王被吃
    KingDead,
    /// 被将死
    CheckMate,
}

/// 终局结果：`winner` 获胜，`loser` 是当前行棋方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub winner: Team,
    pub reason: GameOverReason,
}

impl GameOver {
    pub fn loser(&self) -> Team {
        self.winner.opponent()
    }

    /// 原因编码，如 "blackCheckMate"
    pub fn reason_code(&self) -> String {
        let suffix = match self.reason {
            GameOverReason::AllDead => "AllDead",
            GameOverReason::KingDead => "KingDead",
            GameOverReason::CheckMate => "CheckMate",
        };
        format!("{}{}", self.loser().as_str(), suffix)
    }
}

impl fmt::Display for GameOver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wins ({})", self.winner, self.reason_code())
    }
}
