//! 棋盘状态
//!
//! 8x8 数组存储棋子，记录当前回合与棋谱。搜索时通过 `copy()` 得到互不影响的副本，
//! 副本不会发出任何变更通知。

use crate::error::{EngineError, EngineResult};
use crate::fingerprint::{fingerprint_of, parse_fingerprint};
use crate::notation::{notation_text, Notation};
use crate::piece::{castling_rook_square, is_movable, Piece};
use crate::types::{GameOver, GameOverReason, Move, PieceKind, Position, Team};
use log::debug;
use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// 底线棋子排列（a 列到 h 列）
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 一次落子的附带结果
#[derive(Debug, Default)]
struct Relocation {
    captured: Option<Piece>,
    castling: bool,
    promotion: bool,
}

/// 棋盘
pub struct Board {
    squares: [Option<Piece>; 64],
    turn: Team,
    /// 棋谱，副本之间共享记录本身
    notations: Vec<Arc<Notation>>,
    /// 是否为对局中真正的棋盘（非搜索副本）
    canonical: bool,
    /// 唯一订阅者，每次成功走子后收到新的行棋方
    subscriber: Option<Sender<Team>>,
}

impl Board {
    /// 创建标准开局的棋盘
    pub fn new() -> Board {
        let mut board = Board::blank(true);
        board.reset();
        board
    }

    fn blank(canonical: bool) -> Board {
        Board {
            squares: [None; 64],
            turn: Team::White,
            notations: Vec::new(),
            canonical,
            subscriber: None,
        }
    }

    /// 从指纹创建棋盘
    pub fn from_fingerprint(fp: &str, turn: Team) -> EngineResult<Board> {
        let mut board = Board::blank(true);
        board.import_payload(fp)?;
        board.turn = turn;
        Ok(board)
    }

    /// 恢复标准开局，清空棋谱，白方先行
    pub fn reset(&mut self) {
        self.squares = [None; 64];
        for (col, kind) in BACK_RANK.iter().enumerate() {
            let col = col as i8;
            self.place(Piece::new(Team::Black, *kind, Position::new(0, col)));
            self.place(Piece::new(Team::Black, PieceKind::Pawn, Position::new(1, col)));
            self.place(Piece::new(Team::White, PieceKind::Pawn, Position::new(6, col)));
            self.place(Piece::new(Team::White, *kind, Position::new(7, col)));
        }
        self.notations.clear();
        self.turn = Team::White;
    }

    #[inline]
    fn place(&mut self, piece: Piece) {
        self.squares[piece.position.to_index()] = Some(piece);
    }

    /// 深拷贝：棋子独立，棋谱浅拷贝，副本不是 canonical 且没有订阅者
    pub fn copy(&self) -> Board {
        Board {
            squares: self.squares,
            turn: self.turn,
            notations: self.notations.clone(),
            canonical: false,
            subscriber: None,
        }
    }

    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// 订阅走子通知，仅 canonical 棋盘可订阅；再次订阅会替换旧的订阅者
    pub fn subscribe(&mut self) -> Option<Receiver<Team>> {
        if !self.canonical {
            return None;
        }
        let (tx, rx) = channel();
        self.subscriber = Some(tx);
        Some(rx)
    }

    /// 获取当前回合
    #[inline]
    pub fn turn(&self) -> Team {
        self.turn
    }

    /// 设置当前回合（导入局面后使用）
    #[inline]
    pub fn set_turn(&mut self, team: Team) {
        self.turn = team;
    }

    /// 获取某位置的棋子
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()].as_ref()
    }

    /// 某方所有棋子（行优先顺序）
    pub fn team_pieces(&self, team: Team) -> Vec<Piece> {
        self.squares
            .iter()
            .flatten()
            .filter(|p| p.team == team)
            .copied()
            .collect()
    }

    /// 某方子力总和
    pub fn team_material(&self, team: Team) -> i32 {
        self.squares
            .iter()
            .flatten()
            .filter(|p| p.team == team)
            .map(|p| p.value())
            .sum()
    }

    /// 找到王的位置
    pub fn find_king(&self, team: Team) -> Option<Position> {
        self.squares
            .iter()
            .flatten()
            .find(|p| p.team == team && p.kind == PieceKind::King)
            .map(|p| p.position)
    }

    /// 棋谱
    pub fn notations(&self) -> &[Arc<Notation>] {
        &self.notations
    }

    /// 导出 64 字符指纹
    pub fn export(&self) -> String {
        fingerprint_of(&self.squares)
    }

    /// 从指纹恢复局面
    ///
    /// 棋子的移动次数会丢失（全部为 0），因此导入后的易位资格不可靠。
    /// 回合与棋谱保持不变。
    pub fn import_payload(&mut self, fp: &str) -> EngineResult<()> {
        let pieces = parse_fingerprint(fp)?;
        self.squares = [None; 64];
        for piece in pieces {
            self.place(piece);
        }
        Ok(())
    }

    /// 执行走子，返回记谱文本（`without_notation` 时为 None）
    ///
    /// 起点无子或走子方不是当前回合时返回错误，棋盘保持不变。
    /// 不会重新校验走法是否合法，调用方只能传入已确认合法的走法。
    pub fn move_piece(&mut self, mv: Move, without_notation: bool) -> EngineResult<Option<String>> {
        for square in [mv.from, mv.to] {
            if !square.is_valid() {
                return Err(EngineError::OffBoard { square });
            }
        }
        let mover = match self.piece_at(mv.from) {
            Some(p) => *p,
            None => return Err(EngineError::NoPieceAtOrigin { from: mv.from }),
        };
        if mover.team != self.turn {
            return Err(EngineError::WrongTurn {
                turn: self.turn,
                mover: mover.team,
            });
        }

        let relocation = self.relocate(mv);
        if relocation.promotion && self.canonical {
            debug!("promotion at {}", mv.to);
        }

        let next = mover.team.opponent();
        let text = if without_notation {
            None
        } else {
            let text = notation_text(
                &mover,
                relocation.captured.as_ref(),
                mv.to,
                relocation.castling,
                relocation.promotion,
            );
            self.notations.push(Arc::new(Notation {
                text: text.clone(),
                fingerprint: self.export(),
                mv,
                team: mover.team,
                captured: relocation.captured,
            }));
            Some(text)
        };

        self.turn = next;
        if self.canonical {
            self.notify(next);
        }
        Ok(text)
    }

    fn notify(&mut self, next: Team) {
        if let Some(tx) = &self.subscriber {
            if tx.send(next).is_err() {
                // 接收端已关闭
                self.subscriber = None;
            }
        }
    }

    /// 移动棋子：处理吃子、升变和易位时车的移动，不切换回合
    fn relocate(&mut self, mv: Move) -> Relocation {
        let Some(mut piece) = self.squares[mv.from.to_index()].take() else {
            return Relocation::default();
        };
        let captured = self.squares[mv.to.to_index()].take();

        let promotion =
            piece.kind == PieceKind::Pawn && mv.to.row == piece.team.promotion_row();
        if promotion {
            piece.kind = PieceKind::Queen;
        }
        piece.position = mv.to;
        piece.move_count += 1;

        let mut castling = false;
        if piece.kind == PieceKind::King {
            if let Some(rook_pos) = castling_rook_square(mv.from, mv.to) {
                if let Some(mut rook) = self.squares[rook_pos.to_index()] {
                    if rook.kind == PieceKind::Rook
                        && rook.team == piece.team
                        && rook.move_count == 0
                    {
                        let step = (mv.to.col - mv.from.col).signum();
                        self.squares[rook_pos.to_index()] = None;
                        rook.position = mv.from.offset(0, step);
                        rook.move_count += 1;
                        self.place(rook);
                        castling = true;
                    }
                }
            }
        }

        self.place(piece);
        Relocation {
            captured,
            castling,
            promotion,
        }
    }

    /// 某个棋子的所有可走位置
    pub fn available_moves(&self, piece: &Piece, threat_check: bool) -> Vec<Move> {
        (0..64)
            .map(Position::from_index)
            .filter(|&to| is_movable(self, piece, to, threat_check))
            .map(|to| Move::new(piece.position, to))
            .collect()
    }

    /// 某方所有棋子的可走位置
    pub fn team_moves(&self, team: Team, threat_check: bool) -> Vec<Move> {
        let mut moves = Vec::with_capacity(40);
        for piece in self.team_pieces(team) {
            moves.extend(self.available_moves(&piece, threat_check));
        }
        moves
    }

    /// 当前行棋方的所有可走位置
    pub fn all_available_moves(&self, threat_check: bool) -> Vec<Move> {
        self.team_moves(self.turn, threat_check)
    }

    /// 在副本上试走后，走子方的王是否被攻击
    pub(crate) fn is_threatened_after_move(&self, piece: &Piece, mv: Move) -> bool {
        let mut temp = self.copy();
        temp.relocate(mv);
        temp.is_king_threatened(piece.team)
    }

    /// 王是否被对方任一棋子攻击（不做威胁过滤）；没有王时返回 false
    pub fn is_king_threatened(&self, team: Team) -> bool {
        let Some(king_pos) = self.find_king(team) else {
            return false;
        };
        self.squares
            .iter()
            .flatten()
            .filter(|p| p.team != team)
            .any(|p| is_movable(self, p, king_pos, false))
    }

    /// 是否被将军
    #[inline]
    pub fn is_check(&self, team: Team) -> bool {
        self.is_king_threatened(team)
    }

    /// 是否被将死：正被将军，且逐个试走所有合法走法后王仍然被攻击
    pub fn is_check_mate(&self, team: Team) -> bool {
        if !self.is_check(team) {
            return false;
        }
        for mv in self.team_moves(team, true) {
            let mut temp = self.copy();
            temp.relocate(mv);
            if !temp.is_king_threatened(team) {
                return false;
            }
        }
        true
    }

    /// 判断对局是否结束，只检查当前行棋方
    ///
    /// 无子可走但未被将军（逼和）不算结束。
    pub fn is_game_over(&self) -> Option<GameOver> {
        let team = self.turn;
        let winner = team.opponent();
        let pieces = self.team_pieces(team);

        let reason = if pieces.is_empty() {
            GameOverReason::AllDead
        } else if !pieces.iter().any(|p| p.kind == PieceKind::King) {
            GameOverReason::KingDead
        } else if self.is_check_mate(team) {
            GameOverReason::CheckMate
        } else {
            return None;
        };
        Some(GameOver { winner, reason })
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("fingerprint", &self.export())
            .field("turn", &self.turn)
            .field("notations", &self.notations.len())
            .field("canonical", &self.canonical)
            .finish()
    }
}

/// 文本棋盘，白方在下
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8 {
                let ch = self
                    .piece_at(Position::new(row, col))
                    .map_or('.', |p| p.code());
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
