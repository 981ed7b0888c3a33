//! 引擎错误类型

use crate::types::{Position, Team};
use thiserror::Error;

/// 引擎错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// 起点没有棋子（调用方错误）
    #[error("No piece at move origin {from}")]
    NoPieceAtOrigin { from: Position },

    /// 走法的起点或终点在棋盘之外（调用方错误）
    #[error("Square {square} is off the board")]
    OffBoard { square: Position },

    /// 走子方与当前回合不符（调用方错误）
    #[error("Current turn is {turn} but {mover} is moving")]
    WrongTurn { turn: Team, mover: Team },

    /// 局面指纹非法
    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    /// 没有可选走法（调用方应先检查终局）
    #[error("No legal moves available for {0}")]
    NoLegalMoves(Team),

    /// 未知策略名
    #[error("Unknown strategy: {0}. Available: random, greedy, lookahead, minimax, alphabeta, mcts, qlearning")]
    UnknownStrategy(String),
}

/// 引擎操作的结果类型
pub type EngineResult<T> = Result<T, EngineError>;
