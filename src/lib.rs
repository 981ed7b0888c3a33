//! Chess rule engine and AI strategies
//!
//! 国际象棋规则引擎与 AI 策略 - 支持 64 字符指纹的导入导出

pub mod ai;
pub mod board;
pub mod error;
pub mod fingerprint;
pub mod notation;
pub mod piece;
pub mod test_positions;
pub mod types;

pub use ai::{
    normalize_moves, AIConfig, AIEngine, AIStrategy, AdvantageCache, Evaluation, MoveChoice,
    ScoredMove, AVAILABLE_STRATEGIES, DEFAULT_STRATEGY,
};
pub use board::Board;
pub use error::{EngineError, EngineResult};
pub use fingerprint::{FINGERPRINT_LEN, START_FINGERPRINT};
pub use notation::Notation;
pub use piece::{is_movable, Piece};
pub use types::{GameOver, GameOverReason, Move, PieceKind, Position, Team};
