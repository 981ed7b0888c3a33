//! AI 策略模块
//!
//! 提供多种 AI 策略实现：随机、贪婪（0 层 / 1 层应着）、Minimax、Alpha-Beta、
//! MCTS 和表格 Q-learning。所有策略都只读传入的棋盘，在副本上展开搜索。

mod alphabeta;
pub mod eval;
mod greedy;
mod lookahead;
mod mcts;
mod minimax;
mod qlearning;
mod random;

pub use alphabeta::AlphaBetaAI;
pub use eval::{AdvantageCache, Evaluation};
pub use greedy::GreedyAI;
pub use lookahead::LookaheadAI;
pub use mcts::MCTSAI;
pub use minimax::MinimaxAI;
pub use qlearning::QLearningAI;
pub use random::RandomAI;

use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::{Move, Team};
use rand::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;

/// 可用的策略名
pub const AVAILABLE_STRATEGIES: &[&str] = &[
    "random",
    "greedy",
    "lookahead",
    "minimax",
    "alphabeta",
    "mcts",
    "qlearning",
];

/// 默认策略
pub const DEFAULT_STRATEGY: &str = "alphabeta";

/// AI 配置
#[derive(Debug, Clone)]
pub struct AIConfig {
    /// 搜索深度（minimax / alphabeta）
    pub depth: u32,
    /// MCTS 迭代次数
    pub iterations: u32,
    /// 随机种子
    pub seed: Option<u64>,
    /// 贪婪策略使用的评估方式
    pub evaluation: Evaluation,
    /// minimax / alphabeta 叶子节点的评估方式
    pub search_evaluation: Evaluation,
    /// UCT 探索常数
    pub exploration: f64,
    /// MCTS 每次模拟最多走的步数
    pub rollout_limit: u32,
    /// Q-learning 学习率
    pub alpha: f64,
    /// Q-learning 折扣因子
    pub gamma: f64,
    /// Q-learning 探索概率
    pub epsilon: f64,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            depth: 2,
            iterations: 12,
            seed: None,
            evaluation: Evaluation::Extended,
            search_evaluation: Evaluation::Simple,
            exploration: std::f64::consts::SQRT_2,
            rollout_limit: 200,
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.2,
        }
    }
}

/// 带评分的走法
///
/// 这些标注只在一次查询中有效，不会写回棋盘。
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMove {
    #[serde(rename = "move")]
    pub mv: Move,
    pub profit: f64,
    /// 归一化到 [0, 1] 的收益，由 `normalize_moves` 填充
    pub normalized_profit: Option<f64>,
    pub optimal: bool,
    /// 对手的应着（仅 1 层应着的贪婪策略填充）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<ScoredMove>,
}

impl ScoredMove {
    pub fn new(mv: Move, profit: f64) -> Self {
        ScoredMove {
            mv,
            profit,
            normalized_profit: None,
            optimal: false,
            replies: Vec::new(),
        }
    }
}

/// 策略的选择结果
#[derive(Debug, Clone, Serialize)]
pub struct MoveChoice {
    #[serde(rename = "move")]
    pub mv: Move,
    /// 所有候选走法及评分（随机策略为空）
    pub moves: Vec<ScoredMove>,
}

/// AI 策略接口
pub trait AIStrategy {
    /// 策略名称
    fn name(&self) -> String;

    /// 为 `team` 选择走法
    ///
    /// 调用前应先确认对局未结束；没有候选走法时返回 `EngineError::NoLegalMoves`。
    fn get_move(&mut self, board: &Board, team: Team) -> EngineResult<MoveChoice>;
}

/// 创建随机数生成器
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// 按收益从高到低排序
pub(crate) fn sort_by_profit(scored: &mut [ScoredMove]) {
    scored.sort_by(|a, b| b.profit.partial_cmp(&a.profit).unwrap_or(Ordering::Equal));
}

/// 在收益最高的走法中随机选一个
pub(crate) fn pick_best(scored: &[ScoredMove], rng: &mut StdRng) -> Option<Move> {
    let best = scored
        .iter()
        .map(|s| s.profit)
        .fold(f64::NEG_INFINITY, f64::max);
    let ties: Vec<Move> = scored
        .iter()
        .filter(|s| s.profit == best)
        .map(|s| s.mv)
        .collect();
    ties.choose(rng).copied()
}

/// 填充归一化收益和最优标记
pub fn normalize_moves(moves: &mut [ScoredMove]) {
    if moves.is_empty() {
        return;
    }
    let max = moves.iter().map(|m| m.profit).fold(f64::NEG_INFINITY, f64::max);
    let min = moves.iter().map(|m| m.profit).fold(f64::INFINITY, f64::min);
    let range = max - min;
    for m in moves.iter_mut() {
        m.normalized_profit = Some(if range > 0.0 {
            (m.profit - min) / range
        } else {
            1.0
        });
        m.optimal = m.profit == max;
    }
}

/// AI 引擎 - 统一的 AI 接口
pub struct AIEngine {
    strategy: Box<dyn AIStrategy>,
}

impl AIEngine {
    /// 创建随机 AI
    pub fn random(seed: Option<u64>) -> Self {
        AIEngine {
            strategy: Box::new(RandomAI::new(seed)),
        }
    }

    /// 创建 0 层贪婪 AI
    pub fn greedy(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(GreedyAI::new(config)),
        }
    }

    /// 创建 1 层应着贪婪 AI
    pub fn lookahead(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(LookaheadAI::new(config)),
        }
    }

    /// 创建 Minimax AI
    pub fn minimax(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(MinimaxAI::new(config)),
        }
    }

    /// 创建 Alpha-Beta AI
    pub fn alphabeta(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(AlphaBetaAI::new(config)),
        }
    }

    /// 创建 MCTS AI
    pub fn mcts(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(MCTSAI::new(config)),
        }
    }

    /// 创建 Q-learning AI
    pub fn qlearning(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(QLearningAI::new(config)),
        }
    }

    /// 从策略名称创建
    pub fn from_strategy(name: &str, config: &AIConfig) -> EngineResult<Self> {
        match name.to_lowercase().as_str() {
            "random" => Ok(Self::random(config.seed)),
            "greedy" | "d0" => Ok(Self::greedy(config)),
            "lookahead" | "d1" => Ok(Self::lookahead(config)),
            "minimax" => Ok(Self::minimax(config)),
            "alphabeta" | "alpha_beta" => Ok(Self::alphabeta(config)),
            "mcts" | "montecarlo" => Ok(Self::mcts(config)),
            "qlearning" | "q" => Ok(Self::qlearning(config)),
            _ => Err(EngineError::UnknownStrategy(name.to_string())),
        }
    }

    pub fn name(&self) -> String {
        self.strategy.name()
    }

    /// 为 `team` 选择走法，候选列表带归一化标注
    pub fn get_move(&mut self, board: &Board, team: Team) -> EngineResult<MoveChoice> {
        let mut choice = self.strategy.get_move(board, team)?;
        normalize_moves(&mut choice.moves);
        for m in choice.moves.iter_mut() {
            normalize_moves(&mut m.replies);
        }
        Ok(choice)
    }

    /// 从指纹选择走法
    pub fn get_move_fingerprint(&mut self, fp: &str, team: Team) -> EngineResult<MoveChoice> {
        let board = Board::from_fingerprint(fp, team)?;
        self.get_move(&board, team)
    }
}
