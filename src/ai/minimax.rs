//! Minimax AI 策略（negamax 形式）
//!
//! 只有根节点使用威胁过滤后的合法走法，更深的层只枚举伪合法走法。
//! 叶子节点返回当前行棋方视角的静态评估。

use super::{make_rng, pick_best, sort_by_profit, AIConfig, AIStrategy, MoveChoice, ScoredMove};
use crate::ai::eval::AdvantageCache;
use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::Team;
use log::debug;
use rand::prelude::*;

pub struct MinimaxAI {
    depth: u32,
    rng: StdRng,
    cache: AdvantageCache,
    nodes: u64,
}

impl MinimaxAI {
    pub fn new(config: &AIConfig) -> Self {
        MinimaxAI {
            depth: config.depth.max(1),
            rng: make_rng(config.seed),
            cache: AdvantageCache::new(config.search_evaluation),
            nodes: 0,
        }
    }

    /// 上一次搜索访问的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes
    }

    /// 返回 `board` 当前行棋方视角的局面值
    fn negamax(&mut self, board: &Board, depth: u32) -> EngineResult<f64> {
        self.nodes += 1;
        let side = board.turn();
        if depth == 0 {
            return Ok(self.cache.advantage(board, side));
        }

        let moves = board.team_moves(side, false);
        if moves.is_empty() {
            return Ok(self.cache.advantage(board, side));
        }

        let mut best = f64::NEG_INFINITY;
        for mv in moves {
            let mut child = board.copy();
            child.move_piece(mv, true)?;
            let value = -self.negamax(&child, depth - 1)?;
            if value > best {
                best = value;
            }
        }
        Ok(best)
    }
}

impl AIStrategy for MinimaxAI {
    fn name(&self) -> String {
        format!("Minimax AI (depth={})", self.depth)
    }

    fn get_move(&mut self, board: &Board, team: Team) -> EngineResult<MoveChoice> {
        if board.turn() != team {
            return Err(EngineError::WrongTurn {
                turn: board.turn(),
                mover: team,
            });
        }
        self.nodes = 0;

        let mut scored = Vec::new();
        for mv in board.team_moves(team, true) {
            let mut child = board.copy();
            child.move_piece(mv, true)?;
            let profit = -self.negamax(&child, self.depth - 1)?;
            scored.push(ScoredMove::new(mv, profit));
        }

        sort_by_profit(&mut scored);
        let mv = pick_best(&scored, &mut self.rng).ok_or(EngineError::NoLegalMoves(team))?;
        debug!(
            "minimax depth {} picked {} after {} nodes",
            self.depth, mv, self.nodes
        );
        Ok(MoveChoice { mv, moves: scored })
    }
}
