//! Alpha-Beta 剪枝 AI 策略
//!
//! 与 Minimax 相同的 negamax 递归，加上 alpha/beta 窗口。
//! 根节点的每个走法都用完整窗口搜索，所以根节点收益与 Minimax 完全一致；
//! 内部节点按子力差预排序以提高剪枝率。

use super::{make_rng, pick_best, sort_by_profit, AIConfig, AIStrategy, MoveChoice, ScoredMove};
use crate::ai::eval::{material_advantage, AdvantageCache};
use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::{Move, Team};
use log::debug;
use rand::prelude::*;
use std::cmp::Ordering;

pub struct AlphaBetaAI {
    depth: u32,
    rng: StdRng,
    cache: AdvantageCache,
    nodes: u64,
    cutoffs: u64,
}

impl AlphaBetaAI {
    pub fn new(config: &AIConfig) -> Self {
        AlphaBetaAI {
            depth: config.depth.max(1),
            rng: make_rng(config.seed),
            cache: AdvantageCache::new(config.search_evaluation),
            nodes: 0,
            cutoffs: 0,
        }
    }

    /// 上一次搜索访问的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes
    }

    /// 展开子节点，按走后的子力差从高到低排序
    fn ordered_children(board: &Board, moves: Vec<Move>) -> EngineResult<Vec<Board>> {
        let side = board.turn();
        let mut children = Vec::with_capacity(moves.len());
        for mv in moves {
            let mut child = board.copy();
            child.move_piece(mv, true)?;
            let key = material_advantage(&child, side);
            children.push((key, child));
        }
        children.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        Ok(children.into_iter().map(|(_, child)| child).collect())
    }

    fn alphabeta(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: f64,
        beta: f64,
    ) -> EngineResult<f64> {
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
        for child in Self::ordered_children(board, moves)? {
            let value = -self.alphabeta(&child, depth - 1, -beta, -alpha)?;
            if value > best {
                best = value;
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                self.cutoffs += 1;
                break;
            }
        }
        Ok(best)
    }
}

impl AIStrategy for AlphaBetaAI {
    fn name(&self) -> String {
        format!("AlphaBeta AI (depth={})", self.depth)
    }

    fn get_move(&mut self, board: &Board, team: Team) -> EngineResult<MoveChoice> {
        if board.turn() != team {
            return Err(EngineError::WrongTurn {
                turn: board.turn(),
                mover: team,
            });
        }
        self.nodes = 0;
        self.cutoffs = 0;

        let mut scored = Vec::new();
        for mv in board.team_moves(team, true) {
            let mut child = board.copy();
            child.move_piece(mv, true)?;
            let profit =
                -self.alphabeta(&child, self.depth - 1, f64::NEG_INFINITY, f64::INFINITY)?;
            scored.push(ScoredMove::new(mv, profit));
        }

        sort_by_profit(&mut scored);
        let mv = pick_best(&scored, &mut self.rng).ok_or(EngineError::NoLegalMoves(team))?;
        debug!(
            "alphabeta depth {} picked {} after {} nodes, {} cutoffs",
            self.depth, mv, self.nodes, self.cutoffs
        );
        Ok(MoveChoice { mv, moves: scored })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Evaluation, MinimaxAI};
    use crate::test_positions;

    fn config(depth: u32) -> AIConfig {
        AIConfig {
            depth,
            seed: Some(9),
            search_evaluation: Evaluation::Simple,
            ..Default::default()
        }
    }

    fn assert_same_profits(fp: &str, team: Team, depth: u32) {
        let board = Board::from_fingerprint(fp, team).unwrap();
        let mut ab = AlphaBetaAI::new(&config(depth));
        let mut mm = MinimaxAI::new(&config(depth));
        let a = ab.get_move(&board, team).unwrap();
        let m = mm.get_move(&board, team).unwrap();
        assert_eq!(a.moves.len(), m.moves.len());
        for s in &a.moves {
            let other = m.moves.iter().find(|x| x.mv == s.mv).unwrap();
            assert_eq!(s.profit, other.profit, "{}", s.mv);
        }
    }

    #[test]
    fn test_matches_minimax_profits() {
        assert_same_profits(test_positions::HANGING_QUEEN, Team::White, 2);
        assert_same_profits(test_positions::END_ROOK_VS_PAWN, Team::White, 3);
        assert_same_profits(test_positions::MATE_IN_ONE, Team::White, 3);
    }

    #[test]
    fn test_finds_mate_in_one() {
        let board = Board::from_fingerprint(test_positions::MATE_IN_ONE, Team::White).unwrap();
        let mut ai = AlphaBetaAI::new(&config(3));
        let choice = ai.get_move(&board, Team::White).unwrap();
        assert_eq!(choice.mv, Move::from_coord_str("a1a8").unwrap());
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let board = Board::from_fingerprint(test_positions::MATE_IN_ONE, Team::White).unwrap();
        let mut ab = AlphaBetaAI::new(&config(3));
        let mut mm = MinimaxAI::new(&config(3));
        ab.get_move(&board, Team::White).unwrap();
        mm.get_move(&board, Team::White).unwrap();
        assert!(ab.cutoffs > 0);
        assert!(ab.nodes_searched() < mm.nodes_searched());
    }
}
