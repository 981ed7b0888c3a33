//! 表格 Q-learning AI 策略
//!
//! Q 表以 (状态, 走法) 为键，状态是 "行棋方|指纹"。
//! `learn` 只在显式调用时更新 Q 表，引擎和命令行都不会调用它，
//! 所以没有训练过的实例实际上就是随机走子。

use super::{make_rng, sort_by_profit, AIConfig, AIStrategy, MoveChoice, ScoredMove};
use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::{Move, Team};
use log::{debug, trace};
use rand::prelude::*;
use std::collections::HashMap;

pub struct QLearningAI {
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    rng: StdRng,
    table: HashMap<(String, Move), f64>,
}

impl QLearningAI {
    pub fn new(config: &AIConfig) -> Self {
        QLearningAI {
            alpha: config.alpha,
            gamma: config.gamma,
            epsilon: config.epsilon,
            rng: make_rng(config.seed),
            table: HashMap::new(),
        }
    }

    fn state_key(board: &Board) -> String {
        format!("{}|{}", board.turn(), board.export())
    }

    /// 已学到的 Q 值
    pub fn q_value(&self, board: &Board, mv: Move) -> Option<f64> {
        self.table.get(&(Self::state_key(board), mv)).copied()
    }

    /// Q 表条目数
    pub fn table_size(&self) -> usize {
        self.table.len()
    }

    /// 用一次转移更新 Q 值
    ///
    /// `Q ← (1 − alpha)·Q + alpha·(reward + gamma·max Q(next, a'))`，
    /// 未知的 Q 值按 0 计；`next` 没有走法时 max 取 0。
    pub fn learn(&mut self, board: &Board, mv: Move, reward: f64, next: &Board) {
        let next_key = Self::state_key(next);
        let next_max = next
            .team_moves(next.turn(), true)
            .into_iter()
            .map(|a| self.table.get(&(next_key.clone(), a)).copied().unwrap_or(0.0))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
            .unwrap_or(0.0);

        let key = (Self::state_key(board), mv);
        let old = self.table.get(&key).copied().unwrap_or(0.0);
        let updated = (1.0 - self.alpha) * old + self.alpha * (reward + self.gamma * next_max);
        trace!("q({}) {} -> {}", mv, old, updated);
        self.table.insert(key, updated);
    }
}

impl AIStrategy for QLearningAI {
    fn name(&self) -> String {
        format!("Q-Learning AI (epsilon={})", self.epsilon)
    }

    fn get_move(&mut self, board: &Board, team: Team) -> EngineResult<MoveChoice> {
        if board.turn() != team {
            return Err(EngineError::WrongTurn {
                turn: board.turn(),
                mover: team,
            });
        }
        let moves = board.team_moves(team, true);
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves(team));
        }

        let state = Self::state_key(board);
        let known = moves
            .iter()
            .filter(|&&mv| self.table.contains_key(&(state.clone(), mv)))
            .count();

        // 这个状态学过至少一个走法时，全部走法都参与比较，未知的按 0 计
        let mut scored: Vec<ScoredMove> = if known == 0 {
            Vec::new()
        } else {
            moves
                .iter()
                .map(|&mv| {
                    let q = self.table.get(&(state.clone(), mv)).copied().unwrap_or(0.0);
                    ScoredMove::new(mv, q)
                })
                .collect()
        };

        let explore = self.rng.gen::<f64>() < self.epsilon;
        let mv = if explore || scored.is_empty() {
            *moves
                .choose(&mut self.rng)
                .ok_or(EngineError::NoLegalMoves(team))?
        } else {
            let best = scored
                .iter()
                .map(|s| s.profit)
                .fold(f64::NEG_INFINITY, f64::max);
            let ties: Vec<Move> = scored
                .iter()
                .filter(|s| s.profit == best)
                .map(|s| s.mv)
                .collect();
            *ties
                .choose(&mut self.rng)
                .ok_or(EngineError::NoLegalMoves(team))?
        };

        debug!(
            "qlearning picked {} (explore: {}, known: {}/{})",
            mv,
            explore,
            known,
            moves.len()
        );
        sort_by_profit(&mut scored);
        Ok(MoveChoice { mv, moves: scored })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(epsilon: f64) -> AIConfig {
        AIConfig {
            seed: Some(17),
            alpha: 0.5,
            gamma: 0.9,
            epsilon,
            ..Default::default()
        }
    }

    #[test]
    fn test_untrained_plays_random_legal_moves() {
        let board = Board::new();
        let legal = board.team_moves(Team::White, true);
        let mut ai = QLearningAI::new(&config(0.0));
        for _ in 0..10 {
            let choice = ai.get_move(&board, Team::White).unwrap();
            assert!(legal.contains(&choice.mv));
            assert!(choice.moves.is_empty());
        }
        assert_eq!(ai.table_size(), 0);
    }

    #[test]
    fn test_learn_update_rule() {
        let board = Board::new();
        let mv = Move::from_coord_str("e2e4").unwrap();
        let mut next = board.copy();
        next.move_piece(mv, true).unwrap();

        let mut ai = QLearningAI::new(&config(0.0));
        ai.learn(&board, mv, 1.0, &next);
        // (1 - 0.5) * 0 + 0.5 * (1 + 0.9 * 0)
        assert_eq!(ai.q_value(&board, mv), Some(0.5));

        // 给后继局面一个已知值，再更新一次
        let reply = Move::from_coord_str("e7e5").unwrap();
        let mut after_reply = next.copy();
        after_reply.move_piece(reply, true).unwrap();
        ai.learn(&next, reply, 2.0, &after_reply);
        assert_eq!(ai.q_value(&next, reply), Some(1.0));

        ai.learn(&board, mv, 1.0, &next);
        // 0.5 * 0.5 + 0.5 * (1 + 0.9 * 1.0)
        let q = ai.q_value(&board, mv).unwrap();
        assert!((q - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_exploits_learned_values() {
        let board = Board::new();
        let good = Move::from_coord_str("d2d4").unwrap();
        let bad = Move::from_coord_str("a2a3").unwrap();
        let mut ai = QLearningAI::new(&config(0.0));
        for (mv, reward) in [(good, 5.0), (bad, -5.0)] {
            let mut next = board.copy();
            next.move_piece(mv, true).unwrap();
            ai.learn(&board, mv, reward, &next);
        }
        for _ in 0..10 {
            let choice = ai.get_move(&board, Team::White).unwrap();
            assert_eq!(choice.mv, good);
            // 未学过的走法以 0 参与排序
            assert_eq!(choice.moves.len(), 20);
            assert_eq!(choice.moves[0].mv, good);
            assert_eq!(choice.moves[1].profit, 0.0);
            assert_eq!(choice.moves[19].mv, bad);
        }
    }

    #[test]
    fn test_unknown_replies_count_as_zero() {
        let board = Board::new();
        let e4 = Move::from_coord_str("e2e4").unwrap();
        let e5 = Move::from_coord_str("e7e5").unwrap();
        let mut next = board.copy();
        next.move_piece(e4, true).unwrap();
        let mut after = next.copy();
        after.move_piece(e5, true).unwrap();

        let mut ai = QLearningAI::new(&AIConfig {
            seed: Some(3),
            alpha: 1.0,
            gamma: 1.0,
            epsilon: 0.0,
            ..Default::default()
        });
        ai.learn(&next, e5, -4.0, &after);
        assert_eq!(ai.q_value(&next, e5), Some(-4.0));

        // 黑方其余应着未知即为 0，所以 max 是 0 而不是 -4
        ai.learn(&board, e4, 0.0, &next);
        assert_eq!(ai.q_value(&board, e4), Some(0.0));

        for _ in 0..10 {
            let choice = ai.get_move(&next, Team::Black).unwrap();
            assert_ne!(choice.mv, e5);
            assert_eq!(choice.moves.last().unwrap().mv, e5);
        }
    }

    #[test]
    fn test_rejects_side_not_to_move() {
        let mut ai = QLearningAI::new(&config(0.0));
        assert_eq!(
            ai.get_move(&Board::new(), Team::Black).unwrap_err(),
            EngineError::WrongTurn {
                turn: Team::White,
                mover: Team::Black
            }
        );
    }

    #[test]
    fn test_state_includes_side_to_move() {
        let board = Board::new();
        let mv = Move::from_coord_str("e2e4").unwrap();
        let mut next = board.copy();
        next.move_piece(mv, true).unwrap();
        let mut ai = QLearningAI::new(&config(0.0));
        ai.learn(&board, mv, 1.0, &next);

        let mut black_to_move = board.copy();
        black_to_move.set_turn(Team::Black);
        assert_eq!(ai.q_value(&black_to_move, mv), None);
    }
}
