//! 贪婪 AI 策略（0 层）

use super::{make_rng, pick_best, sort_by_profit, AIConfig, AIStrategy, MoveChoice, ScoredMove};
use crate::ai::eval::AdvantageCache;
use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::Team;
use log::debug;
use rand::prelude::*;

/// 贪婪 AI - 每个合法走法试走一次，按走后己方优势打分
pub struct GreedyAI {
    rng: StdRng,
    cache: AdvantageCache,
}

impl GreedyAI {
    pub fn new(config: &AIConfig) -> Self {
        GreedyAI {
            rng: make_rng(config.seed),
            cache: AdvantageCache::new(config.evaluation),
        }
    }
}

impl AIStrategy for GreedyAI {
    fn name(&self) -> String {
        "Greedy AI (D0)".to_string()
    }

    fn get_move(&mut self, board: &Board, team: Team) -> EngineResult<MoveChoice> {
        if board.turn() != team {
            return Err(EngineError::WrongTurn {
                turn: board.turn(),
                mover: team,
            });
        }
        let mut scored = Vec::new();
        for mv in board.team_moves(team, true) {
            let mut temp = board.copy();
            temp.move_piece(mv, true)?;
            scored.push(ScoredMove::new(mv, self.cache.advantage(&temp, team)));
        }

        sort_by_profit(&mut scored);
        let mv = pick_best(&scored, &mut self.rng).ok_or(EngineError::NoLegalMoves(team))?;
        debug!(
            "greedy picked {} out of {} moves (cache size {})",
            mv,
            scored.len(),
            self.cache.len()
        );
        Ok(MoveChoice { mv, moves: scored })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Evaluation;
    use crate::test_positions;

    fn config(evaluation: Evaluation) -> AIConfig {
        AIConfig {
            seed: Some(3),
            evaluation,
            ..Default::default()
        }
    }

    #[test]
    fn test_scores_every_legal_move() {
        let board = Board::new();
        let mut ai = GreedyAI::new(&config(Evaluation::Extended));
        let choice = ai.get_move(&board, Team::White).unwrap();
        assert_eq!(choice.moves.len(), 20);
        // 已按收益降序排列
        assert!(choice
            .moves
            .windows(2)
            .all(|w| w[0].profit >= w[1].profit));
        let best = choice.moves[0].profit;
        let chosen = choice.moves.iter().find(|m| m.mv == choice.mv).unwrap();
        assert_eq!(chosen.profit, best);
    }

    #[test]
    fn test_takes_free_material() {
        let board = Board::from_fingerprint(test_positions::HANGING_QUEEN, Team::White).unwrap();
        for evaluation in [Evaluation::Simple, Evaluation::Extended] {
            let mut ai = GreedyAI::new(&config(evaluation));
            let choice = ai.get_move(&board, Team::White).unwrap();
            assert_eq!(choice.mv.to_coord_str(), "d1d5");
        }
    }

    #[test]
    fn test_simple_ties_are_broken_among_best() {
        // 起始局面所有走法子力差都为 0
        let board = Board::new();
        let mut ai = GreedyAI::new(&config(Evaluation::Simple));
        let choice = ai.get_move(&board, Team::White).unwrap();
        assert!(choice.moves.iter().all(|m| m.profit == 0.0));
    }

    #[test]
    fn test_rejects_side_not_to_move() {
        let mut ai = GreedyAI::new(&config(Evaluation::Simple));
        assert_eq!(
            ai.get_move(&Board::new(), Team::Black).unwrap_err(),
            EngineError::WrongTurn {
                turn: Team::White,
                mover: Team::Black
            }
        );
    }
}
