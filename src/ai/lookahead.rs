//! 贪婪 AI 策略（1 层应着）
//!
//! 对每个己方合法走法，枚举对手全部伪合法应着（不做威胁过滤），
//! 假设对手选择按同一评估对其最有利的应着，己方走法得分为该应着得分的相反数。

use super::{make_rng, pick_best, sort_by_profit, AIConfig, AIStrategy, MoveChoice, ScoredMove};
use crate::ai::eval::AdvantageCache;
use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::Team;
use log::{debug, trace};
use rand::prelude::*;

pub struct LookaheadAI {
    rng: StdRng,
    cache: AdvantageCache,
}

impl LookaheadAI {
    pub fn new(config: &AIConfig) -> Self {
        LookaheadAI {
            rng: make_rng(config.seed),
            cache: AdvantageCache::new(config.evaluation),
        }
    }

    /// 对手的所有应着，按对手视角打分
    fn score_replies(&mut self, after: &Board, opponent: Team) -> EngineResult<Vec<ScoredMove>> {
        let mut replies = Vec::new();
        for reply in after.team_moves(opponent, false) {
            let mut temp = after.copy();
            temp.move_piece(reply, true)?;
            replies.push(ScoredMove::new(reply, self.cache.advantage(&temp, opponent)));
        }
        sort_by_profit(&mut replies);
        Ok(replies)
    }
}

impl AIStrategy for LookaheadAI {
    fn name(&self) -> String {
        "Greedy AI (D1)".to_string()
    }

    fn get_move(&mut self, board: &Board, team: Team) -> EngineResult<MoveChoice> {
        if board.turn() != team {
            return Err(EngineError::WrongTurn {
                turn: board.turn(),
                mover: team,
            });
        }
        let opponent = team.opponent();
        let mut scored = Vec::new();

        for mv in board.team_moves(team, true) {
            let mut after = board.copy();
            after.move_piece(mv, true)?;

            let replies = self.score_replies(&after, opponent)?;
            // 对手无子可走时直接看走后的局面
            let profit = match replies.first() {
                Some(best) => -best.profit,
                None => self.cache.advantage(&after, team),
            };
            trace!("{} -> {} ({} replies)", mv, profit, replies.len());

            let mut candidate = ScoredMove::new(mv, profit);
            candidate.replies = replies;
            scored.push(candidate);
        }

        sort_by_profit(&mut scored);
        let mv = pick_best(&scored, &mut self.rng).ok_or(EngineError::NoLegalMoves(team))?;
        debug!(
            "lookahead picked {} out of {} moves (cache size {})",
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
    use crate::types::Move;

    fn config() -> AIConfig {
        AIConfig {
            seed: Some(11),
            evaluation: Evaluation::Simple,
            ..Default::default()
        }
    }

    #[test]
    fn test_replies_are_recorded() {
        let board = Board::new();
        let mut ai = LookaheadAI::new(&config());
        let choice = ai.get_move(&board, Team::White).unwrap();
        assert_eq!(choice.moves.len(), 20);
        for candidate in &choice.moves {
            // 黑方在任意白方首步后都有 20 个应着
            assert_eq!(candidate.replies.len(), 20);
            assert_eq!(candidate.profit, -candidate.replies[0].profit);
        }
    }

    #[test]
    fn test_avoids_losing_the_queen() {
        // 黑后 d5 与白后 d1 对峙，白方抢先吃后
        let board = Board::from_fingerprint(test_positions::HANGING_QUEEN, Team::White).unwrap();
        let mut ai = LookaheadAI::new(&config());
        let choice = ai.get_move(&board, Team::White).unwrap();
        assert_eq!(choice.mv, Move::from_coord_str("d1d5").unwrap());
        let best = &choice.moves[0];
        assert_eq!(best.profit, 9.0);
    }

    #[test]
    fn test_hanging_moves_score_negative() {
        let board = Board::from_fingerprint(test_positions::HANGING_QUEEN, Team::White).unwrap();
        let mut ai = LookaheadAI::new(&config());
        let choice = ai.get_move(&board, Team::White).unwrap();
        // 白后走到 d4 仍在黑后射程内，对手吃后
        let d4 = choice
            .moves
            .iter()
            .find(|m| m.mv == Move::from_coord_str("d1d4").unwrap())
            .unwrap();
        assert_eq!(d4.profit, -9.0);
    }

    #[test]
    fn test_rejects_side_not_to_move() {
        let board = Board::from_fingerprint(test_positions::HANGING_QUEEN, Team::Black).unwrap();
        let mut ai = LookaheadAI::new(&config());
        assert_eq!(
            ai.get_move(&board, Team::White).unwrap_err(),
            EngineError::WrongTurn {
                turn: Team::Black,
                mover: Team::White
            }
        );
    }
}
