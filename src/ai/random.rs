//! 随机 AI 策略

use super::{make_rng, AIStrategy, MoveChoice};
use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::Team;
use rand::prelude::*;

/// 随机 AI - 在合法走法中均匀随机选择，不打分
pub struct RandomAI {
    rng: StdRng,
}

impl RandomAI {
    pub fn new(seed: Option<u64>) -> Self {
        RandomAI {
            rng: make_rng(seed),
        }
    }
}

impl AIStrategy for RandomAI {
    fn name(&self) -> String {
        "Random AI".to_string()
    }

    fn get_move(&mut self, board: &Board, team: Team) -> EngineResult<MoveChoice> {
        if board.turn() != team {
            return Err(EngineError::WrongTurn {
                turn: board.turn(),
                mover: team,
            });
        }
        let moves = board.team_moves(team, true);
        let mv = *moves
            .choose(&mut self.rng)
            .ok_or(EngineError::NoLegalMoves(team))?;
        Ok(MoveChoice {
            mv,
            moves: Vec::new(),
        })
    }
}
