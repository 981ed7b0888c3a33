//! 跨模块的引擎性质测试

use chess_ai::test_positions;
use chess_ai::{
    AIConfig, AIEngine, Board, EngineError, Evaluation, GameOverReason, Move, PieceKind, Position,
    Team,
};
use rand::prelude::*;

/// 用随机对局收集一批可达局面
fn reachable_positions(seed: u64, plies: usize) -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new();
    let mut positions = vec![board.copy()];
    for _ in 0..plies {
        if board.is_game_over().is_some() {
            break;
        }
        let moves = board.team_moves(board.turn(), true);
        let Some(&mv) = moves.choose(&mut rng) else {
            break;
        };
        board.move_piece(mv, false).unwrap();
        positions.push(board.copy());
    }
    positions
}

#[test]
fn export_import_round_trip_on_reachable_positions() {
    for seed in 0..4 {
        for board in reachable_positions(seed, 40) {
            let fp = board.export();
            let mut restored = Board::new();
            restored.import_payload(&fp).unwrap();
            assert_eq!(restored.export(), fp);
        }
    }
}

#[test]
fn threat_checked_moves_never_leave_king_attacked() {
    let mut positions = reachable_positions(7, 60);
    for (_, fp) in test_positions::ALL_POSITIONS {
        for team in [Team::White, Team::Black] {
            positions.push(Board::from_fingerprint(fp, team).unwrap());
        }
    }

    for board in positions {
        let team = board.turn();
        for piece in board.team_pieces(team) {
            for mv in board.available_moves(&piece, true) {
                let mut after = board.copy();
                after.move_piece(mv, true).unwrap();
                assert!(
                    !after.is_king_threatened(team),
                    "{} leaves the {} king attacked in {}",
                    mv,
                    team,
                    board.export()
                );
            }
        }
    }
}

#[test]
fn start_position_has_twenty_moves_per_side() {
    let mut board = Board::new();
    assert_eq!(board.team_moves(Team::White, true).len(), 20);
    board.move_piece(Move::from_coord_str("g1f3").unwrap(), false).unwrap();
    assert_eq!(board.turn(), Team::Black);
    assert_eq!(board.team_moves(Team::Black, true).len(), 20);
}

#[test]
fn back_rank_mate_is_reported_for_black() {
    let board = Board::from_fingerprint(test_positions::BLACK_MATED, Team::Black).unwrap();
    let over = board.is_game_over().unwrap();
    assert_eq!(over.winner, Team::White);
    assert_eq!(over.reason, GameOverReason::CheckMate);
    assert_eq!(over.reason_code(), "blackCheckMate");
}

#[test]
fn mate_in_one_played_through_the_engine() {
    let mut board = Board::from_fingerprint(test_positions::MATE_IN_ONE, Team::White).unwrap();
    let config = AIConfig {
        depth: 3,
        seed: Some(4),
        ..Default::default()
    };
    let mut ai = AIEngine::alphabeta(&config);
    let choice = ai.get_move(&board, Team::White).unwrap();
    let text = board.move_piece(choice.mv, false).unwrap();
    assert_eq!(text.as_deref(), Some("Ra8"));
    assert_eq!(
        board.is_game_over().map(|g| g.reason_code()),
        Some("blackCheckMate".to_string())
    );
}

#[test]
fn minimax_and_alphabeta_agree_on_chosen_profit() {
    let positions = [
        (test_positions::START, Team::White, 2),
        (test_positions::HANGING_QUEEN, Team::Black, 3),
        (test_positions::END_ROOK_VS_PAWN, Team::White, 3),
        (test_positions::CASTLING, Team::White, 2),
    ];
    for (fp, team, depth) in positions {
        let board = Board::from_fingerprint(fp, team).unwrap();
        for evaluation in [Evaluation::Simple, Evaluation::Extended] {
            let config = AIConfig {
                depth,
                seed: Some(2),
                search_evaluation: evaluation,
                ..Default::default()
            };
            let a = AIEngine::minimax(&config).get_move(&board, team).unwrap();
            let b = AIEngine::alphabeta(&config).get_move(&board, team).unwrap();
            let best_a = a.moves.iter().find(|m| m.mv == a.mv).unwrap().profit;
            let best_b = b.moves.iter().find(|m| m.mv == b.mv).unwrap().profit;
            assert_eq!(best_a, best_b, "{} depth {}", fp, depth);
        }
    }
}

#[test]
fn mcts_single_iteration_expands_one_child() {
    let config = AIConfig {
        iterations: 1,
        rollout_limit: 30,
        seed: Some(8),
        ..Default::default()
    };
    for board in reachable_positions(3, 30) {
        let team = board.turn();
        if board.team_moves(team, true).is_empty() {
            continue;
        }
        let mut ai = AIEngine::mcts(&config);
        let choice = ai.get_move(&board, team).unwrap();
        assert_eq!(choice.moves.len(), 1);
        assert_eq!(choice.moves[0].mv, choice.mv);
    }
}

#[test]
fn white_pawn_promotes_to_queen() {
    let mut board = Board::from_fingerprint(test_positions::PROMOTION, Team::White).unwrap();
    let text = board
        .move_piece(Move::from_coord_str("a7a8").unwrap(), false)
        .unwrap()
        .unwrap();
    assert!(text.ends_with("=Q"));
    let piece = board.piece_at(Position::from_algebraic("a8").unwrap()).unwrap();
    assert_eq!(piece.kind, PieceKind::Queen);
    assert_eq!(piece.team, Team::White);
}

#[test]
fn stalemated_side_gets_an_error_not_a_move() {
    let board = Board::from_fingerprint(test_positions::STALEMATE, Team::Black).unwrap();
    assert!(board.is_game_over().is_none());
    let mut ai = AIEngine::greedy(&AIConfig::default());
    assert_eq!(
        ai.get_move(&board, Team::Black).unwrap_err(),
        EngineError::NoLegalMoves(Team::Black)
    );
}

#[test]
fn self_play_between_strategies_stays_legal() {
    let config = AIConfig {
        depth: 1,
        iterations: 3,
        rollout_limit: 10,
        seed: Some(12),
        ..Default::default()
    };
    let mut white = AIEngine::from_strategy("lookahead", &config).unwrap();
    let mut black = AIEngine::from_strategy("mcts", &config).unwrap();
    let mut board = Board::new();
    let events = board.subscribe().unwrap();

    for ply in 0..16 {
        if board.is_game_over().is_some() {
            break;
        }
        let team = board.turn();
        let ai = if team == Team::White {
            &mut white
        } else {
            &mut black
        };
        let choice = match ai.get_move(&board, team) {
            Ok(choice) => choice,
            Err(EngineError::NoLegalMoves(_)) => break,
            Err(e) => panic!("{}", e),
        };
        assert!(board.team_moves(team, true).contains(&choice.mv));
        board.move_piece(choice.mv, false).unwrap();
        assert_eq!(events.try_recv().unwrap(), team.opponent());
        assert_eq!(board.notations().len(), ply + 1);
    }
}
