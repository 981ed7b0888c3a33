//! MCTS AI 策略
//!
//! 搜索树保存在策略实例内，节点存放在一个 Vec 里并用下标互相引用，根节点始终是 0 号。
//! 每次选择走法后以选中的子节点为新根；下一次查询的棋盘如果是新根或其子节点的局面就复用子树，
//! 否则丢弃重建。

use super::{make_rng, pick_best, sort_by_profit, AIConfig, AIStrategy, MoveChoice, ScoredMove};
use crate::ai::eval::material_advantage;
use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::{Move, Team};
use log::{debug, trace};
use rand::prelude::*;
use std::collections::{HashMap, HashSet};

/// 搜索树节点
struct Node {
    board: Board,
    /// 从父节点走到这里的走法
    mv: Option<Move>,
    /// 该节点的行棋方
    team: Team,
    children: Vec<usize>,
    untried: Vec<Move>,
    visits: u32,
    /// 累计得分，以走进该节点的一方（`team` 的对手）为视角
    score: f64,
    parent: Option<usize>,
}

impl Node {
    fn new(board: Board, mv: Option<Move>, parent: Option<usize>, searcher: Team) -> Self {
        let team = board.turn();
        let untried = if board.is_game_over().is_some() {
            Vec::new()
        } else {
            board.team_moves(team, team == searcher)
        };
        Node {
            board,
            mv,
            team,
            children: Vec::new(),
            untried,
            visits: 0,
            score: 0.0,
            parent,
        }
    }

    fn average(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.score / self.visits as f64
        }
    }

    fn matches(&self, fingerprint: &str, turn: Team) -> bool {
        self.team == turn && self.board.export() == fingerprint
    }
}

/// MCTS AI - Monte Carlo Tree Search，带跨回合的树复用
pub struct MCTSAI {
    iterations: u32,
    exploration: f64,
    rollout_limit: u32,
    rng: StdRng,
    nodes: Vec<Node>,
}

impl MCTSAI {
    pub fn new(config: &AIConfig) -> Self {
        MCTSAI {
            iterations: config.iterations.max(1),
            exploration: config.exploration,
            rollout_limit: config.rollout_limit,
            rng: make_rng(config.seed),
            nodes: Vec::new(),
        }
    }

    /// 当前树的节点数
    pub fn tree_size(&self) -> usize {
        self.nodes.len()
    }

    /// 让根节点对应 `board`，能复用时返回 true
    fn sync_root(&mut self, board: &Board, searcher: Team) -> bool {
        let fingerprint = board.export();
        let turn = board.turn();

        if let Some(root) = self.nodes.first() {
            if root.matches(&fingerprint, turn) {
                return true;
            }
            let child = root
                .children
                .iter()
                .copied()
                .find(|&c| self.nodes[c].matches(&fingerprint, turn));
            if let Some(child) = child {
                self.reroot(child);
                return true;
            }
        }

        self.nodes = vec![Node::new(board.copy(), None, None, searcher)];
        false
    }

    /// 以 `new_root` 为根压缩子树，其余节点丢弃
    fn reroot(&mut self, new_root: usize) {
        let mut old: Vec<Option<Node>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();

        // 广度优先收集子树
        let mut order = vec![new_root];
        let mut i = 0;
        while i < order.len() {
            if let Some(node) = &old[order[i]] {
                order.extend(node.children.iter().copied());
            }
            i += 1;
        }
        let remap: HashMap<usize, usize> = order
            .iter()
            .enumerate()
            .map(|(new, &old_idx)| (old_idx, new))
            .collect();

        let mut nodes = Vec::with_capacity(order.len());
        for &old_idx in &order {
            if let Some(mut node) = old[old_idx].take() {
                node.parent = node.parent.and_then(|p| remap.get(&p).copied());
                node.children = node
                    .children
                    .iter()
                    .filter_map(|c| remap.get(c).copied())
                    .collect();
                nodes.push(node);
            }
        }
        self.nodes = nodes;
    }

    /// 选择：沿 UCT 最大的子节点下降，直到遇到还有未尝试走法的节点或叶子
    fn select(&self) -> usize {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            if !node.untried.is_empty() || node.children.is_empty() {
                return idx;
            }
            let ln_parent = (node.visits.max(1) as f64).ln();
            let mut best = node.children[0];
            let mut best_uct = f64::NEG_INFINITY;
            for &c in &node.children {
                let child = &self.nodes[c];
                let uct = if child.visits == 0 {
                    f64::INFINITY
                } else {
                    child.average()
                        + self.exploration * (ln_parent / child.visits as f64).sqrt()
                };
                if uct > best_uct {
                    best_uct = uct;
                    best = c;
                }
            }
            idx = best;
        }
    }

    /// 扩展：随机取一个未尝试的走法，生成一个子节点
    fn expand(&mut self, idx: usize, searcher: Team) -> EngineResult<usize> {
        if self.nodes[idx].untried.is_empty() {
            return Ok(idx);
        }
        let pick = self.rng.gen_range(0..self.nodes[idx].untried.len());
        let mv = self.nodes[idx].untried.swap_remove(pick);

        let mut board = self.nodes[idx].board.copy();
        board.move_piece(mv, true)?;
        let child = self.nodes.len();
        self.nodes.push(Node::new(board, Some(mv), Some(idx), searcher));
        self.nodes[idx].children.push(child);
        Ok(child)
    }

    /// 模拟：双方随机走子，遇到重复局面、无子可走、对局结束或步数上限时停止
    fn simulate(&mut self, start: &Board, searcher: Team) -> EngineResult<Board> {
        let mut board = start.copy();
        let mut seen = HashSet::new();
        let mut plies = 0;

        while plies < self.rollout_limit {
            if !seen.insert(board.export()) {
                break;
            }
            if board.is_game_over().is_some() {
                break;
            }
            let side = board.turn();
            let moves = board.team_moves(side, side == searcher);
            let Some(&mv) = moves.choose(&mut self.rng) else {
                break;
            };
            board.move_piece(mv, true)?;
            plies += 1;
        }
        trace!("rollout stopped after {} plies", plies);
        Ok(board)
    }

    /// 回传：沿父链累加访问次数和终局子力差
    fn backpropagate(&mut self, leaf: usize, terminal: &Board) {
        let mut cursor = Some(leaf);
        while let Some(idx) = cursor {
            let node = &mut self.nodes[idx];
            node.visits += 1;
            node.score += material_advantage(terminal, node.team.opponent());
            cursor = node.parent;
        }
    }

    fn iterate(&mut self, searcher: Team) -> EngineResult<()> {
        let selected = self.select();
        let leaf = self.expand(selected, searcher)?;
        let start = self.nodes[leaf].board.copy();
        let terminal = self.simulate(&start, searcher)?;
        self.backpropagate(leaf, &terminal);
        Ok(())
    }
}

impl AIStrategy for MCTSAI {
    fn name(&self) -> String {
        format!("MCTS AI (iterations={})", self.iterations)
    }

    fn get_move(&mut self, board: &Board, team: Team) -> EngineResult<MoveChoice> {
        if board.turn() != team {
            return Err(EngineError::WrongTurn {
                turn: board.turn(),
                mover: team,
            });
        }

        let reused = self.sync_root(board, team);
        if self.nodes[0].untried.is_empty() && self.nodes[0].children.is_empty() {
            return Err(EngineError::NoLegalMoves(team));
        }

        for _ in 0..self.iterations {
            self.iterate(team)?;
        }

        let mut scored: Vec<ScoredMove> = self.nodes[0]
            .children
            .iter()
            .filter_map(|&c| {
                let child = &self.nodes[c];
                child.mv.map(|mv| ScoredMove::new(mv, child.average()))
            })
            .collect();
        sort_by_profit(&mut scored);
        let mv = pick_best(&scored, &mut self.rng).ok_or(EngineError::NoLegalMoves(team))?;

        let chosen = self.nodes[0]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].mv == Some(mv));
        debug!(
            "mcts picked {} (tree reused: {}, root visits: {}, tree size: {})",
            mv,
            reused,
            self.nodes[0].visits,
            self.nodes.len()
        );
        if let Some(chosen) = chosen {
            self.reroot(chosen);
        }

        Ok(MoveChoice { mv, moves: scored })
    }
}
