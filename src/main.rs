//! Chess AI CLI
//!
//! 命令行界面，用于测试规则引擎和 AI
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 通信

use chess_ai::ai::eval::{extended_advantage, material_advantage};
use chess_ai::{
    AIConfig, AIEngine, Board, EngineResult, Evaluation, MoveChoice, Team, AVAILABLE_STRATEGIES,
    DEFAULT_STRATEGY, START_FINGERPRINT,
};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "chess-ai")]
#[command(about = "Chess rule engine and AI strategies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取合法走法
    Moves {
        /// 64 字符局面指纹
        #[arg(long, default_value = START_FINGERPRINT)]
        fp: String,

        /// 行棋方 (white, black)
        #[arg(long, default_value = "white", value_parser = parse_team)]
        turn: Team,
    },

    /// 选择最佳走法
    Best {
        /// 64 字符局面指纹
        #[arg(long, default_value = START_FINGERPRINT)]
        fp: String,

        /// 行棋方 (white, black)
        #[arg(long, default_value = "white", value_parser = parse_team)]
        turn: Team,

        /// AI 策略 (random, greedy, lookahead, minimax, alphabeta, mcts, qlearning)
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        strategy: String,

        #[command(flatten)]
        search: SearchArgs,

        /// 显示的候选走法数量
        #[arg(long, default_value = "5")]
        n: usize,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数
    Score {
        /// 64 字符局面指纹
        #[arg(long, default_value = START_FINGERPRINT)]
        fp: String,

        /// 行棋方 (white, black)
        #[arg(long, default_value = "white", value_parser = parse_team)]
        turn: Team,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 两个策略自对弈
    Play {
        /// 白方策略
        #[arg(long, default_value = "greedy")]
        white: String,

        /// 黑方策略
        #[arg(long, default_value = "random")]
        black: String,

        /// 最大步数
        #[arg(long, default_value = "100")]
        max_plies: u32,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

/// 搜索参数
#[derive(clap::Args, Clone)]
struct SearchArgs {
    /// 搜索深度（minimax / alphabeta）
    #[arg(long, default_value = "2")]
    depth: u32,

    /// MCTS 迭代次数
    #[arg(long, default_value = "12")]
    iterations: u32,

    /// 随机种子
    #[arg(long)]
    seed: Option<u64>,

    /// 贪婪策略的评估方式 (simple, extended)
    #[arg(long, default_value = "extended", value_parser = parse_evaluation)]
    evaluation: Evaluation,
}

impl SearchArgs {
    fn config(&self) -> AIConfig {
        AIConfig {
            depth: self.depth,
            iterations: self.iterations,
            seed: self.seed,
            evaluation: self.evaluation,
            ..Default::default()
        }
    }
}

fn parse_team(s: &str) -> Result<Team, String> {
    Team::from_name(s).ok_or_else(|| format!("unknown team: {}", s))
}

fn parse_evaluation(s: &str) -> Result<Evaluation, String> {
    Evaluation::from_name(s).ok_or_else(|| format!("unknown evaluation: {}", s))
}

#[derive(Serialize, Deserialize)]
struct MoveResult {
    #[serde(rename = "move")]
    mv: String,
    profit: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<f64>,
    optimal: bool,
}

#[derive(Serialize, Deserialize)]
struct BestResponse {
    best: String,
    moves: Vec<MoveResult>,
    total: usize,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    fp: Option<String>,
    #[serde(default)]
    turn: Option<String>,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    depth: Option<u32>,
    #[serde(default)]
    iterations: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    n: Option<usize>,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    best: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<MoveResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    // eval 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    material: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extended: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    turn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    game_over: Option<String>,
}

impl ServerResponse {
    fn success_best(best: String, moves: Vec<MoveResult>, elapsed_ms: f64) -> Self {
        Self {
            ok: true,
            best: Some(best),
            moves: Some(moves),
            elapsed_ms: Some(elapsed_ms),
            ..Default::default()
        }
    }

    fn success_legal_moves(legal_moves: Vec<String>) -> Self {
        Self {
            ok: true,
            legal_moves: Some(legal_moves),
            ..Default::default()
        }
    }

    fn success_eval(board: &Board) -> Self {
        let turn = board.turn();
        Self {
            ok: true,
            material: Some(material_advantage(board, turn)),
            extended: Some(extended_advantage(board, turn)),
            turn: Some(turn.as_str().to_string()),
            game_over: board.is_game_over().map(|g| g.reason_code()),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"serialize: {}\"}}", e))
}

fn move_results(choice: &MoveChoice, n: usize) -> Vec<MoveResult> {
    choice
        .moves
        .iter()
        .take(n)
        .map(|m| MoveResult {
            mv: m.mv.to_coord_str(),
            profit: m.profit,
            normalized: m.normalized_profit,
            optimal: m.optimal,
        })
        .collect()
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fp, turn } => match Board::from_fingerprint(&fp, turn) {
            Ok(board) => {
                let moves = board.team_moves(turn, true);
                println!("Legal moves ({}):", moves.len());
                for mv in &moves {
                    println!("  {}", mv);
                }
            }
            Err(e) => fail(e),
        },

        Commands::Best {
            fp,
            turn,
            strategy,
            search,
            n,
            json,
        } => {
            let mut ai = match AIEngine::from_strategy(&strategy, &search.config()) {
                Ok(ai) => ai,
                Err(e) => fail(e),
            };

            let start = Instant::now();
            match ai.get_move_fingerprint(&fp, turn) {
                Ok(choice) => {
                    let elapsed = start.elapsed().as_secs_f64();
                    let moves = move_results(&choice, n);
                    if json {
                        let response = BestResponse {
                            best: choice.mv.to_coord_str(),
                            total: choice.moves.len(),
                            moves,
                        };
                        println!("{}", to_json(&response));
                    } else {
                        println!("Best move (strategy={}): {}", ai.name(), choice.mv);
                        for m in moves {
                            let marker = if m.optimal { "*" } else { " " };
                            println!("  {} {} (profit: {:.2})", marker, m.mv, m.profit);
                        }
                        println!("\nTime: {:.3}s", elapsed);
                    }
                }
                Err(e) => fail(e),
            }
        }

        Commands::Score { fp, turn, json } => match Board::from_fingerprint(&fp, turn) {
            Ok(board) => {
                let material = material_advantage(&board, turn);
                let extended = extended_advantage(&board, turn);
                if json {
                    println!("{}", to_json(&ServerResponse::success_eval(&board)));
                } else {
                    println!("{}", board);
                    println!(
                        "局面评估 ({} 视角): material={:.2}, extended={:.2}",
                        turn, material, extended
                    );
                    if let Some(over) = board.is_game_over() {
                        println!("对局结束: {}", over);
                    }
                }
            }
            Err(e) => fail(e),
        },

        Commands::Play {
            white,
            black,
            max_plies,
            search,
        } => {
            if let Err(e) = play(&white, &black, max_plies, &search.config()) {
                fail(e);
            }
        }

        Commands::Server => {
            run_server();
        }
    }
}

/// 自对弈，逐步打印记谱
fn play(white: &str, black: &str, max_plies: u32, config: &AIConfig) -> EngineResult<()> {
    let mut white_ai = AIEngine::from_strategy(white, config)?;
    let mut black_ai = AIEngine::from_strategy(black, config)?;
    let mut board = Board::new();
    let events = board.subscribe();
    info!("{} (white) vs {} (black)", white_ai.name(), black_ai.name());

    for ply in 0..max_plies {
        if let Some(over) = board.is_game_over() {
            println!("{}", board);
            println!("Game over after {} plies: {}", ply, over);
            return Ok(());
        }

        let team = board.turn();
        let ai = match team {
            Team::White => &mut white_ai,
            Team::Black => &mut black_ai,
        };
        let choice = match ai.get_move(&board, team) {
            Ok(choice) => choice,
            Err(e) => {
                // 无子可走但未被将死
                println!("{}", board);
                println!("Game stopped after {} plies: {}", ply, e);
                return Ok(());
            }
        };

        let text = board.move_piece(choice.mv, false)?;
        println!(
            "{:>3}. {:<5} {}",
            ply + 1,
            team.as_str(),
            text.unwrap_or_default()
        );
        if let Some(rx) = &events {
            if let Ok(next) = rx.try_recv() {
                debug!("turn -> {}", next);
            }
        }
    }

    warn!("stopped at the {} ply limit", max_plies);
    println!("{}", board);
    Ok(())
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    info!("server ready, strategies: {}", AVAILABLE_STRATEGIES.join(", "));

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        // 解析请求
        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = ServerResponse::error(&format!("Invalid JSON: {}", e));
                println!("{}", to_json(&response));
                let _ = stdout.flush();
                continue;
            }
        };

        // 处理命令
        let response = match request.cmd.as_str() {
            "best" => handle_best_request(&request),
            "moves" => handle_moves_request(&request),
            "eval" => handle_eval_request(&request),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        // 返回响应
        println!("{}", to_json(&response));
        let _ = stdout.flush();
    }
}

fn request_board(request: &ServerRequest) -> Result<Board, String> {
    let turn = match request.turn.as_deref() {
        Some(name) => parse_team(name)?,
        None => Team::White,
    };
    let fp = request.fp.as_deref().unwrap_or(START_FINGERPRINT);
    Board::from_fingerprint(fp, turn).map_err(|e| e.to_string())
}

/// 处理 best 命令
fn handle_best_request(request: &ServerRequest) -> ServerResponse {
    let board = match request_board(request) {
        Ok(b) => b,
        Err(e) => return ServerResponse::error(&e),
    };
    let strategy = request.strategy.as_deref().unwrap_or(DEFAULT_STRATEGY);
    let defaults = AIConfig::default();
    let config = AIConfig {
        depth: request.depth.unwrap_or(defaults.depth),
        iterations: request.iterations.unwrap_or(defaults.iterations),
        seed: request.seed,
        ..defaults
    };

    let mut ai = match AIEngine::from_strategy(strategy, &config) {
        Ok(ai) => ai,
        Err(e) => return ServerResponse::error(&format!("Invalid strategy: {}", e)),
    };

    let start = Instant::now();
    match ai.get_move(&board, board.turn()) {
        Ok(choice) => {
            let elapsed = start.elapsed().as_secs_f64();
            let n = request.n.unwrap_or(choice.moves.len());
            ServerResponse::success_best(
                choice.mv.to_coord_str(),
                move_results(&choice, n),
                elapsed * 1000.0,
            )
        }
        Err(e) => ServerResponse::error(&format!("AI error: {}", e)),
    }
}

/// 处理 moves 命令
fn handle_moves_request(request: &ServerRequest) -> ServerResponse {
    match request_board(request) {
        Ok(board) => ServerResponse::success_legal_moves(
            board
                .team_moves(board.turn(), true)
                .iter()
                .map(|m| m.to_coord_str())
                .collect(),
        ),
        Err(e) => ServerResponse::error(&format!("Invalid position: {}", e)),
    }
}

/// 处理 eval 命令（静态评估）
fn handle_eval_request(request: &ServerRequest) -> ServerResponse {
    match request_board(request) {
        Ok(board) => ServerResponse::success_eval(&board),
        Err(e) => ServerResponse::error(&format!("Invalid position: {}", e)),
    }
}
