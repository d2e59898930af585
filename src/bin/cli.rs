//! UCI front-end: reads commands from stdin, drives the engine core, writes
//! responses to stdout.

use std::io::{self, BufRead};

use tempo::engine::Engine;

/// The original plays at a fixed depth when `go` carries no depth argument.
const DEFAULT_DEPTH: u32 = 6;

fn main() {
    let mut engine = Engine::new();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "uci" => {
                println!("id name Tempo {}", env!("CARGO_PKG_VERSION"));
                println!("id author the Tempo authors");
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => engine.set_startpos(),
            "position" => handle_position(&mut engine, &parts),
            "go" => handle_go(&mut engine, &parts),
            // The search is synchronous: by the time a stop arrives the
            // bestmove for the last go has already been printed.
            "stop" => {}
            "quit" => break,
            "d" | "display" => {
                if let Some(board) = engine.position() {
                    println!("{}", board);
                }
            }
            _ => {}
        }
    }
}

fn handle_position(engine: &mut Engine, parts: &[&str]) {
    let moves_idx = parts.iter().position(|&p| p == "moves");
    let moves = match moves_idx {
        Some(i) => &parts[i + 1..],
        None => &[],
    };

    let result = match parts.get(1) {
        Some(&"startpos") => engine.set_position(None, moves),
        Some(&"fen") => {
            let fen_end = moves_idx.unwrap_or(parts.len());
            let fen = parts[2..fen_end].join(" ");
            engine.set_position(Some(&fen), moves)
        }
        _ => engine.set_position(None, moves),
    };

    if let Err(e) = result {
        eprintln!("position rejected: {}", e);
    }
}

fn handle_go(engine: &mut Engine, parts: &[&str]) {
    let mut depth = DEFAULT_DEPTH;

    // Only `depth` matters; time and node controls are accepted and ignored.
    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                if let Some(d) = parts.get(i + 1).and_then(|s| s.parse().ok()) {
                    depth = d;
                }
                i += 2;
            }
            "movetime" | "wtime" | "btime" | "winc" | "binc" | "movestogo" | "nodes" => i += 2,
            _ => i += 1,
        }
    }

    match engine.search_to_depth(depth) {
        Ok(result) => match result.best_move {
            Some(mv) => println!("bestmove {}", mv),
            None => println!("bestmove 0000"),
        },
        Err(e) => eprintln!("go rejected: {}", e),
    }
}
