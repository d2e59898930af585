use arrayvec::ArrayVec;
use tracing::debug;

use crate::board::Board;
use crate::moves::execute::{make_move, unmake_move};
use crate::moves::magic::MagicTables;
use crate::moves::movegen::generate_moves;
use crate::moves::square_control::in_check;
use crate::moves::types::Move;
use crate::search::eval::evaluate;
use crate::search::ordering::order_moves;
use crate::search::tt::TranspositionTable;

/// Strictly larger than any evaluation plus search plies.
pub const MATE: i32 = 250_000;

// Backed-up scores this close to MATE lose one point per ply, so shorter
// mates win the comparison.
const MATE_WINDOW: i32 = 100;

const TT_SIZE_MB: usize = 64;

/// Outcome of a completed search.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    /// Score from the searched side's perspective.
    pub score: i32,
    /// None only when the root has no legal move.
    pub best_move: Option<Move>,
    pub nodes: u64,
    /// Deepest fully completed iteration.
    pub depth: u32,
}

/// Depth-first negamax with alpha-beta pruning over the legal move tree.
pub fn negamax(
    board: &mut Board,
    tables: &MagicTables,
    tt: &mut TranspositionTable,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    nodes: &mut u64,
) -> (i32, Option<Move>) {
    *nodes += 1;

    // A position reached for the third time is dead drawn; no need to expand.
    if board.is_threefold() {
        return (0, None);
    }

    let hash = board.zobrist;
    let mut hash_move = None;
    if let Some(entry) = tt.probe(hash) {
        if entry.depth as i32 >= depth && (entry.exact || entry.score >= beta) {
            return (entry.score, entry.best_move);
        }
        // Not usable for a cutoff, still the best first guess.
        hash_move = entry.best_move;
    }

    if depth == 0 {
        return (evaluate(board) * board.side_to_move.sign(), None);
    }

    let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
    generate_moves(board, tables, &mut moves);
    if moves.is_empty() {
        return if in_check(board, board.side_to_move, tables) {
            (-MATE, None)
        } else {
            (0, None)
        };
    }

    order_moves(&mut moves, hash_move);

    let mut best_score = -MATE;
    let mut best_move = moves[0];
    let mut exact = true;

    for &mv in moves.iter() {
        make_move(board, mv);
        let (child_score, _) = negamax(board, tables, tt, depth - 1, -beta, -alpha, nodes);
        unmake_move(board);

        let mut score = -child_score;
        if score > MATE - MATE_WINDOW {
            score -= 1;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        alpha = alpha.max(score);
        if alpha >= beta {
            exact = false;
            break;
        }
    }

    tt.store(hash, depth as u8, best_score, Some(best_move), exact);
    (best_score, Some(best_move))
}

/// Iterative deepening driver: searches depth 1, 2, ... up to `max_depth`
/// and keeps the move recommended by the deepest completed iteration. Prints
/// one `info` line per iteration, as the protocol front-end expects.
pub fn search(board: &mut Board, tables: &MagicTables, max_depth: u32) -> SearchResult {
    let mut tt = TranspositionTable::new(TT_SIZE_MB);
    let mut nodes = 0u64;
    let mut result = SearchResult {
        score: 0,
        best_move: None,
        nodes: 0,
        depth: 0,
    };

    for depth in 1..=max_depth {
        let (score, best_move) = negamax(board, tables, &mut tt, depth as i32, -MATE, MATE, &mut nodes);
        result = SearchResult {
            score,
            best_move,
            nodes,
            depth,
        };
        debug!(depth, score, nodes, "iteration complete");

        match best_move {
            Some(mv) => println!(
                "info depth {} score cp {} pv {} nodes {}",
                depth, score, mv, nodes
            ),
            // Mate, stalemate or repetition at the root: deeper iterations
            // cannot change anything.
            None => break,
        }
    }

    result
}
