use crate::board::Board;
use crate::moves::execute::{make_move, unmake_move};
use crate::moves::magic::MagicTables;
use crate::moves::movegen::generate_moves;
use crate::moves::types::Move;
use tracing::{debug, instrument};

const MAX_PERFT_DEPTH: usize = 20;

fn move_buffers() -> [Vec<Move>; MAX_PERFT_DEPTH] {
    std::array::from_fn(|_| Vec::with_capacity(64))
}

fn perft_recursive(
    board: &mut Board,
    tables: &MagicTables,
    depth: u32,
    ply: usize,
    buffers: &mut [Vec<Move>],
) -> u64 {
    if depth == 0 {
        return 1;
    }

    {
        let moves = &mut buffers[ply];
        generate_moves(board, tables, moves);
    }

    if depth == 1 {
        return buffers[ply].len() as u64;
    }

    let move_count = buffers[ply].len();
    let mut nodes = 0;
    for i in 0..move_count {
        let mv = buffers[ply][i];

        #[cfg(debug_assertions)]
        let hash_before = board.zobrist;

        make_move(board, mv);
        nodes += perft_recursive(board, tables, depth - 1, ply + 1, buffers);
        unmake_move(board);

        #[cfg(debug_assertions)]
        debug_assert_eq!(board.zobrist, hash_before, "hash changed across make/unmake");
    }
    nodes
}

/// Count leaf nodes of the legal move tree to the given depth.
#[instrument(skip(board, tables), fields(depth))]
pub fn perft(board: &mut Board, tables: &MagicTables, depth: u32) -> u64 {
    assert!(
        depth as usize <= MAX_PERFT_DEPTH,
        "depth {} exceeds MAX_PERFT_DEPTH {}",
        depth,
        MAX_PERFT_DEPTH
    );

    let mut buffers = move_buffers();
    perft_recursive(board, tables, depth, 0, &mut buffers)
}

/// Perft split by root move, printed one line per move. Returns the total.
#[instrument(skip(board, tables), fields(depth))]
pub fn perft_divide(board: &mut Board, tables: &MagicTables, depth: u32) -> u64 {
    assert!(depth >= 1, "divide needs at least depth 1");

    let mut buffers = move_buffers();
    {
        let moves = &mut buffers[0];
        generate_moves(board, tables, moves);
    }

    let move_count = buffers[0].len();
    let mut total = 0;
    for i in 0..move_count {
        let mv = buffers[0][i];
        make_move(board, mv);
        let count = perft_recursive(board, tables, depth - 1, 1, &mut buffers);
        unmake_move(board);

        debug!(%mv, nodes = count, "divide: root child");
        println!("{}: {}", mv, count);
        total += count;
    }

    debug!(depth, total, "divide: total");
    println!("Total: {}", total);
    total
}
