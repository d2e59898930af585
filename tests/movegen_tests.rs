//! The fast legal generator is checked against a naive oracle: pseudo-legal
//! generation followed by a make/attacked/unmake king-safety filter.

use tempo::board::Board;
use tempo::moves::execute::{make_move, unmake_move};
use tempo::moves::magic::MagicTables;
use tempo::moves::magic::loader::magic_tables;
use tempo::moves::movegen::{generate_moves, generate_pseudo_legal};
use tempo::moves::square_control::in_check;
use tempo::moves::types::Move;

const FENS: &[&str] = &[
    // startpos
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    // Kiwipete
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    // EP with a horizontal discovered check lurking
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 1",
    // EP capture would expose the black king along the fourth rank
    "8/8/8/8/k2Pp2Q/8/8/4K3 b - d3 0 1",
    // EP legal
    "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
    // Promotions for both sides
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    // Castling with one path attacked
    "r3k2r/8/5q2/8/8/8/8/R3K2R w KQkq - 0 1",
    "r3k2r/8/5Q2/8/8/8/8/R3K2R b KQkq - 0 1",
    // Checks: slider, knight, double check
    "4k3/8/8/8/8/8/4r3/4K3 w - - 0 1",
    "4k3/8/8/8/8/3n4/8/4K3 w - - 0 1",
    "4k3/8/8/8/7b/3n4/8/4K3 w - - 0 1",
    // Pins everywhere
    "4k3/8/8/q7/8/2N5/3P4/4K2r w - - 0 1",
    // Stalemate and checkmate
    "7k/5Q2/5K2/8/8/8/8/8 b - - 0 1",
    "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1",
];

/// Pseudo-legal moves surviving the king-safety filter: the reference set.
fn reference_moves(board: &mut Board, tables: &MagicTables) -> Vec<Move> {
    let mut pseudo = Vec::with_capacity(128);
    generate_pseudo_legal(board, tables, &mut pseudo);

    let mut legal = Vec::with_capacity(pseudo.len());
    for mv in pseudo {
        let mover = board.side_to_move;
        make_move(board, mv);
        let safe = !in_check(board, mover, tables);
        unmake_move(board);
        if safe {
            legal.push(mv);
        }
    }
    legal
}

fn move_keys(moves: &[Move]) -> Vec<(u8, u8, u8, u8)> {
    let mut keys: Vec<_> = moves
        .iter()
        .map(|m| {
            (
                m.from.index(),
                m.to.index(),
                m.promotion.map_or(255, |p| p as u8),
                m.flags,
            )
        })
        .collect();
    keys.sort_unstable();
    keys
}

fn assert_matches_reference(board: &mut Board, tables: &MagicTables, context: &str) {
    let mut fast = Vec::with_capacity(64);
    generate_moves(board, tables, &mut fast);
    let reference = reference_moves(board, tables);

    let fast_keys = move_keys(&fast);
    let ref_keys = move_keys(&reference);

    // No duplicates in either list.
    let mut dedup = fast_keys.clone();
    dedup.dedup();
    assert_eq!(dedup.len(), fast_keys.len(), "duplicate moves in {context}");

    assert_eq!(fast_keys, ref_keys, "move set mismatch in {context}");

    // Every generated move leaves the mover's king safe.
    for &mv in &fast {
        let mover = board.side_to_move;
        make_move(board, mv);
        assert!(
            !in_check(board, mover, tables),
            "move {mv} leaves the king attacked in {context}"
        );
        unmake_move(board);
    }
}

#[test]
fn fixed_positions_match_reference() {
    let tables = magic_tables();
    for &fen in FENS {
        let mut board: Board = fen.parse().expect("valid FEN");
        assert_matches_reference(&mut board, &tables, fen);
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[test]
fn random_walks_match_reference() {
    let tables = magic_tables();
    for &seed0 in &[7_u64, 19, 1234] {
        for &fen in &FENS[..6] {
            let mut board: Board = fen.parse().expect("valid FEN");
            let mut seed = seed0;
            for ply in 0..80 {
                assert_matches_reference(&mut board, &tables, &format!("{fen} ply {ply}"));

                let mut moves = Vec::with_capacity(64);
                generate_moves(&mut board, &tables, &mut moves);
                if moves.is_empty() {
                    break;
                }
                seed = splitmix64(seed);
                make_move(&mut board, moves[(seed as usize) % moves.len()]);
            }
        }
    }
}

#[test]
fn double_check_allows_only_king_moves() {
    let tables = magic_tables();
    // Knight d3 and bishop h4 both give check.
    let mut board: Board = "4k3/8/8/8/7b/3n4/8/4K3 w - - 0 1".parse().unwrap();
    let mut moves = Vec::new();
    generate_moves(&mut board, &tables, &mut moves);
    assert!(!moves.is_empty());
    for mv in &moves {
        assert_eq!(mv.piece, tempo::board::Piece::King, "non-king move {mv}");
    }
}

#[test]
fn castling_path_rules() {
    let tables = magic_tables();
    // Black queen on f6 covers f1: kingside is out, queenside is fine.
    let mut board: Board = "r3k2r/8/5q2/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
    let mut moves = Vec::new();
    generate_moves(&mut board, &tables, &mut moves);
    let texts: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
    assert!(!texts.contains(&"e1g1".to_string()));
    assert!(texts.contains(&"e1c1".to_string()));
}

#[test]
fn pinned_en_passant_is_rejected() {
    let tables = magic_tables();
    // exd3 would empty two fourth-rank squares and expose Ka4 to Qh4.
    let mut board: Board = "8/8/8/8/k2Pp2Q/8/8/4K3 b - d3 0 1".parse().unwrap();
    let mut moves = Vec::new();
    generate_moves(&mut board, &tables, &mut moves);
    assert!(moves.iter().all(|m| !m.is_en_passant()));
}

#[test]
fn checkmate_and_stalemate_are_empty() {
    let tables = magic_tables();

    let mut mate: Board = "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1".parse().unwrap();
    let mut moves = Vec::new();
    generate_moves(&mut mate, &tables, &mut moves);
    assert!(moves.is_empty());
    assert!(in_check(&mate, mate.side_to_move, &tables));

    let mut stale: Board = "7k/5Q2/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
    generate_moves(&mut stale, &tables, &mut moves);
    assert!(moves.is_empty());
    assert!(!in_check(&stale, stale.side_to_move, &tables));
}
