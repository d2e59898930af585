use crate::board::castle_bits::*;
use crate::board::{Board, Color, Piece};
use crate::hash::zobrist::{ep_file_to_hash, xor_castling_rights_delta, zobrist_keys};
use crate::moves::types::{Move, Undo};
use crate::square::Square;

/// Rook relocation by king destination index, for castling moves.
#[inline(always)]
fn rook_castle_squares(king_to: u8) -> Option<(Square, Square)> {
    match king_to {
        6 => Some((Square::from_index(7), Square::from_index(5))), // White O-O
        2 => Some((Square::from_index(0), Square::from_index(3))), // White O-O-O
        62 => Some((Square::from_index(63), Square::from_index(61))), // Black O-O
        58 => Some((Square::from_index(56), Square::from_index(59))), // Black O-O-O
        _ => None,
    }
}

/// The castling right lost when a rook of `color` moves from, or is captured
/// on, the given square.
#[inline(always)]
fn rook_rights_mask(color: Color, rook_sq: u8) -> u8 {
    match (color, rook_sq) {
        (Color::White, 0) => CASTLE_WQ,  // a1
        (Color::White, 7) => CASTLE_WK,  // h1
        (Color::Black, 56) => CASTLE_BQ, // a8
        (Color::Black, 63) => CASTLE_BK, // h8
        _ => 0,
    }
}

#[inline(always)]
fn remove_piece(board: &mut Board, color: Color, piece: Piece, idx: usize) {
    let new_bb = board.bb(color, piece) & !(1u64 << idx);
    board.set_bb(color, piece, new_bb);
}

#[inline(always)]
fn place_piece(board: &mut Board, color: Color, piece: Piece, idx: usize) {
    let new_bb = board.bb(color, piece) | (1u64 << idx);
    board.set_bb(color, piece, new_bb);
}

/// Apply a move. Pushes an undo record and the new hash onto the board's own
/// stacks; `unmake_move` restores the prior position bit for bit.
pub fn make_move(board: &mut Board, mv: Move) {
    let prev_zobrist = board.zobrist;
    let us = board.side_to_move;
    let them = us.opposite();
    let from = mv.from.index() as usize;
    let to = mv.to.index() as usize;

    // The old en-passant file leaves the hash before anything else changes.
    if let Some(f) = ep_file_to_hash(board) {
        board.zobrist ^= zobrist_keys().ep_file[f as usize];
    }

    let prev_en_passant = board.en_passant;
    let prev_halfmove_clock = board.halfmove_clock;
    let prev_fullmove_number = board.fullmove_number;
    let old_rights = board.castling_rights;
    board.en_passant = None;

    let mut captured = None;
    if mv.is_en_passant() {
        let cap_sq = if us == Color::White { to - 8 } else { to + 8 };
        remove_piece(board, them, Piece::Pawn, cap_sq);
        captured = Some((them, Piece::Pawn, Square::from_index(cap_sq as u8)));
    } else if let Some(victim) = mv.captured {
        remove_piece(board, them, victim, to);
        captured = Some((them, victim, mv.to));
    }

    // Castling rights lost by this move, applied in one delta.
    let mut lost: u8 = 0;
    if mv.piece == Piece::King {
        lost |= match us {
            Color::White => CASTLE_WK | CASTLE_WQ,
            Color::Black => CASTLE_BK | CASTLE_BQ,
        };
    }
    if mv.piece == Piece::Rook {
        lost |= rook_rights_mask(us, mv.from.index());
    }
    if let Some((cap_color, cap_piece, cap_sq)) = captured
        && cap_piece == Piece::Rook
    {
        lost |= rook_rights_mask(cap_color, cap_sq.index());
    }
    let new_rights = old_rights & !lost;
    if new_rights != old_rights {
        xor_castling_rights_delta(&mut board.zobrist, zobrist_keys(), old_rights, new_rights);
        board.castling_rights = new_rights;
    }

    // Move the piece; a promotion swaps the pawn for the promoted kind.
    remove_piece(board, us, mv.piece, from);
    place_piece(board, us, mv.promotion.unwrap_or(mv.piece), to);

    let castling_rook = if mv.is_castling() {
        rook_castle_squares(mv.to.index())
    } else {
        None
    };
    if let Some((rook_from, rook_to)) = castling_rook {
        remove_piece(board, us, Piece::Rook, rook_from.index() as usize);
        place_piece(board, us, Piece::Rook, rook_to.index() as usize);
    }

    if mv.piece == Piece::Pawn && mv.is_double_pawn_push() {
        let ep_sq = if us == Color::White { from + 8 } else { from - 8 };
        board.en_passant = Some(Square::from_index(ep_sq as u8));
    }

    if captured.is_some() || mv.piece == Piece::Pawn {
        board.halfmove_clock = 0;
    } else {
        board.halfmove_clock = prev_halfmove_clock + 1;
    }
    if us == Color::Black {
        board.fullmove_number = prev_fullmove_number + 1;
    }

    board.side_to_move = them;
    board.zobrist ^= zobrist_keys().side_to_move;

    // The new en-passant file enters the hash from the mover's opponent's
    // point of view.
    if let Some(f) = ep_file_to_hash(board) {
        board.zobrist ^= zobrist_keys().ep_file[f as usize];
    }

    board.undo_stack.push(Undo {
        mv,
        captured,
        castling_rook,
        prev_castling_rights: old_rights,
        prev_en_passant,
        prev_halfmove_clock,
        prev_fullmove_number,
        prev_zobrist,
    });
    board.history.push(board.zobrist);

    #[cfg(debug_assertions)]
    board.assert_hash();
}

/// Take back the most recent move.
pub fn unmake_move(board: &mut Board) {
    let Some(undo) = board.undo_stack.pop() else {
        panic!("unmake_move with no move to undo");
    };
    board.history.pop();

    let mv = undo.mv;
    let us = board.side_to_move.opposite(); // the side that made the move
    let from = mv.from.index() as usize;
    let to = mv.to.index() as usize;

    // Walk the piece back; a promotion turns back into a pawn.
    remove_piece(board, us, mv.promotion.unwrap_or(mv.piece), to);
    place_piece(board, us, mv.piece, from);

    if let Some((cap_color, cap_piece, cap_sq)) = undo.captured {
        place_piece(board, cap_color, cap_piece, cap_sq.index() as usize);
    }

    if let Some((rook_from, rook_to)) = undo.castling_rook {
        remove_piece(board, us, Piece::Rook, rook_to.index() as usize);
        place_piece(board, us, Piece::Rook, rook_from.index() as usize);
    }

    board.side_to_move = us;
    board.castling_rights = undo.prev_castling_rights;
    board.en_passant = undo.prev_en_passant;
    board.halfmove_clock = undo.prev_halfmove_clock;
    board.fullmove_number = undo.prev_fullmove_number;
    // The stored hash already encodes side, rights and en passant; assigning
    // it last cancels the piece-key toggles done above.
    board.zobrist = undo.prev_zobrist;

    #[cfg(debug_assertions)]
    board.assert_hash();
}
