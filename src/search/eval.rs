use crate::board::{Board, COLORS, Color, PIECES, Piece};
use crate::search::pst;
use crate::utils::pop_lsb;

/// Static evaluation in centipawns from White's point of view: material plus
/// piece-square terms, with the pawn and king tables blended towards their
/// endgame variants as material leaves the board (`endgame = 1 - n/32` for
/// `n` pieces). Negate for Black's perspective.
pub fn evaluate(board: &Board) -> i32 {
    let n = board.occupied().count_ones() as i32;

    let mut score = 0;
    let mut midgame = 0;
    let mut endgame = 0;

    for &color in &COLORS {
        let sign = color.sign();
        for &piece in &PIECES {
            let mut bb = board.pieces(piece, color);
            while bb != 0 {
                let sq = pop_lsb(&mut bb) as usize;
                let idx = if color == Color::White { sq ^ 56 } else { sq };

                score += sign * piece.value();
                match piece {
                    Piece::Pawn => {
                        midgame += sign * pst::PAWN[idx];
                        endgame += sign * pst::PAWN_END[idx];
                    }
                    Piece::King => {
                        midgame += sign * pst::KING[idx];
                        endgame += sign * pst::KING_END[idx];
                    }
                    Piece::Knight => score += sign * pst::KNIGHT[idx],
                    Piece::Bishop => score += sign * pst::BISHOP[idx],
                    Piece::Rook => score += sign * pst::ROOK[idx],
                    Piece::Queen => score += sign * pst::QUEEN[idx],
                }
            }
        }
    }

    score + (midgame * n + endgame * (32 - n)) / 32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn startpos_is_balanced() {
        assert_eq!(evaluate(&Board::new()), 0);
    }

    #[test]
    fn extra_material_counts_for_white() {
        // Kings plus one white rook on a neutral square.
        let b = Board::from_str("4k3/8/8/8/3R4/8/8/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&b) >= 450, "got {}", evaluate(&b));
    }

    #[test]
    fn mirrored_positions_negate() {
        let white_up = Board::from_str("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let black_up = Board::from_str("4k3/4p3/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&white_up), -evaluate(&black_up));
    }

    #[test]
    fn advanced_pawn_outscores_home_pawn_in_endgame() {
        // Same material, pawn on e6 vs pawn on e2; the endgame pawn table
        // rewards the advanced one.
        let advanced = Board::from_str("4k3/8/4P3/8/8/8/8/4K3 w - - 0 1").unwrap();
        let home = Board::from_str("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&advanced) > evaluate(&home));
    }

    #[test]
    fn side_to_move_does_not_change_white_perspective() {
        let w = Board::from_str("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1").unwrap();
        let b = Board::from_str("4k3/8/8/8/3Q4/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&w), evaluate(&b));
    }
}
