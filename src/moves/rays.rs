use once_cell::sync::Lazy;

use crate::utils::square_index;

/// `BETWEEN[a][b]`: the open segment strictly between two squares that share a
/// rank, file or diagonal; 0 for unaligned pairs and for adjacent squares.
static BETWEEN: Lazy<[[u64; 64]; 64]> = Lazy::new(|| {
    const DIRS: [(i32, i32); 8] = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    let mut table = [[0u64; 64]; 64];
    for from in 0..64usize {
        let (r0, f0) = ((from / 8) as i32, (from % 8) as i32);
        for (dr, df) in DIRS {
            let mut span = 0u64;
            let (mut r, mut f) = (r0 + dr, f0 + df);
            while (0..8).contains(&r) && (0..8).contains(&f) {
                let to = square_index(r as usize, f as usize);
                table[from][to] = span;
                span |= 1u64 << to;
                r += dr;
                f += df;
            }
        }
    }
    table
});

#[inline(always)]
pub fn between(a: u8, b: u8) -> u64 {
    BETWEEN[a as usize][b as usize]
}
