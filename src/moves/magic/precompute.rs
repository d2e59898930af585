//! Magic number search. Finds, per square, a multiplier that perfectly hashes
//! every relevant blocker subset into a dense attack table.

use rand::{RngCore, SeedableRng, rngs::StdRng};

use super::attacks::{bishop_attacks_per_square, rook_attacks_per_square};
use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};

const MAX_ATTEMPTS: u32 = 10_000_000;

// Attack sets never cover the whole board, so all-ones marks an unused slot.
const UNUSED: u64 = u64::MAX;

pub enum MagicTableSeed {
    Fixed(u64),
    Random,
}

pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, String> {
    let mut rng = match seed {
        MagicTableSeed::Fixed(s) => StdRng::seed_from_u64(s),
        MagicTableSeed::Random => {
            let mut bytes = [0u8; 32];
            rand::rng().fill_bytes(&mut bytes);
            StdRng::from_seed(bytes)
        }
    };

    let mut rook_entries = Vec::with_capacity(64);
    for sq in 0..64 {
        rook_entries.push(find_magic(
            &mut rng,
            sq,
            rook_mask(sq),
            rook_attacks_per_square,
        )?);
    }

    let mut bishop_entries = Vec::with_capacity(64);
    for sq in 0..64 {
        bishop_entries.push(find_magic(
            &mut rng,
            sq,
            bishop_mask(sq),
            bishop_attacks_per_square,
        )?);
    }

    Ok(MagicTables {
        rook: RookMagicTables {
            entries: rook_entries,
        },
        bishop: BishopMagicTables {
            entries: bishop_entries,
        },
    })
}

/// Relevant occupancy for a rook: its rays minus the final square of each ray.
/// Edge squares cannot hide anything behind them, so they never affect the
/// attack set.
fn rook_mask(square: usize) -> u64 {
    ray_mask(square, &[(1, 0), (-1, 0), (0, 1), (0, -1)])
}

fn bishop_mask(square: usize) -> u64 {
    ray_mask(square, &[(1, 1), (1, -1), (-1, 1), (-1, -1)])
}

fn ray_mask(square: usize, dirs: &[(i32, i32)]) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;
    for &(dr, df) in dirs {
        let (mut r, mut f) = (rank + dr, file + df);
        // stop before the board edge in this direction
        while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Enumerate every subset of `mask` (carry-rippler), the empty set included.
fn blocker_subsets(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

fn find_magic(
    rng: &mut StdRng,
    square: usize,
    mask: u64,
    attack_fn: fn(usize, u64) -> u64,
) -> Result<MagicEntry, String> {
    let bits = mask.count_ones();
    let shift = 64 - bits;
    let subsets = blocker_subsets(mask);
    let attacks: Vec<u64> = subsets.iter().map(|&b| attack_fn(square, b)).collect();

    let mut table = vec![UNUSED; 1 << bits];
    for _ in 0..MAX_ATTEMPTS {
        // Sparse candidates converge much faster than uniform ones.
        let magic = rng.next_u64() & rng.next_u64() & rng.next_u64();
        if (mask.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }

        table.fill(UNUSED);
        let mut ok = true;
        for (i, &subset) in subsets.iter().enumerate() {
            let index = (subset.wrapping_mul(magic) >> shift) as usize;
            if table[index] == UNUSED {
                table[index] = attacks[i];
            } else if table[index] != attacks[i] {
                // destructive collision: two blocker sets with different attacks
                ok = false;
                break;
            }
        }
        if ok {
            return Ok(MagicEntry {
                magic,
                shift,
                mask,
                table: table.into_boxed_slice(),
            });
        }
    }

    Err(format!(
        "no magic found for square {} within {} attempts",
        square, MAX_ATTEMPTS
    ))
}
