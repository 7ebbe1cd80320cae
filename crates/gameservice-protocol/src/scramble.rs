//! Fixed obfuscation cipher used for `GS` property frames.
//!
//! Keyless and length-preserving. Each byte is XORed with a position
//! mask, then the bytes are laid into a square grid along zig-zag
//! anti-diagonals and read back row by row. Decryption rebuilds the same
//! occupancy pattern from the length alone.

/// Encrypts `data` for a `GS` frame.
pub fn encrypt(data: &[u8]) -> Vec<u8> {
    let (side, cells) = diagonal_walk(data.len());
    let mut grid: Vec<Option<u8>> = vec![None; side * side];

    for (i, (&byte, &cell)) in data.iter().zip(&cells).enumerate() {
        grid[cell] = Some(byte ^ mask(i));
    }

    grid.into_iter().flatten().collect()
}

/// Inverse of [`encrypt`].
pub fn decrypt(data: &[u8]) -> Vec<u8> {
    let (side, cells) = diagonal_walk(data.len());

    let mut occupied = vec![false; side * side];
    for &cell in &cells {
        occupied[cell] = true;
    }

    // Row-major order of the occupied cells is the ciphertext order.
    let mut grid = vec![0u8; side * side];
    let positions = occupied.iter().enumerate().filter(|(_, o)| **o);
    for ((cell, _), &byte) in positions.zip(data) {
        grid[cell] = byte;
    }

    cells
        .iter()
        .enumerate()
        .map(|(i, &cell)| grid[cell] ^ mask(i))
        .collect()
}

fn mask(index: usize) -> u8 {
    (index as u8).wrapping_sub(119)
}

/// Smallest `r` with `r * r >= len`.
fn side_for(len: usize) -> usize {
    let mut side = 0;
    while side * side < len {
        side += 1;
    }
    side
}

/// Grid cells visited by the first `len` steps of the diagonal walk, in
/// visiting order. All cells are distinct and lie inside the grid.
fn diagonal_walk(len: usize) -> (usize, Vec<usize>) {
    let side = side_for(len);
    let r = side as isize;
    let mut cells = Vec::with_capacity(len);

    let (mut a, mut b) = (0isize, 0isize);
    for _ in 0..len {
        if a < r {
            if b < 0 {
                b = a;
                a = 0;
            }
        } else {
            a = b + 2;
            b = r - 1;
        }
        cells.push((a + r * b) as usize);
        a += 1;
        b -= 1;
    }

    (side, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(hex(&encrypt(b"hello world")), "e1e7aefeefe2e3e0fff8f7");
        let counting: Vec<u8> = (0..10).collect();
        assert_eq!(hex(&encrypt(&counting)), "89898b9b8b89998f9789");
        assert_eq!(hex(&encrypt(b"sabc\x00")), "fae9eb8def");
    }

    #[test]
    fn test_walk_for_eleven_bytes() {
        let (side, cells) = diagonal_walk(11);
        assert_eq!(side, 4);
        assert_eq!(cells, vec![0, 4, 1, 8, 5, 2, 12, 9, 6, 3, 13]);
    }

    #[test]
    fn test_walk_stays_in_grid_and_never_repeats() {
        for len in 0..=1024 {
            let (side, cells) = diagonal_walk(len);
            let mut seen = vec![false; side * side];
            for cell in cells {
                assert!(cell < side * side, "len {len}: cell {cell} out of grid");
                assert!(!seen[cell], "len {len}: cell {cell} visited twice");
                seen[cell] = true;
            }
        }
    }

    #[test]
    fn test_empty_and_single() {
        assert!(encrypt(&[]).is_empty());
        assert!(decrypt(&[]).is_empty());
        assert_eq!(encrypt(&[0xFF]), vec![0x76]);
        assert_eq!(decrypt(&[0x76]), vec![0xFF]);
    }

    #[test]
    fn test_bytes_that_look_like_filler_survive() {
        // A payload full of 0xFF after masking must not lose cells.
        let data: Vec<u8> = (0..50).map(|i| 0xFF ^ mask(i)).collect();
        let encrypted = encrypt(&data);
        assert!(encrypted.iter().all(|&b| b == 0xFF));
        assert_eq!(decrypt(&encrypted), data);
    }

    #[test]
    fn test_roundtrip_squares_and_primes() {
        for len in [1, 2, 3, 4, 9, 16, 17, 31, 64, 97, 100, 127, 256, 257, 509] {
            let data: Vec<u8> = (0..len).map(|i| (i * 31 + 7) as u8).collect();
            assert_eq!(decrypt(&encrypt(&data)), data, "len {len}");
        }
    }
}
