/// [Szudzik pairing function][szudzik-pairing], wrapping on overflow.
///
/// ```text
/// (a, b) -> if (a<b) then (b^2 + a) else (a^2 + a + b)
/// ```
///
/// Exact (and therefore injective) while both arguments are below `2^32`.
///
/// [szudzik-pairing]: http://szudzik.com/ElegantPairing.pdf
pub fn pairing_szudzik(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// [Pairing function][pairing] for two `u64` values.
///
/// [pairing]: https://en.wikipedia.org/wiki/Pairing_function
pub fn pairing2(a: u64, b: u64) -> u64 {
    pairing_szudzik(a, b)
}

/// Folds a sequence of words into a single hash with [`pairing2`].
pub fn pairing_many(words: impl IntoIterator<Item = u64>) -> u64 {
    words.into_iter().fold(0, pairing2)
}

pub trait MyHash {
    /// Structural hash: a pure function of the value's contents.
    fn hash(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_szudzik_fills_square() {
        // Below 32, pairs map one-to-one onto 0..32*32.
        let mut seen: Vec<u64> = (0..32).flat_map(|a| (0..32).map(move |b| pairing_szudzik(a, b))).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..32 * 32).collect::<Vec<u64>>());
    }

    #[test]
    fn test_szudzik_wraps() {
        // u64::MAX squared wraps to 1.
        assert_eq!(pairing_szudzik(u64::MAX, 3), 3);
        assert_eq!(pairing_szudzik(3, u64::MAX), 4);
    }

    #[test]
    fn test_pairing_full_cube_words() {
        // A chunk of 32 literals uses all 64 bits of its word.
        let low = (1u64 << 63) | 0b01;
        let high = (1u64 << 63) | 0b10;
        assert_eq!(pairing_many([low]), 1);
        assert_eq!(pairing_many([high]), 4);
        assert_eq!(pairing_many([low, high]), 5);
        assert_eq!(pairing_many([low, low]), 2);
    }

    #[test]
    fn test_pairing_many() {
        assert_eq!(pairing_many([]), 0);
        assert_eq!(pairing_many([5]), pairing2(0, 5));
        assert_eq!(pairing_many([5, 7]), pairing2(pairing2(0, 5), 7));
        assert_ne!(pairing_many([5, 7]), pairing_many([7, 5]));
    }
}
