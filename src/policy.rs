use rand::rngs::ThreadRng;
use rand::Rng;

use crate::arena::Arena;

/// Strategy that picks the next column to branch on.
///
/// The solver calls [`Self::choose`] once per branch node with read-only
/// access to the arena. An implementation must return the arena index of an
/// active *primary* column header, or `None` when no primary column remains
/// active, which tells the solver the current chosen-row sequence is a
/// complete solution. Returning a secondary or inactive column is a contract
/// violation, caught by a debug assertion in the solver.
///
/// The policy only influences the order in which solutions appear and how
/// fast the search converges, never which solutions exist.
pub trait ColumnPolicy {
    /// Returns the arena index of the column to branch on next.
    fn choose(&mut self, arena: &Arena) -> Option<usize>;
}

/// Picks the leftmost active column. Deterministic, O(1).
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstAvailable;

impl ColumnPolicy for FirstAvailable {
    fn choose(&mut self, arena: &Arena) -> Option<usize> {
        arena.active_primary_headers().next()
    }
}

/// Picks the rightmost active column; the mirror ordering of
/// [`FirstAvailable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LastAvailable;

impl ColumnPolicy for LastAvailable {
    fn choose(&mut self, arena: &Arena) -> Option<usize> {
        arena.active_primary_headers().last()
    }
}

/// Picks the column with the fewest remaining 1s, minimizing the branching
/// factor. This is the default policy and usually the fastest.
///
/// Ties go to the column encountered first in header-ring order, which keeps
/// the enumeration order reproducible across runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeastOnes;

impl ColumnPolicy for LeastOnes {
    fn choose(&mut self, arena: &Arena) -> Option<usize> {
        // min_by_key keeps the first of equally small columns.
        arena
            .active_primary_headers()
            .min_by_key(|&h| arena.live_count(h))
    }
}

/// Picks uniformly at random among the active columns.
///
/// A single left-to-right pass keeps one candidate, replacing it with the
/// i-th column seen with probability 1/i (reservoir sampling with a
/// reservoir of one), so every active primary column is equally likely
/// without knowing their number in advance.
#[derive(Clone, Debug)]
pub struct RandomColumn<R = ThreadRng> {
    rng: R,
}

impl RandomColumn<ThreadRng> {
    pub fn new() -> Self {
        RandomColumn {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomColumn<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomColumn<R> {
    /// Uses the supplied generator; hand it a seeded RNG for reproducible
    /// searches.
    pub fn with_rng(rng: R) -> Self {
        RandomColumn { rng }
    }
}

impl<R: Rng> ColumnPolicy for RandomColumn<R> {
    fn choose(&mut self, arena: &Arena) -> Option<usize> {
        let mut pick = None;
        for (i, header) in arena.active_primary_headers().enumerate() {
            if self.rng.gen_range(0..=i) == 0 {
                pick = Some(header);
            }
        }
        pick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DenseMatrix;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    /// Three primary columns with 2, 1 and 3 ones, plus one secondary.
    fn arena() -> Arena {
        let m = DenseMatrix::with_secondary(
            &[
                vec![true, true, true, true],
                vec![true, false, true, false],
                vec![false, false, true, true],
            ],
            3,
        )
        .unwrap();
        Arena::build(&m)
    }

    #[test]
    fn test_first_available_picks_leftmost() {
        assert_eq!(FirstAvailable.choose(&arena()), Some(1));
    }

    #[test]
    fn test_last_available_picks_rightmost_primary() {
        // The secondary column at arena index 4 must be skipped.
        assert_eq!(LastAvailable.choose(&arena()), Some(3));
    }

    #[test]
    fn test_least_ones_picks_smallest_column() {
        assert_eq!(LeastOnes.choose(&arena()), Some(2));
    }

    #[test]
    fn test_least_ones_breaks_ties_in_ring_order() {
        let m = DenseMatrix::new(&[vec![true, true, true], vec![false, true, true]]).unwrap();
        let mut working = Arena::build(&m);
        assert_eq!(LeastOnes.choose(&working), Some(1));
        // Covering column 1 removes row 0, leaving columns 2 and 3 tied
        // with one live cell each; the tie goes to the leftmost.
        working.cover(1);
        assert_eq!(LeastOnes.choose(&working), Some(2));
    }

    #[test]
    fn test_policies_return_none_when_only_secondaries_remain() {
        let mut working = arena();
        working.cover(1);
        working.cover(2);
        working.cover(3);
        assert_eq!(FirstAvailable.choose(&working), None);
        assert_eq!(LastAvailable.choose(&working), None);
        assert_eq!(LeastOnes.choose(&working), None);
        let mut random = RandomColumn::with_rng(ChaCha8Rng::seed_from_u64(7));
        assert_eq!(random.choose(&working), None);
    }

    #[test]
    fn test_random_column_stays_on_active_primaries() {
        let arena = arena();
        let mut policy = RandomColumn::with_rng(ChaCha8Rng::seed_from_u64(42));
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let header = policy.choose(&arena).unwrap();
            assert!(arena.is_primary(header));
            seen.insert(header);
        }
        // Every primary column is reachable by the reservoir pass.
        assert_eq!(seen, HashSet::from([1, 2, 3]));
    }
}
