// Board simulation engine
// Owns the truth and visibility grids, bomb placement, flood-fill reveal,
// flag bookkeeping and win detection

use rand::Rng;
use thiserror::Error;

/// Reasons a board cannot be built
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("board size must be at least 2, got {0}")]
    TooSmall(usize),
    #[error("{bombs} bombs do not fit on a {size}x{size} board with a safe cell")]
    TooManyBombs { size: usize, bombs: usize },
    #[error("cell ({0}, {1}) is outside the board")]
    OutOfBounds(usize, usize),
    #[error("cell ({0}, {1}) already holds a bomb")]
    DuplicateBomb(usize, usize),
}

/// What the player currently sees at a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Flagged,
    Revealed(u8), // adjacent bomb count (0-8)
}

/// Presentation-neutral description of a cell, consumed by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellHint {
    Hidden,
    Flag,
    Bomb,
    Empty,
    Number(u8),
}

/// Result of a flag toggle; none of these are errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    Placed,
    Removed,
    BudgetExhausted,
    Ignored,
}

/// Number of flags the player may still place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagBudget {
    remaining: usize,
    total: usize,
}

impl FlagBudget {
    /// Budget with all `total` flags available
    pub fn new(total: usize) -> Self {
        FlagBudget {
            remaining: total,
            total,
        }
    }

    /// Flags that can still be placed
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Flags available at the start, one per bomb
    pub fn total(&self) -> usize {
        self.total
    }

    fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    fn give_back(&mut self) {
        self.remaining = (self.remaining + 1).min(self.total);
    }
}

/// Number of bombs for a board of `size` at `density` percent, never less than one
pub fn bomb_count_for(size: usize, density: usize) -> usize {
    (size * size * density / 100).max(1)
}

/// Square minefield
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    bombs: Vec<bool>,          // truth grid
    visible: Vec<Visibility>,  // what the player sees
    bomb_count: usize,
    revealed: usize,
}

impl Board {
    fn empty(size: usize, bomb_count: usize) -> Result<Self, BoardError> {
        if size < 2 {
            return Err(BoardError::TooSmall(size));
        }
        if bomb_count >= size * size {
            return Err(BoardError::TooManyBombs {
                size,
                bombs: bomb_count,
            });
        }
        Ok(Board {
            size,
            bombs: vec![false; size * size],
            visible: vec![Visibility::Hidden; size * size],
            bomb_count,
            revealed: 0,
        })
    }

    /// Build a board with bombs placed uniformly at random, never on `(safe_row, safe_col)`
    pub fn generate<R: Rng + ?Sized>(
        size: usize,
        density: usize,
        safe_row: usize,
        safe_col: usize,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        if density >= 100 {
            return Err(BoardError::TooManyBombs {
                size,
                bombs: size * size,
            });
        }
        let mut board = Board::empty(size, bomb_count_for(size, density))?;
        let safe = board
            .index(safe_row, safe_col)
            .ok_or(BoardError::OutOfBounds(safe_row, safe_col))?;

        // rejection sampling: retry on the safe cell or an existing bomb
        let mut placed = 0;
        while placed < board.bomb_count {
            let i = rng.gen_range(0..size * size);
            if i == safe || board.bombs[i] {
                continue;
            }
            board.bombs[i] = true;
            placed += 1;
        }
        Ok(board)
    }

    /// Build a board from an explicit bomb layout
    pub fn from_bombs(size: usize, bombs: &[(usize, usize)]) -> Result<Self, BoardError> {
        let mut board = Board::empty(size, bombs.len())?;
        for &(row, col) in bombs {
            let i = board
                .index(row, col)
                .ok_or(BoardError::OutOfBounds(row, col))?;
            if board.bombs[i] {
                return Err(BoardError::DuplicateBomb(row, col));
            }
            board.bombs[i] = true;
        }
        Ok(board)
    }

    /// Side length of the square grid
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of bombs on the board
    pub fn bomb_count(&self) -> usize {
        self.bomb_count
    }

    /// Cells uncovered so far
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Flat index for (row, col), or None when out of bounds
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }

    /// True when (row, col) lies on the board
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        self.index(row, col).is_some()
    }

    /// Truth grid lookup; false outside the board
    pub fn has_bomb(&self, row: usize, col: usize) -> bool {
        self.index(row, col).is_some_and(|i| self.bombs[i])
    }

    /// Player-visible state of a cell, or None outside the board
    pub fn visibility(&self, row: usize, col: usize) -> Option<Visibility> {
        self.index(row, col).map(|i| self.visible[i])
    }

    /// Clipped Moore neighbourhood of a cell
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> + use<> {
        let size = self.size;
        let rows = row.saturating_sub(1)..=(row + 1).min(size - 1);
        rows.flat_map(move |r| {
            (col.saturating_sub(1)..=(col + 1).min(size - 1)).map(move |c| (r, c))
        })
        .filter(move |&(r, c)| (r, c) != (row, col))
    }

    /// Bombs among the neighbours of a cell
    pub fn adjacent_bombs(&self, row: usize, col: usize) -> u8 {
        self.neighbors(row, col)
            .filter(|&(r, c)| self.has_bomb(r, c))
            .count() as u8
    }

    /// Uncover a cell and flood through zero-count regions.
    /// Out-of-bounds or non-hidden targets are ignored. Returns how many cells were uncovered.
    pub fn reveal(&mut self, row: usize, col: usize) -> usize {
        let mut uncovered = 0;
        let mut pending = vec![(row, col)];
        while let Some((r, c)) = pending.pop() {
            let Some(i) = self.index(r, c) else { continue };
            // the Hidden check doubles as the visited set
            if self.visible[i] != Visibility::Hidden || self.bombs[i] {
                continue;
            }
            let adj = self.adjacent_bombs(r, c);
            self.visible[i] = Visibility::Revealed(adj);
            self.revealed += 1;
            uncovered += 1;
            if adj == 0 {
                pending.extend(self.neighbors(r, c));
            }
        }
        uncovered
    }

    /// Toggle a flag, honouring the remaining budget
    pub fn toggle_flag(&mut self, budget: &mut FlagBudget, row: usize, col: usize) -> FlagOutcome {
        let Some(i) = self.index(row, col) else {
            return FlagOutcome::Ignored;
        };
        match self.visible[i] {
            Visibility::Hidden => {
                if budget.take() {
                    self.visible[i] = Visibility::Flagged;
                    FlagOutcome::Placed
                } else {
                    FlagOutcome::BudgetExhausted
                }
            }
            Visibility::Flagged => {
                self.visible[i] = Visibility::Hidden;
                budget.give_back();
                FlagOutcome::Removed
            }
            Visibility::Revealed(_) => FlagOutcome::Ignored,
        }
    }

    /// Win iff every non-bomb cell has been revealed
    pub fn is_won(&self) -> bool {
        self.revealed == self.size * self.size - self.bomb_count
    }

    /// Cell as the player sees it
    pub fn hint(&self, row: usize, col: usize) -> CellHint {
        match self.visibility(row, col) {
            Some(Visibility::Flagged) => CellHint::Flag,
            Some(Visibility::Revealed(0)) => CellHint::Empty,
            Some(Visibility::Revealed(n)) => CellHint::Number(n),
            Some(Visibility::Hidden) | None => CellHint::Hidden,
        }
    }

    /// Cell with the truth grid exposed, shown once the game is over
    pub fn truth_hint(&self, row: usize, col: usize) -> CellHint {
        if !self.in_bounds(row, col) {
            return CellHint::Hidden;
        }
        if self.has_bomb(row, col) {
            return CellHint::Bomb;
        }
        match self.adjacent_bombs(row, col) {
            0 => CellHint::Empty,
            n => CellHint::Number(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    fn revealed_set(board: &Board) -> BTreeSet<(usize, usize)> {
        let n = board.size();
        (0..n)
            .flat_map(|r| (0..n).map(move |c| (r, c)))
            .filter(|&(r, c)| matches!(board.visibility(r, c), Some(Visibility::Revealed(_))))
            .collect()
    }

    // straightforward recursive flood fill to compare against
    fn reveal_recursive(board: &mut Board, row: usize, col: usize) {
        let Some(i) = board.index(row, col) else { return };
        if board.visible[i] != Visibility::Hidden {
            return;
        }
        let adj = board.adjacent_bombs(row, col);
        board.visible[i] = Visibility::Revealed(adj);
        board.revealed += 1;
        if adj == 0 {
            let around: Vec<_> = board.neighbors(row, col).collect();
            for (r, c) in around.into_iter().rev() {
                reveal_recursive(board, r, c);
            }
        }
    }

    #[test]
    fn generate_places_exact_bomb_count_for_presets() {
        let mut rng = StdRng::seed_from_u64(7);
        for (size, density, expected) in [(6, 15, 5), (8, 18, 11), (12, 20, 28)] {
            let board = Board::generate(size, density, 2, 3, &mut rng).unwrap();
            let bombs = board.bombs.iter().filter(|b| **b).count();
            assert_eq!(bombs, expected);
            assert_eq!(board.bomb_count(), expected);
            assert!(!board.has_bomb(2, 3));
        }
    }

    #[test]
    fn generate_starts_all_hidden() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = Board::generate(8, 18, 0, 0, &mut rng).unwrap();
        assert_eq!(board.revealed_count(), 0);
        assert!(board.visible.iter().all(|v| *v == Visibility::Hidden));
    }

    #[test]
    fn generate_rejects_bad_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Board::generate(1, 15, 0, 0, &mut rng), Err(BoardError::TooSmall(1)));
        assert_eq!(
            Board::generate(6, 15, 6, 0, &mut rng),
            Err(BoardError::OutOfBounds(6, 0))
        );
        assert!(matches!(
            Board::generate(4, 100, 0, 0, &mut rng),
            Err(BoardError::TooManyBombs { .. })
        ));
    }

    #[test]
    fn low_density_still_gets_one_bomb() {
        assert_eq!(bomb_count_for(2, 15), 1);
        let mut rng = StdRng::seed_from_u64(3);
        let board = Board::generate(2, 15, 1, 1, &mut rng).unwrap();
        assert_eq!(board.bomb_count(), 1);
        assert!(!board.has_bomb(1, 1));
    }

    #[test]
    fn from_bombs_rejects_duplicates_and_full_boards() {
        assert_eq!(
            Board::from_bombs(3, &[(0, 0), (0, 0)]),
            Err(BoardError::DuplicateBomb(0, 0))
        );
        assert!(matches!(
            Board::from_bombs(2, &[(0, 0), (0, 1), (1, 0), (1, 1)]),
            Err(BoardError::TooManyBombs { .. })
        ));
    }

    #[test]
    fn neighbors_are_clipped_at_edges() {
        let board = Board::from_bombs(4, &[]).unwrap();
        assert_eq!(board.neighbors(0, 0).count(), 3);
        assert_eq!(board.neighbors(0, 2).count(), 5);
        assert_eq!(board.neighbors(1, 1).count(), 8);
        assert_eq!(board.neighbors(3, 3).count(), 3);
    }

    #[test]
    fn reveal_numbered_cell_stops() {
        let mut board = Board::from_bombs(3, &[(0, 0)]).unwrap();
        assert_eq!(board.reveal(1, 1), 1);
        assert_eq!(board.visibility(1, 1), Some(Visibility::Revealed(1)));
        assert_eq!(board.hint(1, 1), CellHint::Number(1));
    }

    #[test]
    fn reveal_floods_zero_region() {
        let mut board = Board::from_bombs(4, &[(3, 3)]).unwrap();
        assert_eq!(board.reveal(0, 0), 15);
        assert_eq!(board.hint(0, 0), CellHint::Empty);
        assert_eq!(board.hint(2, 2), CellHint::Number(1));
        assert_eq!(board.hint(3, 3), CellHint::Hidden);
        assert!(board.is_won());
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut board = Board::from_bombs(4, &[(3, 3)]).unwrap();
        board.reveal(0, 0);
        let before = board.clone();
        assert_eq!(board.reveal(0, 0), 0);
        assert_eq!(board.reveal(1, 2), 0);
        assert_eq!(board.reveal(9, 9), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn reveal_skips_flags_inside_region() {
        let mut board = Board::from_bombs(4, &[(3, 3)]).unwrap();
        let mut budget = FlagBudget::new(1);
        board.toggle_flag(&mut budget, 0, 3);
        board.reveal(0, 0);
        assert_eq!(board.visibility(0, 3), Some(Visibility::Flagged));
        assert_eq!(board.revealed_count(), 14);
        assert!(!board.is_won());
    }

    #[test]
    fn flag_toggle_follows_budget() {
        let mut board = Board::from_bombs(3, &[(0, 0)]).unwrap();
        let mut budget = FlagBudget::new(board.bomb_count());

        assert_eq!(board.toggle_flag(&mut budget, 0, 0), FlagOutcome::Placed);
        assert_eq!(budget.remaining(), 0);
        assert_eq!(board.toggle_flag(&mut budget, 1, 1), FlagOutcome::BudgetExhausted);
        assert_eq!(board.visibility(1, 1), Some(Visibility::Hidden));
        assert_eq!(board.toggle_flag(&mut budget, 0, 0), FlagOutcome::Removed);
        assert_eq!(budget.remaining(), 1);

        board.reveal(2, 2);
        assert_eq!(board.toggle_flag(&mut budget, 2, 2), FlagOutcome::Ignored);
        assert_eq!(board.toggle_flag(&mut budget, 5, 5), FlagOutcome::Ignored);
        assert_eq!(budget.remaining(), 1);
    }

    #[test]
    fn win_needs_every_safe_cell() {
        let mut board = Board::from_bombs(2, &[(0, 0)]).unwrap();
        board.reveal(0, 1);
        board.reveal(1, 0);
        assert!(!board.is_won());
        board.reveal(1, 1);
        assert!(board.is_won());
    }

    #[test]
    fn truth_hint_exposes_bombs_and_counts() {
        let board = Board::from_bombs(3, &[(0, 0), (2, 2)]).unwrap();
        assert_eq!(board.truth_hint(0, 0), CellHint::Bomb);
        assert_eq!(board.truth_hint(1, 1), CellHint::Number(2));
        assert_eq!(board.truth_hint(0, 2), CellHint::Empty);
        assert_eq!(board.hint(0, 0), CellHint::Hidden);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn generated_boards_respect_count_and_safe_cell(
            seed in any::<u64>(),
            size in 2usize..16,
            density in 0usize..60,
            safe_row in 0usize..16,
            safe_col in 0usize..16,
        ) {
            let (safe_row, safe_col) = (safe_row % size, safe_col % size);
            let mut rng = StdRng::seed_from_u64(seed);
            let board = Board::generate(size, density, safe_row, safe_col, &mut rng).unwrap();
            prop_assert_eq!(board.bombs.iter().filter(|b| **b).count(), bomb_count_for(size, density));
            prop_assert!(!board.has_bomb(safe_row, safe_col));
        }

        #[test]
        fn flood_fill_matches_recursive_reference(seed in any::<u64>(), row in 0usize..10, col in 0usize..10) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut iterative = Board::generate(10, 12, row, col, &mut rng).unwrap();
            let mut recursive = iterative.clone();
            iterative.reveal(row, col);
            reveal_recursive(&mut recursive, row, col);
            prop_assert_eq!(revealed_set(&iterative), revealed_set(&recursive));
            prop_assert_eq!(iterative.revealed_count(), recursive.revealed_count());
        }

        #[test]
        fn any_start_in_a_zero_region_reveals_the_same_set(seed in any::<u64>(), pick in any::<prop::sample::Index>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let base = Board::generate(10, 10, 5, 5, &mut rng).unwrap();
            let mut first = base.clone();
            first.reveal(5, 5);
            if base.adjacent_bombs(5, 5) == 0 {
                let zeros: Vec<_> = revealed_set(&first)
                    .into_iter()
                    .filter(|&(r, c)| first.visibility(r, c) == Some(Visibility::Revealed(0)))
                    .collect();
                let (r, c) = *pick.get(&zeros);
                let mut second = base.clone();
                second.reveal(r, c);
                prop_assert_eq!(revealed_set(&first), revealed_set(&second));
            }
        }

        #[test]
        fn flag_budget_stays_in_range(
            seed in any::<u64>(),
            moves in prop::collection::vec((0usize..6, 0usize..6, any::<bool>()), 0..80),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Board::generate(6, 15, 0, 0, &mut rng).unwrap();
            let mut budget = FlagBudget::new(board.bomb_count());
            for (r, c, reveal) in moves {
                if reveal && !board.has_bomb(r, c) {
                    board.reveal(r, c);
                } else {
                    board.toggle_flag(&mut budget, r, c);
                }
                let flags = board.visible.iter().filter(|v| **v == Visibility::Flagged).count();
                prop_assert!(budget.remaining() <= budget.total());
                prop_assert_eq!(budget.remaining() + flags, budget.total());
            }
        }
    }
}
