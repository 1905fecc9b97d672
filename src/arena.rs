use log::debug;

use crate::matrix::Matrix;

/// Arena index of the sentinel root cell.
pub(crate) const ROOT: usize = 0;

/// A single cell in the dancing-links mesh: either a column header or one
/// matrix "1". Cells never move; all linkage is by arena index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub left: usize,
    pub right: usize,
    pub up: usize,
    pub down: usize,
    /// Arena index of the column header this cell belongs to.
    pub header: usize,
    /// Matrix row of the cell; `None` for headers and the root.
    pub row: Option<usize>,
}

/// Flat, index-addressed store of every [`Cell`] of an instance, threaded
/// into three families of circular rings:
///
/// - the cells of one matrix row, via `left`/`right`;
/// - the cells of one column plus its header, via `up`/`down`;
/// - all column headers plus the root, via `left`/`right`.
///
/// Index 0 is the root; semantic column `j` lives at arena index `j + 1`.
/// [`Self::cover`] and [`Self::uncover`] splice cells out of and back into
/// these rings in O(1) per link edit without ever freeing a cell or reusing
/// an index, so any amount of search can be undone exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    pub(crate) cells: Vec<Cell>,
    /// Live "1" count per column, indexed by arena index. Entry 0 is unused.
    pub(crate) ones: Vec<usize>,
    /// Rows not currently covered.
    pub(crate) active_rows: usize,
    /// Columns not currently covered.
    pub(crate) active_cols: usize,
    /// Arena index of the first secondary column header; `cols + 1` when
    /// every column is primary.
    pub(crate) sec_start: usize,
}

impl Default for Arena {
    fn default() -> Self {
        Arena::empty()
    }
}

impl Arena {
    /// The trivial zero-row, zero-column instance: a root linked to itself.
    pub(crate) fn empty() -> Self {
        Arena {
            cells: vec![Cell {
                left: ROOT,
                right: ROOT,
                up: ROOT,
                down: ROOT,
                header: ROOT,
                row: None,
            }],
            ones: vec![0],
            active_rows: 0,
            active_cols: 0,
            sec_start: 1,
        }
    }

    /// Builds the mesh for `matrix` from scratch.
    ///
    /// One header per column is appended to the header ring in column order;
    /// then rows are scanned in order, and every 1 becomes a cell appended to
    /// the tail of its row ring and the bottom of its column ring. Costs
    /// O(rows x cols) calls to [`Matrix::value`] and O(ones) insertions.
    /// A column without any 1s is left as a ring containing only its header.
    pub(crate) fn build<M: Matrix + ?Sized>(matrix: &M) -> Self {
        let rows = matrix.rows();
        let cols = matrix.cols();
        let sec = matrix.first_secondary_col();
        debug_assert!(sec <= cols, "secondary boundary {sec} past column count {cols}");

        let mut arena = Arena::empty();
        arena.active_rows = rows;
        arena.active_cols = cols;
        arena.sec_start = sec + 1;
        arena.ones.resize(cols + 1, 0);
        arena.cells.reserve(cols);

        for j in 0..cols {
            let idx = j + 1;
            arena.cells.push(Cell {
                left: j, // previous header, or the root for the first
                right: ROOT,
                up: idx,
                down: idx,
                header: idx,
                row: None,
            });
            arena.cells[j].right = idx;
            arena.cells[ROOT].left = idx;
        }

        // Bottommost cell seen so far in each column, by semantic index.
        let mut bottom: Vec<usize> = (1..=cols).collect();
        let mut ones = 0usize;

        for i in 0..rows {
            let mut first: Option<usize> = None;
            for j in 0..cols {
                if !matrix.value(i, j) {
                    continue;
                }
                let header = j + 1;
                let idx = arena.cells.len();
                arena.cells.push(Cell {
                    left: idx,
                    right: idx,
                    up: bottom[j],
                    down: header,
                    header,
                    row: Some(i),
                });
                arena.cells[bottom[j]].down = idx;
                arena.cells[header].up = idx;
                arena.ones[header] += 1;
                bottom[j] = idx;
                ones += 1;
                if let Some(head) = first {
                    // Splice into the row ring just left of its first cell,
                    // i.e. at the tail.
                    let tail = arena.cells[head].left;
                    arena.cells[idx].left = tail;
                    arena.cells[idx].right = head;
                    arena.cells[tail].right = idx;
                    arena.cells[head].left = idx;
                } else {
                    first = Some(idx);
                }
            }
        }

        debug!(
            "built {rows}x{cols} instance: {ones} ones, {} secondary columns",
            cols - sec
        );
        arena
    }

    /// Unlinks the column at `header` and every row intersecting it.
    ///
    /// Walks down the column ring; for each row cell, walks the row ring and
    /// unlinks every other cell vertically from its own column, decrementing
    /// that column's live count. The header itself is then unlinked from the
    /// header ring. Nothing is freed and no index changes, so the removed
    /// cells keep pointing at their old neighbors for [`Self::uncover`].
    pub(crate) fn cover(&mut self, header: usize) {
        debug_assert!(
            self.cells[header].row.is_none() && header != ROOT,
            "cover target {header} is not a column header"
        );
        let mut c1 = self.cells[header].down;
        while self.cells[c1].row.is_some() {
            let mut c2 = self.cells[c1].right;
            while self.cells[c2].header != header {
                let up = self.cells[c2].up;
                let down = self.cells[c2].down;
                self.cells[up].down = down;
                self.cells[down].up = up;
                self.ones[self.cells[c2].header] -= 1;
                c2 = self.cells[c2].right;
            }
            self.active_rows -= 1;
            c1 = self.cells[c1].down;
        }
        let left = self.cells[header].left;
        let right = self.cells[header].right;
        self.cells[left].right = right;
        self.cells[right].left = left;
        self.active_cols -= 1;
    }

    /// Exact structural inverse of [`Self::cover`].
    ///
    /// Must be invoked in LIFO order with respect to the matching cover: the
    /// header is relinked first, then rows bottom-to-top and cells
    /// right-to-left, incrementing the live counts back.
    pub(crate) fn uncover(&mut self, header: usize) {
        debug_assert!(
            self.cells[header].row.is_none() && header != ROOT,
            "uncover target {header} is not a column header"
        );
        self.active_cols += 1;
        let left = self.cells[header].left;
        let right = self.cells[header].right;
        self.cells[left].right = header;
        self.cells[right].left = header;
        let mut c1 = self.cells[header].up;
        while self.cells[c1].row.is_some() {
            self.active_rows += 1;
            let mut c2 = self.cells[c1].left;
            while self.cells[c2].header != header {
                self.ones[self.cells[c2].header] += 1;
                let up = self.cells[c2].up;
                let down = self.cells[c2].down;
                self.cells[down].up = c2;
                self.cells[up].down = c2;
                c2 = self.cells[c2].left;
            }
            c1 = self.cells[c1].up;
        }
    }

    /// Number of rows not currently covered.
    pub fn active_rows(&self) -> usize {
        self.active_rows
    }

    /// Number of columns not currently covered.
    pub fn active_cols(&self) -> usize {
        self.active_cols
    }

    /// Live "1" count of the column whose header sits at arena index
    /// `header`.
    pub fn live_count(&self, header: usize) -> usize {
        self.ones[header]
    }

    /// Whether the arena index `header` denotes a primary column.
    pub fn is_primary(&self, header: usize) -> bool {
        header != ROOT && header < self.sec_start
    }

    /// The active primary column headers, in header-ring order.
    ///
    /// Primary columns precede secondary ones in the ring and covering
    /// preserves ring order, so the walk can stop at the first secondary
    /// header it meets.
    pub fn active_primary_headers(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(self.cells[ROOT].right), move |&h| {
            Some(self.cells[h].right)
        })
        .take_while(move |&h| h != ROOT && self.is_primary(h))
    }

    /// Every still-linked cell as a `(row, column)` pair, scanned column by
    /// column in header-ring order. Diagnostic only; does not mutate.
    pub fn active_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut header = self.cells[ROOT].right;
        while header != ROOT {
            let mut c = self.cells[header].down;
            while let Some(row) = self.cells[c].row {
                out.push((row, header - 1));
                c = self.cells[c].down;
            }
            header = self.cells[header].right;
        }
        out
    }

    /// Debug-build check that a policy's pick is a live primary header.
    pub(crate) fn is_active_primary(&self, header: usize) -> bool {
        self.is_primary(header) && self.active_primary_headers().any(|h| h == header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DenseMatrix;

    fn small() -> Arena {
        // 0 1 1
        // 1 0 1
        let m = DenseMatrix::new(&[vec![false, true, true], vec![true, false, true]]).unwrap();
        Arena::build(&m)
    }

    #[test]
    fn test_header_ring_order() {
        let arena = small();
        assert_eq!(arena.cells[ROOT].right, 1);
        assert_eq!(arena.cells[1].right, 2);
        assert_eq!(arena.cells[2].right, 3);
        assert_eq!(arena.cells[3].right, ROOT);
        assert_eq!(arena.cells[ROOT].left, 3);
        assert_eq!(arena.active_rows(), 2);
        assert_eq!(arena.active_cols(), 3);
    }

    #[test]
    fn test_live_counts() {
        let arena = small();
        assert_eq!(arena.live_count(1), 1);
        assert_eq!(arena.live_count(2), 1);
        assert_eq!(arena.live_count(3), 2);
    }

    #[test]
    fn test_row_and_column_rings() {
        let arena = small();
        // Row 0 cells land at indices 4 (col 1) and 5 (col 2).
        assert_eq!(arena.cells[4].right, 5);
        assert_eq!(arena.cells[5].right, 4);
        assert_eq!(arena.cells[4].row, Some(0));
        // Column 2 (arena 3) holds both rows, top-to-bottom.
        assert_eq!(arena.cells[3].down, 5);
        assert_eq!(arena.cells[5].down, 7);
        assert_eq!(arena.cells[7].down, 3);
        assert_eq!(arena.cells[3].up, 7);
    }

    #[test]
    fn test_zero_one_column_degenerates_to_header_ring() {
        let m = DenseMatrix::new(&[vec![true, false]]).unwrap();
        let arena = Arena::build(&m);
        assert_eq!(arena.cells[2].down, 2);
        assert_eq!(arena.cells[2].up, 2);
        assert_eq!(arena.live_count(2), 0);
    }

    #[test]
    fn test_cover_uncover_restores_structure() {
        let arena = small();
        let pristine = arena.clone();
        let mut working = arena;
        working.cover(3);
        assert_ne!(working, pristine);
        assert_eq!(working.active_cols(), 2);
        assert_eq!(working.active_rows(), 0);
        working.uncover(3);
        assert_eq!(working, pristine);
    }

    #[test]
    fn test_nested_cover_uncover_restores_structure() {
        let pristine = small();
        let mut working = pristine.clone();
        working.cover(1);
        let after_outer = working.clone();
        working.cover(2);
        working.uncover(2);
        assert_eq!(working, after_outer);
        working.uncover(1);
        assert_eq!(working, pristine);
    }

    #[test]
    fn test_cover_hides_intersecting_rows() {
        let mut arena = small();
        arena.cover(3); // both rows intersect column 2
        assert_eq!(arena.active_cells(), vec![]);
        assert_eq!(arena.live_count(1), 0);
        assert_eq!(arena.live_count(2), 0);
    }

    #[test]
    fn test_active_primary_headers_skips_secondaries() {
        let m =
            DenseMatrix::with_secondary(&[vec![true, true, true], vec![true, true, true]], 2)
                .unwrap();
        let arena = Arena::build(&m);
        assert_eq!(arena.active_primary_headers().collect::<Vec<_>>(), [1, 2]);
        assert!(!arena.is_primary(3));
    }

    #[test]
    fn test_active_cells_dump() {
        let arena = small();
        assert_eq!(
            arena.active_cells(),
            vec![(1, 0), (0, 1), (0, 2), (1, 2)]
        );
    }

    #[test]
    fn test_empty_arena() {
        let arena = Arena::empty();
        assert_eq!(arena.cells[ROOT].right, ROOT);
        assert_eq!(arena.active_primary_headers().count(), 0);
        assert_eq!(arena.active_cells(), vec![]);
    }
}
