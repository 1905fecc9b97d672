use log::trace;

use crate::arena::Arena;
use crate::matrix::Matrix;
use crate::policy::{ColumnPolicy, LeastOnes};
use crate::visitor::Visitor;


/// Which backtracking engine [`DancingLinks::solve`] runs.
///
/// Both engines use the same column-then-row selection rule and therefore
/// enumerate the identical solutions in the identical order; `Iterative`
/// bounds stack usage by the size of the search state instead of the
/// recursion depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveMethod {
    Recursive,
    Iterative,
}

/// One pending resume point of the iterative engine.
///
/// The explicit stack is a manual continuation-passing transform of the
/// recursive search: each frame carries exactly the column header and row
/// cell needed to resume at that point.
enum Frame {
    /// Ask the policy for the next column to branch on.
    FindColumn,
    /// Commit to covering `row` (linked under `header` at `cell`) and
    /// descend.
    ChooseRow {
        header: usize,
        cell: usize,
        row: usize,
    },
    /// Undo the commitment made by the matching `ChooseRow`.
    UnchooseRow { header: usize, cell: usize },
    /// Undo the cover of `header` performed by the matching `FindColumn`.
    UncoverColumn { header: usize },
}

/// An exact cover solver over a dancing-links arena.
///
/// The instance matrix is injected through the [`Matrix`] trait and turned
/// into a mesh of circular rings by [`Self::initialize`]; solutions are
/// streamed to a [`Visitor`] by [`Self::solve`]. The column-picking
/// heuristic is a type parameter so it can be inlined on the hot path; it
/// defaults to [`LeastOnes`].
///
/// # Example
/// ```
/// use dlx::{DancingLinks, DenseMatrix, SolveMethod};
///
/// // Rows 1 and 2 together cover all four columns exactly once,
/// // and so do rows 0 and 3.
/// let matrix = DenseMatrix::new(&[
///     vec![true, false, true, false],
///     vec![true, false, false, true],
///     vec![false, true, true, false],
///     vec![false, true, false, true],
/// ])
/// .unwrap();
///
/// let mut solver = DancingLinks::new(&matrix);
/// let solutions = solver.solve_all(SolveMethod::Iterative);
/// assert_eq!(solutions.len(), 2);
/// assert!(solutions.iter().any(|s| {
///     let mut s = s.clone();
///     s.sort();
///     s == [0, 3]
/// }));
/// ```
pub struct DancingLinks<P = LeastOnes> {
    arena: Arena,
    policy: P,
}

impl DancingLinks<LeastOnes> {
    /// Builds a solver for `matrix` with the default fewest-ones policy.
    pub fn new<M: Matrix + ?Sized>(matrix: &M) -> Self {
        Self::with_policy(matrix, LeastOnes)
    }
}

impl<P: ColumnPolicy + Default> Default for DancingLinks<P> {
    /// A solver over the trivial empty instance, which has exactly one
    /// (empty) solution; use [`Self::initialize`] to give it a real one.
    fn default() -> Self {
        DancingLinks {
            arena: Arena::empty(),
            policy: P::default(),
        }
    }
}

impl<P: ColumnPolicy> DancingLinks<P> {
    /// Builds a solver for `matrix` branching with `policy`.
    pub fn with_policy<M: Matrix + ?Sized>(matrix: &M, policy: P) -> Self {
        DancingLinks {
            arena: Arena::build(matrix),
            policy,
        }
    }

    /// Discards any prior state and rebuilds the arena from `matrix`.
    ///
    /// Safe to call repeatedly, with the same instance or a different one;
    /// rebuilding with the same matrix reproduces the identical arena and
    /// the identical enumeration order.
    pub fn initialize<M: Matrix + ?Sized>(&mut self, matrix: &M) {
        self.arena = Arena::build(matrix);
    }

    /// Streams every solution to `visitor` until it asks to stop or the
    /// search space is exhausted.
    ///
    /// Whatever happens (full enumeration, early stop, no solution at all),
    /// the internal structure is restored exactly to its post-initialize
    /// state before this returns, so the solver can be reused without any
    /// caller-side bookkeeping.
    pub fn solve<V: Visitor>(&mut self, visitor: &mut V, method: SolveMethod) {
        trace!(
            "{method:?} search over {} active columns",
            self.arena.active_cols()
        );
        match method {
            SolveMethod::Recursive => {
                self.rsolve(&mut Vec::new(), visitor);
            }
            SolveMethod::Iterative => self.isolve(visitor),
        }
    }

    /// Collects every solution as a list of original row indices.
    pub fn solve_all(&mut self, method: SolveMethod) -> Vec<Vec<usize>> {
        let mut solutions = Vec::new();
        self.solve(
            &mut |chosen: &[usize]| {
                solutions.push(chosen.to_vec());
                true
            },
            method,
        );
        solutions
    }

    /// Number of rows not currently covered.
    pub fn active_rows(&self) -> usize {
        self.arena.active_rows()
    }

    /// Number of columns not currently covered.
    pub fn active_cols(&self) -> usize {
        self.arena.active_cols()
    }

    /// Live "1" count of the semantic column `col`.
    pub fn live_count(&self, col: usize) -> usize {
        self.arena.live_count(col + 1)
    }

    /// Every still-linked cell as a `(row, column)` pair; a read-only
    /// diagnostic dump of the active board.
    pub fn active_cells(&self) -> Vec<(usize, usize)> {
        self.arena.active_cells()
    }

    /// Recursive engine. Returns the continuation flag: `false` once the
    /// visitor has asked to stop, which unwinds through every frame while
    /// still performing every pending uncover on the way out.
    fn rsolve<V: Visitor>(&mut self, chosen: &mut Vec<usize>, visitor: &mut V) -> bool {
        let Some(header) = self.policy.choose(&self.arena) else {
            // No primary column left to cover: `chosen` is a solution.
            return visitor.visit(chosen);
        };
        debug_assert!(
            self.arena.is_active_primary(header),
            "policy chose an inactive or secondary column"
        );
        if self.arena.cells[header].down == header {
            // The column is active but no remaining row can cover it;
            // a normal dead end, not a solution and not an error.
            return true;
        }

        self.arena.cover(header);
        let mut keep_going = true;
        let mut c1 = self.arena.cells[header].down;
        while keep_going {
            let Some(row) = self.arena.cells[c1].row else {
                break; // wrapped around to the header
            };
            let mut c2 = self.arena.cells[c1].right;
            while self.arena.cells[c2].header != header {
                let other = self.arena.cells[c2].header;
                self.arena.cover(other);
                c2 = self.arena.cells[c2].right;
            }
            chosen.push(row);
            keep_going = self.rsolve(chosen, visitor);
            chosen.pop();
            let mut c2 = self.arena.cells[c1].left;
            while self.arena.cells[c2].header != header {
                let other = self.arena.cells[c2].header;
                self.arena.uncover(other);
                c2 = self.arena.cells[c2].left;
            }
            c1 = self.arena.cells[c1].down;
        }
        self.arena.uncover(header);
        keep_going
    }

    /// Iterative engine; behaviorally identical to [`Self::rsolve`] with an
    /// explicit work stack in place of call recursion.
    fn isolve<V: Visitor>(&mut self, visitor: &mut V) {
        let mut stack = vec![Frame::FindColumn];
        let mut chosen: Vec<usize> = Vec::new();
        // Cleared once the visitor asks to stop. From then on popped branch
        // frames are dropped unexecuted, but the restoration frames queued
        // beneath them still run, so the structure always ends fully
        // restored no matter when the search is cut off.
        let mut keep_going = true;

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::FindColumn if keep_going => {
                    let Some(header) = self.policy.choose(&self.arena) else {
                        keep_going = visitor.visit(&chosen);
                        continue;
                    };
                    debug_assert!(
                        self.arena.is_active_primary(header),
                        "policy chose an inactive or secondary column"
                    );
                    if self.arena.cells[header].down == header {
                        continue; // dead end
                    }
                    self.arena.cover(header);
                    stack.push(Frame::UncoverColumn { header });
                    // Queue candidate rows bottom-to-top so they pop
                    // top-to-bottom, matching the recursive engine.
                    let mut cell = self.arena.cells[header].up;
                    while let Some(row) = self.arena.cells[cell].row {
                        stack.push(Frame::ChooseRow { header, cell, row });
                        cell = self.arena.cells[cell].up;
                    }
                }
                Frame::ChooseRow { header, cell, row } if keep_going => {
                    let mut c2 = self.arena.cells[cell].right;
                    while self.arena.cells[c2].header != header {
                        let other = self.arena.cells[c2].header;
                        self.arena.cover(other);
                        c2 = self.arena.cells[c2].right;
                    }
                    chosen.push(row);
                    stack.push(Frame::UnchooseRow { header, cell });
                    stack.push(Frame::FindColumn);
                }
                Frame::UnchooseRow { header, cell } => {
                    chosen.pop();
                    let mut c2 = self.arena.cells[cell].left;
                    while self.arena.cells[c2].header != header {
                        let other = self.arena.cells[c2].header;
                        self.arena.uncover(other);
                        c2 = self.arena.cells[c2].left;
                    }
                }
                Frame::UncoverColumn { header } => self.arena.uncover(header),
                // Branch work popped after a stop; nothing to do.
                Frame::FindColumn | Frame::ChooseRow { .. } => {}
            }
        }
    }
}
