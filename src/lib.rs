//! A configurable and efficient implementation of Knuth's Algorithm X
//! (<https://arxiv.org/pdf/cs/0011047.pdf>) for the Exact Cover problem: given
//! a matrix of 1s and 0s, find the subsets of rows that sum to the all-ones
//! vector. The matrix is represented as a mesh of four-directional circular
//! linked rings over a flat index arena (the "dancing links"), so a column
//! and every row touching it can be removed, and later restored exactly, in
//! O(1) per link edit.
//!
//! Columns may be split into *primary* columns (must be covered exactly once)
//! and *secondary* columns (covered at most once); instances group all
//! primary columns before all secondary ones. Instances are injected through
//! the [`Matrix`] trait, solutions are streamed to a [`Visitor`] (any
//! `FnMut(&[usize]) -> bool` closure works), and the column-picking
//! heuristic is pluggable via [`ColumnPolicy`]. The search runs either
//! recursively or on an explicit work stack for bounded stack depth; both
//! engines enumerate the same solutions in the same order.
//!
//! # Example
//! ```
//! use dlx::{DancingLinks, DenseMatrix, SolveMethod};
//!
//! let matrix = DenseMatrix::new(&[
//!     vec![true, false, true],  // row 0
//!     vec![false, true, false], // row 1
//!     vec![false, true, true],  // row 2
//! ])
//! .unwrap();
//!
//! let mut solver = DancingLinks::new(&matrix);
//! let mut found = Vec::new();
//! solver.solve(
//!     &mut |solution: &[usize]| {
//!         found.push(solution.to_vec());
//!         true // keep enumerating
//!     },
//!     SolveMethod::Iterative,
//! );
//! assert_eq!(found, vec![vec![0, 1]]);
//! ```

pub mod arena;
pub mod error;
pub mod matrix;
pub mod policy;
pub mod solver;
pub mod visitor;

pub use arena::Arena;
pub use error::{Error, Result};
pub use matrix::{DenseMatrix, Matrix};
pub use policy::{ColumnPolicy, FirstAvailable, LastAvailable, LeastOnes, RandomColumn};
pub use solver::{DancingLinks, SolveMethod};
pub use visitor::Visitor;
