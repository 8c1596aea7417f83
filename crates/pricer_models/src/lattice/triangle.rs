//! Flat row-major storage for recombining binomial lattices.
//!
//! Step `i` holds `i + 1` nodes, so a lattice with `N` steps stores
//! `(N + 1)(N + 2) / 2` values. Node `(i, j)` lives at offset `i(i + 1)/2 + j`.

use std::ops::Index;

/// One node of a lattice, as exposed for tabular export.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LatticeNode {
    /// Time step index `i` in `[0, N]`
    pub step: usize,
    /// Node index `j` in `[0, i]` (number of up-moves)
    pub node: usize,
    /// Value stored at the node
    pub value: f64,
}

/// Triangular array of `f64` addressed by `(step, node)`.
///
/// # Examples
/// ```
/// use pricer_models::lattice::TriangularGrid;
///
/// assert_eq!(TriangularGrid::node_count(2), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TriangularGrid {
    steps: usize,
    values: Vec<f64>,
}

impl TriangularGrid {
    /// Allocates a zero-filled grid for `steps` time steps.
    pub(crate) fn zeros(steps: usize) -> Self {
        Self {
            steps,
            values: vec![0.0; Self::node_count(steps)],
        }
    }

    /// Total number of nodes in a lattice with `steps` time steps.
    #[inline]
    pub fn node_count(steps: usize) -> usize {
        (steps + 1) * (steps + 2) / 2
    }

    #[inline]
    fn offset(step: usize) -> usize {
        step * (step + 1) / 2
    }

    /// Number of time steps `N` (the grid has `N + 1` rows).
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Value at `(step, node)`, or `None` outside the triangle.
    #[inline]
    pub fn get(&self, step: usize, node: usize) -> Option<f64> {
        if step > self.steps || node > step {
            return None;
        }
        Some(self.values[Self::offset(step) + node])
    }

    /// All nodes of one time step, ordered by number of up-moves.
    pub fn row(&self, step: usize) -> Option<&[f64]> {
        if step > self.steps {
            return None;
        }
        let start = Self::offset(step);
        Some(&self.values[start..start + step + 1])
    }

    pub(crate) fn row_mut(&mut self, step: usize) -> &mut [f64] {
        let start = Self::offset(step);
        &mut self.values[start..start + step + 1]
    }

    /// Mutable views of rows `step` and `step + 1` at once.
    pub(crate) fn adjacent_rows_mut(&mut self, step: usize) -> (&mut [f64], &mut [f64]) {
        let start = Self::offset(step);
        let split = Self::offset(step + 1);
        let (head, tail) = self.values.split_at_mut(split);
        (&mut head[start..], &mut tail[..step + 2])
    }

    /// Iterates over rows from step 0 to step `N`.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..=self.steps).map(move |step| {
            let start = Self::offset(step);
            &self.values[start..start + step + 1]
        })
    }

    /// Flat enumeration of every node as `(step, node, value)`.
    pub fn nodes(&self) -> impl Iterator<Item = LatticeNode> + '_ {
        self.rows().enumerate().flat_map(|(step, row)| {
            row.iter().enumerate().map(move |(node, &value)| LatticeNode {
                step,
                node,
                value,
            })
        })
    }

    /// Underlying row-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

impl Index<(usize, usize)> for TriangularGrid {
    type Output = f64;

    /// # Panics
    /// Panics if `(step, node)` lies outside the triangle.
    fn index(&self, (step, node): (usize, usize)) -> &f64 {
        assert!(
            step <= self.steps && node <= step,
            "lattice index ({step}, {node}) out of bounds for {} steps",
            self.steps
        );
        &self.values[Self::offset(step) + node]
    }
}
