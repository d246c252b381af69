/*
*	Copyright (C) 2025 Kendall Tauser
*
*	This program is free software; you can redistribute it and/or modify
*	it under the terms of the GNU General Public License as published by
*	the Free Software Foundation; either version 2 of the License, or
*	(at your option) any later version.
*
*	This program is distributed in the hope that it will be useful,
*	but WITHOUT ANY WARRANTY; without even the implied warranty of
*	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*	GNU General Public License for more details.
*
*	You should have received a copy of the GNU General Public License along
*	with this program; if not, write to the Free Software Foundation, Inc.,
*	51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.
 */

use std::sync::Mutex;

use rand::Rng;

/// A single embedding row behind its own lock. Workers lock only the rows they touch for a
/// given update, never the whole matrix.
#[derive(Debug)]
pub struct Row {
    values: Mutex<Vec<f64>>,
}

impl Row {
    fn zeroed(dim: usize) -> Self {
        Self {
            values: Mutex::new(vec![0.0; dim]),
        }
    }

    fn uniform(dim: usize, rng: &mut impl Rng) -> Self {
        let values = (0..dim).map(|_| rng.random::<f64>() - 0.5).collect();
        Self {
            values: Mutex::new(values),
        }
    }

    /// Copies the row out. Used for read-mostly paths (hidden-vector accumulation, similarity
    /// queries) where holding the lock across a longer computation isn't worth it.
    pub fn snapshot(&self) -> Vec<f64> {
        self.values.lock().unwrap().clone()
    }

    /// Locks the row and runs `f` against its backing slice, returning whatever `f` returns.
    pub fn with_mut<T>(&self, f: impl FnOnce(&mut [f64]) -> T) -> T {
        let mut guard = self.values.lock().unwrap();
        f(&mut guard)
    }
}

/// A matrix of independently-locked rows, e.g. the input/document/output embedding tables.
#[derive(Debug)]
pub struct Matrix {
    rows: Vec<Row>,
    dim: usize,
}

impl Matrix {
    pub fn zeroed(row_count: usize, dim: usize) -> Self {
        Self {
            rows: (0..row_count).map(|_| Row::zeroed(dim)).collect(),
            dim,
        }
    }

    pub fn uniform(row_count: usize, dim: usize, rng: &mut impl Rng) -> Self {
        Self {
            rows: (0..row_count).map(|_| Row::uniform(dim, rng)).collect(),
            dim,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> &Row {
        &self.rows[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zeroed_matrix_rows_start_at_zero() {
        let m = Matrix::zeroed(4, 8);
        assert_eq!(m.row_count(), 4);
        assert_eq!(m.dim(), 8);
        assert!(m.row(0).snapshot().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn uniform_matrix_rows_are_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let m = Matrix::uniform(3, 16, &mut rng);
        for i in 0..3 {
            let row = m.row(i).snapshot();
            assert_eq!(row.len(), 16);
            assert!(row.iter().all(|&v| (-0.5..0.5).contains(&v)));
        }
    }

    #[test]
    fn with_mut_mutates_in_place() {
        let m = Matrix::zeroed(1, 4);
        m.row(0).with_mut(|slice| {
            for v in slice.iter_mut() {
                *v = 1.0;
            }
        });
        assert_eq!(m.row(0).snapshot(), vec![1.0, 1.0, 1.0, 1.0]);
    }
}
