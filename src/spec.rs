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

use crate::consts::*;

/// The hyperparameters of one training run. Persisted verbatim as `TTrainSpec` so a saved model
/// can be inspected or retrained without re-specifying everything on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSpec {
    pub dimension: usize,
    pub cbow: bool,
    pub hierarchical_softmax: bool,
    pub negative: u32,
    pub window: u32,
    pub sample: f64,
    pub iterations: u32,
    pub alpha: f64,
    pub threads: usize,
    pub seed: u64,
}

impl Default for TrainingSpec {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION_SIZE,
            cbow: DEFAULT_CBOW,
            hierarchical_softmax: DEFAULT_HIERARCHICAL_SOFTMAX,
            negative: DEFAULT_NEGATIVE_SAMPLE_NUMBER,
            window: DEFAULT_WINDOW_SIZE,
            sample: DEFAULT_SAMPLE,
            iterations: DEFAULT_ITERATION_NUMBER,
            alpha: DEFAULT_ALPHA,
            threads: DEFAULT_THREAD_COUNT,
            seed: 1,
        }
    }
}

impl TrainingSpec {
    /// The only hard requirement is a positive embedding dimension. `hierarchical_softmax ==
    /// false && negative == 0` is a legal (if useless) configuration per §8: it trains to
    /// completion without ever touching a weight, exactly as the original doesn't special-case
    /// it either.
    pub fn is_valid(&self) -> bool {
        self.dimension > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_is_valid() {
        assert!(TrainingSpec::default().is_valid());
    }

    #[test]
    fn no_loss_path_is_still_a_valid_noop_spec() {
        let spec = TrainingSpec {
            hierarchical_softmax: false,
            negative: 0,
            ..TrainingSpec::default()
        };
        assert!(spec.is_valid());
    }

    #[test]
    fn zero_dimension_is_invalid() {
        let spec = TrainingSpec {
            dimension: 0,
            ..TrainingSpec::default()
        };
        assert!(!spec.is_valid());
    }
}
