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

/// Half-width of the sigmoid lookup table's domain: cells cover `[-MAX_EXP, +MAX_EXP]`.
pub const MAX_EXP: f64 = 6.0;
/// Number of cells in the sigmoid lookup table.
pub const EXP_TABLE_SIZE: usize = 1000;
/// Number of entries in the negative-sample alias table.
pub const NEGATIVE_SAMPLE_TABLE_SIZE: usize = 100_000_000;
/// Local token count threshold at which a worker reports its progress to the shared alpha.
pub const UPDATE_WORD_NUMBER: u64 = 100_000;
/// Alpha is never decayed below `initial * ALPHA_MAX_REDUCE_COEFFICIENT`.
pub const ALPHA_MAX_REDUCE_COEFFICIENT: f64 = 1e-4;
/// Upper bound on a Huffman code/path length, used to size working buffers.
pub const MAX_CODE_LENGTH: usize = 40;
/// Power applied to raw frequencies when building the negative-sample distribution.
pub const NEGATIVE_SAMPLE_POWER: f64 = 0.75;

pub const DEFAULT_DIMENSION_SIZE: usize = 100;
pub const DEFAULT_HIERARCHICAL_SOFTMAX: bool = false;
pub const DEFAULT_CBOW: bool = true;
pub const DEFAULT_NEGATIVE_SAMPLE_NUMBER: u32 = 5;
pub const DEFAULT_ITERATION_NUMBER: u32 = 5;
pub const DEFAULT_WINDOW_SIZE: u32 = 5;
pub const DEFAULT_SAMPLE: f64 = 1e-3;
pub const DEFAULT_THREAD_COUNT: usize = 4;
pub const DEFAULT_ALPHA: f64 = 0.05;
