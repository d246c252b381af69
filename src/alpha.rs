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

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::consts::ALPHA_MAX_REDUCE_COEFFICIENT;

/// Receives human-readable progress lines during training. The default [`StdoutProgress`]
/// writes to stdout like the original CLI; tests swap in a sink that just records calls.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress_pct: f64, alpha: f64, words_per_sec: f64);
}

/// Writes progress to stdout, matching the original's `Progress: %.2f%% Alpha: %f Words/sec: %.2fk`.
pub struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn report(&self, progress_pct: f64, alpha: f64, words_per_sec: f64) {
        println!(
            "Progress: {:.2}%  Alpha: {:.6}  Words/sec: {:.2}k",
            progress_pct,
            alpha,
            words_per_sec / 1000.0
        );
    }
}

/// The alpha (learning rate) decay state shared by every training worker. Workers call
/// [`SharedAlpha::advance`] after each word they process; the actual decay and progress report
/// only happen when a worker wins the try-lock race and its locally-accumulated word count
/// crosses `UPDATE_WORD_NUMBER`, so the hot path stays lock-free almost always.
pub struct SharedAlpha {
    initial: f64,
    current: Mutex<f64>,
    words_processed: AtomicU64,
    total_train_words: u64,
    start: std::time::Instant,
}

impl SharedAlpha {
    /// `total_train_words` is `iterations * vocab.train_words_count()`, computed by the caller
    /// before any worker starts (§4.7).
    pub fn new(initial: f64, total_train_words: u64) -> Self {
        Self {
            initial,
            current: Mutex::new(initial),
            words_processed: AtomicU64::new(0),
            total_train_words: total_train_words.max(1),
            start: std::time::Instant::now(),
        }
    }

    pub fn current(&self) -> f64 {
        *self.current.lock().unwrap()
    }

    /// Adds `local_words` to the global processed count. If another worker is mid-update, this
    /// call returns immediately without decaying or reporting; the next caller to find the lock
    /// free will fold the skipped words into its own report.
    pub fn advance(&self, local_words: u64, sink: &dyn ProgressSink) {
        let total_processed = self.words_processed.fetch_add(local_words, Ordering::Relaxed) + local_words;

        let Ok(mut current) = self.current.try_lock() else {
            return;
        };

        let progress = total_processed as f64 / self.total_train_words as f64;
        let elapsed = self.start.elapsed().as_secs_f64().max(1e-9);
        let words_per_sec = total_processed as f64 / elapsed;

        let proposed = self.initial * (1.0 - progress);
        let floor = self.initial * ALPHA_MAX_REDUCE_COEFFICIENT;
        // Mirrors the original: if the decayed value would fall at or below the floor, the
        // report still fires but `current` is left at its last (higher) value.
        if proposed > floor {
            *current = proposed;
        }

        sink.report(progress.min(1.0) * 100.0, *current, words_per_sec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct RecordingSink {
        calls: AtomicUsize,
    }

    impl ProgressSink for RecordingSink {
        fn report(&self, _progress_pct: f64, _alpha: f64, _words_per_sec: f64) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn alpha_never_decays_below_floor() {
        let alpha = SharedAlpha::new(0.05, 100);
        let sink = RecordingSink {
            calls: AtomicUsize::new(0),
        };
        for _ in 0..50 {
            alpha.advance(1_000_000, &sink);
        }
        assert!(alpha.current() >= 0.05 * ALPHA_MAX_REDUCE_COEFFICIENT - 1e-12);
    }

    #[test]
    fn advance_reports_progress() {
        let alpha = SharedAlpha::new(0.025, 1000);
        let sink = RecordingSink {
            calls: AtomicUsize::new(0),
        };
        alpha.advance(500, &sink);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
        assert!(alpha.current() <= 0.025);
    }

    #[test]
    fn alpha_holds_last_value_once_proposal_hits_floor() {
        // One huge advance drives progress far past 1.0; current should clamp to whatever it
        // last held above the floor rather than jumping to the floor itself.
        let alpha = SharedAlpha::new(0.05, 10);
        let sink = RecordingSink {
            calls: AtomicUsize::new(0),
        };
        alpha.advance(1, &sink);
        let after_small_step = alpha.current();
        alpha.advance(1_000_000, &sink);
        assert_eq!(alpha.current(), after_small_step);
    }
}
