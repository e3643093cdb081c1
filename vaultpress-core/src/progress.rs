//! Guarded progress reporting.
//!
//! Progress sinks are caller-supplied and fire-and-forget. Every
//! invocation is isolated with `catch_unwind` so a panicking sink cannot
//! take the pipeline down with it.

use std::panic::{catch_unwind, AssertUnwindSafe};

/// Per-stage progress for a single publish: (stage name, percent 0-100)
pub type ProgressFn<'a> = dyn Fn(&str, u8) + 'a;

/// Per-article progress for a batch sync: (current, total, title)
pub type SyncProgressFn<'a> = dyn Fn(usize, usize, &str) + 'a;

pub(crate) fn report(progress: Option<&ProgressFn>, stage: &str, percent: u8) {
    if let Some(sink) = progress {
        if catch_unwind(AssertUnwindSafe(|| sink(stage, percent))).is_err() {
            tracing::warn!("progress sink panicked at stage {stage}");
        }
    }
}

pub(crate) fn report_sync(
    progress: Option<&SyncProgressFn>,
    current: usize,
    total: usize,
    title: &str,
) {
    if let Some(sink) = progress {
        if catch_unwind(AssertUnwindSafe(|| sink(current, total, title))).is_err() {
            tracing::warn!("sync progress sink panicked at article {current}/{total}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_report_invokes_sink() {
        let seen = Cell::new(0u8);
        let sink = |_stage: &str, percent: u8| seen.set(percent);
        report(Some(&sink), "write", 90);
        assert_eq!(seen.get(), 90);
    }

    #[test]
    fn test_panicking_sink_is_contained() {
        let sink = |_: &str, _: u8| panic!("sink exploded");
        // Must not propagate
        report(Some(&sink), "write", 90);

        let sync_sink = |_: usize, _: usize, _: &str| panic!("sink exploded");
        report_sync(Some(&sync_sink), 1, 3, "title");
    }
}
