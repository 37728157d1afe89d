//! Module of helper functions for integration tests.
//!
//! Those tests should only test public API surface in general, with some exceptions as provided by
//! this module.
use std::cell::Cell;

thread_local! {
    /// Buffer of all debugging output logged internally by html5arbor.
    pub static OUTPUT: Cell<String> = Cell::default();
}

const MAX_OUTPUT: usize = 20 * 1024 * 1024;

/// A [`log::Log`] implementation that appends every record to [`OUTPUT`] of the current thread.
///
/// The test harnesses built on `libtest-mimic` cannot capture stdout, see [libtest-mimic issue
/// #9](https://github.com/LukasKalbertodt/libtest-mimic/issues/9) -- this is much more performant
/// than println anyway though.
#[derive(Debug)]
pub struct OutputLogger;

static LOGGER: OutputLogger = OutputLogger;

impl log::Log for OutputLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        trace_log(&record.args().to_string());
    }

    fn flush(&self) {}
}

/// Install [`OutputLogger`] as the global logger. Calling this more than once is fine.
pub fn init_logger() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
}

/// Append a line to [`OUTPUT`], dropping everything logged so far once it grows past 20 MiB.
pub fn trace_log(msg: &str) {
    OUTPUT.with(|cell| {
        let mut buf = cell.take();
        buf.push_str(msg);
        buf.push('\n');

        if buf.len() > MAX_OUTPUT {
            buf.clear();
            buf.push_str("[truncated output]\n");
        }

        cell.set(buf);
    });
}

/// Take everything logged on this thread so far.
pub fn take_output() -> String {
    OUTPUT.with(Cell::take)
}
