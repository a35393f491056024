// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

// The logger utilizes core::fmt to format the log messages because ufmt formatting is not
// compatible with (dependencies of) the log crate.
use core::cell::UnsafeCell;
use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// A logger for the `log` crate writing to any `core::fmt::Write` sink,
/// normally the UART.
///
/// Each line is prefixed with `LEVEL | ` for records at or above
/// `display_level` and with `file:line - ` for records at or above
/// `display_source`.
///
/// # Safety
/// Using this logger is only safe if there is only one thread of execution.
/// Even though `UartLogger` is `Send` and `Sync`, the sink it owns usually is
/// neither.
pub struct UartLogger<W> {
    sink: UnsafeCell<Option<W>>,
    pub display_level: LevelFilter,
    pub display_source: LevelFilter,
}

impl<W: Write> UartLogger<W> {
    pub const fn new(display_level: LevelFilter, display_source: LevelFilter) -> Self {
        UartLogger {
            sink: UnsafeCell::new(None),
            display_level,
            display_source,
        }
    }

    /// Hand `sink` to the logger and register it with the `log` crate.
    ///
    /// # Safety
    /// Only one thread of execution may exist, and this must not be called
    /// while a record is being logged.
    pub unsafe fn install(
        &'static self,
        sink: W,
        max_level: LevelFilter,
    ) -> Result<(), SetLoggerError>
    where
        W: 'static,
    {
        *self.sink.get() = Some(sink);
        log::set_logger_racy(self)?;
        log::set_max_level_racy(max_level);
        Ok(())
    }

    /// Format `record` the way it ends up on the UART.
    pub fn write_record(&self, w: &mut impl Write, record: &Record) -> core::fmt::Result {
        if record.level() <= self.display_level {
            write!(w, "{} | ", record.level())?;
        }
        if record.level() <= self.display_source {
            write!(
                w,
                "{}:{} - ",
                record.file().unwrap_or("?"),
                record.line().unwrap_or(0)
            )?;
        }
        writeln!(w, "{}", record.args())
    }
}

impl<W: Write> Log for UartLogger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // SAFETY: single thread of execution, see the type level docs.
        if let Some(sink) = unsafe { &mut *self.sink.get() } {
            // Nowhere to report a failing sink to.
            let _ = self.write_record(sink, record);
        }
    }

    fn flush(&self) {}
}

unsafe impl<W> Send for UartLogger<W> {}
unsafe impl<W> Sync for UartLogger<W> {}
