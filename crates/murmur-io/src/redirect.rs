#![forbid(unsafe_code)]

//! Revertible routing of `print`-style output into a [`BufferedSink`].
//!
//! [`OutputRedirect::install`] registers a sink as the process-wide target for
//! [`murmur_print!`] / [`murmur_println!`] and [`RedirectWriter`]. The returned
//! handle undoes the registration on [`restore`](OutputRedirect::restore) or
//! drop, after which the macros write to stdout again.
//!
//! Only text written through these entry points is routed; direct
//! `std::io::stdout()` writes and FFI output are untouched.
//!
//! # Example
//!
//! ```rust
//! use murmur_io::{BufferedSink, OutputRedirect};
//!
//! let sink = BufferedSink::new();
//! let redirect = OutputRedirect::install(&sink).unwrap();
//! murmur_io::murmur_println!("count = {}", 42);
//! redirect.restore();
//!
//! assert_eq!(sink.dequeue_oldest().as_deref(), Some("count = 42\n"));
//! ```

use std::io::{self, Write};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::sink::{BufferedSink, SinkError};

/// Installed redirect target; `None` means the macros print to stdout.
static REDIRECT_TARGET: Mutex<Option<BufferedSink>> = Mutex::new(None);

/// Handle for an installed redirect. Dropping it restores stdout routing.
#[derive(Debug)]
pub struct OutputRedirect {
    sink: BufferedSink,
    active: bool,
}

impl OutputRedirect {
    /// Route redirected output into `sink`.
    ///
    /// # Errors
    ///
    /// - [`SinkError::AlreadyRedirected`] while another redirect is installed.
    /// - [`SinkError::PoisonedLock`] if the global lock is poisoned.
    pub fn install(sink: &BufferedSink) -> Result<Self, SinkError> {
        let mut target = REDIRECT_TARGET.lock().map_err(|_| SinkError::PoisonedLock)?;
        if target.is_some() {
            return Err(SinkError::AlreadyRedirected);
        }
        *target = Some(sink.clone());
        debug!("output redirect installed");
        Ok(Self {
            sink: sink.clone(),
            active: true,
        })
    }

    /// Check whether a redirect is currently installed.
    pub fn is_installed() -> bool {
        REDIRECT_TARGET.lock().map(|t| t.is_some()).unwrap_or(false)
    }

    /// The sink receiving redirected output.
    #[must_use]
    pub fn sink(&self) -> &BufferedSink {
        &self.sink
    }

    /// Remove the redirect; equivalent to dropping the handle.
    pub fn restore(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        // `install` refuses while the slot is taken, so an active handle
        // always owns it.
        *REDIRECT_TARGET
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        debug!("output redirect restored");
    }
}

impl Drop for OutputRedirect {
    fn drop(&mut self) {
        self.release();
    }
}

fn current_target() -> Option<BufferedSink> {
    // Clone out so the lock is released before the sink notifies subscribers,
    // which may print through the macros again.
    REDIRECT_TARGET.lock().ok().and_then(|t| t.clone())
}

/// Append `text` to the installed sink.
///
/// Returns `Ok(false)` when no redirect is installed; callers fall back to
/// stdout.
///
/// # Errors
///
/// Propagates the sink's `append` error (e.g. a failing pump consumer).
pub fn try_redirect(text: &str) -> Result<bool, SinkError> {
    match current_target() {
        Some(sink) => sink.append(text).map(|()| true),
        None => Ok(false),
    }
}

/// Macro entry point: routes `text`, reporting consumer failures via tracing.
///
/// Returns `false` when no redirect is installed.
#[doc(hidden)]
pub fn redirect_or_report(text: &str) -> bool {
    let Some(sink) = current_target() else {
        return false;
    };
    if let Err(err) = sink.append(text) {
        warn!(error = %err, "redirected output was not delivered");
    }
    true
}

/// An [`io::Write`] adapter over the installed redirect.
///
/// Bytes are decoded by the target sink's [`io::Write`] impl, so characters
/// split across writes arrive whole. Without a redirect, bytes are accepted
/// and discarded. Consumer failures surface as [`io::Error`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct RedirectWriter;

impl Write for RedirectWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match current_target() {
            Some(mut sink) => sink.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match current_target() {
            Some(mut sink) => Write::flush(&mut sink),
            None => Ok(()),
        }
    }
}

/// Like `print!` but routes into the installed [`OutputRedirect`] sink.
///
/// Falls back to `print!` when no redirect is installed.
#[macro_export]
macro_rules! murmur_print {
    ($($arg:tt)*) => {{
        let msg = ::std::format!($($arg)*);
        if !$crate::redirect::redirect_or_report(&msg) {
            ::std::print!("{}", msg);
        }
    }};
}

/// Like `println!` but routes into the installed [`OutputRedirect`] sink.
///
/// Falls back to `println!` when no redirect is installed.
#[macro_export]
macro_rules! murmur_println {
    () => {
        $crate::murmur_println!("")
    };
    ($($arg:tt)*) => {{
        let msg = ::std::format!("{}\n", ::std::format_args!($($arg)*));
        if !$crate::redirect::redirect_or_report(&msg) {
            ::std::print!("{}", msg);
        }
    }};
}
