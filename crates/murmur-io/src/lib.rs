#![forbid(unsafe_code)]

//! Buffered text output for Murmur.
//!
//! - [`BufferedSink`]: shared FIFO of text fragments with an item-available
//!   notification.
//! - [`SinkPump`]: forwards fragments from a sink to a consumer without ever
//!   re-entering its own drain loop.
//! - [`OutputRedirect`], [`RedirectWriter`], [`murmur_print!`],
//!   [`murmur_println!`]: revertible routing of print-style output into a sink.

pub mod pump;
pub mod redirect;
pub mod sink;

pub use pump::{PumpState, SinkPump};
pub use redirect::{OutputRedirect, RedirectWriter, try_redirect};
pub use sink::{BoxError, BufferedSink, ItemAvailable, SinkConfig, SinkError};
