#![forbid(unsafe_code)]

//! Murmur: observable containers and buffered, re-entrancy-safe output.
//!
//! This crate re-exports the member crates and offers a [`prelude`]:
//!
//! - [`guards`]: argument guards and [`ArgumentError`](guards::ArgumentError)
//! - [`collections`]: observable stack/queue, typed and dynamic
//! - [`io`] (feature `io`): buffered sink, drain pump, output redirect
//! - [`codec`] (feature `codec`): JSON and TOML codecs
//!
//! ```rust
//! use murmur::prelude::*;
//!
//! let mut stack: ObservableStack<String> = ObservableStack::new();
//! stack.on_added().subscribe(|e| assert!(e.succeeded()));
//! stack.push("a".to_owned());
//! assert_eq!(stack.pop().as_deref(), Some("a"));
//! ```

pub use murmur_collections as collections;
pub use murmur_core as guards;

#[cfg(feature = "codec")]
pub use murmur_codec as codec;
#[cfg(feature = "io")]
pub use murmur_io as io;

#[cfg(feature = "io")]
pub use murmur_io::{murmur_print, murmur_println};

pub mod prelude {
    pub use murmur_collections::{
        ContainerError, DynamicObservableContainer, DynamicQueue, DynamicStack, EventChannel,
        MutationEvent, MutationKind, ObservableContainer, ObservableQueue, ObservableStack,
        SubscriptionId,
    };
    pub use murmur_core::ArgumentError;

    #[cfg(feature = "codec")]
    pub use murmur_codec::{
        CodecError, DeserializeBytes, DeserializeStream, DeserializeString, JsonCodec,
        SerializeBytes, SerializeStream, SerializeString, TomlCodec, clone_via,
    };
    #[cfg(feature = "io")]
    pub use murmur_io::{
        BufferedSink, OutputRedirect, PumpState, RedirectWriter, SinkConfig, SinkError, SinkPump,
    };
}
