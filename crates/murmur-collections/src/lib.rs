#![forbid(unsafe_code)]

//! Observable sequential containers for Murmur.
//!
//! This crate provides:
//! - [`MutationEvent`], the record raised for every mutation attempt
//! - [`EventChannel`], an ordered multicast subscriber list
//! - [`ObservableContainer`] with [`Lifo`] / [`Fifo`] disciplines
//!   ([`ObservableStack`], [`ObservableQueue`])
//! - [`DynamicObservableContainer`], an untyped adapter over the same core
//!
//! # Invariants
//!
//! 1. Every add, remove and clear attempt raises exactly one event, in call
//!    order, before the call returns.
//! 2. Subscribers on a channel run in registration order.
//! 3. Absent items are rejected without error; empty removal is a soft
//!    failure; empty peek is a hard failure.

pub mod channel;
pub mod container;
pub mod dynamic;
pub mod event;

pub use channel::{EventChannel, Handler, SubscriptionId};
pub use container::{
    ContainerError, Discipline, Fifo, IntoIter, Iter, Lifo, ObservableContainer, ObservableQueue,
    ObservableStack,
};
pub use dynamic::{DynamicObservableContainer, DynamicQueue, DynamicStack};
pub use event::{MutationEvent, MutationKind};
