#![forbid(unsafe_code)]

//! Mutation notification records.
//!
//! A [`MutationEvent`] describes the outcome of one attempted mutation. It is
//! built only through the constructors below, which keep the record
//! consistent:
//!
//! 1. `succeeded == false` implies `value` is `None`.
//! 2. A successful add or remove carries the item that moved.
//! 3. A clear always succeeds, carries no value and reports a count of 0.
//! 4. `count` is the container length *after* the attempt.
//!
//! With the `serde` feature, deserializing checks the same rules and refuses
//! records that break them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which channel an event was raised on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MutationKind {
    /// Push (stack) or enqueue (queue).
    Added,
    /// Pop (stack) or dequeue (queue).
    Removed,
    /// Clear.
    Cleared,
}

impl MutationKind {
    /// Stable lowercase name, used for channel names and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Cleared => "cleared",
        }
    }
}

/// Immutable description of one attempted mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MutationEvent<T> {
    kind: MutationKind,
    count: usize,
    succeeded: bool,
    value: Option<T>,
}

impl<T> MutationEvent<T> {
    /// An item was stored; `count` includes it.
    #[must_use]
    pub fn added(count: usize, item: T) -> Self {
        Self {
            kind: MutationKind::Added,
            count,
            succeeded: true,
            value: Some(item),
        }
    }

    /// An item was taken out; `count` excludes it.
    #[must_use]
    pub fn removed(count: usize, item: T) -> Self {
        Self {
            kind: MutationKind::Removed,
            count,
            succeeded: true,
            value: Some(item),
        }
    }

    /// The container was emptied.
    #[must_use]
    pub fn cleared() -> Self {
        Self {
            kind: MutationKind::Cleared,
            count: 0,
            succeeded: true,
            value: None,
        }
    }

    /// The attempt had no effect; `count` is the unchanged length.
    #[must_use]
    pub fn rejected(kind: MutationKind, count: usize) -> Self {
        Self {
            kind,
            count,
            succeeded: false,
            value: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    /// Container length after the attempt.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// The item added or removed, if any.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consume the event, yielding the item it carried.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    use super::{MutationEvent, MutationKind};

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Record<T> {
        kind: MutationKind,
        count: usize,
        succeeded: bool,
        value: Option<T>,
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for MutationEvent<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let Record {
                kind,
                count,
                succeeded,
                value,
            } = Record::deserialize(deserializer)?;
            match (kind, succeeded, value) {
                (MutationKind::Cleared, true, None) if count == 0 => Ok(Self::cleared()),
                (MutationKind::Cleared, ..) => Err(D::Error::custom(
                    "a cleared event must succeed with count 0 and no value",
                )),
                (kind, false, None) => Ok(Self::rejected(kind, count)),
                (_, false, Some(_)) => Err(D::Error::custom("a rejected event carries no value")),
                (MutationKind::Added, true, Some(item)) if count > 0 => Ok(Self::added(count, item)),
                (MutationKind::Added, true, Some(_)) => Err(D::Error::custom(
                    "an added event must count the item it stored",
                )),
                (MutationKind::Removed, true, Some(item)) => Ok(Self::removed(count, item)),
                (_, true, None) => Err(D::Error::custom(
                    "a successful add or remove carries its item",
                )),
            }
        }
    }
}
