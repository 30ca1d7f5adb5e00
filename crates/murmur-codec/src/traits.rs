//! Codec capabilities, split by payload shape.
//!
//! A codec implements whichever of these its format supports. Stream
//! methods take the reader/writer by mutable reference and never close it;
//! writers are flushed after a value is written.

use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CodecError;

pub trait SerializeString {
    fn serialize_to_string<T>(&self, value: &T) -> Result<String, CodecError>
    where
        T: Serialize + ?Sized;
}

pub trait DeserializeString {
    fn deserialize_str<T>(&self, text: &str) -> Result<T, CodecError>
    where
        T: DeserializeOwned;
}

pub trait SerializeBytes {
    fn serialize_to_bytes<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized;
}

pub trait DeserializeBytes {
    fn deserialize_bytes<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned;
}

pub trait SerializeStream {
    /// Write `value` to `writer`, then flush it.
    fn serialize_to_writer<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CodecError>
    where
        W: Write + ?Sized,
        T: Serialize + ?Sized;
}

pub trait DeserializeStream {
    /// Decode a value from the remainder of `reader`.
    fn deserialize_from_reader<R, T>(&self, reader: &mut R) -> Result<T, CodecError>
    where
        R: Read + ?Sized,
        T: DeserializeOwned;
}

/// Deep-copy `value` by encoding and decoding it with `codec`.
///
/// The copy shares nothing with the original, including subscriber lists on
/// containers (which are not serialized).
pub fn clone_via<C, T>(codec: &C, value: &T) -> Result<T, CodecError>
where
    C: SerializeString + DeserializeString,
    T: Serialize + DeserializeOwned,
{
    let text = codec.serialize_to_string(value)?;
    codec.deserialize_str(&text)
}
