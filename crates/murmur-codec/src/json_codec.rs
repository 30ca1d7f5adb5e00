//! JSON codec backed by `serde_json`.

use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::CodecError;
use crate::traits::{
    DeserializeBytes, DeserializeStream, DeserializeString, SerializeBytes, SerializeStream,
    SerializeString,
};

/// JSON codec. Compact output unless built with [`JsonCodec::pretty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    #[must_use]
    pub const fn compact() -> Self {
        Self { pretty: false }
    }

    /// Indented, multi-line output.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }

    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub const fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl SerializeString for JsonCodec {
    fn serialize_to_string<T>(&self, value: &T) -> Result<String, CodecError>
    where
        T: Serialize + ?Sized,
    {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        trace!(len = text.len(), pretty = self.pretty, "json encoded");
        Ok(text)
    }
}

impl DeserializeString for JsonCodec {
    fn deserialize_str<T>(&self, text: &str) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_str(text)?)
    }
}

impl SerializeBytes for JsonCodec {
    fn serialize_to_bytes<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        if self.pretty {
            Ok(serde_json::to_vec_pretty(value)?)
        } else {
            Ok(serde_json::to_vec(value)?)
        }
    }
}

impl DeserializeBytes for JsonCodec {
    fn deserialize_bytes<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl SerializeStream for JsonCodec {
    fn serialize_to_writer<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CodecError>
    where
        W: Write + ?Sized,
        T: Serialize + ?Sized,
    {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, value)?;
        } else {
            serde_json::to_writer(&mut *writer, value)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl DeserializeStream for JsonCodec {
    fn deserialize_from_reader<R, T>(&self, reader: &mut R) -> Result<T, CodecError>
    where
        R: Read + ?Sized,
        T: DeserializeOwned,
    {
        Ok(serde_json::from_reader(&mut *reader)?)
    }
}
