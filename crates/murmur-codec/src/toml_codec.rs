//! TOML codec backed by the `toml` crate.
//!
//! TOML documents are tables, so top-level values must serialize as structs
//! or maps. A bare sequence (such as a container) has to be wrapped in a
//! field first.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::CodecError;
use crate::traits::{DeserializeBytes, DeserializeString, SerializeBytes, SerializeString};

/// TOML codec. Pretty output (one array element per line) is opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TomlCodec {
    pretty: bool,
}

impl TomlCodec {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl SerializeString for TomlCodec {
    fn serialize_to_string<T>(&self, value: &T) -> Result<String, CodecError>
    where
        T: Serialize + ?Sized,
    {
        let text = if self.pretty {
            toml::to_string_pretty(value)?
        } else {
            toml::to_string(value)?
        };
        trace!(len = text.len(), pretty = self.pretty, "toml encoded");
        Ok(text)
    }
}

impl DeserializeString for TomlCodec {
    fn deserialize_str<T>(&self, text: &str) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        Ok(toml::from_str(text)?)
    }
}

impl SerializeBytes for TomlCodec {
    fn serialize_to_bytes<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        self.serialize_to_string(value).map(String::into_bytes)
    }
}

impl DeserializeBytes for TomlCodec {
    fn deserialize_bytes<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        self.deserialize_str(std::str::from_utf8(bytes)?)
    }
}
