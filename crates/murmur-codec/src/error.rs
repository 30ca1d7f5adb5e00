/// Error type for every codec operation.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("json codec: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml serialization: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("toml deserialization: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
    /// Byte payload for a text format was not UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("codec stream: {0}")]
    Io(#[from] std::io::Error),
}
