#![forbid(unsafe_code)]

//! Serde-based codecs for Murmur values.
//!
//! Capabilities are separate traits ([`SerializeString`], [`DeserializeBytes`],
//! [`SerializeStream`], ...) so each format implements only what it supports:
//!
//! | Codec         | string | bytes | stream |
//! |---------------|--------|-------|--------|
//! | [`JsonCodec`] | yes    | yes   | yes    |
//! | [`TomlCodec`] | yes    | yes   | no     |
//!
//! ```rust
//! use murmur_codec::{JsonCodec, SerializeString, clone_via};
//!
//! let text = JsonCodec::compact().serialize_to_string(&vec!["a", "b"]).unwrap();
//! assert_eq!(text, r#"["a","b"]"#);
//!
//! let copy: Vec<String> = clone_via(&JsonCodec::compact(), &vec!["x".to_owned()]).unwrap();
//! assert_eq!(copy, ["x"]);
//! ```

mod error;
pub mod json_codec;
pub mod toml_codec;
pub mod traits;

pub use error::CodecError;
pub use json_codec::JsonCodec;
pub use toml_codec::TomlCodec;
pub use traits::{
    DeserializeBytes, DeserializeStream, DeserializeString, SerializeBytes, SerializeStream,
    SerializeString, clone_via,
};
