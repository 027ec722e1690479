//! Payload codec: compression, content hashing, and wire serialization.
//!
//! # Design
//! AIL expects item data as a base64-encoded gzip stream, accompanied by a
//! SHA-256 digest of the *original* uncompressed bytes so the server can
//! verify integrity and deduplicate independently of compression settings.
//! Both helpers accept anything byte-like (`&str`, `String`, `&[u8]`,
//! `Vec<u8>`); text is treated as its UTF-8 bytes.
//!
//! `to_json` is the wire conversion hook for domain scalars: chrono datetimes
//! become ISO-8601 strings, UUIDs their canonical hyphenated form, and domain
//! enums their scalar tag, all through their `Serialize` impls.

use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::AilError;

/// Gzip-compress `data` and return the compressed bytes base64-encoded.
///
/// The output is whitespace-free ASCII, safe to embed in a JSON string.
/// Empty input is valid and encodes an empty gzip stream.
pub fn encode_and_compress<D: AsRef<[u8]>>(data: D) -> String {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    // Writing into a Vec cannot fail.
    encoder
        .write_all(data.as_ref())
        .expect("gzip into memory buffer");
    let compressed = encoder.finish().expect("gzip into memory buffer");
    BASE64.encode(compressed)
}

/// Lowercase hex SHA-256 digest of the raw (uncompressed) bytes of `data`.
pub fn data_sha256<D: AsRef<[u8]>>(data: D) -> String {
    let digest = Sha256::digest(data.as_ref());
    format!("{digest:x}")
}

/// Convert a domain value into its JSON wire representation.
///
/// Datetimes serialize as ISO-8601, UUIDs as canonical strings, and domain
/// enums as their underlying scalar. Values with no JSON representation
/// surface as [`AilError::Serialization`].
pub fn to_json<T: Serialize>(value: &T) -> Result<Value, AilError> {
    serde_json::to_value(value).map_err(|e| AilError::Serialization(e.to_string()))
}

/// JSON-encode an assembled payload mapping.
pub fn serialize(fields: &Map<String, Value>) -> Result<String, AilError> {
    serde_json::to_string(fields).map_err(|e| AilError::Serialization(e.to_string()))
}
