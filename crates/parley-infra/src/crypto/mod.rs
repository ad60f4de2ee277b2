//! Cryptographic operations for history at rest.

pub mod vault;

pub use vault::{AesGcmCipher, decode_room_key, encode_room_key, generate_room_key};
