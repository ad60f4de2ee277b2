//! Content cipher trait.
//!
//! Symmetric encryption of conversation content with a per-room key.
//! The AES-GCM implementation lives in parley-infra.

use parley_types::error::CipherError;
use parley_types::room::RoomKey;

/// Encrypts and decrypts history records at rest.
///
/// Synchronous: encryption is CPU-bound and cheap for chat-sized payloads.
pub trait ContentCipher: Send + Sync {
    /// Encrypt `plaintext` with the room key. The output is self-contained
    /// (it carries whatever nonce the scheme needs).
    fn encrypt(&self, key: &RoomKey, plaintext: &[u8]) -> Result<Vec<u8>, CipherError>;

    /// Decrypt a blob produced by [`ContentCipher::encrypt`] with the same key.
    fn decrypt(&self, key: &RoomKey, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>;
}
