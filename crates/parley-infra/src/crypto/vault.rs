//! AES-256-GCM content cipher.
//!
//! Each room has its own random 32-byte key. Records are encrypted with a
//! fresh 96-bit nonce per call.
//!
//! Encrypted format: `nonce (12 bytes) || ciphertext`
//!
//! SECURITY: Error types never contain plaintext or key material.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use parley_core::cipher::ContentCipher;
use parley_types::error::CipherError;
use parley_types::room::{ROOM_KEY_LEN, RoomKey};

/// Nonce size for AES-256-GCM (96 bits / 12 bytes).
const NONCE_SIZE: usize = 12;

/// [`ContentCipher`] backed by AES-256-GCM.
///
/// Stateless: the cipher instance is built from the room key on each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmCipher;

impl ContentCipher for AesGcmCipher {
    fn encrypt(&self, key: &RoomKey, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let cipher = Aes256Gcm::new(key.as_bytes().into());
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| CipherError::EncryptionFailed)?;

        let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&nonce);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    fn decrypt(&self, key: &RoomKey, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        if data.len() < NONCE_SIZE {
            return Err(CipherError::CiphertextTooShort);
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        Aes256Gcm::new(key.as_bytes().into())
            .decrypt(nonce, ciphertext)
            .map_err(|_| CipherError::DecryptionFailed)
    }
}

/// Generate a random room key using the OS CSPRNG.
pub fn generate_room_key() -> RoomKey {
    use aes_gcm::aead::rand_core::RngCore;
    let mut key = [0u8; ROOM_KEY_LEN];
    OsRng.fill_bytes(&mut key);
    RoomKey::new(key)
}

/// Base64 form of a room key, as stored in the registry.
pub fn encode_room_key(key: &RoomKey) -> String {
    STANDARD.encode(key.as_bytes())
}

pub fn decode_room_key(encoded: &str) -> Result<RoomKey, CipherError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CipherError::InvalidKey(e.to_string()))?;
    RoomKey::from_slice(&bytes).ok_or_else(|| {
        CipherError::InvalidKey(format!("expected {ROOM_KEY_LEN} bytes, got {}", bytes.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> RoomKey {
        let mut key = [0u8; ROOM_KEY_LEN];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        RoomKey::new(key)
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let plaintext = "User: héllo wörld\nAI: 👋".as_bytes();
        let encrypted = AesGcmCipher.encrypt(&test_key(), plaintext).unwrap();
        assert_eq!(AesGcmCipher.decrypt(&test_key(), &encrypted).unwrap(), plaintext);
    }

    #[test]
    fn test_decrypt_with_wrong_key_fails() {
        let encrypted = AesGcmCipher.encrypt(&test_key(), b"secret data").unwrap();
        let mut wrong = *test_key().as_bytes();
        wrong[0] = 0xFF;

        let result = AesGcmCipher.decrypt(&RoomKey::new(wrong), &encrypted);
        assert!(matches!(result, Err(CipherError::DecryptionFailed)));
    }

    #[test]
    fn test_random_nonce_produces_different_ciphertexts() {
        let a = AesGcmCipher.encrypt(&test_key(), b"same").unwrap();
        let b = AesGcmCipher.encrypt(&test_key(), b"same").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), NONCE_SIZE + 4 + 16);
    }

    #[test]
    fn test_ciphertext_too_short() {
        let result = AesGcmCipher.decrypt(&test_key(), &[0u8; 5]);
        assert!(matches!(result, Err(CipherError::CiphertextTooShort)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut encrypted = AesGcmCipher.encrypt(&test_key(), b"payload").unwrap();
        let last = encrypted.len() - 1;
        encrypted[last] ^= 0x01;
        assert!(AesGcmCipher.decrypt(&test_key(), &encrypted).is_err());
    }

    #[test]
    fn test_room_key_base64_roundtrip() {
        let key = generate_room_key();
        let encoded = encode_room_key(&key);
        assert_eq!(encoded.len(), 44);
        assert_eq!(decode_room_key(&encoded).unwrap(), key);
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(generate_room_key(), generate_room_key());
    }

    #[test]
    fn test_decode_rejects_bad_keys() {
        assert!(matches!(decode_room_key("not base64!"), Err(CipherError::InvalidKey(_))));
        let short = STANDARD.encode([1u8; 16]);
        assert!(matches!(decode_room_key(&short), Err(CipherError::InvalidKey(_))));
    }
}
