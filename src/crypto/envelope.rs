//! AES-256-GCM envelope sealing for single secret strings.
//!
//! Envelopes use a 16-byte IV (the GCM counter block is derived through
//! GHASH, as OpenSSL does for non-96-bit IVs) and a detached 16-byte tag.
//! Every field travels as lowercase hex.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Key, Nonce, Tag};
use serde::{Deserialize, Serialize};

use super::ServerSecret;

/// IV length in bytes. A fresh IV is drawn for every seal.
pub const IV_LENGTH: usize = 16;

/// Authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// One sealed string: IV, ciphertext and authentication tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub iv: String,
    pub data: String,
    #[serde(rename = "authTag")]
    pub auth_tag: String,
}

/// Envelope failures. Every variant means the envelope must not be trusted.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A field is not valid hex, has the wrong length, or the plaintext is not UTF-8.
    #[error("Malformed envelope: {0}")]
    Malformed(&'static str),

    /// The authentication tag did not verify (tampered data or wrong key).
    #[error("Envelope failed authentication")]
    Integrity,

    #[error("Encryption failed")]
    Encryption,
}

/// Seals and opens envelopes with the server key.
#[derive(Clone)]
pub struct EnvelopeCodec {
    cipher: Aes256Gcm16,
}

impl EnvelopeCodec {
    pub fn new(secret: &ServerSecret) -> Self {
        let key = Key::<Aes256Gcm16>::from_slice(secret.expose_key());
        Self {
            cipher: Aes256Gcm16::new(key),
        }
    }

    /// Encrypt a UTF-8 string under a fresh random IV.
    pub fn seal(&self, plaintext: &str) -> Result<Envelope, CodecError> {
        let iv: [u8; IV_LENGTH] = rand::random();
        let mut buffer = plaintext.as_bytes().to_vec();

        let tag = self
            .cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
            .map_err(|_| CodecError::Encryption)?;

        Ok(Envelope {
            iv: hex::encode(iv),
            data: hex::encode(&buffer),
            auth_tag: hex::encode(tag),
        })
    }

    /// Verify and decrypt an envelope. Fails closed on any tampering.
    pub fn open(&self, envelope: &Envelope) -> Result<String, CodecError> {
        let iv = hex::decode(&envelope.iv).map_err(|_| CodecError::Malformed("iv is not hex"))?;
        if iv.len() != IV_LENGTH {
            return Err(CodecError::Malformed("iv must be 16 bytes"));
        }

        let tag = hex::decode(&envelope.auth_tag)
            .map_err(|_| CodecError::Malformed("authTag is not hex"))?;
        if tag.len() != TAG_LENGTH {
            return Err(CodecError::Malformed("authTag must be 16 bytes"));
        }

        let mut buffer =
            hex::decode(&envelope.data).map_err(|_| CodecError::Malformed("data is not hex"))?;

        self.cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(&iv),
                b"",
                &mut buffer,
                Tag::<U16>::from_slice(&tag),
            )
            .map_err(|_| CodecError::Integrity)?;

        String::from_utf8(buffer).map_err(|_| CodecError::Malformed("plaintext is not UTF-8"))
    }
}

impl std::fmt::Debug for EnvelopeCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EnvelopeCodec([REDACTED])")
    }
}
