//! Symmetric key handling and the AES-256-GCM envelope codec.
//!
//! # Security
//! - The sealing key is wrapped in `SecretBox` and zeroized on drop
//! - `Debug` output never includes key material
//! - The key is derived once at startup and injected, never read from globals

mod envelope;

use secrecy::{ExposeSecret, SecretBox};

pub use envelope::{CodecError, Envelope, EnvelopeCodec, IV_LENGTH, TAG_LENGTH};

/// AES-256 key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// Byte used to pad passphrases shorter than [`KEY_LENGTH`].
const PAD_BYTE: u8 = b' ';

/// The process-wide symmetric key used to seal and open credential envelopes.
///
/// Derived from the configured passphrase by taking its first 32 bytes and
/// right-padding with spaces. Tokens issued by the existing deployment depend
/// on exactly this derivation, so it must stay stable across releases.
pub struct ServerSecret {
    key: SecretBox<[u8; KEY_LENGTH]>,
    padded: bool,
}

impl ServerSecret {
    /// Derive the key from a configured passphrase.
    pub fn from_passphrase(passphrase: &str) -> Self {
        let bytes = passphrase.as_bytes();
        let mut key = [PAD_BYTE; KEY_LENGTH];
        let take = bytes.len().min(KEY_LENGTH);
        key[..take].copy_from_slice(&bytes[..take]);

        Self {
            key: SecretBox::new(Box::new(key)),
            padded: bytes.len() < KEY_LENGTH,
        }
    }

    /// Whether the passphrase was shorter than the key and had to be padded.
    ///
    /// A padded key has less entropy than its length suggests.
    pub fn was_padded(&self) -> bool {
        self.padded
    }

    pub(crate) fn expose_key(&self) -> &[u8; KEY_LENGTH] {
        self.key.expose_secret()
    }
}

impl std::fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ServerSecret([REDACTED], padded: {})", self.padded)
    }
}
