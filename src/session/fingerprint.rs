//! Device fingerprint generation
//!
//! The dispatcher endpoint requires an `fp` parameter: a fixed plaintext
//! encrypted with AES-128-CBC (PKCS7 padding) under a fixed key, with a
//! fresh random IV prepended to the ciphertext and the whole thing
//! base64-encoded. A new IV is drawn per call, so repeated invocations
//! yield different strings for the same plaintext.

use aes::Aes128;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{Error, Result};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;

/// Encrypt `plaintext` into the `fp` value expected by the dispatcher.
///
/// `key_b64` is the base64-encoded 16-byte AES key. The output layout is
/// `base64(iv || ciphertext)`.
pub fn generate_fp(plaintext: &str, key_b64: &str) -> Result<String> {
    let key = STANDARD
        .decode(key_b64)
        .map_err(|e| Error::fingerprint(format!("key is not valid base64: {e}")))?;
    if key.len() != 16 {
        return Err(Error::fingerprint(format!(
            "key must decode to 16 bytes, got {}",
            key.len()
        )));
    }

    let mut iv = [0u8; 16];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = Aes128CbcEnc::new_from_slices(&key, &iv)
        .map_err(|e| Error::fingerprint(format!("invalid key/iv length: {e}")))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut payload = Vec::with_capacity(iv.len() + ciphertext.len());
    payload.extend_from_slice(&iv);
    payload.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{DEFAULT_FP_KEY, DEFAULT_FP_PLAINTEXT};
    use cbc::cipher::BlockDecryptMut;

    type Aes128CbcDec = cbc::Decryptor<Aes128>;

    fn decrypt_fp(fp: &str, key_b64: &str) -> String {
        let key = STANDARD.decode(key_b64).unwrap();
        let payload = STANDARD.decode(fp).unwrap();
        let (iv, ciphertext) = payload.split_at(16);
        let plaintext = Aes128CbcDec::new_from_slices(&key, iv)
            .unwrap()
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .unwrap();
        String::from_utf8(plaintext).unwrap()
    }

    #[test]
    fn test_fp_round_trips_through_decryption() {
        let fp = generate_fp(DEFAULT_FP_PLAINTEXT, DEFAULT_FP_KEY).unwrap();
        assert_eq!(decrypt_fp(&fp, DEFAULT_FP_KEY), DEFAULT_FP_PLAINTEXT);
    }

    #[test]
    fn test_fp_uses_fresh_iv_per_call() {
        let a = generate_fp(DEFAULT_FP_PLAINTEXT, DEFAULT_FP_KEY).unwrap();
        let b = generate_fp(DEFAULT_FP_PLAINTEXT, DEFAULT_FP_KEY).unwrap();
        assert_ne!(a, b);
        // Both still decrypt to the same plaintext.
        assert_eq!(decrypt_fp(&a, DEFAULT_FP_KEY), decrypt_fp(&b, DEFAULT_FP_KEY));
    }

    #[test]
    fn test_fp_payload_layout() {
        let fp = generate_fp("hello", DEFAULT_FP_KEY).unwrap();
        let payload = STANDARD.decode(fp).unwrap();
        // 16-byte IV followed by at least one cipher block.
        assert!(payload.len() >= 32);
        assert_eq!(payload.len() % 16, 0);
    }

    #[test]
    fn test_fp_rejects_bad_key() {
        assert!(generate_fp("x", "not-base64!!").is_err());
        // Valid base64 but wrong length.
        assert!(generate_fp("x", &STANDARD.encode(b"short")).is_err());
    }
}
