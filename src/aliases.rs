//! # Secure-Gate Type Aliases
//!
//! Secret material is wrapped in [`secure-gate`](https://github.com/Slurp9187/secure-gate)
//! containers so it is only reachable through an explicit `.expose_secret()` call.
//!
//! - [`PasswordString`] - user password, stretched into a [`SecretKey`]
//! - [`SecretKey`] - working key of an open handle (length depends on the cipher)

// ─────────────────────────────────────────────────────────────────────────────
// Dynamic secrets
// ─────────────────────────────────────────────────────────────────────────────
pub type PasswordString = secure_gate::Dynamic<String>;
pub type SecretKey = secure_gate::Dynamic<Vec<u8>>;

/// Parse a hex-encoded key (either case) into a [`SecretKey`].
pub fn secret_key_from_hex(hex_key: &str) -> crate::Result<SecretKey> {
    let bytes = hex::decode(hex_key.trim())
        .map_err(|e| crate::CryptKeeperError::Crypto(format!("invalid hex key: {e}")))?;
    Ok(SecretKey::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_key_accepts_both_cases() {
        let lower = secret_key_from_hex("0123456789abcdef").unwrap();
        let upper = secret_key_from_hex("0123456789ABCDEF").unwrap();
        assert_eq!(lower.expose_secret(), upper.expose_secret());
        assert_eq!(lower.expose_secret().len(), 8);
    }

    #[test]
    fn hex_key_rejects_odd_length() {
        assert!(secret_key_from_hex("abc").is_err());
    }
}
