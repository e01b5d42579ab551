use crate::EncodingError;

/// Multibase prefix for base58btc.
pub const MULTIBASE_BASE58BTC_PREFIX: char = 'z';

/// Encodes `bytes` as a base58btc multibase string.
pub fn encode_multibase(bytes: &[u8]) -> String {
    format!(
        "{MULTIBASE_BASE58BTC_PREFIX}{}",
        bs58::encode(bytes).into_string()
    )
}

/// Decodes a base58btc multibase string. Any other base is rejected.
pub fn decode_multibase(s: &str) -> Result<Vec<u8>, EncodingError> {
    let mut chars = s.chars();
    match chars.next() {
        None => Err(EncodingError::EmptyMultibase),
        Some(MULTIBASE_BASE58BTC_PREFIX) => bs58::decode(chars.as_str())
            .into_vec()
            .map_err(|e| EncodingError::Base58(e.to_string())),
        Some(other) => Err(EncodingError::UnsupportedMultibase(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        // "hello world" in base58btc
        assert_eq!(encode_multibase(b"hello world"), "zStV1DL6CwTryKyV");
        assert_eq!(
            decode_multibase("zStV1DL6CwTryKyV").unwrap(),
            b"hello world".to_vec()
        );
    }

    #[test]
    fn test_rejects_other_bases() {
        assert_eq!(
            decode_multibase("f68656c6c6f"),
            Err(EncodingError::UnsupportedMultibase('f'))
        );
        assert_eq!(decode_multibase(""), Err(EncodingError::EmptyMultibase));
        assert!(matches!(
            decode_multibase("z0OIl"),
            Err(EncodingError::Base58(_))
        ));
    }

    #[test]
    fn test_leading_zeros_kept() {
        let bytes = [0u8, 0, 1, 2];
        assert_eq!(decode_multibase(&encode_multibase(&bytes)).unwrap(), bytes);
    }
}
