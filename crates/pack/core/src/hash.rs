//! Content hashing shared by the compiler and the artifact reader.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the given bytes.
///
/// Every checksum in manifests and artifact section tables is produced and
/// verified through this one function so the two sides can never disagree on
/// the encoding.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        // SHA-256 of the empty string.
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn differs_on_single_byte_flip() {
        let mut bytes = b"card catalog".to_vec();
        let original = content_hash(&bytes);
        bytes[0] ^= 0x01;
        assert_ne!(content_hash(&bytes), original);
    }
}
