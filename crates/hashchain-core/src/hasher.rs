//! SHA-256 digests rendered as lowercase hex.

use sha2::{Digest, Sha256};

use crate::constants::HASH_SIZE;

/// Raw 32-byte SHA-256 of `data`.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; HASH_SIZE] {
    let digest = Sha256::digest(data);
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&digest[..]);
    out
}

/// SHA-256 of `data` as 64 lowercase hex characters.
pub fn digest(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HASH_HEX_SIZE;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn abc_digest() {
        assert_eq!(
            digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_is_deterministic() {
        let data = b"the same bytes twice";
        assert_eq!(digest(data), digest(data));
        assert_ne!(digest(b"x"), digest(b"y"));
    }

    #[test]
    fn digest_is_lowercase_hex_of_fixed_length() {
        for input in [&b""[..], b"a", b"Genesis Block", &[0xffu8; 1000]] {
            let hash = digest(input);
            assert_eq!(hash.len(), HASH_HEX_SIZE);
            assert!(hash
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn hex_matches_raw_bytes() {
        let raw = sha256(b"abc");
        assert_eq!(hex::decode(digest(b"abc")).unwrap(), raw.to_vec());
    }
}
