use md5::{Digest, Md5};

use crate::models::ContentHash;

/// Stable identifier for a paragraph, used to correlate saved canvas
/// positions across reloads.
///
/// MD5 hex keeps sidecar files written by earlier releases readable. This is a
/// correlation key, not a security boundary.
pub fn content_hash(text: &str) -> ContentHash {
    ContentHash::new(hex::encode(Md5::digest(text.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_lowercase_hex_md5() {
        assert_eq!(
            content_hash("Hello world.").as_str(),
            "764569e58f53ea8b6404f6fa7fc0247f"
        );
        assert_eq!(content_hash("").as_str(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn hash_is_deterministic() {
        let text = "She whispered secrets to the plants.";
        assert_eq!(content_hash(text), content_hash(text));
    }

    #[test]
    fn different_text_gives_different_hash() {
        assert_ne!(content_hash("a"), content_hash("b"));
    }
}
