use sha2::{Digest, Sha256};

/// Content fingerprint of a scenario document, logged at load so a session
/// can be matched to the exact map data it ran against.
pub fn scenario_fingerprint_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    to_hex_lower(&hasher.finalize())
}

fn to_hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write as _;
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let first = scenario_fingerprint_hex(b"{\"layers\":[]}");
        let second = scenario_fingerprint_hex(b"{\"layers\":[]}");
        let third = scenario_fingerprint_hex(b"{\"layers\":[1]}");

        assert_eq!(first, second);
        assert_ne!(first, third);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
