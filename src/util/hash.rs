//! Plan fingerprinting.

use sha2::{Digest, Sha256};

/// Incremental SHA-256 over the fields of a build plan.
///
/// Components are fed in a fixed order with explicit separators, so
/// `["ab", "c"]` and `["a", "bc"]` hash differently and reordering two
/// components changes the result.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0");
        self
    }

    /// Add a sequence of string components.
    pub fn update_strs<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for s in items {
            self.update_str(s);
        }
        self
    }

    /// Add a boolean component.
    pub fn update_bool(&mut self, b: bool) -> &mut Self {
        self.hasher.update([b as u8]);
        self
    }

    /// Finalize as a lowercase hex string.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint_of(parts: &[&str]) -> String {
        let mut fp = Fingerprint::new();
        fp.update_strs(parts.iter().copied());
        fp.finish()
    }

    #[test]
    fn test_equal_inputs_hash_equal() {
        assert_eq!(
            fingerprint_of(&["release", "static"]),
            fingerprint_of(&["release", "static"])
        );
    }

    #[test]
    fn test_order_matters() {
        assert_ne!(
            fingerprint_of(&["release", "static"]),
            fingerprint_of(&["static", "release"])
        );
    }

    #[test]
    fn test_component_boundaries_are_separated() {
        assert_ne!(fingerprint_of(&["ab", "c"]), fingerprint_of(&["a", "bc"]));
    }

    #[test]
    fn test_bool_components_distinguish() {
        let with = {
            let mut fp = Fingerprint::new();
            fp.update_str("debug").update_bool(true);
            fp.finish()
        };
        let without = {
            let mut fp = Fingerprint::new();
            fp.update_str("debug").update_bool(false);
            fp.finish()
        };
        assert_ne!(with, without);
    }
}
