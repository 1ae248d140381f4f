//! Entity identifier helpers.
//!
//! Identifiers are opaque strings so imported diagrams keep their own ids;
//! ids generated by core are random UUID v4 strings.

use uuid::Uuid;

/// Generates a fresh entity id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::generate_id;

    #[test]
    fn generated_ids_are_unique_uuid_strings() {
        let first = generate_id();
        let second = generate_id();
        assert_ne!(first, second);
        assert!(uuid::Uuid::parse_str(&first).is_ok());
    }
}
