//! Identifier helpers shared by every entry point that creates records.

/// Random record id with a readable prefix, e.g. `conv-0b6c…`
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// Stable id derived from a display name, used for categories and prompts
/// created by hand.
///
/// Lower-cases, turns every non-alphanumeric run into a single `-` and trims
/// dashes from both ends. Returns `None` when nothing usable is left.
///
/// ```
/// use georgie_core::ids::slug_from_name;
///
/// assert_eq!(slug_from_name("Te Reo Māori").as_deref(), Some("te-reo-māori"));
/// assert_eq!(slug_from_name("  !!  "), None);
/// ```
pub fn slug_from_name(name: &str) -> Option<String> {
    let mut slug = String::with_capacity(name.len());
    let mut prev_was_dash = true;

    for c in name.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
            prev_was_dash = false;
        } else if !prev_was_dash {
            slug.push('-');
            prev_was_dash = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    (!slug.is_empty()).then_some(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_prefix_and_uniqueness() {
        let a = new_id("msg");
        let b = new_id("msg");
        assert!(a.starts_with("msg-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_slug_from_name() {
        assert_eq!(slug_from_name("Music").as_deref(), Some("music"));
        assert_eq!(slug_from_name("Rust -- Tips").as_deref(), Some("rust-tips"));
        assert_eq!(slug_from_name("-edge-").as_deref(), Some("edge"));
        assert_eq!(slug_from_name(""), None);
    }
}
