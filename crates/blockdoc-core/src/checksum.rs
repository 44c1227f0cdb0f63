//! Checksum computation for blocks.
//!
//! All checksums are CRC-32 (IEEE polynomial) values rendered as eight
//! lowercase hex digits, computed over deterministic canonical strings.
//!
//! ## Checksum Types
//!
//! - **Content**: CRC of the document hasher's string for the content
//! - **Style**: CRC of the four style fields joined by `|`
//! - **Own (`crc`)**: content checksum followed by style checksum
//! - **Subtree**: CRC of the children's compound checksums, in order
//! - **Compound**: own checksum followed by subtree checksum
//!
//! Own and compound checksums are string concatenations, not sums; the
//! byte order matters for interoperability.

use crate::model::Style;
use crc32fast::Hasher;

/// Separator between canonical style fields
pub const STYLE_SEPARATOR: &str = "|";

/// Stand-in for an absent style field (or an absent style)
pub const STYLE_SENTINEL: &str = "none";

/// CRC-32 of a string as eight lowercase hex digits
pub fn crc32_hex(input: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(input.as_bytes());
    format!("{:08x}", hasher.finalize())
}

/// Checksum of a content value's hash string
pub fn content_checksum(hashed_content: &str) -> String {
    crc32_hex(hashed_content)
}

/// Canonical string for a style
///
/// ## Example
///
/// ```
/// use blockdoc_core::checksum::canonical_style;
/// use blockdoc_core::model::Style;
///
/// let style = Style { color: Some("red".into()), ..Style::default() };
/// assert_eq!(canonical_style(Some(&style)), "none|red|none|none");
/// assert_eq!(canonical_style(None), "none|none|none|none");
/// ```
pub fn canonical_style(style: Option<&Style>) -> String {
    let absent = Style::default();
    let style = style.unwrap_or(&absent);
    [
        &style.background_color,
        &style.color,
        &style.font_family,
        &style.font_size,
    ]
    .iter()
    .map(|field| field.as_deref().unwrap_or(STYLE_SENTINEL))
    .collect::<Vec<_>>()
    .join(STYLE_SEPARATOR)
}

/// Checksum of a style (absent style and all-absent fields agree)
pub fn style_checksum(style: Option<&Style>) -> String {
    crc32_hex(&canonical_style(style))
}

/// Subtree checksum over children's compound checksums, in sibling order
///
/// No children yields the empty string.
pub fn subtree_checksum<I, S>(child_compounds: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut concatenated = String::new();
    let mut any = false;
    for compound in child_compounds {
        concatenated.push_str(compound.as_ref());
        any = true;
    }

    if any {
        crc32_hex(&concatenated)
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_known_vector() {
        // standard CRC-32 check value
        assert_eq!(crc32_hex("123456789"), "cbf43926");
        assert_eq!(crc32_hex(""), "00000000");
    }

    #[test]
    fn test_crc32_is_fixed_width() {
        for input in ["a", "First block", "Second block"] {
            assert_eq!(crc32_hex(input).len(), 8);
        }
    }

    #[test]
    fn test_style_field_order_matters() {
        let a = Style {
            color: Some("red".into()),
            ..Style::default()
        };
        let b = Style {
            background_color: Some("red".into()),
            ..Style::default()
        };
        assert_ne!(style_checksum(Some(&a)), style_checksum(Some(&b)));
    }

    #[test]
    fn test_absent_style_equals_empty_style() {
        assert_eq!(style_checksum(None), style_checksum(Some(&Style::default())));
    }

    #[test]
    fn test_subtree_checksum_empty_and_ordered() {
        assert_eq!(subtree_checksum(Vec::<String>::new()), "");
        assert_ne!(
            subtree_checksum(["aa", "bb"]),
            subtree_checksum(["bb", "aa"])
        );
        assert_eq!(subtree_checksum(["aa", "bb"]), crc32_hex("aabb"));
    }
}
