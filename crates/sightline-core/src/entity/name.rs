use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

/// Decode a NUL-terminated name buffer read from remote memory.
///
/// Invalid UTF-8 is replaced and then dropped along with any other
/// character outside letters, digits, punctuation and whitespace.
pub fn decode_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    sanitize_name(&String::from_utf8_lossy(&bytes[..end]))
}

/// Keep only letters, decimal digits, punctuation and whitespace.
///
/// Classes follow the Unicode general category, so symbols such as `+` or
/// `|` are dropped while `¿` and `—` are kept.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars().filter(|c| is_display_char(*c)).collect()
}

fn is_display_char(c: char) -> bool {
    if c.is_whitespace() {
        return true;
    }
    match c.general_category_group() {
        GeneralCategoryGroup::Letter | GeneralCategoryGroup::Punctuation => true,
        GeneralCategoryGroup::Number => c.general_category() == GeneralCategory::DecimalNumber,
        _ => false,
    }
}
