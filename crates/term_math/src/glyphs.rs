//! Glyph Tables - compact Unicode sub/superscript transliteration
//!
//! Unicode only carries sub/superscript forms for a subset of Latin letters,
//! digits and a few operators, so transliteration is all-or-nothing: a
//! string either converts character by character or the caller must fall
//! back to another presentation.

/// Map a character to its Unicode subscript form
pub fn subscript_char(c: char) -> Option<char> {
    let glyph = match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'i' => 'ᵢ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        'r' => 'ᵣ',
        's' => 'ₛ',
        't' => 'ₜ',
        'u' => 'ᵤ',
        'v' => 'ᵥ',
        'x' => 'ₓ',
        'ə' => 'ₔ',
        '+' => '₊',
        '-' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        // No subscript form exists; kept as-is so index lists stay compact
        ',' => ',',
        ' ' => ' ',
        _ => return None,
    };
    Some(glyph)
}

/// Map a character to its Unicode superscript form
pub fn superscript_char(c: char) -> Option<char> {
    let glyph = match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        'a' => 'ᵃ',
        'b' => 'ᵇ',
        'c' => 'ᶜ',
        'd' => 'ᵈ',
        'e' => 'ᵉ',
        'f' => 'ᶠ',
        'g' => 'ᵍ',
        'h' => 'ʰ',
        'i' => 'ⁱ',
        'j' => 'ʲ',
        'k' => 'ᵏ',
        'l' => 'ˡ',
        'm' => 'ᵐ',
        'n' => 'ⁿ',
        'o' => 'ᵒ',
        'p' => 'ᵖ',
        'r' => 'ʳ',
        's' => 'ˢ',
        't' => 'ᵗ',
        'u' => 'ᵘ',
        'v' => 'ᵛ',
        'w' => 'ʷ',
        'x' => 'ˣ',
        'y' => 'ʸ',
        'z' => 'ᶻ',
        'A' => 'ᴬ',
        'B' => 'ᴮ',
        'D' => 'ᴰ',
        'E' => 'ᴱ',
        'G' => 'ᴳ',
        'H' => 'ᴴ',
        'I' => 'ᴵ',
        'J' => 'ᴶ',
        'K' => 'ᴷ',
        'L' => 'ᴸ',
        'M' => 'ᴹ',
        'N' => 'ᴺ',
        'O' => 'ᴼ',
        'P' => 'ᴾ',
        'R' => 'ᴿ',
        'T' => 'ᵀ',
        'U' => 'ᵁ',
        'V' => 'ⱽ',
        'W' => 'ᵂ',
        '+' => '⁺',
        '-' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        _ => return None,
    };
    Some(glyph)
}

/// Transliterate a whole string to subscript glyphs.
///
/// Returns `None` for empty text or when any character lacks a glyph.
pub fn subscript(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    text.chars().map(subscript_char).collect()
}

/// Transliterate a whole string to superscript glyphs.
///
/// Returns `None` for empty text or when any character lacks a glyph.
pub fn superscript(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    text.chars().map(superscript_char).collect()
}

/// Inline subscript form used by the compact layout path.
///
/// `None` means the caller must use multiline placement: compact glyphs are
/// disabled or there is no text. Text that cannot be transliterated is
/// written inline with an underscore prefix instead.
pub fn compact_subscript(text: &str, use_unicode: bool) -> Option<String> {
    if !use_unicode || text.is_empty() {
        return None;
    }
    Some(subscript(text).unwrap_or_else(|| format!("_{text}")))
}

/// Inline superscript form used by the compact layout path.
///
/// Primes and asterisks read naturally inline, so a lone `'`, `"` or `*`
/// is returned untransliterated.
pub fn compact_superscript(text: &str, use_unicode: bool) -> Option<String> {
    if !use_unicode || text.is_empty() {
        return None;
    }
    if matches!(text, "'" | "\"" | "*") {
        return Some(text.to_string());
    }
    superscript(text)
}
