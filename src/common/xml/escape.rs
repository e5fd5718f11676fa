//! Entity escaping for text nodes and attribute values.

use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

const SPECIAL: [&str; 5] = ["&", "<", ">", "\"", "'"];
const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

static ESCAPER: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(SPECIAL).expect("escape patterns are valid"));

// Leftmost-longest so `&amp;lt;` decodes to `&lt;`, not `<`.
static UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(ENTITIES)
        .expect("entity patterns are valid")
});

/// Escape the five XML special characters. Safe for text and for
/// double-quoted attribute values.
///
/// ```
/// use ofd::common::xml::escape_xml;
/// assert_eq!(escape_xml("Song & Hei"), "Song &amp; Hei");
/// assert_eq!(escape_xml("<Font>\"Song\"</Font>"), "&lt;Font&gt;&quot;Song&quot;&lt;/Font&gt;");
/// ```
pub fn escape_xml(s: &str) -> String {
    ESCAPER.replace_all(s, &ENTITIES)
}

/// Decode the five predefined entities; anything else is left as is.
///
/// ```
/// use ofd::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_xml("&nbsp;"), "&nbsp;");
/// ```
pub fn unescape_xml(s: &str) -> String {
    UNESCAPER.replace_all(s, &SPECIAL)
}

/// Resolve a general entity reference name (without `&` and `;`).
pub(crate) fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)
        },
    }
}
