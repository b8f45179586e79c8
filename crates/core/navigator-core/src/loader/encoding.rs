//! Text decoding and mojibake repair
//!
//! Memo exports frequently contain UTF-8 text that was decoded as a legacy
//! single-byte charset somewhere upstream ("CafÃ©" instead of "Café"). The
//! repair here reverses that one step when it can and otherwise leaves the
//! text alone.

/// Decode bytes as UTF-8, dropping every invalid sequence.
///
/// A leading byte-order mark is removed.
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    match out.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => out,
    }
}

/// Repair text that was UTF-8 mis-decoded as a single-byte charset.
///
/// Fallback order:
/// 1. re-encode as ISO-8859-1 and decode as UTF-8
/// 2. re-encode as Windows-1252 and decode as UTF-8
/// 3. return the input unchanged
///
/// A step fails when a char cannot be encoded or the bytes are not valid
/// UTF-8. Plain ASCII comes back unchanged from step 1.
pub fn repair_text(text: &str) -> String {
    if let Some(fixed) = encode_latin1(text).and_then(|b| String::from_utf8(b).ok()) {
        return fixed;
    }
    if let Some(fixed) = encode_windows_1252(text).and_then(|b| String::from_utf8(b).ok()) {
        return fixed;
    }
    text.to_string()
}

fn encode_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}

fn encode_windows_1252(text: &str) -> Option<Vec<u8>> {
    text.chars().map(windows_1252_byte).collect()
}

fn windows_1252_byte(c: char) -> Option<u8> {
    let code = u32::from(c);
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return u8::try_from(code).ok();
    }
    // 0x81, 0x8D, 0x8F, 0x90 and 0x9D are unassigned
    let byte = match c {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_drops_invalid_bytes() {
        let bytes = b"caf\xC3\xA9 \xFF\xFEok";
        assert_eq!(decode_dropping_invalid(bytes), "café ok");
    }

    #[test]
    fn test_decode_strips_bom() {
        let bytes = b"\xEF\xBB\xBFtitle,body_text";
        assert_eq!(decode_dropping_invalid(bytes), "title,body_text");
    }

    #[test]
    fn test_repair_latin1_mojibake() {
        assert_eq!(repair_text("CafÃ©"), "Café");
        assert_eq!(repair_text("naÃ¯ve rÃ©sumÃ©"), "naïve résumé");
    }

    #[test]
    fn test_repair_windows_1252_mojibake() {
        // U+2019 read back through cp1252
        assert_eq!(repair_text("Itâ€™s"), "It’s");
        assert_eq!(repair_text("policyâ€”science"), "policy—science");
        // U+009D has no cp1252 byte, so nothing is changed
        assert_eq!(repair_text("â€\u{9d}"), "â€\u{9d}");
    }

    #[test]
    fn test_repair_leaves_good_text_alone() {
        assert_eq!(repair_text("plain ascii"), "plain ascii");
        assert_eq!(repair_text("Café"), "Café");
        assert_eq!(repair_text("It’s"), "It’s");
        assert_eq!(repair_text("日本語"), "日本語");
        assert_eq!(repair_text(""), "");
    }

    #[test]
    fn test_windows_1252_unassigned() {
        assert_eq!(windows_1252_byte('\u{81}'), None);
        assert_eq!(windows_1252_byte('\u{20AC}'), Some(0x80));
        assert_eq!(windows_1252_byte('é'), Some(0xE9));
    }
}
