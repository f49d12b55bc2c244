//! Single-byte text helpers shared by the normalizer and extractors
//!
//! Disc headers are decoded as ISO-8859-1, so every byte maps to exactly one
//! char and byte offsets stay valid as char offsets.

/// Decode bytes as ISO-8859-1
pub fn decode_latin1(data: &[u8]) -> String {
    data.iter().map(|&b| b as char).collect()
}

/// Trim trailing NUL bytes and spaces
pub fn trim_end_padding(s: &str) -> &str {
    s.trim_end_matches(|c: char| c == ' ' || c == '\0')
}

/// Byte index of the first ASCII case-insensitive match of `needle`
pub fn find_ignore_case(haystack: &[u8], needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Decode a byte window and trim surrounding whitespace
pub fn field(data: &[u8], start: usize, end: usize) -> String {
    let end = end.min(data.len());
    let start = start.min(end);
    decode_latin1(&data[start..end]).trim().to_string()
}
