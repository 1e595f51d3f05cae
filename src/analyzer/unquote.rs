//! Go string literal decoding
//!
//! Tree-sitter hands back the literal exactly as written, quotes and
//! escapes included. Content rules and keyword matching run over the
//! decoded text, so escapes have to be resolved with Go semantics first.
//! A literal that fails to decode is skipped by every rule (no finding,
//! no fault).

/// Decode a Go string literal, including the surrounding quotes.
///
/// Raw literals (backquoted) decode as-is, minus the carriage returns Go
/// discards. Interpreted literals resolve the full escape set: the single
/// character escapes, `\xHH`, three-digit octal, `\uHHHH` and
/// `\UHHHHHHHH`. Returns None for anything malformed.
pub fn unquote(lit: &str) -> Option<String> {
    if lit.len() >= 2 && lit.starts_with('`') && lit.ends_with('`') {
        let body = &lit[1..lit.len() - 1];
        if body.contains('`') {
            return None;
        }
        return Some(body.replace('\r', ""));
    }

    if lit.len() >= 2 && lit.starts_with('"') && lit.ends_with('"') {
        return unescape(&lit[1..lit.len() - 1]);
    }

    None
}

fn unescape(body: &str) -> Option<String> {
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\n' => return None, // newlines must be escaped in interpreted literals
            '"' => return None,  // an unescaped quote means we mis-sliced
            '\\' => {
                let esc = chars.next()?;
                match esc {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' => out.push(b'\\'),
                    '\'' => out.push(b'\''),
                    '"' => out.push(b'"'),
                    'x' => out.push(hex_byte(&mut chars)?),
                    '0'..='7' => out.push(octal_byte(esc, &mut chars)?),
                    'u' => push_unicode(&mut out, hex_value(&mut chars, 4)?)?,
                    'U' => push_unicode(&mut out, hex_value(&mut chars, 8)?)?,
                    _ => return None,
                }
            }
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    // \x and octal escapes may form arbitrary bytes; if they do not add
    // up to UTF-8 the literal is treated as undecodable
    String::from_utf8(out).ok()
}

fn hex_byte(chars: &mut std::str::Chars<'_>) -> Option<u8> {
    let value = hex_value(chars, 2)?;
    u8::try_from(value).ok()
}

fn hex_value(chars: &mut std::str::Chars<'_>, digits: u32) -> Option<u32> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let d = chars.next()?.to_digit(16)?;
        value = value * 16 + d;
    }
    Some(value)
}

fn octal_byte(first: char, chars: &mut std::str::Chars<'_>) -> Option<u8> {
    let mut value = first.to_digit(8)?;
    for _ in 0..2 {
        let d = chars.next()?.to_digit(8)?;
        value = value * 8 + d;
    }
    u8::try_from(value).ok()
}

fn push_unicode(out: &mut Vec<u8>, value: u32) -> Option<()> {
    let c = char::from_u32(value)?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_strings() {
        assert_eq!(unquote(r#""starting server""#), Some("starting server".to_string()));
        assert_eq!(unquote(r#""""#), Some(String::new()));
        assert_eq!(unquote("`raw \\n text`"), Some("raw \\n text".to_string()));
    }

    #[test]
    fn test_escape_sequences() {
        assert_eq!(unquote(r#""line\nbreak""#), Some("line\nbreak".to_string()));
        assert_eq!(unquote(r#""tab\there""#), Some("tab\there".to_string()));
        assert_eq!(unquote(r#""quote \" inside""#), Some("quote \" inside".to_string()));
        assert_eq!(unquote(r#""\x41\x42""#), Some("AB".to_string()));
        assert_eq!(unquote(r#""\101""#), Some("A".to_string()));
        assert_eq!(unquote(r#""ж""#), Some("ж".to_string()));
        assert_eq!(unquote(r#""\U0001F525""#), Some("🔥".to_string()));
    }

    #[test]
    fn test_malformed_literals() {
        assert_eq!(unquote(r#""bad \q escape""#), None);
        assert_eq!(unquote(r#""truncated \x4""#), None);
        assert_eq!(unquote(r#""dangling \""#), None);
        assert_eq!(unquote(r#""\xff lone byte""#), None); // not valid UTF-8
        assert_eq!(unquote("unquoted"), None);
    }

    #[test]
    fn test_raw_literal_drops_carriage_returns() {
        assert_eq!(unquote("`a\r\nb`"), Some("a\nb".to_string()));
    }
}
