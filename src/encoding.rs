//! Encoding detection and transcoding using chardetng and `encoding_rs`.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use simdutf8::basic::from_utf8;

use crate::error::{Error, Result};

/// Legacy single-byte encodings tried after UTF-8, in priority order.
pub static LEGACY_FALLBACKS: [&Encoding; 2] = [
    &encoding_rs::WINDOWS_1252_INIT,
    &encoding_rs::MACINTOSH_INIT,
];

/// Encodings a host can offer for explicit selection, with display names.
pub static SUPPORTED_ENCODINGS: [(&str, &Encoding); 16] = [
    ("Unicode (UTF-8)", &encoding_rs::UTF_8_INIT),
    ("Unicode (UTF-16LE)", &encoding_rs::UTF_16LE_INIT),
    ("Unicode (UTF-16BE)", &encoding_rs::UTF_16BE_INIT),
    ("Western (Mac OS Roman)", &encoding_rs::MACINTOSH_INIT),
    ("Western (Windows Latin 1)", &encoding_rs::WINDOWS_1252_INIT),
    ("Chinese (GBK)", &encoding_rs::GBK_INIT),
    ("Central European (ISO Latin 2)", &encoding_rs::ISO_8859_2_INIT),
    ("Central European (Windows Latin 2)", &encoding_rs::WINDOWS_1250_INIT),
    ("Cyrillic (Windows)", &encoding_rs::WINDOWS_1251_INIT),
    ("Greek (Windows)", &encoding_rs::WINDOWS_1253_INIT),
    ("Turkish (Windows)", &encoding_rs::WINDOWS_1254_INIT),
    ("Hebrew (Windows)", &encoding_rs::WINDOWS_1255_INIT),
    ("Arabic (Windows)", &encoding_rs::WINDOWS_1256_INIT),
    ("Baltic (Windows)", &encoding_rs::WINDOWS_1257_INIT),
    ("Vietnamese (Windows)", &encoding_rs::WINDOWS_1258_INIT),
    ("Thai (Windows)", &encoding_rs::WINDOWS_874_INIT),
];

/// Check if the given bytes are valid UTF-8.
///
/// Uses SIMD-accelerated validation for performance.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM (Byte Order Mark).
///
/// The UTF-8 BOM is the byte sequence: EF BB BF
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(&[0xEF, 0xBB, 0xBF])
}

/// Skip the UTF-8 BOM if present and return the remaining data.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    if has_utf8_bom(data) { &data[3..] } else { data }
}

/// Returns the UTF-16 variant announced by a leading BOM, if any.
pub fn utf16_bom(data: &[u8]) -> Option<&'static Encoding> {
    match data {
        [0xFF, 0xFE, ..] => Some(encoding_rs::UTF_16LE),
        [0xFE, 0xFF, ..] => Some(encoding_rs::UTF_16BE),
        _ => None,
    }
}

/// Returns true for the two UTF-16 byte orders.
#[inline]
pub fn is_utf16(encoding: &'static Encoding) -> bool {
    encoding == encoding_rs::UTF_16LE || encoding == encoding_rs::UTF_16BE
}

/// Named encodings a host can offer, in menu order.
pub fn supported_encodings() -> &'static [(&'static str, &'static Encoding)] {
    &SUPPORTED_ENCODINGS
}

/// Display name for an encoding, falling back to its WHATWG name.
pub fn display_name(encoding: &'static Encoding) -> &'static str {
    SUPPORTED_ENCODINGS
        .iter()
        .find(|(_, e)| *e == encoding)
        .map_or_else(|| encoding.name(), |(name, _)| *name)
}

/// Resolve an encoding label such as `utf-8`, `latin1` or `cp1252`.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

/// An encoding considered during detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingCandidate {
    /// The candidate encoding.
    pub encoding: &'static Encoding,
    /// Whether the input decodes without errors under this encoding.
    pub decodes: bool,
}

impl EncodingCandidate {
    /// Create a new `EncodingCandidate`.
    pub const fn new(encoding: &'static Encoding, decodes: bool) -> Self {
        Self { encoding, decodes }
    }
}

/// Returns true if `data` decodes under `encoding` without malformed sequences.
pub fn decodes_cleanly(data: &[u8], encoding: &'static Encoding) -> bool {
    if encoding == encoding_rs::UTF_8 {
        return is_utf8(skip_bom(data));
    }
    if is_utf16(encoding) {
        let (_, had_errors) = encoding.decode_with_bom_removal(data);
        return !had_errors;
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(data)
        .is_some()
}

/// Build the ordered encoding candidate list for `data`.
///
/// A UTF-8 or UTF-16 BOM short-circuits to that encoding alone. Otherwise
/// UTF-8 comes first when the data validates, followed by the legacy
/// fallbacks that decode. When UTF-8 fails, chardetng's guess is tried
/// ahead of the fixed fallbacks. If nothing decodes, UTF-8 is forced and
/// marked as not decoding.
pub fn encoding_candidates(data: &[u8]) -> Vec<EncodingCandidate> {
    if has_utf8_bom(data) {
        return vec![EncodingCandidate::new(
            encoding_rs::UTF_8,
            is_utf8(skip_bom(data)),
        )];
    }
    if let Some(utf16) = utf16_bom(data) {
        return vec![EncodingCandidate::new(utf16, true)];
    }

    let mut candidates = Vec::with_capacity(LEGACY_FALLBACKS.len() + 2);
    let utf8 = is_utf8(data);
    if utf8 {
        candidates.push(EncodingCandidate::new(encoding_rs::UTF_8, true));
    } else {
        let guess = guess_legacy_encoding(data);
        if !LEGACY_FALLBACKS.contains(&guess) && decodes_cleanly(data, guess) {
            candidates.push(EncodingCandidate::new(guess, true));
        }
    }

    for &legacy in &LEGACY_FALLBACKS {
        if decodes_cleanly(data, legacy) {
            candidates.push(EncodingCandidate::new(legacy, true));
        }
    }

    if candidates.is_empty() {
        candidates.push(EncodingCandidate::new(encoding_rs::UTF_8, false));
    }

    candidates
}

/// Ask chardetng for its best guess, never returning UTF-8.
fn guess_legacy_encoding(data: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let guess = detector.guess(None, true);
    if guess == encoding_rs::UTF_8 {
        encoding_rs::WINDOWS_1252
    } else {
        guess
    }
}

/// Returns true when every ASCII byte in `encoding` stands for itself.
///
/// Only then can separators, quotes and line breaks be matched byte-wise.
/// Multi-byte legacy encodings such as Shift_JIS or GBK reuse ASCII values
/// as trail bytes, and UTF-16 has no single-byte ASCII at all.
#[inline]
pub fn is_ascii_transparent(encoding: &'static Encoding) -> bool {
    encoding == encoding_rs::UTF_8 || encoding.is_single_byte()
}

/// Prepare raw bytes for byte-oriented tokenization.
///
/// Returns the buffer to scan and the encoding to decode fields with.
/// ASCII-transparent encodings are scanned in place (minus a UTF-8 BOM);
/// everything else is transcoded to UTF-8 first.
pub fn prepare_input<'a>(
    data: &'a [u8],
    encoding: &'static Encoding,
) -> (Cow<'a, [u8]>, &'static Encoding) {
    if encoding == encoding_rs::UTF_8 {
        return (Cow::Borrowed(skip_bom(data)), encoding);
    }
    if is_ascii_transparent(encoding) {
        return (Cow::Borrowed(data), encoding);
    }

    let decoded = if is_utf16(encoding) {
        encoding.decode_with_bom_removal(data).0
    } else {
        match encoding.decode_without_bom_handling_and_without_replacement(data) {
            Some(decoded) => decoded,
            None => encoding.decode_without_bom_handling(data).0,
        }
    };
    (
        Cow::Owned(decoded.into_owned().into_bytes()),
        encoding_rs::UTF_8,
    )
}

/// Decode one field's bytes, yielding an empty string on malformed input.
pub fn decode_field(bytes: &[u8], encoding: &'static Encoding) -> String {
    if encoding == encoding_rs::UTF_8 {
        return from_utf8(bytes).map(str::to_owned).unwrap_or_default();
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .unwrap_or_default()
}

/// Decode a whole prefix for sampling, replacing malformed sequences.
pub fn decode_lossy(data: &[u8], encoding: &'static Encoding) -> String {
    let (decoded, _, _) = encoding.decode(data);
    decoded.into_owned()
}

/// Encode text into `encoding`, or `None` if any character is unmappable.
///
/// UTF-16 output starts with a BOM so the result re-detects unambiguously.
pub fn encode_text(text: &str, encoding: &'static Encoding) -> Option<Vec<u8>> {
    if is_utf16(encoding) {
        let little_endian = encoding == encoding_rs::UTF_16LE;
        let mut out = Vec::with_capacity(2 + text.len() * 2);
        for unit in std::iter::once(0xFEFF_u16).chain(text.encode_utf16()) {
            if little_endian {
                out.extend_from_slice(&unit.to_le_bytes());
            } else {
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
        return Some(out);
    }

    let (encoded, _, unmappable) = encoding.encode(text);
    if unmappable {
        None
    } else {
        Some(encoded.into_owned())
    }
}

/// Bytes of a single character in the scanning encoding.
///
/// Falls back to `fallback` when the character has no representation.
pub fn encode_char(c: char, encoding: &'static Encoding, fallback: char) -> Vec<u8> {
    let mut buf = [0u8; 4];
    if encoding == encoding_rs::UTF_8 {
        return c.encode_utf8(&mut buf).as_bytes().to_vec();
    }
    let (encoded, _, unmappable) = encoding.encode(c.encode_utf8(&mut buf));
    if unmappable || encoded.is_empty() {
        fallback.encode_utf8(&mut buf).as_bytes().to_vec()
    } else {
        encoded.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_utf8() {
        assert!(is_utf8(b"Hello, World!"));
        assert!(is_utf8("こんにちは".as_bytes()));
        assert!(is_utf8(b""));
        assert!(!is_utf8(&[0x80, 0x81, 0x82]));
    }

    #[test]
    fn test_utf8_bom() {
        let with_bom = [0xEF, 0xBB, 0xBF, b'a', b'b', b'c'];
        let without_bom = b"abc";

        assert!(has_utf8_bom(&with_bom));
        assert!(!has_utf8_bom(without_bom));

        assert_eq!(skip_bom(&with_bom), b"abc");
        assert_eq!(skip_bom(without_bom), b"abc");
    }

    #[test]
    fn test_candidates_utf8_first() {
        let candidates = encoding_candidates(b"a,b\n1,2\n");
        assert_eq!(candidates[0].encoding, encoding_rs::UTF_8);
        assert!(candidates.iter().all(|c| c.decodes));
        assert!(candidates.len() <= 3);
    }

    #[test]
    fn test_candidates_bom_short_circuit() {
        let data = [0xEF, 0xBB, 0xBF, b'a', b',', b'b'];
        let candidates = encoding_candidates(&data);
        assert_eq!(candidates, vec![EncodingCandidate::new(encoding_rs::UTF_8, true)]);

        let data = [0xFF, 0xFE, b'a', 0x00];
        let candidates = encoding_candidates(&data);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].encoding, encoding_rs::UTF_16LE);
    }

    #[test]
    fn test_candidates_legacy_when_not_utf8() {
        // "café" in Windows-1252
        let data = b"name,drink\nAnna,caf\xe9\n";
        let candidates = encoding_candidates(data);
        assert!(candidates.iter().all(|c| c.encoding != encoding_rs::UTF_8));
        assert!(candidates.iter().any(|c| c.encoding == encoding_rs::WINDOWS_1252));
    }

    #[test]
    fn test_decode_field_invalid_is_empty() {
        assert_eq!(decode_field(&[0xC3, 0x28], encoding_rs::UTF_8), "");
        assert_eq!(decode_field("ok".as_bytes(), encoding_rs::UTF_8), "ok");
        assert_eq!(decode_field(b"caf\xe9", encoding_rs::WINDOWS_1252), "café");
    }

    #[test]
    fn test_prepare_utf16_transcodes() {
        let data: &[u8] = &[0xFF, 0xFE, b'a', 0x00, b',', 0x00, b'b', 0x00];
        let (prepared, field_encoding) = prepare_input(data, encoding_rs::UTF_16LE);
        assert_eq!(&prepared[..], b"a,b");
        assert_eq!(field_encoding, encoding_rs::UTF_8);
    }

    #[test]
    fn test_prepare_multibyte_legacy_transcodes() {
        // "ポ|a" in Shift_JIS: the trail byte of ポ is 0x7C
        let data: &[u8] = &[0x83, 0x7C, 0x7C, 0x61];
        let (prepared, field_encoding) = prepare_input(data, encoding_rs::SHIFT_JIS);
        assert_eq!(&prepared[..], "ポ|a".as_bytes());
        assert_eq!(field_encoding, encoding_rs::UTF_8);
    }

    #[test]
    fn test_ascii_transparency() {
        assert!(is_ascii_transparent(encoding_rs::UTF_8));
        assert!(is_ascii_transparent(encoding_rs::WINDOWS_1252));
        assert!(is_ascii_transparent(encoding_rs::MACINTOSH));
        assert!(!is_ascii_transparent(encoding_rs::SHIFT_JIS));
        assert!(!is_ascii_transparent(encoding_rs::GBK));
        assert!(!is_ascii_transparent(encoding_rs::UTF_16LE));
    }

    #[test]
    fn test_encode_text_unmappable() {
        assert!(encode_text("snowman ☃", encoding_rs::WINDOWS_1252).is_none());
        assert_eq!(
            encode_text("café", encoding_rs::WINDOWS_1252),
            Some(b"caf\xe9".to_vec())
        );
    }

    #[test]
    fn test_encode_text_utf16_has_bom() {
        let encoded = encode_text("a", encoding_rs::UTF_16BE).unwrap();
        assert_eq!(encoded, vec![0xFE, 0xFF, 0x00, b'a']);
    }

    #[test]
    fn test_encoding_for_label() {
        assert_eq!(encoding_for_label("latin1").unwrap(), encoding_rs::WINDOWS_1252);
        assert!(matches!(
            encoding_for_label("klingon"),
            Err(Error::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(encoding_rs::UTF_8), "Unicode (UTF-8)");
        assert_eq!(display_name(encoding_rs::SHIFT_JIS), "Shift_JIS");
    }
}
