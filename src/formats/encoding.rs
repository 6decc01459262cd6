// src/formats/encoding.rs

//! Text encodings for attribute data written to dBase files.
//!
//! Names are resolved with the WHATWG label table of `encoding_rs`, so
//! `latin1`, `CP1251`, `KOI8-R` or `Shift_JIS` all work. Note that under
//! that table `ISO-8859-1` and `ASCII` both mean windows-1252.

use std::fmt;
use std::str::FromStr;

use encoding_rs::{EncoderResult, Encoding, UTF_8, WINDOWS_1252};

/// Character encoding used for text attributes.
///
/// `System` mirrors the host's "use the system encoding" default and is
/// written as UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    System,
    Named(&'static Encoding),
}

impl TextEncoding {
    pub fn utf8() -> Self {
        TextEncoding::Named(UTF_8)
    }

    pub fn windows_1252() -> Self {
        TextEncoding::Named(WINDOWS_1252)
    }

    /// Resolve a label. Encodings that cannot be written byte-wise
    /// (UTF-16, `replacement`) resolve to their output encoding, UTF-8.
    pub fn for_label(label: &str) -> Option<Self> {
        if label.trim().eq_ignore_ascii_case("system") {
            return Some(TextEncoding::System);
        }
        Encoding::for_label(label.trim().as_bytes())
            .map(|e| TextEncoding::Named(e.output_encoding()))
    }

    pub fn encoding(self) -> &'static Encoding {
        match self {
            TextEncoding::System => UTF_8,
            TextEncoding::Named(encoding) => encoding,
        }
    }

    pub fn is_utf8(self) -> bool {
        self.encoding() == UTF_8
    }

    /// Name written to the `.cpg` sidecar file.
    pub fn code_page_name(self) -> &'static str {
        self.encoding().name()
    }

    /// dBase language driver id stored at header byte 29.
    pub fn language_driver(self) -> u8 {
        match self.encoding().name() {
            "windows-1252" => 0x57,
            "windows-1251" => 0xC9,
            "windows-1250" => 0xC8,
            "IBM866" => 0x65,
            // Everything else, UTF-8 included, relies on the .cpg file.
            _ => 0x00,
        }
    }

    /// Encode text, replacing unmappable characters with `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let encoding = self.encoding();
        if encoding == UTF_8 {
            return text.as_bytes().to_vec();
        }

        let mut encoder = encoding.new_encoder();
        let mut out = Vec::with_capacity(text.len() + 16);
        let mut input = text;
        loop {
            let (result, read) =
                encoder.encode_from_utf8_to_vec_without_replacement(input, &mut out, true);
            input = &input[read..];
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => out.reserve(input.len() * 4 + 16),
                EncoderResult::Unmappable(_) => out.push(b'?'),
            }
        }
        out
    }

    /// Decode bytes; malformed sequences become U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> String {
        self.encoding()
            .decode_without_bom_handling(bytes)
            .0
            .into_owned()
    }

    /// Best guess from a `.cpg` sidecar's contents.
    ///
    /// Besides labels this accepts the bare code page numbers ESRI tools
    /// write, such as `1252`, `866` or `88591`.
    pub fn from_code_page(contents: &str) -> Option<Self> {
        let name = contents.trim();
        if let Some(found) = Self::for_label(name) {
            return Some(found);
        }
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match name.strip_prefix("8859") {
            Some(part) if !part.is_empty() => Self::for_label(&format!("iso-8859-{part}")),
            _ => Self::for_label(&format!("windows-{name}"))
                .or_else(|| Self::for_label(&format!("cp{name}"))),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_label(s).ok_or_else(|| format!("unsupported encoding '{}'", s.trim()))
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::System => f.write_str("System"),
            TextEncoding::Named(encoding) => f.write_str(encoding.name()),
        }
    }
}
