//! ToUnicode CMap parser for mapping character codes to Unicode strings.
//!
//! Parses CMap data embedded in PDF `/ToUnicode` streams to convert glyph codes
//! to Unicode text. Supports `beginbfchar`/`endbfchar` (single mappings) and
//! `beginbfrange`/`endbfrange` (range mappings) with UTF-16BE encoded values.

use std::collections::HashMap;

use crate::error::BackendError;

/// A codespace range: a `(low, high)` pair of equal-length byte sequences.
///
/// Determines how many bytes the next code in a content-stream string
/// consumes: the leading byte is checked against each range's first-byte
/// bounds, and the matching range's length is the code's byte length.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CodespaceRange {
    low: Vec<u8>,
    high: Vec<u8>,
}

impl CodespaceRange {
    fn byte_length(&self) -> usize {
        self.low.len()
    }

    fn matches_leading_byte(&self, byte: u8) -> bool {
        match (self.low.first(), self.high.first()) {
            (Some(&lo), Some(&hi)) => (lo..=hi).contains(&byte),
            _ => false,
        }
    }
}

/// Determine the byte length of the next code given a set of codespace
/// ranges (already sorted or not — all ranges are checked).
///
/// Falls back to 2 bytes (PDF's implicit CID font default) when no
/// codespace range is configured, per spec §4.3.
fn code_length_at(ranges: &[CodespaceRange], remaining: &[u8]) -> usize {
    if ranges.is_empty() {
        return 2;
    }
    if let Some(&first) = remaining.first() {
        if let Some(range) = ranges.iter().find(|r| r.matches_leading_byte(first)) {
            return range.byte_length();
        }
    }
    ranges.iter().map(CodespaceRange::byte_length).min().unwrap_or(2)
}

/// Parse a begincodespacerange...endcodespacerange section.
///
/// Each line has the form `<lo> <hi>`, with `lo`/`hi` equal-length hex
/// byte sequences.
fn parse_codespace_section(section: &str) -> Vec<CodespaceRange> {
    let mut ranges = Vec::new();
    for line in section.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || !trimmed.contains('<') {
            continue;
        }
        let tokens = extract_hex_tokens(trimmed);
        if tokens.len() < 2 {
            continue;
        }
        let low = hex_to_bytes(tokens[0]);
        let high = hex_to_bytes(tokens[1]);
        if !low.is_empty() && low.len() == high.len() {
            ranges.push(CodespaceRange { low, high });
        }
    }
    ranges
}

/// Parse a hex string into raw bytes, left-padding with a zero nibble if
/// the digit count is odd.
fn hex_to_bytes(hex: &str) -> Vec<u8> {
    let padded;
    let hex = if hex.len() % 2 != 0 {
        padded = format!("0{hex}");
        padded.as_str()
    } else {
        hex
    };
    hex.as_bytes()
        .chunks(2)
        .filter_map(|pair| {
            let s = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(s, 16).ok()
        })
        .collect()
}

/// Extract all `begin<tag>...end<tag>` sections' inner text from `text`.
fn extract_sections<'a>(text: &'a str, tag: &str) -> Vec<&'a str> {
    let begin = format!("begin{tag}");
    let end = format!("end{tag}");
    let mut sections = Vec::new();
    let mut search_from = 0;
    while let Some(start) = text[search_from..].find(begin.as_str()) {
        let section_start = search_from + start + begin.len();
        if let Some(rel_end) = text[section_start..].find(end.as_str()) {
            sections.push(&text[section_start..section_start + rel_end]);
            search_from = section_start + rel_end + end.len();
        } else {
            break;
        }
    }
    sections
}

/// A parsed ToUnicode CMap that maps character codes to Unicode strings.
///
/// Character codes are typically 1 or 2 bytes from the PDF font encoding.
/// Unicode values may be single characters or multi-character strings
/// (e.g., ligatures like "fi" → "fi").
#[derive(Debug, Clone)]
pub struct CMap {
    /// Mapping from character code to Unicode string.
    mappings: HashMap<u32, String>,
    codespace_ranges: Vec<CodespaceRange>,
}

impl CMap {
    /// Parse a ToUnicode CMap from its raw byte content.
    ///
    /// Extracts `begincodespacerange`/`endcodespacerange`,
    /// `beginbfchar`/`endbfchar` and `beginbfrange`/`endbfrange` sections to
    /// build the character code → Unicode mapping table.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut mappings = HashMap::new();

        for section in extract_sections(&text, "bfchar") {
            parse_bfchar_section(section, &mut mappings)?;
        }
        for section in extract_sections(&text, "bfrange") {
            parse_bfrange_section(section, &mut mappings)?;
        }
        let codespace_ranges = extract_sections(&text, "codespacerange")
            .into_iter()
            .flat_map(|s| parse_codespace_section(s))
            .collect();

        Ok(CMap {
            mappings,
            codespace_ranges,
        })
    }

    /// Look up the Unicode string for a character code.
    ///
    /// Returns `None` if the code has no mapping in this CMap.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(|s| s.as_str())
    }

    /// Look up the Unicode string for a character code, with fallback.
    ///
    /// If no mapping is found, returns U+FFFD (REPLACEMENT CHARACTER).
    pub fn lookup_or_replacement(&self, code: u32) -> String {
        self.lookup(code)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "\u{FFFD}".to_string())
    }

    /// The smallest code that decodes to `target`, if any.
    ///
    /// Used by [`FindSpaceCharGlyphCode`](crate::font) to locate the code
    /// whose Unicode decoding is U+0020, so that `Tw` applies correctly to
    /// multi-byte CID fonts.
    pub fn code_for_unicode(&self, target: &str) -> Option<u32> {
        self.mappings
            .iter()
            .filter(|(_, v)| v.as_str() == target)
            .map(|(&k, _)| k)
            .min()
    }

    /// The byte length of the next code starting at `remaining`, driven by
    /// this CMap's codespace ranges (2 bytes if none are configured).
    pub fn code_length_at(&self, remaining: &[u8]) -> usize {
        code_length_at(&self.codespace_ranges, remaining)
    }

    /// Returns the number of mappings in this CMap.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if this CMap has no mappings.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// A parsed CID CMap that maps character codes to CIDs.
///
/// Used by predefined CMaps (e.g., Adobe-Japan1) and embedded CID CMaps
/// that use `begincidchar`/`endcidchar` and `begincidrange`/`endcidrange`
/// sections. Unlike [`CMap`] which maps to Unicode strings, this maps
/// character codes to numeric CID values.
#[derive(Debug, Clone)]
pub struct CidCMap {
    /// Mapping from character code to CID.
    cid_mappings: HashMap<u32, u32>,
    /// CMap name (e.g., "Adobe-Japan1-6").
    name: Option<String>,
    /// Writing mode: 0 = horizontal, 1 = vertical.
    writing_mode: u8,
    codespace_ranges: Vec<CodespaceRange>,
}

impl CidCMap {
    /// Parse a CID CMap from its raw byte content.
    ///
    /// Extracts `begincodespacerange`/`endcodespacerange`,
    /// `begincidchar`/`endcidchar` and `begincidrange`/`endcidrange`
    /// sections to build the character code → CID mapping table.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut cid_mappings = HashMap::new();

        // Parse CMap name
        let name = parse_cmap_name(&text);

        // Parse writing mode (/WMode)
        let writing_mode = parse_writing_mode(&text);

        for section in extract_sections(&text, "cidchar") {
            parse_cidchar_section(section, &mut cid_mappings)?;
        }
        for section in extract_sections(&text, "cidrange") {
            parse_cidrange_section(section, &mut cid_mappings)?;
        }
        let codespace_ranges = extract_sections(&text, "codespacerange")
            .into_iter()
            .flat_map(|s| parse_codespace_section(s))
            .collect();

        Ok(CidCMap {
            cid_mappings,
            name,
            writing_mode,
            codespace_ranges,
        })
    }

    /// Look up the CID for a character code.
    pub fn lookup(&self, code: u32) -> Option<u32> {
        self.cid_mappings.get(&code).copied()
    }

    /// The byte length of the next code starting at `remaining`, driven by
    /// this CMap's codespace ranges (2 bytes if none are configured, which
    /// matches Identity-H/V and most CJK predefined CMaps).
    pub fn code_length_at(&self, remaining: &[u8]) -> usize {
        code_length_at(&self.codespace_ranges, remaining)
    }

    /// Returns the number of mappings in this CID CMap.
    pub fn len(&self) -> usize {
        self.cid_mappings.len()
    }

    /// Returns true if this CID CMap has no mappings.
    pub fn is_empty(&self) -> bool {
        self.cid_mappings.is_empty()
    }

    /// CMap name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Writing mode: 0 = horizontal, 1 = vertical.
    pub fn writing_mode(&self) -> u8 {
        self.writing_mode
    }
}

/// Parse a begincidchar...endcidchar section.
///
/// Each line has format: `<srcCode> CID`
fn parse_cidchar_section(
    section: &str,
    mappings: &mut HashMap<u32, u32>,
) -> Result<(), BackendError> {
    for line in section.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || !trimmed.contains('<') {
            continue;
        }

        let tokens = extract_hex_tokens(trimmed);
        if tokens.is_empty() {
            continue;
        }
        let src_code = parse_hex_code(tokens[0])?;

        // CID is a decimal number after the hex token
        let after_hex = trimmed
            .rfind('>')
            .map(|pos| &trimmed[pos + 1..])
            .unwrap_or("");
        if let Ok(cid) = after_hex.trim().parse::<u32>() {
            mappings.insert(src_code, cid);
        }
    }
    Ok(())
}

/// Parse a begincidrange...endcidrange section.
///
/// Each line has format: `<srcLow> <srcHigh> CID_start`
fn parse_cidrange_section(
    section: &str,
    mappings: &mut HashMap<u32, u32>,
) -> Result<(), BackendError> {
    for line in section.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || !trimmed.contains('<') {
            continue;
        }

        let tokens = extract_hex_tokens(trimmed);
        if tokens.len() < 2 {
            continue;
        }
        let src_low = parse_hex_code(tokens[0])?;
        let src_high = parse_hex_code(tokens[1])?;

        // CID start is a decimal number after the last hex token
        let after_last_hex = trimmed
            .rfind('>')
            .map(|pos| &trimmed[pos + 1..])
            .unwrap_or("");
        if let Ok(cid_start) = after_last_hex.trim().parse::<u32>() {
            for offset in 0..=(src_high.saturating_sub(src_low)) {
                mappings.insert(src_low + offset, cid_start + offset);
            }
        }
    }
    Ok(())
}

/// Parse /CMapName from CMap data.
fn parse_cmap_name(text: &str) -> Option<String> {
    // Look for "/CMapName /SomeName def"
    let idx = text.find("/CMapName")?;
    let rest = &text[idx + "/CMapName".len()..];
    let rest = rest.trim_start();
    if let Some(rest) = rest.strip_prefix('/') {
        let end = rest.find(|c: char| c.is_whitespace()).unwrap_or(rest.len());
        Some(rest[..end].to_string())
    } else {
        None
    }
}

/// Parse /WMode from CMap data.
fn parse_writing_mode(text: &str) -> u8 {
    // Look for "/WMode N def"
    if let Some(idx) = text.find("/WMode") {
        let rest = &text[idx + "/WMode".len()..];
        let rest = rest.trim_start();
        if let Some(ch) = rest.chars().next() {
            if ch == '1' {
                return 1;
            }
        }
    }
    0 // default horizontal
}

/// Parse a hex string like "0041" into a u32 character code.
fn parse_hex_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16)
        .map_err(|e| BackendError::Parse(format!("invalid hex code '{hex}': {e}")))
}

/// Decode a hex string as UTF-16BE bytes into a Unicode string.
///
/// The hex string represents UTF-16BE encoded code units. For BMP characters,
/// this is a single 2-byte value. For supplementary characters, this is a
/// surrogate pair (4 bytes). For multi-character mappings (ligatures), this
/// can be multiple 2-byte values.
fn decode_utf16be_hex(hex: &str) -> Result<String, BackendError> {
    if hex.len() % 4 != 0 {
        // Pad to even number of hex digits (groups of 4 for UTF-16 code units)
        // For 2-digit hex like "41", treat as single-byte padded to "0041"
        if hex.len() == 2 {
            let padded = format!("00{hex}");
            return decode_utf16be_hex(&padded);
        }
        return Err(BackendError::Parse(format!(
            "UTF-16BE hex string must have length divisible by 4, got '{hex}' (len={})",
            hex.len()
        )));
    }

    // Parse hex string into u16 code units
    let mut code_units = Vec::with_capacity(hex.len() / 4);
    for chunk in hex.as_bytes().chunks(4) {
        let chunk_str = std::str::from_utf8(chunk)
            .map_err(|e| BackendError::Parse(format!("invalid UTF-8 in hex: {e}")))?;
        let unit = u16::from_str_radix(chunk_str, 16).map_err(|e| {
            BackendError::Parse(format!("invalid hex in UTF-16BE '{chunk_str}': {e}"))
        })?;
        code_units.push(unit);
    }

    // Decode UTF-16BE code units to String
    String::from_utf16(&code_units)
        .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE sequence: {e}")))
}

/// Extract all `<hex>` tokens from a line of text.
fn extract_hex_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        if let Some(end) = rest[start + 1..].find('>') {
            let hex = &rest[start + 1..start + 1 + end];
            tokens.push(hex);
            rest = &rest[start + 1 + end + 1..];
        } else {
            break;
        }
    }
    tokens
}

/// Parse a beginbfchar...endbfchar section.
///
/// Each line has format: `<srcCode> <dstUnicode>`
fn parse_bfchar_section(
    section: &str,
    mappings: &mut HashMap<u32, String>,
) -> Result<(), BackendError> {
    for line in section.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || !trimmed.contains('<') {
            continue;
        }

        let tokens = extract_hex_tokens(trimmed);
        if tokens.len() >= 2 {
            let src_code = parse_hex_code(tokens[0])?;
            let unicode_str = decode_utf16be_hex(tokens[1])?;
            mappings.insert(src_code, unicode_str);
        }
    }
    Ok(())
}

/// Parse a beginbfrange...endbfrange section.
///
/// Each line has format: `<srcLow> <srcHigh> <dstStart>`
/// or: `<srcLow> <srcHigh> [<str1> <str2> ...]`
fn parse_bfrange_section(
    section: &str,
    mappings: &mut HashMap<u32, String>,
) -> Result<(), BackendError> {
    for line in section.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || !trimmed.contains('<') {
            continue;
        }

        // Check if destination is an array: [<hex> <hex> ...]
        if let Some(bracket_start) = trimmed.find('[') {
            // Array form: <srcLow> <srcHigh> [<str1> <str2> ...]
            let before_bracket = &trimmed[..bracket_start];
            let src_tokens = extract_hex_tokens(before_bracket);
            if src_tokens.len() < 2 {
                continue;
            }
            let src_low = parse_hex_code(src_tokens[0])?;
            let src_high = parse_hex_code(src_tokens[1])?;

            // Extract hex tokens from inside the brackets
            let bracket_end = trimmed.rfind(']').unwrap_or(trimmed.len());
            let array_content = &trimmed[bracket_start + 1..bracket_end];
            let dst_tokens = extract_hex_tokens(array_content);

            for (i, dst_hex) in dst_tokens.iter().enumerate() {
                let code = src_low + i as u32;
                if code > src_high {
                    break;
                }
                let unicode_str = decode_utf16be_hex(dst_hex)?;
                mappings.insert(code, unicode_str);
            }
        } else {
            // Standard form: <srcLow> <srcHigh> <dstStart>
            let tokens = extract_hex_tokens(trimmed);
            if tokens.len() < 3 {
                continue;
            }
            let src_low = parse_hex_code(tokens[0])?;
            let src_high = parse_hex_code(tokens[1])?;
            let dst_start = parse_hex_code(tokens[2])?;

            if src_high < src_low {
                continue;
            }
            for offset in 0..=src_high.saturating_sub(src_low) {
                let code = src_low + offset;
                let unicode_cp = dst_start + offset;
                if let Some(ch) = char::from_u32(unicode_cp) {
                    mappings.insert(code, ch.to_string());
                }
            }
        }
    }
    Ok(())
}
