//! Font decoder: font dictionary parsing, character decoding, and width
//! computation, for both simple (single-byte) and Type0/CID (multi-byte)
//! fonts.

use std::collections::HashMap;

use pdf_text_core::encoding::{EncodingResolver, FontEncoding, StandardEncoding, glyph_name_to_char};
use pdf_text_core::{FontDescription, FontId, PdfDictionary, PdfObject, WidthTable};

use crate::cid_font::{self, CidFontMetrics};
use crate::cmap::{CidCMap, CMap};
use crate::font_metrics::{self, FontMetrics};
use crate::provider::{resolve, ObjectProvider};
use crate::standard_fonts;

/// How a code sequence was translated to Unicode text, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateMethod {
    /// Resolved via an embedded /ToUnicode CMap.
    ToUnicode,
    /// Resolved via the font's simple encoding (/Encoding name or Differences).
    SimpleEncoding,
    /// Resolved via the implicit default encoding.
    Default,
    /// No encoding information was usable; bytes decoded as raw Latin-1.
    Raw,
}

/// CID encoding strategy: how a content-stream code maps to a CID.
#[derive(Debug, Clone)]
enum CidEncoding {
    /// Identity-H/-V: the code *is* the CID, 2 bytes per code.
    Identity,
    /// An embedded CMap stream mapping codes to CIDs.
    Embedded(CidCMap),
}

impl CidEncoding {
    fn code_length_at(&self, remaining: &[u8]) -> usize {
        match self {
            CidEncoding::Identity => 2,
            CidEncoding::Embedded(cmap) => cmap.code_length_at(remaining),
        }
    }

    fn cid_for_code(&self, code: u32) -> u32 {
        match self {
            CidEncoding::Identity => code,
            CidEncoding::Embedded(cmap) => cmap.lookup(code).unwrap_or(code),
        }
    }
}

/// Decoding data for a simple (single-byte) font.
#[derive(Debug)]
struct SimpleFontData {
    encoding: EncodingResolver,
    /// The single byte code whose decoding is U+0020, if any.
    space_code: Option<u8>,
    has_to_unicode: bool,
    has_font_encoding: bool,
}

/// Decoding data for a Type0 (composite/CID) font.
#[derive(Debug)]
struct CidFontData {
    cid_encoding: CidEncoding,
    to_unicode: Option<CMap>,
    metrics: CidFontMetrics,
    /// The code whose ToUnicode decoding is U+0020, if any.
    space_code: Option<u32>,
}

impl std::fmt::Debug for CidEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CidEncoding::Identity => write!(f, "Identity"),
            CidEncoding::Embedded(_) => write!(f, "Embedded"),
        }
    }
}

/// A decoded font: translation strategy, width table, and font metadata.
///
/// Built once per font dictionary by [`decode_font`] and cached by the
/// collector, keyed by [`FontId`].
#[derive(Debug)]
pub struct Font {
    /// Immutable metadata handed to the output surface.
    pub description: FontDescription,
    simple: Option<SimpleFontData>,
    cid: Option<CidFontData>,
}

impl Font {
    /// `true` for single-byte fonts, `false` for Type0/CID fonts.
    pub fn is_simple_font(&self) -> bool {
        self.description.is_simple_font
    }

    /// The byte length of the next code starting at `remaining`.
    ///
    /// Simple fonts always consume 1 byte. CID fonts consume a
    /// variable-length code driven by the font's encoding CMap (2 bytes if
    /// none is configured, per spec default).
    pub fn code_length_at(&self, remaining: &[u8]) -> usize {
        if let Some(cid) = &self.cid {
            cid.cid_encoding.code_length_at(remaining).max(1)
        } else {
            1
        }
    }

    /// Split `bytes` into a sequence of character codes, consuming
    /// [`Font::code_length_at`] bytes at a time.
    pub fn iter_codes(&self, bytes: &[u8]) -> Vec<u32> {
        let mut codes = Vec::new();
        let mut pos = 0;
        while pos < bytes.len() {
            let len = self.code_length_at(&bytes[pos..]).min(bytes.len() - pos).max(1);
            let mut code = 0u32;
            for &b in &bytes[pos..pos + len] {
                code = (code << 8) | b as u32;
            }
            codes.push(code);
            pos += len;
        }
        codes
    }

    /// `ComputeDisplacements`: split `bytes` into `(code, width)` pairs,
    /// where `width` is the glyph advance in 1/1000 text-space units.
    pub fn compute_displacements(&self, bytes: &[u8]) -> Vec<(u32, f64)> {
        self.iter_codes(bytes)
            .into_iter()
            .map(|code| (code, self.width_for_code(code)))
            .collect()
    }

    /// The glyph advance width for a single code, in 1/1000 text-space units.
    pub fn width_for_code(&self, code: u32) -> f64 {
        if let Some(cid) = &self.cid {
            let c = cid.cid_encoding.cid_for_code(code);
            cid.metrics.get_width(c)
        } else {
            self.description.widths.width_for(code)
        }
    }

    /// `FindSpaceCharGlyphCode`: the code (if any) whose decoding is a
    /// literal U+0020, used to decide whether `Tw` (word spacing) applies
    /// to a given code.
    pub fn space_code(&self) -> Option<u32> {
        if let Some(cid) = &self.cid {
            cid.space_code
        } else {
            self.simple.as_ref().and_then(|s| s.space_code).map(u32::from)
        }
    }

    /// `Translate`: decode `bytes` into its best-effort Unicode text,
    /// following the strategy order ToUnicode → simple encoding → default
    /// → raw Latin-1.
    pub fn translate(&self, bytes: &[u8]) -> (String, TranslateMethod) {
        if let Some(cid) = &self.cid {
            if let Some(to_unicode) = &cid.to_unicode {
                if !to_unicode.is_empty() {
                    let text = self
                        .iter_codes(bytes)
                        .into_iter()
                        .map(|code| to_unicode.lookup_or_replacement(code))
                        .collect();
                    return (text, TranslateMethod::ToUnicode);
                }
            }
            // No usable ToUnicode for a composite font: per spec §4.3, this
            // does not fall through to `raw` (that's reserved for simple
            // fonts) — emit U+FFFD per code and tag `Default`.
            let text = self.iter_codes(bytes).into_iter().map(|_| '\u{FFFD}').collect();
            return (text, TranslateMethod::Default);
        }

        let simple = self
            .simple
            .as_ref()
            .expect("a Font is always either simple or CID");

        let mut any_resolved = false;
        let mut any_unresolved = false;
        let text: String = bytes
            .iter()
            .map(|&b| match simple.encoding.resolve(b as u16) {
                Some(s) => {
                    any_resolved = true;
                    s
                }
                None => {
                    any_unresolved = true;
                    char::from(b).to_string()
                }
            })
            .collect();

        let method = if any_unresolved && !any_resolved {
            TranslateMethod::Raw
        } else if simple.has_to_unicode {
            TranslateMethod::ToUnicode
        } else if simple.has_font_encoding {
            TranslateMethod::SimpleEncoding
        } else {
            TranslateMethod::Default
        };

        (text, method)
    }
}

/// Strip a subset tag prefix (six uppercase letters followed by `+`) from a
/// PostScript font name, e.g. `"ABCDEF+Helvetica"` → `"Helvetica"`.
fn strip_subset_prefix(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() > 7
        && bytes[6] == b'+'
        && bytes[..6].iter().all(|b| b.is_ascii_uppercase())
    {
        &name[7..]
    } else {
        name
    }
}

/// `true` if `name` carries a subset tag prefix.
fn is_subset_font(name: &str) -> bool {
    strip_subset_prefix(name) != name
}

/// Look up the ToUnicode CMap for a font dictionary, if present.
fn load_to_unicode<P: ObjectProvider>(provider: &P, dict: &PdfDictionary) -> Option<CMap> {
    let obj = resolve(provider, dict.get("ToUnicode")?);
    let (_, bytes) = obj.as_stream()?;
    CMap::parse(bytes).ok()
}

/// Find the code in `cmap` whose Unicode decoding is a literal space.
fn space_code_from_cmap(cmap: &CMap) -> Option<u32> {
    cmap.code_for_unicode(" ")
}

/// Find the byte in `encoding` whose decoding is a literal space.
fn space_code_from_encoding(encoding: &FontEncoding) -> Option<u8> {
    (0u16..=255).find_map(|b| {
        let byte = b as u8;
        if encoding.decode(byte) == Some(' ') {
            Some(byte)
        } else {
            None
        }
    })
}

/// Parse a standard-encoding name into [`StandardEncoding`].
fn parse_standard_encoding_name(name: &str) -> Option<StandardEncoding> {
    match name {
        "WinAnsiEncoding" => Some(StandardEncoding::WinAnsi),
        "MacRomanEncoding" => Some(StandardEncoding::MacRoman),
        "MacExpertEncoding" => Some(StandardEncoding::MacExpert),
        "StandardEncoding" => Some(StandardEncoding::Standard),
        _ => None,
    }
}

/// Parse a /Differences array (as stored in a resolved `PdfObject::Array`)
/// into `(code, char)` pairs, per the PDF `[code /name /name ... code /name]`
/// run-length format.
fn parse_differences<P: ObjectProvider>(
    provider: &P,
    array: &[PdfObject],
) -> Vec<(u8, char)> {
    let mut out = Vec::new();
    let mut current_code: i64 = 0;
    for obj in array {
        let obj = resolve(provider, obj);
        if let Some(code) = obj.as_i64() {
            current_code = code;
        } else if let Some(name) = obj.as_name() {
            if let Some(ch) = glyph_name_to_char(name) {
                if (0..=255).contains(&current_code) {
                    out.push((current_code as u8, ch));
                }
            }
            current_code += 1;
        }
    }
    out
}

/// Resolve a font dictionary's /Encoding entry into a [`FontEncoding`], if
/// one is explicitly present (as opposed to the implicit default).
fn resolve_explicit_encoding<P: ObjectProvider>(
    provider: &P,
    font_dict: &PdfDictionary,
) -> Option<FontEncoding> {
    let obj = resolve(provider, font_dict.get("Encoding")?);

    if let Some(name) = obj.as_name() {
        let base = parse_standard_encoding_name(name).unwrap_or(StandardEncoding::Standard);
        return Some(FontEncoding::from_standard(base));
    }

    let dict = obj.as_dict()?;
    let base = dict
        .get_name("BaseEncoding")
        .and_then(parse_standard_encoding_name)
        .unwrap_or(StandardEncoding::Standard);
    let mut encoding = FontEncoding::from_standard(base);

    if let Some(diffs) = dict.get("Differences").map(|o| resolve(provider, o)) {
        if let Some(arr) = diffs.as_array() {
            encoding.apply_differences(&parse_differences(provider, arr));
        }
    }

    Some(encoding)
}

/// `true` if bit `ForceBold` (bit 19, value `0x40000`) is set in a
/// FontDescriptor's /Flags.
fn descriptor_force_bold(flags: i64) -> bool {
    flags & 0x40000 != 0
}

/// Derive `(font_weight, font_stretch)` from a FontDescriptor dictionary.
fn descriptor_weight_and_stretch(desc: Option<&PdfDictionary>) -> (f64, String) {
    let Some(desc) = desc else {
        return (400.0, "Normal".to_string());
    };
    let weight = desc.get_f64("FontWeight").unwrap_or_else(|| {
        let flags = desc.get_i64("Flags").unwrap_or(0);
        if descriptor_force_bold(flags) { 700.0 } else { 400.0 }
    });
    let stretch = desc
        .get_name("FontStretch")
        .map(str::to_string)
        .unwrap_or_else(|| "Normal".to_string());
    (weight, stretch)
}

/// Derive `font_flags` from a FontDescriptor dictionary (0 if absent).
fn descriptor_flags(desc: Option<&PdfDictionary>) -> u32 {
    desc.and_then(|d| d.get_i64("Flags")).unwrap_or(0) as u32
}

fn resolved_font_descriptor<P: ObjectProvider>(
    provider: &P,
    dict: &PdfDictionary,
) -> Option<PdfDictionary> {
    dict.get("FontDescriptor")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_dict().cloned())
}

/// `true` if every width in `widths` is identical (used for monospace
/// detection when a font supplies an explicit width array or table).
fn all_equal(widths: impl Iterator<Item = f64>) -> Option<f64> {
    let mut iter = widths;
    let first = iter.next()?;
    if iter.all(|w| (w - first).abs() < f64::EPSILON) {
        Some(first)
    } else {
        None
    }
}

/// Build a simple-font [`WidthTable`] from font metrics, falling back to
/// built-in standard-14 metrics when the font dictionary supplies no
/// /Widths array.
fn build_simple_width_table(
    metrics: &FontMetrics,
    standard: Option<&standard_fonts::StandardFontData>,
) -> WidthTable {
    if !metrics.widths().is_empty() {
        if let Some(w) = all_equal(metrics.widths().iter().copied()) {
            if metrics.missing_width() == w {
                return WidthTable::Monospace(w);
            }
        }
        let mut widths = HashMap::new();
        for (i, &w) in metrics.widths().iter().enumerate() {
            widths.insert(metrics.first_char() + i as u32, w);
        }
        return WidthTable::Sparse {
            widths,
            default_width: metrics.missing_width(),
        };
    }

    if let Some(standard) = standard {
        // Standard-14 fonts have no explicit default width distinct from
        // the table itself, so every width present is the only width that
        // can apply.
        if let Some(w) = all_equal(standard.widths.iter().map(|&w| w as f64)) {
            return WidthTable::Monospace(w);
        }
        let widths = standard
            .widths
            .iter()
            .enumerate()
            .map(|(code, &w)| (code as u32, w as f64))
            .collect();
        return WidthTable::Sparse {
            widths,
            default_width: 0.0,
        };
    }

    WidthTable::Sparse {
        widths: HashMap::new(),
        default_width: metrics.missing_width(),
    }
}

/// Decode a font dictionary into a [`Font`], dispatching on /Subtype to the
/// simple-font or CID-font decoding path.
pub fn decode_font<P: ObjectProvider>(
    provider: &P,
    font_id: FontId,
    font_dict: &PdfDictionary,
) -> Font {
    if cid_font::is_type0_font(font_dict) {
        decode_cid_font(provider, font_id, font_dict)
    } else {
        decode_simple_font(provider, font_id, font_dict)
    }
}

fn base_font_name(font_dict: &PdfDictionary) -> String {
    font_dict
        .get_name("BaseFont")
        .unwrap_or("Unknown")
        .to_string()
}

fn decode_simple_font<P: ObjectProvider>(
    provider: &P,
    font_id: FontId,
    font_dict: &PdfDictionary,
) -> Font {
    let base_font = base_font_name(font_dict);
    let family_name = strip_subset_prefix(&base_font).to_string();

    let metrics = font_metrics::extract_font_metrics(provider, font_dict);
    let standard = standard_fonts::lookup(&family_name);

    let explicit_encoding = resolve_explicit_encoding(provider, font_dict);
    let default_encoding = FontEncoding::from_standard(StandardEncoding::Standard);

    let to_unicode_map: Option<HashMap<u16, String>> = font_dict
        .get("ToUnicode")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_stream().map(|(_, b)| b.to_vec()))
        .and_then(|bytes| CMap::parse(&bytes).ok())
        .map(|cmap| {
            (0u16..=255)
                .filter_map(|code| cmap.lookup(code as u32).map(|s| (code, s.to_string())))
                .collect()
        });

    let space_code = to_unicode_map
        .as_ref()
        .and_then(|m| m.iter().find(|(_, v)| v.as_str() == " ").map(|(&k, _)| k as u8))
        .or_else(|| explicit_encoding.as_ref().and_then(space_code_from_encoding))
        .or_else(|| {
            if default_encoding.decode(b' ') == Some(' ') {
                Some(b' ')
            } else {
                None
            }
        });

    let has_to_unicode = to_unicode_map.is_some();
    let has_font_encoding = explicit_encoding.is_some();

    let mut resolver = EncodingResolver::new(default_encoding);
    if let Some(map) = to_unicode_map {
        resolver = resolver.with_to_unicode(map);
    }
    if let Some(enc) = explicit_encoding {
        resolver = resolver.with_font_encoding(enc);
    }

    let descriptor = resolved_font_descriptor(provider, font_dict);
    let (font_weight, font_stretch) = descriptor_weight_and_stretch(descriptor.as_ref());
    let font_flags = descriptor_flags(descriptor.as_ref());

    let (ascent, descent) = if descriptor.is_some() {
        (metrics.ascent(), metrics.descent())
    } else if let Some(standard) = standard {
        (standard.ascent as f64, standard.descent as f64)
    } else {
        (metrics.ascent(), metrics.descent())
    };

    let widths = build_simple_width_table(&metrics, standard);
    let space_width = widths.width_for(space_code.map(u32::from).unwrap_or(32));

    let description = FontDescription {
        font_id,
        ascent,
        descent,
        space_width,
        family_name,
        font_name: base_font,
        font_stretch,
        font_weight,
        font_flags,
        is_simple_font: true,
        widths,
    };

    Font {
        description,
        simple: Some(SimpleFontData {
            encoding: resolver,
            space_code,
            has_to_unicode,
            has_font_encoding,
        }),
        cid: None,
    }
}

fn decode_cid_font<P: ObjectProvider>(
    provider: &P,
    font_id: FontId,
    font_dict: &PdfDictionary,
) -> Font {
    let base_font = base_font_name(font_dict);
    let family_name = strip_subset_prefix(&base_font).to_string();

    let descendant = cid_font::get_descendant_font(provider, font_dict).unwrap_or_default();
    let metrics = cid_font::extract_cid_font_metrics(provider, &descendant);

    let cid_encoding = match font_dict.get("Encoding").map(|o| resolve(provider, o)) {
        Some(PdfObject::Name(name)) if name == "Identity-H" || name == "Identity-V" => {
            CidEncoding::Identity
        }
        Some(obj) => {
            if let Some((_, bytes)) = obj.as_stream() {
                match CidCMap::parse(bytes) {
                    Ok(cmap) => CidEncoding::Embedded(cmap),
                    Err(_) => CidEncoding::Identity,
                }
            } else {
                // Predefined non-identity CMap name: recognized but not
                // shipped as data, approximate with Identity (the code
                // value stands in for the CID).
                CidEncoding::Identity
            }
        }
        None => CidEncoding::Identity,
    };

    let to_unicode = load_to_unicode(provider, font_dict);
    let space_code = to_unicode.as_ref().and_then(space_code_from_cmap);

    let descriptor = resolved_font_descriptor(provider, &descendant);
    let (font_weight, font_stretch) = descriptor_weight_and_stretch(descriptor.as_ref());
    let font_flags = descriptor_flags(descriptor.as_ref());

    let space_width = space_code
        .map(|c| metrics.get_width(c))
        .unwrap_or_else(|| metrics.default_width());

    let widths = match all_equal(metrics.widths().values().copied()) {
        Some(w) => WidthTable::Monospace(w),
        None => WidthTable::Sparse {
            widths: metrics.widths().clone(),
            default_width: metrics.default_width(),
        },
    };

    let description = FontDescription {
        font_id,
        ascent: metrics.ascent(),
        descent: metrics.descent(),
        space_width,
        family_name,
        font_name: base_font,
        font_stretch,
        font_weight,
        font_flags,
        is_simple_font: false,
        widths,
    };

    Font {
        description,
        simple: None,
        cid: Some(CidFontData {
            cid_encoding,
            to_unicode,
            metrics,
            space_code,
        }),
    }
}
