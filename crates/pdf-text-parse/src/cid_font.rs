//! CID font support for CJK text extraction.
//!
//! Handles Type0 (composite) fonts with CIDFontType0 and CIDFontType2
//! descendant fonts. Provides CID-to-GID mapping, /W (width) array parsing,
//! and /DW (default width) handling for CID fonts.

use std::collections::HashMap;

use pdf_text_core::PdfDictionary;

use crate::provider::{ObjectProvider, resolve};

/// Default CID font width when /DW is not specified (1000/1000 of text space = full em width).
const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// Default ascent for CID fonts when not specified.
const DEFAULT_CID_ASCENT: f64 = 880.0;

/// Default descent for CID fonts when not specified.
const DEFAULT_CID_DESCENT: f64 = -120.0;

/// CID font subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CidFontType {
    /// CIDFontType0: CID-keyed font based on Type 1 outlines.
    Type0,
    /// CIDFontType2: CID-keyed font based on TrueType outlines.
    Type2,
}

/// CID-to-GID (glyph ID) mapping strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum CidToGidMap {
    /// Identity mapping: CID equals GID directly.
    Identity,
    /// Explicit mapping: byte array where GID for CID `n` is at bytes `2n` and `2n+1`
    /// (big-endian u16).
    Explicit(Vec<u16>),
}

impl CidToGidMap {
    /// Map a CID to a GID.
    pub fn map(&self, cid: u32) -> u32 {
        match self {
            CidToGidMap::Identity => cid,
            CidToGidMap::Explicit(table) => {
                if (cid as usize) < table.len() {
                    u32::from(table[cid as usize])
                } else {
                    cid
                }
            }
        }
    }

    /// Parse a CIDToGIDMap from raw stream bytes (big-endian u16 pairs).
    pub fn from_stream(data: &[u8]) -> Self {
        let mut table = Vec::with_capacity(data.len() / 2);
        for chunk in data.chunks(2) {
            if chunk.len() == 2 {
                table.push(u16::from_be_bytes([chunk[0], chunk[1]]));
            }
        }
        CidToGidMap::Explicit(table)
    }
}

/// CID system information from the /CIDSystemInfo dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct CidSystemInfo {
    /// Registry (e.g., "Adobe").
    pub registry: String,
    /// Ordering (e.g., "Japan1", "GB1", "CNS1", "Korea1").
    pub ordering: String,
    /// Supplement number.
    pub supplement: i64,
}

impl CidSystemInfo {
    /// Check if this is an Adobe CJK system.
    pub fn is_adobe_cjk(&self) -> bool {
        self.registry == "Adobe"
            && matches!(self.ordering.as_str(), "Japan1" | "GB1" | "CNS1" | "Korea1")
    }
}

/// Font metrics for a CID font, handling the /W array and /DW default width.
///
/// CID fonts use a different width specification than simple fonts:
/// - /DW: default width for all CIDs (default 1000)
/// - /W: array of width overrides in the format:
///   `[CID [w1 w2 ...] CIDstart CIDend w ...]`
#[derive(Debug, Clone)]
pub struct CidFontMetrics {
    /// Per-CID width overrides (from /W array).
    widths: HashMap<u32, f64>,
    /// Default width for CIDs not in the widths map (from /DW).
    default_width: f64,
    /// Font ascent in glyph space units.
    ascent: f64,
    /// Font descent in glyph space units.
    descent: f64,
    /// Font bounding box.
    font_bbox: Option<[f64; 4]>,
    /// CID font subtype.
    font_type: CidFontType,
    /// CID-to-GID mapping.
    cid_to_gid: CidToGidMap,
    /// CID system information.
    system_info: Option<CidSystemInfo>,
}

impl CidFontMetrics {
    /// Create CidFontMetrics from parsed values.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        widths: HashMap<u32, f64>,
        default_width: f64,
        ascent: f64,
        descent: f64,
        font_bbox: Option<[f64; 4]>,
        font_type: CidFontType,
        cid_to_gid: CidToGidMap,
        system_info: Option<CidSystemInfo>,
    ) -> Self {
        Self {
            widths,
            default_width,
            ascent,
            descent,
            font_bbox,
            font_type,
            cid_to_gid,
            system_info,
        }
    }

    /// Create default CidFontMetrics.
    pub fn default_metrics() -> Self {
        Self {
            widths: HashMap::new(),
            default_width: DEFAULT_CID_WIDTH,
            ascent: DEFAULT_CID_ASCENT,
            descent: DEFAULT_CID_DESCENT,
            font_bbox: None,
            font_type: CidFontType::Type2,
            cid_to_gid: CidToGidMap::Identity,
            system_info: None,
        }
    }

    /// Get the width for a CID in glyph space (1/1000 of text space).
    pub fn get_width(&self, cid: u32) -> f64 {
        self.widths.get(&cid).copied().unwrap_or(self.default_width)
    }

    /// Font ascent in glyph space units.
    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    /// Font descent in glyph space units.
    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Font bounding box.
    pub fn font_bbox(&self) -> Option<[f64; 4]> {
        self.font_bbox
    }

    /// Default width for CIDs not in the width overrides.
    pub fn default_width(&self) -> f64 {
        self.default_width
    }

    /// All per-CID width overrides, for monospace-detection purposes.
    pub fn widths(&self) -> &HashMap<u32, f64> {
        &self.widths
    }

    /// CID font subtype.
    pub fn font_type(&self) -> CidFontType {
        self.font_type
    }

    /// CID-to-GID mapping.
    pub fn cid_to_gid(&self) -> &CidToGidMap {
        &self.cid_to_gid
    }

    /// Map a CID to a GID.
    pub fn map_cid_to_gid(&self, cid: u32) -> u32 {
        self.cid_to_gid.map(cid)
    }

    /// CID system information.
    pub fn system_info(&self) -> Option<&CidSystemInfo> {
        self.system_info.as_ref()
    }
}

/// Parse a /W (width) array from a CID font dictionary.
///
/// The /W array has the format:
/// ```text
/// [ c [w1 w2 ...] c_first c_last w ... ]
/// ```
/// Where:
/// - `c [w1 w2 ...]` assigns widths w1, w2, ... to CIDs c, c+1, c+2, ...
/// - `c_first c_last w` assigns width w to all CIDs from c_first to c_last
pub fn parse_w_array<P: ObjectProvider>(
    provider: &P,
    objects: &[pdf_text_core::PdfObject],
) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;

    while i < objects.len() {
        let cid_start = match resolve(provider, &objects[i]).as_i64() {
            Some(v) => v as u32,
            None => {
                i += 1;
                continue;
            }
        };
        i += 1;

        if i >= objects.len() {
            break;
        }

        let next = resolve(provider, &objects[i]);
        if let Some(arr) = next.as_array() {
            // Format: CID [w1 w2 w3 ...]
            for (j, obj) in arr.iter().enumerate() {
                let obj = resolve(provider, obj);
                if let Some(w) = obj.as_f64() {
                    widths.insert(cid_start + j as u32, w);
                }
            }
            i += 1;
        } else if let Some(cid_end) = next.as_i64() {
            // Format: CID_start CID_end w
            i += 1;
            if i < objects.len() {
                let w_obj = resolve(provider, &objects[i]);
                if let Some(w) = w_obj.as_f64() {
                    for cid in cid_start..=(cid_end as u32) {
                        widths.insert(cid, w);
                    }
                }
                i += 1;
            }
        } else {
            i += 1;
        }
    }

    widths
}

/// Extract CID font metrics from a CIDFont dictionary (descendant of Type0).
pub fn extract_cid_font_metrics<P: ObjectProvider>(
    provider: &P,
    cid_font_dict: &PdfDictionary,
) -> CidFontMetrics {
    let font_type = cid_font_dict
        .get_name("Subtype")
        .map(|s| match s {
            "CIDFontType0" => CidFontType::Type0,
            _ => CidFontType::Type2,
        })
        .unwrap_or(CidFontType::Type2);

    let default_width = cid_font_dict
        .get("DW")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_f64())
        .unwrap_or(DEFAULT_CID_WIDTH);

    let widths = cid_font_dict
        .get("W")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_array().map(|a| a.to_vec()))
        .map(|arr| parse_w_array(provider, &arr))
        .unwrap_or_default();

    let cid_to_gid = parse_cid_to_gid_map(provider, cid_font_dict);
    let system_info = parse_cid_system_info(provider, cid_font_dict);
    let (ascent, descent, font_bbox) = parse_cid_font_descriptor(provider, cid_font_dict);

    CidFontMetrics::new(
        widths,
        default_width,
        ascent,
        descent,
        font_bbox,
        font_type,
        cid_to_gid,
        system_info,
    )
}

/// Parse the /CIDToGIDMap entry from a CIDFont dictionary.
fn parse_cid_to_gid_map<P: ObjectProvider>(provider: &P, dict: &PdfDictionary) -> CidToGidMap {
    let Some(obj) = dict.get("CIDToGIDMap") else {
        return CidToGidMap::Identity;
    };
    let obj = resolve(provider, obj);
    if obj.as_name() == Some("Identity") {
        return CidToGidMap::Identity;
    }
    if let Some((_, bytes)) = obj.as_stream() {
        return CidToGidMap::from_stream(bytes);
    }
    CidToGidMap::Identity
}

/// Parse /CIDSystemInfo from a CIDFont dictionary.
fn parse_cid_system_info<P: ObjectProvider>(
    provider: &P,
    dict: &PdfDictionary,
) -> Option<CidSystemInfo> {
    let info_obj = resolve(provider, dict.get("CIDSystemInfo")?);
    let info_dict = info_obj.as_dict()?;

    let registry = info_dict
        .get("Registry")
        .and_then(|o| o.as_string_bytes())
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default();

    let ordering = info_dict
        .get("Ordering")
        .and_then(|o| o.as_string_bytes())
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default();

    let supplement = info_dict.get_i64("Supplement").unwrap_or(0);

    Some(CidSystemInfo {
        registry,
        ordering,
        supplement,
    })
}

/// Parse /FontDescriptor from a CIDFont dictionary for ascent, descent, bbox.
fn parse_cid_font_descriptor<P: ObjectProvider>(
    provider: &P,
    dict: &PdfDictionary,
) -> (f64, f64, Option<[f64; 4]>) {
    let Some(desc_obj) = dict.get("FontDescriptor").map(|o| resolve(provider, o)) else {
        return (DEFAULT_CID_ASCENT, DEFAULT_CID_DESCENT, None);
    };
    let Some(desc) = desc_obj.as_dict() else {
        return (DEFAULT_CID_ASCENT, DEFAULT_CID_DESCENT, None);
    };

    let ascent = desc.get_f64("Ascent").unwrap_or(DEFAULT_CID_ASCENT);
    let descent = desc.get_f64("Descent").unwrap_or(DEFAULT_CID_DESCENT);

    let font_bbox = desc
        .get("FontBBox")
        .map(|o| resolve(provider, o))
        .and_then(|o| o.as_array().map(|a| a.to_vec()))
        .and_then(|arr| {
            if arr.len() == 4 {
                let vals: Vec<f64> = arr.iter().filter_map(|o| o.as_f64()).collect();
                if vals.len() == 4 {
                    Some([vals[0], vals[1], vals[2], vals[3]])
                } else {
                    None
                }
            } else {
                None
            }
        });

    (ascent, descent, font_bbox)
}

/// Information about a predefined CMap encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct PredefinedCMapInfo {
    /// The full CMap name (e.g., "Adobe-Japan1-6").
    pub name: String,
    /// Registry (e.g., "Adobe").
    pub registry: String,
    /// Ordering (e.g., "Japan1").
    pub ordering: String,
    /// Writing mode: 0 = horizontal, 1 = vertical.
    pub writing_mode: u8,
    /// Whether this is an Identity CMap.
    pub is_identity: bool,
}

/// Parse a predefined CMap name and extract its information.
///
/// Recognizes standard Adobe CJK CMap names:
/// - `Identity-H` / `Identity-V`
/// - `Adobe-Japan1-*` (with `-H` or `-V` suffix for writing mode)
/// - `Adobe-GB1-*`
/// - `Adobe-CNS1-*`
/// - `Adobe-Korea1-*`
/// - Standard encoding names like `UniJIS-UTF16-H`, `UniGB-UTF16-H`, etc.
pub fn parse_predefined_cmap_name(name: &str) -> Option<PredefinedCMapInfo> {
    if name == "Identity-H" {
        return Some(PredefinedCMapInfo {
            name: name.to_string(),
            registry: "Adobe".to_string(),
            ordering: "Identity".to_string(),
            writing_mode: 0,
            is_identity: true,
        });
    }
    if name == "Identity-V" {
        return Some(PredefinedCMapInfo {
            name: name.to_string(),
            registry: "Adobe".to_string(),
            ordering: "Identity".to_string(),
            writing_mode: 1,
            is_identity: true,
        });
    }

    if let Some(rest) = name.strip_prefix("Adobe-") {
        let (ordering, supplement) = if let Some(r) = rest.strip_prefix("Japan1-") {
            ("Japan1".to_string(), r)
        } else if let Some(r) = rest.strip_prefix("GB1-") {
            ("GB1".to_string(), r)
        } else if let Some(r) = rest.strip_prefix("CNS1-") {
            ("CNS1".to_string(), r)
        } else if let Some(r) = rest.strip_prefix("Korea1-") {
            ("Korea1".to_string(), r)
        } else {
            return None;
        };

        if supplement.parse::<i32>().is_ok() {
            return Some(PredefinedCMapInfo {
                name: name.to_string(),
                registry: "Adobe".to_string(),
                ordering,
                writing_mode: 0,
                is_identity: false,
            });
        }
    }

    let (base, writing_mode) = if let Some(b) = name.strip_suffix("-H") {
        (b, 0u8)
    } else if let Some(b) = name.strip_suffix("-V") {
        (b, 1u8)
    } else {
        return None;
    };

    let ordering = if base.contains("JIS")
        || base.contains("Japan")
        || base.contains("EUC-JP")
        || base == "78-RKSJ"
        || base == "83pv-RKSJ"
        || base == "90pv-RKSJ"
        || base == "90ms-RKSJ"
        || base == "Hankaku"
        || base == "Hiragana"
        || base == "Katakana"
        || base == "Roman"
        || base == "WP-Symbol"
        || base == "Add-RKSJ"
        || base == "Ext-RKSJ"
    {
        "Japan1"
    } else if base.contains("GB")
        || base.contains("GBK")
        || base.contains("GBpc")
        || base.contains("GBT")
        || base == "UniCNS-UCS2"
    {
        if base.starts_with("UniCNS") {
            "CNS1"
        } else {
            "GB1"
        }
    } else if base.contains("CNS") || base.contains("ETen") || base.contains("HKscs") {
        "CNS1"
    } else if base.contains("KSC") || base.contains("KSCms") || base.contains("UniKS") {
        "Korea1"
    } else {
        return None;
    };

    Some(PredefinedCMapInfo {
        name: name.to_string(),
        registry: "Adobe".to_string(),
        ordering: ordering.to_string(),
        writing_mode,
        is_identity: false,
    })
}

/// Detect whether a font dictionary represents a Type0 (composite/CID) font.
pub fn is_type0_font(font_dict: &PdfDictionary) -> bool {
    font_dict.get_name("Subtype") == Some("Type0")
}

/// Extract the descendant CIDFont dictionary from a Type0 font.
pub fn get_descendant_font<P: ObjectProvider>(
    provider: &P,
    type0_dict: &PdfDictionary,
) -> Option<PdfDictionary> {
    let descendants = resolve(provider, type0_dict.get("DescendantFonts")?);
    let arr = descendants.as_array()?;
    let first = resolve(provider, arr.first()?);
    first.as_dict().cloned()
}

/// Get the encoding name from a Type0 font dictionary.
pub fn get_type0_encoding(font_dict: &PdfDictionary) -> Option<String> {
    font_dict.get_name("Encoding").map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockProvider;
    use pdf_text_core::{ObjectId, PdfObject};

    // ========== CidToGidMap tests ==========

    #[test]
    fn identity_map_returns_same_cid() {
        let map = CidToGidMap::Identity;
        assert_eq!(map.map(0), 0);
        assert_eq!(map.map(100), 100);
        assert_eq!(map.map(65535), 65535);
    }

    #[test]
    fn explicit_map_looks_up_table() {
        let table = vec![10, 20, 30, 40, 50];
        let map = CidToGidMap::Explicit(table);
        assert_eq!(map.map(0), 10);
        assert_eq!(map.map(1), 20);
        assert_eq!(map.map(4), 50);
    }

    #[test]
    fn explicit_map_out_of_range_returns_cid() {
        let table = vec![10, 20, 30];
        let map = CidToGidMap::Explicit(table);
        assert_eq!(map.map(5), 5);
    }

    #[test]
    fn from_stream_parses_big_endian_u16() {
        let data = vec![0x00, 0x05, 0x00, 0x0A];
        let map = CidToGidMap::from_stream(&data);
        assert_eq!(map.map(0), 5);
        assert_eq!(map.map(1), 10);
    }

    #[test]
    fn from_stream_handles_odd_length() {
        let data = vec![0x00, 0x05, 0x00];
        let map = CidToGidMap::from_stream(&data);
        assert_eq!(map.map(0), 5);
        assert_eq!(map.map(1), 1);
    }

    #[test]
    fn from_stream_empty() {
        let map = CidToGidMap::from_stream(&[]);
        assert_eq!(map.map(0), 0);
    }

    // ========== CidSystemInfo tests ==========

    #[test]
    fn cid_system_info_adobe_cjk_variants() {
        for ordering in ["Japan1", "GB1", "CNS1", "Korea1"] {
            let info = CidSystemInfo {
                registry: "Adobe".to_string(),
                ordering: ordering.to_string(),
                supplement: 1,
            };
            assert!(info.is_adobe_cjk());
        }
    }

    #[test]
    fn cid_system_info_non_adobe_not_cjk() {
        let info = CidSystemInfo {
            registry: "Custom".to_string(),
            ordering: "Japan1".to_string(),
            supplement: 0,
        };
        assert!(!info.is_adobe_cjk());
    }

    // ========== CidFontMetrics tests ==========

    #[test]
    fn default_metrics_values() {
        let metrics = CidFontMetrics::default_metrics();
        assert_eq!(metrics.default_width(), DEFAULT_CID_WIDTH);
        assert_eq!(metrics.ascent(), DEFAULT_CID_ASCENT);
        assert_eq!(metrics.descent(), DEFAULT_CID_DESCENT);
        assert_eq!(metrics.get_width(42), DEFAULT_CID_WIDTH);
    }

    #[test]
    fn get_width_uses_override_then_default() {
        let mut widths = HashMap::new();
        widths.insert(5u32, 750.0);
        let metrics = CidFontMetrics::new(
            widths,
            500.0,
            880.0,
            -120.0,
            None,
            CidFontType::Type2,
            CidToGidMap::Identity,
            None,
        );
        assert_eq!(metrics.get_width(5), 750.0);
        assert_eq!(metrics.get_width(6), 500.0);
    }

    // ========== parse_w_array tests ==========

    #[test]
    fn parse_w_array_per_code_form() {
        let provider = MockProvider::new();
        let objects = vec![
            PdfObject::Integer(10),
            PdfObject::Array(vec![
                PdfObject::Integer(500),
                PdfObject::Integer(600),
                PdfObject::Integer(700),
            ]),
        ];
        let widths = parse_w_array(&provider, &objects);
        assert_eq!(widths.get(&10), Some(&500.0));
        assert_eq!(widths.get(&11), Some(&600.0));
        assert_eq!(widths.get(&12), Some(&700.0));
    }

    #[test]
    fn parse_w_array_range_form() {
        let provider = MockProvider::new();
        let objects = vec![
            PdfObject::Integer(20),
            PdfObject::Integer(25),
            PdfObject::Integer(1000),
        ];
        let widths = parse_w_array(&provider, &objects);
        for cid in 20..=25 {
            assert_eq!(widths.get(&cid), Some(&1000.0));
        }
    }

    #[test]
    fn parse_w_array_resolves_indirect_entries() {
        let id = ObjectId::new(9, 0);
        let provider = MockProvider::new().with_object(id, PdfObject::Integer(42));
        let objects = vec![
            PdfObject::Reference(id),
            PdfObject::Integer(42),
            PdfObject::Integer(900),
        ];
        let widths = parse_w_array(&provider, &objects);
        assert_eq!(widths.get(&42), Some(&900.0));
    }

    // ========== extract_cid_font_metrics tests ==========

    fn dict_with(entries: Vec<(&str, PdfObject)>) -> PdfDictionary {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn extract_metrics_with_dw_and_w() {
        let provider = MockProvider::new();
        let dict = dict_with(vec![
            ("Subtype", PdfObject::Name("CIDFontType2".into())),
            ("DW", PdfObject::Integer(1000)),
            (
                "W",
                PdfObject::Array(vec![
                    PdfObject::Integer(3),
                    PdfObject::Array(vec![PdfObject::Integer(250)]),
                ]),
            ),
        ]);
        let metrics = extract_cid_font_metrics(&provider, &dict);
        assert_eq!(metrics.get_width(3), 250.0);
        assert_eq!(metrics.get_width(4), 1000.0);
        assert_eq!(metrics.font_type(), CidFontType::Type2);
    }

    #[test]
    fn extract_metrics_without_descriptor_uses_defaults() {
        let provider = MockProvider::new();
        let dict = dict_with(vec![("Subtype", PdfObject::Name("CIDFontType0".into()))]);
        let metrics = extract_cid_font_metrics(&provider, &dict);
        assert_eq!(metrics.ascent(), DEFAULT_CID_ASCENT);
        assert_eq!(metrics.descent(), DEFAULT_CID_DESCENT);
        assert_eq!(metrics.font_type(), CidFontType::Type0);
    }

    #[test]
    fn extract_metrics_cid_to_gid_identity_by_default() {
        let provider = MockProvider::new();
        let dict = dict_with(vec![]);
        let metrics = extract_cid_font_metrics(&provider, &dict);
        assert_eq!(metrics.cid_to_gid(), &CidToGidMap::Identity);
    }

    #[test]
    fn extract_metrics_cid_to_gid_from_stream() {
        let stream_dict = PdfDictionary::new();
        let stream = PdfObject::Stream(stream_dict, vec![0x00, 0x02, 0x00, 0x03]);
        let stream_id = ObjectId::new(11, 0);
        let provider = MockProvider::new().with_object(stream_id, stream);
        let dict = dict_with(vec![("CIDToGIDMap", PdfObject::Reference(stream_id))]);
        let metrics = extract_cid_font_metrics(&provider, &dict);
        assert_eq!(metrics.map_cid_to_gid(0), 2);
        assert_eq!(metrics.map_cid_to_gid(1), 3);
    }

    #[test]
    fn extract_metrics_cid_system_info() {
        let provider = MockProvider::new();
        let info_dict = dict_with(vec![
            ("Registry", PdfObject::String(b"Adobe".to_vec())),
            ("Ordering", PdfObject::String(b"Japan1".to_vec())),
            ("Supplement", PdfObject::Integer(6)),
        ]);
        let dict = dict_with(vec![(
            "CIDSystemInfo",
            PdfObject::Dictionary(info_dict),
        )]);
        let metrics = extract_cid_font_metrics(&provider, &dict);
        let info = metrics.system_info().unwrap();
        assert_eq!(info.registry, "Adobe");
        assert_eq!(info.ordering, "Japan1");
        assert!(info.is_adobe_cjk());
    }

    // ========== predefined CMap name tests ==========

    #[test]
    fn parse_identity_h_and_v() {
        let h = parse_predefined_cmap_name("Identity-H").unwrap();
        assert!(h.is_identity);
        assert_eq!(h.writing_mode, 0);
        let v = parse_predefined_cmap_name("Identity-V").unwrap();
        assert_eq!(v.writing_mode, 1);
    }

    #[test]
    fn parse_adobe_japan1_supplement() {
        let info = parse_predefined_cmap_name("Adobe-Japan1-6").unwrap();
        assert_eq!(info.ordering, "Japan1");
        assert!(!info.is_identity);
    }

    #[test]
    fn parse_unijis_utf16_h() {
        let info = parse_predefined_cmap_name("UniJIS-UTF16-H").unwrap();
        assert_eq!(info.ordering, "Japan1");
        assert_eq!(info.writing_mode, 0);
    }

    #[test]
    fn parse_unigb_utf16_h() {
        let info = parse_predefined_cmap_name("UniGB-UTF16-H").unwrap();
        assert_eq!(info.ordering, "GB1");
    }

    #[test]
    fn parse_unicns_ucs2_h() {
        let info = parse_predefined_cmap_name("UniCNS-UCS2-H").unwrap();
        assert_eq!(info.ordering, "CNS1");
    }

    #[test]
    fn parse_uniks_utf16_h() {
        let info = parse_predefined_cmap_name("UniKS-UTF16-H").unwrap();
        assert_eq!(info.ordering, "Korea1");
    }

    #[test]
    fn parse_unknown_cmap_name_returns_none() {
        assert_eq!(parse_predefined_cmap_name("NotARealCMap"), None);
    }

    // ========== Type0 helpers ==========

    #[test]
    fn is_type0_font_detects_subtype() {
        let dict = dict_with(vec![("Subtype", PdfObject::Name("Type0".into()))]);
        assert!(is_type0_font(&dict));
        let other = dict_with(vec![("Subtype", PdfObject::Name("Type1".into()))]);
        assert!(!is_type0_font(&other));
    }

    #[test]
    fn get_descendant_font_resolves_first_array_entry() {
        let provider = MockProvider::new();
        let descendant = dict_with(vec![("Subtype", PdfObject::Name("CIDFontType2".into()))]);
        let type0 = dict_with(vec![(
            "DescendantFonts",
            PdfObject::Array(vec![PdfObject::Dictionary(descendant)]),
        )]);
        let resolved = get_descendant_font(&provider, &type0).unwrap();
        assert_eq!(resolved.get_name("Subtype"), Some("CIDFontType2"));
    }

    #[test]
    fn get_type0_encoding_reads_name() {
        let dict = dict_with(vec![("Encoding", PdfObject::Name("Identity-H".into()))]);
        assert_eq!(get_type0_encoding(&dict).as_deref(), Some("Identity-H"));
    }
}
