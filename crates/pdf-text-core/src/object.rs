//! Backend-independent PDF object model.
//!
//! Mirrors the shape of a low-level PDF object model (as in `lopdf::Object`)
//! without depending on one: the content-stream interpreter, font decoder,
//! and collector are written against [`PdfObject`]/[`PdfDictionary`] and the
//! `ObjectProvider` trait (defined in `pdf-text-parse`), never against a
//! concrete PDF library directly.

use std::collections::HashMap;

/// Identity of an indirect object: `(object number, generation)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32, pub u16);

impl ObjectId {
    pub fn new(number: u32, generation: u16) -> Self {
        Self(number, generation)
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u16 {
        self.1
    }
}

/// A PDF object value, resolved or not.
///
/// `Stream` carries its dictionary and raw (already filter-decoded) bytes;
/// the Object Provider is responsible for filter decoding before handing a
/// stream's bytes to the core (see `ObjectProvider::stream_contents`).
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(Vec<u8>),
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    Stream(PdfDictionary, Vec<u8>),
    Reference(ObjectId),
}

impl PdfObject {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PdfObject::Integer(i) => Some(*i),
            PdfObject::Real(r) => Some(*r as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PdfObject::Integer(i) => Some(*i as f64),
            PdfObject::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PdfObject::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            PdfObject::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_string_bytes(&self) -> Option<&[u8]> {
        match self {
            PdfObject::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PdfObject]> {
        match self {
            PdfObject::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&PdfDictionary> {
        match self {
            PdfObject::Dictionary(d) => Some(d),
            PdfObject::Stream(d, _) => Some(d),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<(&PdfDictionary, &[u8])> {
        match self {
            PdfObject::Stream(d, bytes) => Some((d, bytes)),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjectId> {
        match self {
            PdfObject::Reference(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PdfObject::Null)
    }
}

/// A name-indexed PDF dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: HashMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PdfObject) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(PdfObject::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PdfObject::as_f64)
    }

    pub fn get_name(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PdfObject::as_name)
    }

    pub fn get_array(&self, key: &str) -> Option<&[PdfObject]> {
        self.get(key).and_then(PdfObject::as_array)
    }

    pub fn get_dict(&self, key: &str) -> Option<&PdfDictionary> {
        self.get(key).and_then(PdfObject::as_dict)
    }

    pub fn get_reference(&self, key: &str) -> Option<ObjectId> {
        self.get(key).and_then(PdfObject::as_reference)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PdfObject)> {
        self.entries.iter()
    }
}

impl FromIterator<(String, PdfObject)> for PdfDictionary {
    fn from_iter<T: IntoIterator<Item = (String, PdfObject)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_accessors() {
        let id = ObjectId::new(5, 1);
        assert_eq!(id.number(), 5);
        assert_eq!(id.generation(), 1);
    }

    #[test]
    fn as_i64_from_integer_and_real() {
        assert_eq!(PdfObject::Integer(7).as_i64(), Some(7));
        assert_eq!(PdfObject::Real(7.9).as_i64(), Some(7));
        assert_eq!(PdfObject::Null.as_i64(), None);
    }

    #[test]
    fn as_f64_from_integer_and_real() {
        assert_eq!(PdfObject::Integer(3).as_f64(), Some(3.0));
        assert_eq!(PdfObject::Real(3.5).as_f64(), Some(3.5));
    }

    #[test]
    fn as_name_and_string_bytes() {
        assert_eq!(PdfObject::Name("F1".into()).as_name(), Some("F1"));
        assert_eq!(
            PdfObject::String(b"hello".to_vec()).as_string_bytes(),
            Some(&b"hello"[..])
        );
    }

    #[test]
    fn as_dict_works_for_stream_too() {
        let mut dict = PdfDictionary::new();
        dict.insert("Length", PdfObject::Integer(4));
        let stream = PdfObject::Stream(dict.clone(), b"data".to_vec());
        assert_eq!(stream.as_dict(), Some(&dict));
        assert_eq!(stream.as_stream(), Some((&dict, &b"data"[..])));
    }

    #[test]
    fn dictionary_get_helpers() {
        let mut dict = PdfDictionary::new();
        dict.insert("Count", PdfObject::Integer(3));
        dict.insert("Name", PdfObject::Name("Helvetica".into()));
        dict.insert(
            "Kids",
            PdfObject::Array(vec![PdfObject::Integer(1), PdfObject::Integer(2)]),
        );
        dict.insert("Parent", PdfObject::Reference(ObjectId::new(9, 0)));

        assert_eq!(dict.get_i64("Count"), Some(3));
        assert_eq!(dict.get_name("Name"), Some("Helvetica"));
        assert_eq!(dict.get_array("Kids").map(|a| a.len()), Some(2));
        assert_eq!(dict.get_reference("Parent"), Some(ObjectId::new(9, 0)));
        assert!(dict.contains_key("Count"));
        assert!(!dict.contains_key("Missing"));
    }

    #[test]
    fn dictionary_from_iterator() {
        let dict: PdfDictionary = vec![
            ("A".to_string(), PdfObject::Integer(1)),
            ("B".to_string(), PdfObject::Boolean(true)),
        ]
        .into_iter()
        .collect();
        assert_eq!(dict.get_i64("A"), Some(1));
        assert_eq!(dict.get("B").and_then(PdfObject::as_bool), Some(true));
    }
}
