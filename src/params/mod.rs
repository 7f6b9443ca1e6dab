//! Recursive request parameter values.
//!
//! [`Parameters`] is the pre-encoding representation of request data: a
//! scalar, an ordered sequence, or a mapping. Mappings are stored as a
//! `Vec` of pairs so URL-encoded output is deterministic in the caller's
//! insertion order. The integer/float distinction is preserved through
//! JSON encoding.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A recursive key-value structure representing request data prior to
/// encoding. Built by callers, consumed by one encoding pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameters {
    /// Text scalar.
    Str(String),
    /// Integer scalar, kept distinct from floats through JSON encoding.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// Boolean scalar, form-encoded as `true`/`false`.
    Bool(bool),
    /// Ordered sequence.
    Seq(Vec<Parameters>),
    /// Mapping in insertion order.
    Map(Vec<(String, Parameters)>),
}

impl Parameters {
    /// Build a mapping from `(key, value)` pairs, preserving their order.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Parameters)>,
    {
        Parameters::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build an ordered sequence.
    pub fn seq<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Parameters>,
    {
        Parameters::Seq(items.into_iter().collect())
    }

    /// Whether this value is a scalar (string, number, or bool).
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Parameters::Str(_) | Parameters::Int(_) | Parameters::Float(_) | Parameters::Bool(_)
        )
    }

    /// The form-encoding text of a scalar value. `None` for sequences and
    /// mappings, which only flatten through their keys.
    pub(crate) fn scalar_text(&self) -> Option<String> {
        match self {
            Parameters::Str(s) => Some(s.clone()),
            Parameters::Int(i) => Some(i.to_string()),
            Parameters::Float(f) => Some(f.to_string()),
            Parameters::Bool(b) => Some(b.to_string()),
            Parameters::Seq(_) | Parameters::Map(_) => None,
        }
    }
}

impl Serialize for Parameters {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Parameters::Str(s) => serializer.serialize_str(s),
            Parameters::Int(i) => serializer.serialize_i64(*i),
            Parameters::Float(f) => serializer.serialize_f64(*f),
            Parameters::Bool(b) => serializer.serialize_bool(*b),
            Parameters::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Parameters::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for Parameters {
    fn from(value: &str) -> Self {
        Parameters::Str(value.to_owned())
    }
}

impl From<String> for Parameters {
    fn from(value: String) -> Self {
        Parameters::Str(value)
    }
}

impl From<i64> for Parameters {
    fn from(value: i64) -> Self {
        Parameters::Int(value)
    }
}

impl From<i32> for Parameters {
    fn from(value: i32) -> Self {
        Parameters::Int(i64::from(value))
    }
}

impl From<u32> for Parameters {
    fn from(value: u32) -> Self {
        Parameters::Int(i64::from(value))
    }
}

impl From<f64> for Parameters {
    fn from(value: f64) -> Self {
        Parameters::Float(value)
    }
}

impl From<bool> for Parameters {
    fn from(value: bool) -> Self {
        Parameters::Bool(value)
    }
}

impl From<Vec<Parameters>> for Parameters {
    fn from(value: Vec<Parameters>) -> Self {
        Parameters::Seq(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_integer_and_float_apart() {
        let int = serde_json::to_string(&Parameters::Int(1)).unwrap();
        let float = serde_json::to_string(&Parameters::Float(1.0)).unwrap();
        assert_eq!(int, "1");
        assert_eq!(float, "1.0");
    }

    #[test]
    fn json_round_trips_nested_structure() {
        let params = Parameters::map([
            ("foo", Parameters::seq([1.into(), 2.into(), 3.into()])),
            ("bar", Parameters::map([("baz", "qux".into())])),
        ]);
        let text = serde_json::to_string(&params).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"foo": [1, 2, 3], "bar": {"baz": "qux"}})
        );
    }

    #[test]
    fn map_serializes_in_insertion_order() {
        let params = Parameters::map([
            ("z", Parameters::from(1)),
            ("a", Parameters::from(2)),
        ]);
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn scalar_text_covers_all_scalars() {
        assert_eq!(Parameters::from("x").scalar_text().as_deref(), Some("x"));
        assert_eq!(Parameters::from(7).scalar_text().as_deref(), Some("7"));
        assert_eq!(Parameters::from(true).scalar_text().as_deref(), Some("true"));
        assert_eq!(Parameters::seq([]).scalar_text(), None);
    }
}
