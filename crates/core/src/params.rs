//! Lenient typed access to a JSON params object.
//!
//! Scalar lookups never fail: a missing key or a value of the wrong JSON type
//! yields the caller's default, so a control surface can send partial
//! updates. Structured values go through [`ParamReader::parse`], which does
//! fail when a key is present but malformed.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FlowError;

/// Borrowed view over a params object.
#[derive(Debug, Clone, Copy)]
pub struct ParamReader<'a> {
    params: &'a Value,
}

impl<'a> ParamReader<'a> {
    pub fn new(params: &'a Value) -> Self {
        Self { params }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.params.get(name).filter(|v| !v.is_null())
    }

    /// Any JSON number, integers included.
    pub fn f64(&self, name: &str, default: f64) -> f64 {
        self.get(name).and_then(Value::as_f64).unwrap_or(default)
    }

    /// Non-negative integers only; floats and negatives fall back.
    pub fn usize(&self, name: &str, default: usize) -> usize {
        self.get(name)
            .and_then(Value::as_u64)
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(default)
    }

    pub fn bool(&self, name: &str, default: bool) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Deserializes `params[name]` into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent or null, and
    /// `FlowError::InvalidConfig` when it is present but does not fit `T`.
    pub fn parse<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, FlowError> {
        self.get(name)
            .map(|v| {
                serde_json::from_value(v.clone())
                    .map_err(|e| FlowError::invalid(name, format!("malformed value: {e}")))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn f64_accepts_integers_and_floats() {
        let params = json!({"a": 2.5, "b": 10});
        let r = ParamReader::new(&params);
        assert!((r.f64("a", 0.0) - 2.5).abs() < f64::EPSILON);
        assert!((r.f64("b", 0.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn f64_falls_back_on_missing_wrong_type_or_null() {
        let params = json!({"s": "fast", "n": null});
        let r = ParamReader::new(&params);
        assert_eq!(r.f64("missing", 3.0), 3.0);
        assert_eq!(r.f64("s", 1.0), 1.0);
        assert_eq!(r.f64("n", 5.0), 5.0);
    }

    #[test]
    fn non_object_params_always_default() {
        let params = json!("not an object");
        let r = ParamReader::new(&params);
        assert_eq!(r.f64("x", 7.0), 7.0);
        assert_eq!(r.usize("x", 7), 7);
        assert!(r.str("x").is_none());
    }

    #[test]
    fn usize_rejects_floats_and_negatives() {
        let params = json!({"ok": 42, "float": 2.5, "neg": -1});
        let r = ParamReader::new(&params);
        assert_eq!(r.usize("ok", 0), 42);
        assert_eq!(r.usize("float", 99), 99);
        assert_eq!(r.usize("neg", 5), 5);
    }

    #[test]
    fn bool_extracts_or_defaults() {
        let params = json!({"t": true, "n": 1});
        let r = ParamReader::new(&params);
        assert!(r.bool("t", false));
        assert!(!r.bool("n", false));
        assert!(r.bool("missing", true));
    }

    #[test]
    fn str_extracts_strings_only() {
        let params = json!({"name": "perlin", "num": 4});
        let r = ParamReader::new(&params);
        assert_eq!(r.str("name"), Some("perlin"));
        assert_eq!(r.str("num"), None);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        a: f64,
        b: f64,
    }

    #[test]
    fn parse_absent_is_none() {
        let params = json!({});
        let r = ParamReader::new(&params);
        assert_eq!(r.parse::<Pair>("pair").unwrap(), None);
    }

    #[test]
    fn parse_well_formed_value() {
        let params = json!({"pair": {"a": 1.0, "b": 2.0}});
        let r = ParamReader::new(&params);
        assert_eq!(r.parse::<Pair>("pair").unwrap(), Some(Pair { a: 1.0, b: 2.0 }));
    }

    #[test]
    fn parse_malformed_value_is_invalid_config() {
        let params = json!({"pair": {"a": "one"}});
        let r = ParamReader::new(&params);
        let err = r.parse::<Pair>("pair").unwrap_err();
        assert!(matches!(err, FlowError::InvalidConfig { ref name, .. } if name == "pair"));
    }
}
