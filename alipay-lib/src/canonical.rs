//! Parameter sets and their canonical signing form.
//!
//! The gateway signs and verifies a plain-text rendering of the request or
//! notification fields:
//!
//! ```text
//! app_id=2014072300007148&biz_content={"foo":"bar"}&method=alipay.trade.pay
//! ```
//!
//! Keys are sorted byte-wise, every non-empty value is emitted as
//! `key=value` in its original order, and nothing is percent-encoded.
//! Empty values are dropped one at a time, so a key whose values are
//! `["", "x"]` still contributes `key=x`. Changing any of this changes
//! every signature the gateway expects.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Name of the signature field. Never part of the canonical string.
pub const SIGN_FIELD: &str = "sign";

/// Name of the signature-algorithm field.
pub const SIGN_TYPE_FIELD: &str = "sign_type";

/// An ordered, multi-valued set of string fields.
///
/// Keys iterate in byte-wise ascending order; values under one key keep the
/// order they were added in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    fields: BTreeMap<String, Vec<String>>,
}

impl Params {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all values of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), vec![value.into()]);
    }

    /// Set `key` only when `value` is present.
    pub fn set_opt(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Add another value under `key`, after any existing ones.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    /// First value of `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of `key` in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove `key`, returning its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.fields.remove(key)
    }

    /// Whether `key` is present (with any values, empty or not).
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the set has no keys.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(key, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| (key.as_str(), value.as_str()))
        })
    }

    /// Parse an `application/x-www-form-urlencoded` body.
    ///
    /// Keys and values are percent-decoded, so the result is ready for
    /// [`Params::canonical_string`].
    pub fn from_form(body: &str) -> Self {
        form_urlencoded::parse(body.as_bytes()).collect()
    }

    /// Deterministic signing form over every field except `sign`.
    pub fn canonical_string(&self) -> String {
        canonicalize(self.iter().filter(|(key, _)| *key != SIGN_FIELD))
    }

    /// Form-URL-encode every field for transport.
    ///
    /// `sign` is written last regardless of its position in key order.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter().filter(|(key, _)| *key != SIGN_FIELD) {
            serializer.append_pair(key, value);
        }
        for value in self.get_all(SIGN_FIELD) {
            serializer.append_pair(SIGN_FIELD, value);
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

/// Canonicalize an arbitrary sequence of `(key, value)` pairs.
///
/// Pairs are grouped by key (byte-wise ascending), values keep their relative
/// order within a key, and empty values are skipped individually. The caller
/// decides which keys take part; this function filters nothing but empties.
pub fn canonicalize<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (key, value) in pairs {
        grouped.entry(key).or_default().push(value);
    }

    let mut out = String::new();
    for (key, values) in grouped {
        for value in values.into_iter().filter(|value| !value.is_empty()) {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Params {
        let mut params = Params::new();
        params.set("app_id", "2014072300007148");
        params.set("method", "alipay.trade.pay");
        params.set("biz_content", r#"{"foo":"bar"}"#);
        params.set("timestamp", "2024-01-01 00:00:00");
        params.set("version", "1.0");
        params
    }

    #[test]
    fn test_canonical_string_sorts_keys_without_encoding() {
        assert_eq!(
            scenario().canonical_string(),
            r#"app_id=2014072300007148&biz_content={"foo":"bar"}&method=alipay.trade.pay&timestamp=2024-01-01 00:00:00&version=1.0"#
        );
    }

    #[test]
    fn test_sign_field_is_excluded() {
        let mut params = scenario();
        params.set("sign", "c2lnbmF0dXJl");
        let canonical = params.canonical_string();
        assert!(!canonical.contains("sign="));
        assert_eq!(canonical, scenario().canonical_string());
    }

    #[test]
    fn test_sign_type_is_kept_in_request_form() {
        let mut params = scenario();
        params.set("sign_type", "RSA2");
        assert!(params.canonical_string().contains("&sign_type=RSA2&"));
    }

    #[test]
    fn test_empty_values_dropped_per_value() {
        let mut params = Params::new();
        params.append("b", "");
        params.append("b", "2");
        params.append("a", "");
        params.set("c", "3");
        assert_eq!(params.canonical_string(), "b=2&c=3");
    }

    #[test]
    fn test_multi_values_keep_insertion_order() {
        let mut params = Params::new();
        params.append("k", "z");
        params.append("k", "a");
        params.set("j", "1");
        assert_eq!(params.canonical_string(), "j=1&k=z&k=a");
    }

    #[test]
    fn test_keys_sort_bytewise() {
        let params: Params = vec![("b", "1"), ("B", "2"), ("a_b", "3"), ("ab", "4")]
            .into_iter()
            .collect();
        // '_' (0x5f) sorts before 'b' (0x62); uppercase before lowercase
        assert_eq!(params.canonical_string(), "B=2&a_b=3&ab=4&b=1");
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(Params::new().canonical_string(), "");
        assert_eq!(canonicalize(std::iter::empty()), "");
    }

    #[test]
    fn test_from_form_decodes() {
        let params =
            Params::from_form("subject=%E6%B5%8B%E8%AF%95+order&total_amount=8.80&x=1&x=2");
        assert_eq!(params.get("subject"), Some("测试 order"));
        assert_eq!(params.get("total_amount"), Some("8.80"));
        assert_eq!(params.get_all("x"), ["1".to_string(), "2".to_string()]);
        assert_eq!(
            params.canonical_string(),
            "subject=测试 order&total_amount=8.80&x=1&x=2"
        );
    }

    #[test]
    fn test_query_string_encodes_and_puts_sign_last() {
        let mut params = Params::new();
        params.set("timestamp", "2024-01-01 00:00:00");
        params.set("sign", "ab+/=");
        params.set("app_id", "1");
        assert_eq!(
            params.to_query_string(),
            "app_id=1&timestamp=2024-01-01+00%3A00%3A00&sign=ab%2B%2F%3D"
        );
    }

    #[test]
    fn test_query_string_round_trips_through_form_parsing() {
        let mut params = scenario();
        params.set("sign", "abc+def/ghi==");
        assert_eq!(Params::from_form(&params.to_query_string()), params);
    }

    #[test]
    fn test_set_opt_and_remove() {
        let mut params = Params::new();
        params.set_opt("notify_url", None::<String>);
        assert!(!params.contains_key("notify_url"));
        params.set_opt("notify_url", Some("https://example.com/notify"));
        assert_eq!(params.len(), 1);
        assert_eq!(
            params.remove("notify_url"),
            Some(vec!["https://example.com/notify".to_string()])
        );
        assert!(params.is_empty());
    }
}
