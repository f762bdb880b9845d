//! Query parameters and the optional search filter.
//!
//! # Design
//! `Params` keeps insertion order so generated query strings are
//! deterministic and read in the order the service documents them. Keys
//! are case-sensitive (`Take` and `take` are different parameters).
//! Inserting an existing key overwrites its value in place, which is how
//! defaults get overridden by caller-supplied values.
//!
//! `SearchQuery` goes through serde: its wire names come from the derive and
//! `to_params` reads the serialized object back in field order.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Ordered, case-sensitive key/value list used for query strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Chaining form of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Apply every entry of `other` on top of `self`; `other` wins on collision.
    pub fn merge(&mut self, other: Params) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Params {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Optional filter and pagination accepted by the list endpoints.
///
/// Unset fields are omitted from the query entirely. A blank search term
/// counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "is_blank", serialize_with = "trimmed")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
}

fn is_blank(term: &Option<String>) -> bool {
    term.as_deref().map_or(true, |t| t.trim().is_empty())
}

fn trimmed<S: Serializer>(term: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(term.as_deref().map_or("", str::trim))
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    pub fn take(mut self, take: u32) -> Self {
        self.take = Some(take);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// This filter's contribution to a request query.
    pub fn to_params(&self) -> Params {
        let Ok(Value::Object(fields)) = serde_json::to_value(self) else {
            return Params::new();
        };
        fields
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(text) => (key, text),
                other => (key, other.to_string()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_in_place() {
        let mut params = Params::from([("Take", "10"), ("Skip", "0")]);
        params.insert("Take", 25);
        let entries: Vec<_> = params.iter().collect();
        assert_eq!(entries, vec![("Take", "25"), ("Skip", "0")]);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let params = Params::new().with("Take", 1).with("take", 2);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("Take"), Some("1"));
        assert_eq!(params.get("take"), Some("2"));
    }

    #[test]
    fn merge_lets_other_side_win() {
        let mut defaults = Params::from([("Token", "t"), ("ApplicationKey", "k")]);
        defaults.merge(Params::from([("ApplicationKey", "override"), ("Foo", "bar")]));
        let entries: Vec<_> = defaults.iter().collect();
        assert_eq!(
            entries,
            vec![("Token", "t"), ("ApplicationKey", "override"), ("Foo", "bar")]
        );
    }

    #[test]
    fn empty_search_query_contributes_nothing() {
        assert!(SearchQuery::new().to_params().is_empty());
    }

    #[test]
    fn search_query_emits_only_set_fields() {
        let params = SearchQuery::new().name("Smith").take(20).to_params();
        let entries: Vec<_> = params.iter().collect();
        assert_eq!(entries, vec![("Name", "Smith"), ("Take", "20")]);
        assert!(!params.contains_key("Skip"));
        assert!(!params.contains_key("Search"));
    }

    #[test]
    fn search_term_is_trimmed_and_blank_dropped() {
        let params = SearchQuery::new().search("  cardio ").to_params();
        assert_eq!(params.get("Search"), Some("cardio"));

        let params = SearchQuery::new().search("   ").to_params();
        assert!(!params.contains_key("Search"));
    }

    #[test]
    fn all_fields_use_service_casing() {
        let params = SearchQuery::new()
            .search("a")
            .name("b")
            .specialty("c")
            .take(1)
            .skip(2)
            .to_params();
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Search", "Name", "Specialty", "Take", "Skip"]);
    }

    #[test]
    fn serialized_form_matches_query() {
        let query = SearchQuery::new().search(" heart ").specialty("Cardiology").take(5);
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            serde_json::json!({"Search": "heart", "Specialty": "Cardiology", "Take": 5})
        );
        let entries: Vec<_> = query.to_params().iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        assert_eq!(
            entries,
            vec![
                ("Search".to_string(), "heart".to_string()),
                ("Specialty".to_string(), "Cardiology".to_string()),
                ("Take".to_string(), "5".to_string()),
            ]
        );
    }
}
