// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Fixed page size of the external catalog; every list endpoint returns at
/// most this many records per page.
pub const PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collection {
    People,
    Planets,
    Vehicles,
    Starships,
}

impl Collection {
    pub const ALL: [Self; 4] = [Self::People, Self::Planets, Self::Vehicles, Self::Starships];

    /// Path segment used by the catalog API.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Planets => "planets",
            Self::Vehicles => "vehicles",
            Self::Starships => "starships",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "people" => Some(Self::People),
            "planets" => Some(Self::Planets),
            "vehicles" => Some(Self::Vehicles),
            "starships" => Some(Self::Starships),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::People => "characters",
            Self::Planets => "planets",
            Self::Vehicles => "vehicles",
            Self::Starships => "starships",
        }
    }

    pub const fn detail_title(self) -> &'static str {
        match self {
            Self::People => "Character Details",
            Self::Planets => "Planet Details",
            Self::Vehicles => "Vehicle Details",
            Self::Starships => "Starship Details",
        }
    }
}

/// One field of a catalog record: a plain string or a list of
/// cross-reference URLs into another collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Refs(Vec<String>),
}

impl FieldValue {
    fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Self::Text(text),
            serde_json::Value::Array(items) => Self::Refs(
                items
                    .into_iter()
                    .map(|item| match item {
                        serde_json::Value::String(text) => text,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            serde_json::Value::Null => Self::Text(String::new()),
            other => Self::Text(other.to_string()),
        }
    }
}

/// One catalog entity as a field/value mapping. Records are immutable after
/// load; there is no stable numeric key in this catalog, so identity is the
/// record's resource URL or, absent that, its name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    /// Canonical resource URL, when the catalog supplied one.
    pub fn reference(&self) -> Option<&str> {
        self.text("url")
    }

    /// Display identity: resource URL, else name. Name collisions are a
    /// known limitation of the catalog.
    pub fn identity(&self) -> Option<&str> {
        self.reference().or_else(|| self.name())
    }

    /// Fields in sorted key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Map::deserialize(deserializer)?;
        let fields = raw
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from_json(value)))
            .collect();
        Ok(Self { fields })
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One page of a collection as returned by the catalog: the collection's
/// total record count, optional next/previous page links, and the page's
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEnvelope {
    #[serde(rename = "count")]
    pub total_count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Record>,
}

impl PageEnvelope {
    pub fn total_pages(&self) -> u32 {
        total_pages_for(self.total_count)
    }

    /// Concatenates two envelopes for the same page number: counts add,
    /// results append, and next/previous take the first non-empty link.
    /// The merged links are best-effort only; they stop describing real
    /// pagination state once the two collections' page counts diverge.
    pub fn merge(self, other: Self) -> Self {
        let mut results = self.results;
        results.extend(other.results);
        Self {
            total_count: self.total_count + other.total_count,
            next: self.next.or(other.next),
            previous: self.previous.or(other.previous),
            results,
        }
    }
}

pub fn total_pages_for(total_count: u64) -> u32 {
    total_count.div_ceil(PAGE_SIZE) as u32
}

#[cfg(test)]
mod tests {
    use super::{Collection, FieldValue, PAGE_SIZE, PageEnvelope, Record, total_pages_for};

    fn record(name: &str) -> Record {
        Record::from_fields([("name", FieldValue::Text(name.to_owned()))])
    }

    #[test]
    fn collection_round_trips_through_parse() {
        for collection in Collection::ALL {
            assert_eq!(Collection::parse(collection.as_str()), Some(collection));
        }
        assert_eq!(Collection::parse("droids"), None);
    }

    #[test]
    fn total_pages_is_ceiling_of_count_over_page_size() {
        assert_eq!(total_pages_for(0), 0);
        assert_eq!(total_pages_for(1), 1);
        assert_eq!(total_pages_for(PAGE_SIZE), 1);
        assert_eq!(total_pages_for(PAGE_SIZE + 1), 2);
        assert_eq!(total_pages_for(82), 9);
    }

    #[test]
    fn record_decodes_strings_and_reference_lists() {
        let raw = r#"{
            "name": "Luke Skywalker",
            "height": "172",
            "films": ["https://example.test/films/1/", "https://example.test/films/2/"],
            "url": "https://example.test/people/1/"
        }"#;
        let record: Record = serde_json::from_str(raw).expect("decode record");

        assert_eq!(record.name(), Some("Luke Skywalker"));
        assert_eq!(record.text("height"), Some("172"));
        assert_eq!(record.reference(), Some("https://example.test/people/1/"));
        match record.get("films") {
            Some(FieldValue::Refs(refs)) => assert_eq!(refs.len(), 2),
            other => panic!("films should be refs, got {other:?}"),
        }
    }

    #[test]
    fn record_identity_prefers_url_over_name() {
        let with_url = Record::from_fields([
            ("name", FieldValue::Text("Tatooine".to_owned())),
            (
                "url",
                FieldValue::Text("https://example.test/planets/1/".to_owned()),
            ),
        ]);
        assert_eq!(with_url.identity(), Some("https://example.test/planets/1/"));

        let name_only = record("Tatooine");
        assert_eq!(name_only.identity(), Some("Tatooine"));
    }

    #[test]
    fn record_tolerates_non_string_scalars() {
        let raw = r#"{"name": "X-34", "crew": 1, "cost": null}"#;
        let record: Record = serde_json::from_str(raw).expect("decode record");
        assert_eq!(record.text("crew"), Some("1"));
        assert_eq!(record.text("cost"), Some(""));
    }

    #[test]
    fn merge_adds_counts_and_concatenates_results() {
        let vehicles = PageEnvelope {
            total_count: 4,
            next: None,
            previous: None,
            results: vec![record("v1"), record("v2")],
        };
        let starships = PageEnvelope {
            total_count: 6,
            next: Some("https://example.test/starships/?page=2".to_owned()),
            previous: None,
            results: vec![record("s1"), record("s2")],
        };

        let merged = vehicles.merge(starships);
        assert_eq!(merged.total_count, 10);
        assert_eq!(
            merged
                .results
                .iter()
                .filter_map(Record::name)
                .collect::<Vec<_>>(),
            vec!["v1", "v2", "s1", "s2"],
        );
        assert_eq!(
            merged.next.as_deref(),
            Some("https://example.test/starships/?page=2"),
        );
    }

    #[test]
    fn merge_takes_first_non_empty_link() {
        let left = PageEnvelope {
            total_count: 20,
            next: Some("left-next".to_owned()),
            previous: None,
            results: Vec::new(),
        };
        let right = PageEnvelope {
            total_count: 20,
            next: Some("right-next".to_owned()),
            previous: Some("right-prev".to_owned()),
            results: Vec::new(),
        };

        let merged = left.merge(right);
        assert_eq!(merged.next.as_deref(), Some("left-next"));
        assert_eq!(merged.previous.as_deref(), Some("right-prev"));
    }
}
