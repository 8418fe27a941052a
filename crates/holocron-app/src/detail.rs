// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Collection, FieldValue, Record};

/// Fields never shown in a detail view: identifiers, timestamps, and every
/// cross-reference collection field. `name` is also withheld from the body
/// because it becomes the overlay title.
pub const DEFAULT_EXCLUDED_FIELDS: [&str; 10] = [
    "url",
    "created",
    "edited",
    "films",
    "residents",
    "pilots",
    "people",
    "starships",
    "vehicles",
    "species",
];

/// Ordered field manifest per collection. Display order and labels are
/// fixed here instead of being inferred from record shape at render time,
/// so the displayed field set is statically checkable.
pub const fn field_manifest(collection: Collection) -> &'static [(&'static str, &'static str)] {
    match collection {
        Collection::People => &[
            ("height", "Height"),
            ("mass", "Mass"),
            ("hair_color", "Hair Color"),
            ("skin_color", "Skin Color"),
            ("eye_color", "Eye Color"),
            ("birth_year", "Birth Year"),
            ("gender", "Gender"),
            ("homeworld", "Homeworld"),
        ],
        Collection::Planets => &[
            ("rotation_period", "Rotation Period"),
            ("orbital_period", "Orbital Period"),
            ("diameter", "Diameter"),
            ("climate", "Climate"),
            ("gravity", "Gravity"),
            ("terrain", "Terrain"),
            ("surface_water", "Surface Water"),
            ("population", "Population"),
        ],
        Collection::Vehicles => &[
            ("model", "Model"),
            ("manufacturer", "Manufacturer"),
            ("cost_in_credits", "Cost In Credits"),
            ("length", "Length"),
            ("max_atmosphering_speed", "Max Atmosphering Speed"),
            ("crew", "Crew"),
            ("passengers", "Passengers"),
            ("cargo_capacity", "Cargo Capacity"),
            ("consumables", "Consumables"),
            ("vehicle_class", "Vehicle Class"),
        ],
        Collection::Starships => &[
            ("model", "Model"),
            ("manufacturer", "Manufacturer"),
            ("cost_in_credits", "Cost In Credits"),
            ("length", "Length"),
            ("max_atmosphering_speed", "Max Atmosphering Speed"),
            ("crew", "Crew"),
            ("passengers", "Passengers"),
            ("cargo_capacity", "Cargo Capacity"),
            ("consumables", "Consumables"),
            ("hyperdrive_rating", "Hyperdrive Rating"),
            ("MGLT", "MGLT"),
            ("starship_class", "Starship Class"),
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLine {
    pub label: String,
    pub value: String,
}

/// Overlay title: the record's own name, else the caller-supplied fallback.
pub fn detail_title(record: &Record, fallback: &str) -> String {
    match record.name() {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => fallback.to_owned(),
    }
}

/// `field_name` -> `Field Name`.
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sequences summarize to a count; strings pass through unchanged.
pub fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Refs(refs) if refs.is_empty() => "None".to_owned(),
        FieldValue::Refs(refs) => format!("{} item(s)", refs.len()),
    }
}

/// Label/value lines for a record of a known collection, in manifest order.
/// Fields absent from the record are skipped; `extra_excluded` removes
/// manifest fields a particular view does not want.
pub fn detail_lines(
    collection: Collection,
    record: &Record,
    extra_excluded: &[&str],
) -> Vec<DetailLine> {
    field_manifest(collection)
        .iter()
        .filter(|(key, _)| !extra_excluded.contains(key))
        .filter_map(|(key, label)| {
            record.get(key).map(|value| DetailLine {
                label: (*label).to_owned(),
                value: display_value(value),
            })
        })
        .collect()
}

/// Fallback for records with no manifest (single-record lookups of unknown
/// kind): every field in natural key order, minus the default exclusions,
/// with humanized labels.
pub fn detail_lines_dynamic(record: &Record, extra_excluded: &[&str]) -> Vec<DetailLine> {
    record
        .fields()
        .filter(|(key, _)| {
            *key != "name"
                && !DEFAULT_EXCLUDED_FIELDS.contains(key)
                && !extra_excluded.contains(key)
        })
        .map(|(key, value)| DetailLine {
            label: humanize_key(key),
            value: display_value(value),
        })
        .collect()
}
