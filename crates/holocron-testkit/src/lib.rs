// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use holocron_app::{Collection, FieldValue, PAGE_SIZE, PageEnvelope, Record};
use std::collections::BTreeMap;

const BASE_URL: &str = "https://catalog.example.test/api";

const GIVEN_NAMES: [&str; 16] = [
    "Kara", "Dorn", "Mivra", "Telos", "Jessa", "Rhen", "Ossk", "Varda", "Quill", "Breno", "Syla",
    "Tarek", "Numa", "Ezrin", "Wyla", "Joruk",
];
const FAMILY_NAMES: [&str; 14] = [
    "Antara", "Vexley", "Dunmar", "Korrin", "Solaar", "Pellan", "Threx", "Morvayn", "Ysadora",
    "Brask", "Calrix", "Ondren", "Farlo", "Zerev",
];
const HAIR_COLORS: [&str; 6] = ["black", "brown", "blond", "auburn", "grey", "none"];
const SKIN_COLORS: [&str; 6] = ["fair", "gold", "light", "green", "blue", "pale"];
const EYE_COLORS: [&str; 6] = ["blue", "brown", "yellow", "red", "orange", "hazel"];
const GENDERS: [&str; 4] = ["male", "female", "n/a", "none"];

const PLANET_PREFIXES: [&str; 12] = [
    "Tal", "Vor", "Kes", "Dan", "Or", "Mal", "Ber", "Cor", "Vel", "Nar", "Ild", "Sul",
];
const PLANET_SUFFIXES: [&str; 10] = [
    "dera", "uun", "thas", "ovia", "mir", "antor", "eshi", "aris", "ock", "ume",
];
const CLIMATES: [&str; 6] = [
    "arid", "temperate", "tropical", "frozen", "murky", "temperate, tropical",
];
const TERRAINS: [&str; 6] = [
    "desert", "grasslands, mountains", "jungle, rainforests", "tundra, ice caves", "swamp",
    "cityscape",
];

const VEHICLE_NAMES: [&str; 10] = [
    "Dune Skimmer", "Ridge Hauler", "Storm Crawler", "Mag-Lev Speeder", "Canyon Strider",
    "Cargo Walker", "Patrol Bike", "Sand Barge", "Scout Flitter", "Vapor Tractor",
];
const VEHICLE_CLASSES: [&str; 5] = [
    "wheeled", "repulsorcraft", "walker", "airspeeder", "sail barge",
];
const STARSHIP_NAMES: [&str; 10] = [
    "Void Corsair", "Stellar Wayfarer", "Aurora Lance", "Comet Chaser", "Nebula Freighter",
    "Ion Harrier", "Solar Skiff", "Drift Marauder", "Pulse Frigate", "Quasar Runner",
];
const STARSHIP_CLASSES: [&str; 5] = [
    "starfighter", "light freighter", "corvette", "cruiser", "shuttle",
];
const MANUFACTURERS: [&str; 6] = [
    "Antara Drive Yards",
    "Korrin Fleet Systems",
    "Vexley Motors",
    "Sul Orbital Works",
    "Threx Foundry",
    "Ondren Shipwrights",
];

const DEFAULT_COUNTS: [(Collection, usize); 4] = [
    (Collection::People, 24),
    (Collection::Planets, 17),
    (Collection::Vehicles, 12),
    (Collection::Starships, 15),
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.next_u64() % span) as i64
    }
}

/// Deterministic generator of catalog records. Equal seeds produce equal
/// records, so fixtures are reproducible across test runs.
#[derive(Debug, Clone)]
pub struct CatalogFaker {
    rng: DeterministicRng,
}

impl CatalogFaker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(if seed == 0 { 1 } else { seed }),
        }
    }

    pub fn record(&mut self, collection: Collection, index: usize) -> Record {
        match collection {
            Collection::People => self.person(index),
            Collection::Planets => self.planet(index),
            Collection::Vehicles => self.vehicle(index),
            Collection::Starships => self.starship(index),
        }
    }

    fn person(&mut self, index: usize) -> Record {
        let name = format!("{} {}", self.pick(&GIVEN_NAMES), self.pick(&FAMILY_NAMES));
        let homeworld_index = self.rng.int_n(DEFAULT_COUNTS[1].1) + 1;
        Record::from_fields([
            ("name", text(name)),
            ("height", text(self.rng.int_range(150, 210).to_string())),
            ("mass", text(self.rng.int_range(45, 140).to_string())),
            ("hair_color", text(self.pick(&HAIR_COLORS))),
            ("skin_color", text(self.pick(&SKIN_COLORS))),
            ("eye_color", text(self.pick(&EYE_COLORS))),
            (
                "birth_year",
                text(format!("{}BBY", self.rng.int_range(8, 96))),
            ),
            ("gender", text(self.pick(&GENDERS))),
            (
                "homeworld",
                text(resource_url(Collection::Planets, homeworld_index)),
            ),
            ("films", self.film_refs()),
            ("species", FieldValue::Refs(Vec::new())),
            ("vehicles", FieldValue::Refs(Vec::new())),
            ("starships", FieldValue::Refs(Vec::new())),
            ("created", text(fixture_timestamp())),
            ("edited", text(fixture_timestamp())),
            ("url", text(resource_url(Collection::People, index + 1))),
        ])
    }

    fn planet(&mut self, index: usize) -> Record {
        let name = format!(
            "{}{}",
            self.pick(&PLANET_PREFIXES),
            self.pick(&PLANET_SUFFIXES)
        );
        Record::from_fields([
            ("name", text(name)),
            (
                "rotation_period",
                text(self.rng.int_range(12, 40).to_string()),
            ),
            (
                "orbital_period",
                text(self.rng.int_range(200, 900).to_string()),
            ),
            (
                "diameter",
                text(self.rng.int_range(4_000, 20_000).to_string()),
            ),
            ("climate", text(self.pick(&CLIMATES))),
            ("gravity", text("1 standard")),
            ("terrain", text(self.pick(&TERRAINS))),
            (
                "surface_water",
                text(self.rng.int_range(0, 100).to_string()),
            ),
            (
                "population",
                text((self.rng.int_range(1, 900) * 1_000_000).to_string()),
            ),
            ("residents", self.resident_refs()),
            ("films", self.film_refs()),
            ("created", text(fixture_timestamp())),
            ("edited", text(fixture_timestamp())),
            ("url", text(resource_url(Collection::Planets, index + 1))),
        ])
    }

    fn vehicle(&mut self, index: usize) -> Record {
        let name = self.pick_owned(&VEHICLE_NAMES);
        let mut record = self.transport_fields(name);
        record.push(("vehicle_class", text(self.pick(&VEHICLE_CLASSES))));
        record.push(("url", text(resource_url(Collection::Vehicles, index + 1))));
        Record::from_fields(record)
    }

    fn starship(&mut self, index: usize) -> Record {
        let name = self.pick_owned(&STARSHIP_NAMES);
        let mut record = self.transport_fields(name);
        record.push((
            "hyperdrive_rating",
            text(format!("{}.{}", self.rng.int_range(0, 4), self.rng.int_range(0, 9))),
        ));
        record.push(("MGLT", text(self.rng.int_range(40, 120).to_string())));
        record.push(("starship_class", text(self.pick(&STARSHIP_CLASSES))));
        record.push(("url", text(resource_url(Collection::Starships, index + 1))));
        Record::from_fields(record)
    }

    fn transport_fields(&mut self, name: String) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("name", text(name)),
            ("model", text(format!("Mark {}", self.rng.int_range(1, 9)))),
            ("manufacturer", text(self.pick(&MANUFACTURERS))),
            (
                "cost_in_credits",
                text((self.rng.int_range(8, 4_000) * 100).to_string()),
            ),
            ("length", text(self.rng.int_range(3, 150).to_string())),
            (
                "max_atmosphering_speed",
                text(self.rng.int_range(300, 1_200).to_string()),
            ),
            ("crew", text(self.rng.int_range(1, 12).to_string())),
            ("passengers", text(self.rng.int_range(0, 60).to_string())),
            (
                "cargo_capacity",
                text(self.rng.int_range(50, 50_000).to_string()),
            ),
            (
                "consumables",
                text(format!("{} days", self.rng.int_range(1, 60))),
            ),
            ("pilots", FieldValue::Refs(Vec::new())),
            ("films", self.film_refs()),
            ("created", text(fixture_timestamp())),
            ("edited", text(fixture_timestamp())),
        ]
    }

    fn film_refs(&mut self) -> FieldValue {
        let count = self.rng.int_n(4);
        FieldValue::Refs(
            (0..count)
                .map(|_| format!("{BASE_URL}/films/{}/", self.rng.int_range(1, 6)))
                .collect(),
        )
    }

    fn resident_refs(&mut self) -> FieldValue {
        let count = self.rng.int_n(3);
        FieldValue::Refs(
            (0..count)
                .map(|_| {
                    resource_url(
                        Collection::People,
                        self.rng.int_n(DEFAULT_COUNTS[0].1) + 1,
                    )
                })
                .collect(),
        )
    }

    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items[self.rng.int_n(items.len())]
    }

    fn pick_owned(&mut self, items: &[&'static str]) -> String {
        self.pick(items).to_owned()
    }
}

fn text(value: impl Into<String>) -> FieldValue {
    FieldValue::Text(value.into())
}

fn resource_url(collection: Collection, index: usize) -> String {
    format!("{BASE_URL}/{}/{index}/", collection.as_str())
}

pub fn fixture_timestamp() -> &'static str {
    "2026-02-19T12:34:56Z"
}

/// In-memory catalog with the wire semantics of the remote one: fixed page
/// size, 1-based pages, next/previous links, lookup by resource URL. Used
/// by demo mode and by tests that must not touch the network.
#[derive(Debug, Clone)]
pub struct FakeCatalog {
    records: BTreeMap<&'static str, Vec<Record>>,
    failure: Option<String>,
}

impl FakeCatalog {
    pub fn new(seed: u64) -> Self {
        let mut faker = CatalogFaker::new(seed);
        let mut records = BTreeMap::new();
        for (collection, count) in DEFAULT_COUNTS {
            let rows = (0..count)
                .map(|index| faker.record(collection, index))
                .collect();
            records.insert(collection.as_str(), rows);
        }
        Self {
            records,
            failure: None,
        }
    }

    /// Makes every subsequent call fail with `message`, simulating a
    /// transport outage.
    pub fn set_failure(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    pub fn clear_failure(&mut self) {
        self.failure = None;
    }

    pub fn record_count(&self, collection: Collection) -> usize {
        self.records
            .get(collection.as_str())
            .map_or(0, Vec::len)
    }

    pub fn page(&self, collection: Collection, page: u32) -> Result<PageEnvelope> {
        if let Some(message) = &self.failure {
            bail!("{message}");
        }

        let rows = self
            .records
            .get(collection.as_str())
            .map_or(&[][..], Vec::as_slice);
        let page = page.max(1);
        let page_size = PAGE_SIZE as usize;
        let start = (page as usize - 1) * page_size;
        let results: Vec<Record> = rows.iter().skip(start).take(page_size).cloned().collect();
        let total_pages = (rows.len() as u64).div_ceil(PAGE_SIZE) as u32;

        let link = |target: u32| format!("{BASE_URL}/{}/?page={target}", collection.as_str());
        Ok(PageEnvelope {
            total_count: rows.len() as u64,
            next: (page < total_pages).then(|| link(page + 1)),
            previous: (page > 1 && start < rows.len()).then(|| link(page - 1)),
            results,
        })
    }

    pub fn transport_page(&self, page: u32) -> Result<PageEnvelope> {
        let vehicles = self.page(Collection::Vehicles, page)?;
        let starships = self.page(Collection::Starships, page)?;
        Ok(vehicles.merge(starships))
    }

    pub fn by_reference(&self, reference: &str) -> Result<Record> {
        if let Some(message) = &self.failure {
            bail!("{message}");
        }

        self.records
            .values()
            .flatten()
            .find(|record| record.reference() == Some(reference))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no record at {reference}"))
    }
}
