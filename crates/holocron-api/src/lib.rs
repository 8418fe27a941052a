// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use holocron_app::{Collection, PAGE_SIZE, PageEnvelope, Record};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Read-only client for the remote catalog. Each call is one round trip:
/// no retry, no caching, no deadline beyond the transport timeout.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("catalog.base_url must not be empty");
        }
        Url::parse(&base_url)
            .with_context(|| format!("catalog.base_url {base_url:?} is not a valid URL"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of a collection. Pages are 1-based; the catalog
    /// returns at most [`PAGE_SIZE`] records per page.
    pub fn list_page(&self, collection: Collection, page: u32) -> Result<PageEnvelope> {
        let page = page.max(1);
        let response = self
            .http
            .get(format!(
                "{}/{}/?page={page}",
                self.base_url,
                collection.as_str()
            ))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))
            .with_context(|| fetch_context(collection, page))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, &body)).with_context(|| fetch_context(collection, page));
        }

        let envelope: PageEnvelope = response
            .json()
            .with_context(|| format!("decode page envelope ({})", fetch_context(collection, page)))?;
        Ok(envelope)
    }

    /// Fetches a single record by its absolute resource URL.
    pub fn get_by_reference(&self, reference: &str) -> Result<Record> {
        let parsed =
            Url::parse(reference).with_context(|| format!("invalid resource URL {reference:?}"))?;

        let response = self
            .http
            .get(parsed)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))
            .with_context(|| format!("fetch record {reference}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, &body))
                .with_context(|| format!("fetch record {reference}"));
        }

        let record: Record = response
            .json()
            .with_context(|| format!("decode record {reference}"))?;
        Ok(record)
    }

    /// Combined vehicles + starships page: two independent list calls for
    /// the same page number, merged vehicles-first. The merge is lossy once
    /// the two collections' page counts diverge; see
    /// [`PageEnvelope::merge`].
    pub fn list_transport_page(&self, page: u32) -> Result<PageEnvelope> {
        let vehicles = self.list_page(Collection::Vehicles, page)?;
        let starships = self.list_page(Collection::Starships, page)?;
        Ok(vehicles.merge(starships))
    }
}

fn fetch_context(collection: Collection, page: u32) -> String {
    format!("fetch {} page {page}", collection.as_str())
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach catalog at {} -- check [catalog].base_url and your network ({} )",
        base_url,
        error
    )
}

fn status_error(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<DetailErrorEnvelope>(body)
        && let Some(detail) = parsed.detail
        && !detail.is_empty()
    {
        return anyhow!("catalog returned {}: {}", status.as_u16(), detail);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("catalog returned {}: {}", status.as_u16(), body.trim());
    }

    anyhow!("catalog returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct DetailErrorEnvelope {
    detail: Option<String>,
}

// PAGE_SIZE is fixed by the external catalog, not negotiated per request.
const _: () = assert!(PAGE_SIZE == 10);
