// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use holocron_api::Client;
use holocron_app::{Collection, PageEnvelope};
use holocron_testkit::FakeCatalog;
use holocron_tui::{CatalogRuntime, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;

/// Network-backed runtime. Fetches run on their own threads so the render
/// loop never blocks on a catalog round trip.
pub struct HttpRuntime {
    client: Client,
}

impl HttpRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl CatalogRuntime for HttpRuntime {
    fn fetch_page(&mut self, collection: Collection, page: u32) -> Result<PageEnvelope> {
        self.client.list_page(collection, page)
    }

    fn spawn_fetch(
        &mut self,
        ticket: holocron_app::FetchTicket,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        thread::spawn(move || {
            let outcome = client
                .list_page(ticket.collection, ticket.page)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(InternalEvent::PageLoaded { ticket, outcome });
        });
        Ok(())
    }
}

/// Offline runtime for `--demo`: deterministic fixture records, no network.
pub struct DemoRuntime {
    catalog: FakeCatalog,
}

impl DemoRuntime {
    pub fn new(seed: u64) -> Self {
        Self {
            catalog: FakeCatalog::new(seed),
        }
    }
}

impl CatalogRuntime for DemoRuntime {
    fn fetch_page(&mut self, collection: Collection, page: u32) -> Result<PageEnvelope> {
        self.catalog.page(collection, page)
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogRuntime, DemoRuntime, HttpRuntime};
    use anyhow::{Result, anyhow};
    use holocron_api::Client;
    use holocron_app::{Collection, FetchTicket};
    use holocron_tui::InternalEvent;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tiny_http::{Header, Response, Server};

    #[test]
    fn demo_runtime_serves_deterministic_pages() -> Result<()> {
        let mut first = DemoRuntime::new(7);
        let mut second = DemoRuntime::new(7);

        let page_a = first.fetch_page(Collection::People, 1)?;
        let page_b = second.fetch_page(Collection::People, 1)?;
        assert_eq!(page_a, page_b);
        assert!(!page_a.results.is_empty());
        Ok(())
    }

    #[test]
    fn http_runtime_reports_fetches_through_the_channel() -> Result<()> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let addr = format!("http://{}", server.server_addr());

        let handle = thread::spawn(move || {
            let request = server.recv().expect("request expected");
            assert_eq!(request.url(), "/planets/?page=1");
            let body = r#"{"count": 1, "next": null, "previous": null,
                "results": [{"name": "Dagobah"}]}"#;
            let response = Response::from_string(body).with_header(
                Header::from_bytes("Content-Type", "application/json").expect("valid header"),
            );
            request.respond(response).expect("response should succeed");
        });

        let client = Client::new(&addr, Duration::from_secs(1))?;
        let mut runtime = HttpRuntime::new(client);
        let (tx, rx) = mpsc::channel();
        let ticket = FetchTicket {
            collection: Collection::Planets,
            page: 1,
            seq: 1,
        };
        runtime.spawn_fetch(ticket, tx)?;

        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .map_err(|_| anyhow!("no fetch outcome received"))?;
        match event {
            InternalEvent::PageLoaded {
                ticket: got,
                outcome,
            } => {
                assert_eq!(got, ticket);
                let envelope = outcome.map_err(|message| anyhow!(message))?;
                assert_eq!(envelope.results[0].name(), Some("Dagobah"));
            }
            other => return Err(anyhow!("unexpected event {other:?}")),
        }

        handle.join().expect("server thread should join");
        Ok(())
    }
}
