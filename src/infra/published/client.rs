use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::config::SheetUrlConfig;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};
use crate::parser::parse_sheet;
use crate::services::sheet_source::SheetSource;
use crate::table::SheetTable;

/// Pause between consecutive sheet downloads, to stay under export rate limits.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

pub struct PublishedSheetsClient<C = BasicClient> {
    client: C,
    sheets: SheetUrlConfig,
    delay: Duration,
}

impl PublishedSheetsClient<BasicClient> {
    pub fn new(sheets: SheetUrlConfig) -> Result<Self> {
        let client = BasicClient::with_timeouts(Duration::from_secs(30), Duration::from_secs(10))?;
        Ok(Self::with_client(client, sheets))
    }
}

impl<C: HttpClient> PublishedSheetsClient<C> {
    pub fn with_client(client: C, sheets: SheetUrlConfig) -> Self {
        Self {
            client,
            sheets,
            delay: DEFAULT_REQUEST_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl<C: HttpClient> SheetSource for PublishedSheetsClient<C> {
    async fn list_sheets(&self) -> Result<Vec<String>> {
        Ok(self.sheets.names().map(str::to_string).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_sheet(&self, name: &str) -> Result<SheetTable> {
        let url = self
            .sheets
            .get_url(name)
            .ok_or_else(|| anyhow!("No export URL configured for sheet '{name}'"))?;

        let bytes = fetch_bytes(&self.client, url).await?;
        debug!(bytes = bytes.len(), "Sheet export received");

        parse_sheet(name, &bytes)
    }

    fn request_delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::published::SheetUrl;
    use std::sync::Mutex;

    /// Serves fixed bodies keyed by URL and records every request.
    struct FakeClient {
        bodies: Vec<(String, &'static str)>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpClient for FakeClient {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            let url = req.url().to_string();
            self.requested.lock().unwrap().push(url.clone());

            let (status, body) = match self.bodies.iter().find(|(u, _)| *u == url) {
                Some((_, body)) => (200u16, *body),
                None => (404, ""),
            };
            let resp = http::Response::builder().status(status).body(body).unwrap();
            Ok(reqwest::Response::from(resp))
        }
    }

    fn source() -> PublishedSheetsClient<FakeClient> {
        let client = FakeClient {
            bodies: vec![
                ("http://sheets.test/day1".into(), "BAND,0:00\nA,12\n"),
                ("http://sheets.test/day2".into(), r#"[{"BAND": "B", "0:00": 3}]"#),
            ],
            requested: Mutex::new(vec![]),
        };
        let sheets = SheetUrlConfig::new(vec![
            SheetUrl {
                name: "Day 1".into(),
                url: "http://sheets.test/day1".into(),
            },
            SheetUrl {
                name: "Day 2".into(),
                url: "http://sheets.test/day2".into(),
            },
            SheetUrl {
                name: "Gone".into(),
                url: "http://sheets.test/gone".into(),
            },
        ]);
        PublishedSheetsClient::with_client(client, sheets).with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_list_sheets_in_config_order() {
        let names = source().list_sheets().await.unwrap();
        assert_eq!(names, vec!["Day 1", "Day 2", "Gone"]);
    }

    #[tokio::test]
    async fn test_fetch_csv_and_json_exports() {
        let source = source();

        let day1 = source.fetch_sheet("Day 1").await.unwrap();
        assert_eq!(day1.rows, vec![vec!["A", "12"]]);

        let day2 = source.fetch_sheet("Day 2").await.unwrap();
        assert_eq!(day2.rows, vec![vec!["B", "3"]]);

        let requested = source.client.requested.lock().unwrap().clone();
        assert_eq!(requested, vec!["http://sheets.test/day1", "http://sheets.test/day2"]);
    }

    #[tokio::test]
    async fn test_fetch_errors() {
        let source = source();
        assert!(source.fetch_sheet("Unknown").await.is_err());
        assert!(source.fetch_sheet("Gone").await.is_err());
    }

    #[test]
    fn test_default_delay() {
        let client = FakeClient {
            bodies: vec![],
            requested: Mutex::new(vec![]),
        };
        let source = PublishedSheetsClient::with_client(client, SheetUrlConfig::default());
        assert_eq!(source.request_delay(), DEFAULT_REQUEST_DELAY);
    }
}
