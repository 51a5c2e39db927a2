use super::PageFetcher;
use crate::error::{GridError, Result};
use crate::model::Record;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!("gitgrid/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// PageFetcher for GitHub-style REST APIs: `GET {base}/{endpoint}` with
/// `page`/`per_page` query parameters and an optional token header.
pub struct HttpFetcher {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl HttpFetcher {
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let api_base = api_base.into().trim_end_matches('/').to_string();

        Ok(Self { client, api_base, token })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch_page(&self, endpoint: &str, page: u32, page_size: u32) -> Result<Vec<Record>> {
        let url = format!("{}/{}", self.api_base, endpoint.trim_matches('/'));

        let mut request = self.client.get(&url).query(&[
            ("page", page.to_string()),
            ("per_page", page_size.to_string()),
        ]);
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {token}"));
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GridError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        let body: Value = response.json()?;
        let rows = match body {
            Value::Array(rows) => rows,
            _ => {
                return Err(GridError::Parse(format!(
                    "Expected a JSON array of records from {url}"
                )))
            }
        };

        rows.into_iter()
            .map(|row| match row {
                Value::Object(fields) => Ok(Record::new(fields).with_origin(endpoint)),
                other => Err(GridError::Parse(format!(
                    "Expected a record object, got: {}",
                    snippet(&other.to_string())
                ))),
            })
            .collect()
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > 200 {
        let head: String = trimmed.chars().take(200).collect();
        format!("{head}...")
    } else {
        trimmed.to_string()
    }
}
