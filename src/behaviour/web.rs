// src/behaviour/web.rs

use anyhow::{Context, Result, bail};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::config::WebSettings;
use crate::observe::{self, SharedObserver};
use crate::report::Report;
use crate::types::HttpMethod;

use super::backend::{Notifier, NotifyFuture};

/// Sends the JSON report as the body of a POST/PUT request.
///
/// Any status outside 2xx counts as a failure. The response body is read
/// and dropped.
#[derive(Debug)]
pub struct WebSink<'s> {
    settings: &'s WebSettings,
    client: reqwest::Client,
    observer: SharedObserver,
}

impl<'s> WebSink<'s> {
    pub fn new(settings: &'s WebSettings, client: reqwest::Client) -> Self {
        Self {
            settings,
            client,
            observer: observe::noop(),
        }
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub async fn send_report(&self, report: &Report) -> Result<()> {
        let method = self.settings.method;
        let url = &self.settings.url;
        let payload = report.to_json().context("serializing report")?;

        self.observer
            .info(&format!("sending report with {method} to {url}"));

        let response = self
            .client
            .request(reqwest_method(method), url)
            .headers(self.request_headers()?)
            .body(payload)
            .send()
            .await
            .with_context(|| format!("{method} request to {url} could not be sent"))?;

        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();

        if !status.is_success() {
            self.observer.warn(&format!(
                "{method} {url} answered {status}: {}",
                String::from_utf8_lossy(&body)
            ));
            bail!(
                "{method} request to {url} failed with code {}",
                status.as_u16()
            );
        }
        Ok(())
    }

    /// `Content-Type: application/json` plus the configured headers, which
    /// replace any default of the same name.
    fn request_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.settings.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("invalid header name '{name}'"))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("invalid value for header '{name}'"))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
    }
}

impl Notifier for WebSink<'_> {
    fn notify<'a>(&'a self, report: &'a Report) -> NotifyFuture<'a> {
        Box::pin(self.send_report(report))
    }
}
