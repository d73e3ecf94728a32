//! REST [`Database`] implementation.
//!
//! Speaks a PostgREST-flavored HTTP API: tables are resources, predicates
//! are `column=eq.value` query parameters, and counts travel in the
//! `Content-Range` response header.

mod impls;

use std::time::Duration;

use derive_more::{Display, Error as StdError, From};
use reqwest::{header, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use smart_default::SmartDefault;
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

/// Configuration of a [`Rest`] client.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL of the REST API, without a trailing slash.
    #[default(String::from("http://127.0.0.1:3000"))]
    pub base_url: String,

    /// API key attached to every request, if the backend requires one.
    pub api_key: Option<String>,

    /// Timeout of a single request.
    #[default(Duration::from_secs(10))]
    pub timeout: Duration,
}

/// REST [`Database`] client.
#[derive(Clone, Debug)]
pub struct Rest {
    /// HTTP client performing the requests.
    http: reqwest::Client,

    /// Base URL of the REST API.
    base_url: String,

    /// API key attached to every request, if any.
    api_key: Option<String>,
}

impl Rest {
    /// Creates a new [`Rest`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the underlying HTTP client cannot be initialized.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let http = reqwest::Client::builder()
            .timeout(conf.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self {
            http,
            base_url: conf.base_url.trim_end_matches('/').to_owned(),
            api_key: conf.api_key.clone(),
        })
    }

    /// Returns the URL of the given `table` resource.
    fn url(&self, table: &str) -> String {
        format!("{}/{table}", self.base_url)
    }

    /// Attaches the configured API key to the given request.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("apikey", key).bearer_auth(key),
            None => req,
        }
    }

    /// Fetches rows of the given `table` matching the `query` predicates.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, Traced<Error>> {
        let resp = self
            .authorize(self.http.get(self.url(table)).query(query))
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        check(resp)
            .map_err(tracerr::wrap!())?
            .json()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
    }

    /// Inserts the given `row` into the given `table`.
    async fn insert(
        &self,
        table: &str,
        row: &impl Serialize,
    ) -> Result<(), Traced<Error>> {
        let resp = self
            .authorize(self.http.post(self.url(table)).json(row))
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        check(resp).map_err(tracerr::wrap!()).map(drop)
    }

    /// Deletes rows of the given `table` matching the `query` predicates.
    async fn delete(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<(), Traced<Error>> {
        let resp = self
            .authorize(self.http.delete(self.url(table)).query(query))
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        check(resp).map_err(tracerr::wrap!()).map(drop)
    }

    /// Counts rows of the given `table` matching the `query` predicates
    /// without fetching them.
    async fn count(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<i32, Traced<Error>> {
        let resp = self
            .authorize(
                self.http
                    .get(self.url(table))
                    .query(query)
                    .header("Prefer", "count=exact")
                    .header(header::RANGE, "0-0"),
            )
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        let resp = check(resp).map_err(tracerr::wrap!())?;

        // `Content-Range: 0-24/3573` carries the total after the slash.
        resp.headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit_once('/'))
            .and_then(|(_, total)| total.parse().ok())
            .ok_or_else(|| tracerr::new!(Error::MalformedContentRange))
    }
}

/// Maps an erroneous [`Response`] status into an [`Error`].
fn check(resp: Response) -> Result<Response, Error> {
    match resp.status() {
        StatusCode::NOT_FOUND => Err(Error::NotFound),
        StatusCode::CONFLICT => Err(Error::Conflict),
        status if status.is_client_error() || status.is_server_error() => {
            Err(Error::Status(status))
        }
        _ => Ok(resp),
    }
}

/// REST database [`Error`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP transport or decoding error.
    #[display("HTTP error: {_0}")]
    Http(reqwest::Error),

    /// Requested resource does not exist.
    #[display("resource not found")]
    NotFound,

    /// Request violated a uniqueness constraint.
    #[display("uniqueness constraint violated")]
    Conflict,

    /// Response carried an unexpected status code.
    #[display("unexpected response status: {_0}")]
    Status(#[error(not(source))] StatusCode),

    /// Response carried no parsable `Content-Range` header.
    #[display("malformed `Content-Range` response header")]
    MalformedContentRange,
}
