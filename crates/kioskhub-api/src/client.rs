// Tablet API HTTP client
//
// Wraps `reqwest::Client` with tablet URL construction and response-flag
// checking. Addresses are `host:port` strings; the caller owns port
// selection so the same client can front any transport.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{CommandResponse, StatusResponse};
use crate::transport::TransportConfig;

/// Raw HTTP client for a tablet's control API.
///
/// Stateless apart from the pooled `reqwest::Client`, so one instance is
/// shared by every concurrent fan-out task.
#[derive(Debug, Clone)]
pub struct KioskClient {
    http: reqwest::Client,
}

impl KioskClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `http://{addr}{path}`.
    pub(crate) fn device_url(addr: &str, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("http://{addr}{path}"))?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Fetch the full status block of a tablet.
    ///
    /// `GET /api/status`. A non-200 answer, an undecodable body or
    /// `success: false` are all errors.
    pub async fn fetch_status(&self, addr: &str) -> Result<StatusResponse, Error> {
        let url = Self::device_url(addr, "/api/status")?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let status: StatusResponse = Self::parse_json(addr, resp).await?;

        if !status.success {
            return Err(Error::Rejected { addr: addr.into() });
        }
        Ok(status)
    }

    /// Send a command to a tablet and check both response flags.
    ///
    /// `POST {path}` with an optional JSON body. Succeeds only when the
    /// tablet reports `success: true` and `data.executed: true`.
    pub async fn post_command<B: Serialize + ?Sized>(
        &self,
        addr: &str,
        path: &str,
        body: Option<&B>,
    ) -> Result<CommandResponse, Error> {
        let url = Self::device_url(addr, path)?;
        debug!("POST {}", url);

        let mut req = self.http.post(url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        let cmd: CommandResponse = Self::parse_json(addr, resp).await?;

        if !cmd.success {
            return Err(Error::Rejected { addr: addr.into() });
        }
        if !cmd.data.executed {
            return Err(Error::NotExecuted {
                addr: addr.into(),
                command: cmd.data.command,
            });
        }
        Ok(cmd)
    }

    /// Take a photo with one of the tablet cameras.
    ///
    /// `GET /api/camera/photo?camera={camera}&quality={quality}`; returns
    /// the raw JPEG bytes.
    pub async fn take_photo(&self, addr: &str, camera: &str, quality: u8) -> Result<Bytes, Error> {
        let mut url = Self::device_url(addr, "/api/camera/photo")?;
        url.query_pairs_mut()
            .append_pair("camera", camera)
            .append_pair("quality", &quality.to_string());
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                addr: addr.into(),
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes().await?)
    }

    // ── Response helpers ─────────────────────────────────────────────

    async fn parse_json<T: DeserializeOwned>(
        addr: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Http {
                addr: addr.into(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => Err(Error::Deserialization {
                message: e.to_string(),
                body,
            }),
        }
    }
}
