// ── Device capability seam ──
//
// Everything the engine needs from a single tablet. `KioskClient` is the
// production implementation; tests plug in scripted fakes.

use async_trait::async_trait;
use bytes::Bytes;

use kioskhub_api::{Error as ApiError, KioskClient, StatusResponse};

use crate::command::KioskCommand;

/// Per-device remote operations, addressed by `host:port`.
#[async_trait]
pub trait DeviceCapability: Send + Sync {
    /// Full status block of the tablet.
    async fn fetch_status(&self, addr: &str) -> Result<StatusResponse, ApiError>;

    /// Send a one-way command. `Ok` means the tablet executed it.
    async fn execute(&self, addr: &str, command: &KioskCommand) -> Result<(), ApiError>;

    /// JPEG from one of the tablet cameras.
    async fn take_photo(&self, addr: &str, camera: &str, quality: u8)
    -> Result<Bytes, ApiError>;
}

#[async_trait]
impl DeviceCapability for KioskClient {
    async fn fetch_status(&self, addr: &str) -> Result<StatusResponse, ApiError> {
        KioskClient::fetch_status(self, addr).await
    }

    async fn execute(&self, addr: &str, command: &KioskCommand) -> Result<(), ApiError> {
        let body = command.body();
        self.post_command(addr, &command.path(), body.as_ref())
            .await
            .map(|_| ())
    }

    async fn take_photo(
        &self,
        addr: &str,
        camera: &str,
        quality: u8,
    ) -> Result<Bytes, ApiError> {
        KioskClient::take_photo(self, addr, camera, quality).await
    }
}
