//! The seam between the tab shell and the HTTP services

use crate::error::Result;
use async_trait::async_trait;

/// One backend capability: turns a typed request into a typed response
///
/// A gateway makes exactly one HTTP attempt per call and never retries.
/// Gateways serving several request shapes implement the trait once per shape.
#[async_trait]
pub trait Gateway<Req>: Send + Sync
where
    Req: Send + Sync,
{
    type Response: Send;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn call(&self, request: &Req) -> Result<Self::Response>;
}
