use async_trait::async_trait;

/// Raw answer of the edge cache to a purge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl PurgeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait PurgeClient: Send + Sync {
    /// `Err` means no HTTP response was received at all.
    async fn send_purge(&self, url: &str) -> Result<PurgeResponse, String>;
}

#[async_trait]
impl<'a, T: PurgeClient + ?Sized> PurgeClient for &'a T {
    async fn send_purge(&self, url: &str) -> Result<PurgeResponse, String> {
        (**self).send_purge(url).await
    }
}
