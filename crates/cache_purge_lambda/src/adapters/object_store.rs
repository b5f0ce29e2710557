use async_trait::async_trait;
use cache_purge_core::metadata::MetadataPatch;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, String>;

    async fn set_metadata(
        &self,
        bucket: &str,
        key: &str,
        patch: &MetadataPatch,
    ) -> Result<(), String>;
}

#[async_trait]
impl<'a, T: ObjectStore + ?Sized> ObjectStore for &'a T {
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, String> {
        (**self).exists(bucket, key).await
    }

    async fn set_metadata(
        &self,
        bucket: &str,
        key: &str,
        patch: &MetadataPatch,
    ) -> Result<(), String> {
        (**self).set_metadata(bucket, key, patch).await
    }
}
