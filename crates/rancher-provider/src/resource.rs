//! Resource lifecycle contract.
//!
//! Each operation receives the resource's state record and updates it in
//! place. Clearing the record's ID tells the configuration tool the remote
//! object is gone.

use crate::error::ProviderError;
use crate::schema::ResourceSchema;
use crate::state::ResourceData;
use async_trait::async_trait;

#[async_trait]
pub trait Resource: Send + Sync {
    /// Attribute schema the configuration is validated against
    fn schema(&self) -> ResourceSchema;

    async fn create(&self, data: &mut ResourceData) -> Result<(), ProviderError>;
    async fn read(&self, data: &mut ResourceData) -> Result<(), ProviderError>;
    async fn update(&self, data: &mut ResourceData) -> Result<(), ProviderError>;
    async fn delete(&self, data: &mut ResourceData) -> Result<(), ProviderError>;

    /// Start tracking an existing remote object identified by `import_id`
    async fn import(&self, import_id: &str, data: &mut ResourceData) -> Result<(), ProviderError>;
}
