//! Interface model resolution boundary

use crate::error::TransportError;
use crate::model::InterfaceModel;
use async_trait::async_trait;

/// Resolves a model identifier to the full set of entities the model declares
#[async_trait]
pub trait ModelResolver: Send + Sync {
    /// Fetch the entity set for a model identifier.
    ///
    /// The returned model is treated as immutable for the duration of the
    /// dispatch that requested it.
    async fn resolve_model(&self, model_id: &str) -> Result<InterfaceModel, TransportError>;
}
