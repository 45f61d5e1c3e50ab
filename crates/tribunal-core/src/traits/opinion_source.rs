use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::OpinionError;
use crate::models::{ItemContext, Opinion, UserContext};
use crate::persona::CriticPersona;

/// Everything a critic gets to see for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpinionRequest {
    pub user: UserContext,
    pub item: ItemContext,
}

/// Produces a critic's opinion, typically by prompting a language model.
///
/// Implementations report failures as [`OpinionError`]; the engine adds its
/// own per-call timeout on top.
#[async_trait]
pub trait IOpinionSource: Send + Sync {
    async fn generate_opinion(
        &self,
        critic: &CriticPersona,
        request: &OpinionRequest,
    ) -> Result<Opinion, OpinionError>;
}
