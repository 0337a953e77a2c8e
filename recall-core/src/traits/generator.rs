use crate::errors::RecallResult;
use crate::models::PackedContext;

/// Downstream generation step consuming a packed context.
pub trait IGenerator: Send + Sync {
    /// Produce free-form text for `query` grounded in `context`.
    fn generate(&self, query: &str, context: &PackedContext) -> RecallResult<String>;

    fn name(&self) -> &str;
}
