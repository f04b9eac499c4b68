//! Generation port - Interface for dispatching one prompt to one model

use async_trait::async_trait;
use domain::Endpoint;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for text generation
///
/// One call is one request: implementations must not retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenerationPort: Send + Sync {
    /// Send `prompt` to `model` at `endpoint` and return the trimmed result text
    async fn generate(
        &self,
        endpoint: &Endpoint,
        model: &str,
        prompt: &str,
    ) -> Result<String, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn GenerationPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GenerationPort>();
    }
}
