//! Completion service port definition.

use crate::domain::AppError;
use crate::domain::prompt::CompletionRequest;

/// Port for the remote chat-completion service.
///
/// Implementations send one request and return the text of the first choice.
/// A response without content yields an empty string. Implementations never
/// retry; retry policy belongs to the caller.
pub trait CompletionGateway {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError>;
}

impl<T: CompletionGateway + ?Sized> CompletionGateway for &T {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError> {
        (**self).complete(request)
    }
}

impl<T: CompletionGateway + ?Sized> CompletionGateway for Box<T> {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError> {
        (**self).complete(request)
    }
}
