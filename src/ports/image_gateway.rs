//! Image generation port definition.

use crate::domain::AppError;

/// Request for one generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    /// Dimensions as `WIDTHxHEIGHT`.
    pub size: String,
}

/// Port for the remote image-generation service.
pub trait ImageGateway {
    /// Generate an image and return its decoded bytes.
    fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>, AppError>;
}

impl<T: ImageGateway + ?Sized> ImageGateway for Box<T> {
    fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>, AppError> {
        (**self).generate(request)
    }
}
