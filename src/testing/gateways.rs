use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::domain::AppError;
use crate::domain::assembly::CancellationToken;
use crate::domain::prompt::CompletionRequest;
use crate::ports::{CompletionGateway, ImageGateway, ImageRequest};

/// Completion gateway answering from a fixed script.
///
/// Once the script runs out every call returns an empty completion.
#[derive(Default)]
pub struct ScriptedGateway {
    responses: RefCell<VecDeque<Result<String, AppError>>>,
    requests: RefCell<Vec<CompletionRequest>>,
    failure: Option<(u16, String)>,
    cancel_after: RefCell<Option<(usize, CancellationToken)>>,
}

impl ScriptedGateway {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    pub fn always_empty() -> Self {
        Self::default()
    }

    /// Every call fails with the given status and body.
    pub fn failing(status: u16, body: &str) -> Self {
        Self { failure: Some((status, body.to_string())), ..Self::default() }
    }

    pub fn push_error(&self, error: AppError) {
        self.responses.borrow_mut().push_back(Err(error));
    }

    /// Cancel `token` once `calls` requests have been answered.
    pub fn cancel_after_calls(&self, calls: usize, token: CancellationToken) {
        *self.cancel_after.borrow_mut() = Some((calls, token));
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl CompletionGateway for ScriptedGateway {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError> {
        self.requests.borrow_mut().push(request.clone());
        if let Some((calls, token)) = self.cancel_after.borrow().as_ref() {
            if self.call_count() >= *calls {
                token.cancel();
            }
        }
        if let Some((status, body)) = &self.failure {
            return Err(AppError::Gateway { status: *status, body: body.clone() });
        }
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| Ok(String::new()))
    }
}

/// Image gateway returning fixed bytes, or failing when built with `failing`.
#[derive(Default)]
pub struct FakeImageGateway {
    bytes: Vec<u8>,
    fail: bool,
    requests: RefCell<Vec<ImageRequest>>,
    calls: Cell<usize>,
}

impl FakeImageGateway {
    pub fn returning(bytes: &[u8]) -> Self {
        Self { bytes: bytes.to_vec(), ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.get()
    }
}

impl ImageGateway for FakeImageGateway {
    fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>, AppError> {
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push(request.clone());
        if self.fail {
            return Err(AppError::Gateway { status: 400, body: "image rejected".to_string() });
        }
        Ok(self.bytes.clone())
    }
}

/// Solid-colour PNG of the given size.
pub fn encoded_png(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 120, 40])));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}
