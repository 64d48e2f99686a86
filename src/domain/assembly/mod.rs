//! Iterative draft expansion and structural conformance.

mod assembler;
mod cancellation;
mod outcome;

pub use assembler::{Assembler, AssemblyPolicy};
pub use cancellation::CancellationToken;
pub use outcome::{ArticleOutcome, AssemblyStatus, Phase, ProgressEvent};
