pub mod mock;
pub mod openai;
pub mod searchapi;
// Recording stubs (feature-gated)
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod traits;

pub use mock::MockBookingProvider;
pub use openai::OpenAiLlmProvider;
pub use searchapi::SearchApiBookingProvider;
pub use traits::{AnalysisContext, BookingProvider, LlmProvider};
