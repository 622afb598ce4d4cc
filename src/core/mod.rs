pub mod error;
pub mod history;
pub mod params;
pub mod record;
pub mod style;

pub use error::{ErrorKind, SparkError};
pub use history::History;
pub use params::{validate_seed, AspectRatio, GenerateParams, SeedMode, MAX_SEED, NUM_INFERENCE_STEPS};
pub use record::GenerationRecord;
pub use style::Style;
