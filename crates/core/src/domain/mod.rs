mod engine;
mod issue;

pub use engine::{ConfigPayload, EngineDescriptor, EngineMetadata, EXCLUDE_PATHS_KEY};
pub use issue::Issue;
