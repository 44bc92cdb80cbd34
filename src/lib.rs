pub mod error;
pub mod job;
pub mod parser;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types at the crate root for convenience
pub use error::CatError;
pub use job::{InputSpec, JobConfig};
pub use parser::{parse, Parsed};
pub use pipeline::concat_videos;
pub use utils::{Config, FFmpeg, Invocation, ProcessRunner, TempSettings, TempStreams, ToolRunner};
