pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod outlet;
pub mod pipeline;
pub mod search;

// Re-export commonly used types
pub use config::Config;
pub use error::ResearchError;
pub use pipeline::ReportPipeline;
pub use pipeline::workflow::launch;
