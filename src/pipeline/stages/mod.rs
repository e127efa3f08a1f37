pub mod analyst;
pub mod miner;
pub mod publisher;
pub mod writer;

pub use analyst::Analyst;
pub use miner::Miner;
pub use publisher::Publisher;
pub use writer::Writer;
