pub mod download;
pub mod graph;
pub mod timeseries;

// Re-export command functions for convenience
pub use download::download;
pub use graph::graph;
pub use timeseries::timeseries;
