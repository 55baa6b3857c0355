pub mod extract;
pub mod findings;
pub mod module;
pub mod scoring;

pub mod error;
