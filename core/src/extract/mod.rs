pub mod assemble;
pub mod block;
pub mod bullets;
pub mod normalize;
pub mod profile;
pub mod questions;
pub mod segment;
pub mod synthesize;
