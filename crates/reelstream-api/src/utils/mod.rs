pub mod range;
pub mod upload;
