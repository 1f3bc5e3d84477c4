pub mod error;
pub mod slice;
