pub mod shared;
pub mod speech;
pub mod translation;
