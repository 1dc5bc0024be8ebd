pub mod error;
pub mod lookup;
pub mod models;
pub mod offset;
