pub mod contracts;
pub mod error;
pub mod helpers;
pub mod setup;
pub mod utils;
