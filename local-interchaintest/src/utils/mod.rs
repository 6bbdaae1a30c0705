pub mod constants;
pub mod file_system;
pub mod genesis;
pub mod ibc;
pub mod ibc_paths;
pub mod polling;
pub mod queries;
pub mod relayer;
pub mod setup;
pub mod stride;
pub mod test_context;
pub mod types;
