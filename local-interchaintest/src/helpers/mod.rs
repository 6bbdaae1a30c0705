pub mod astroport;
pub mod balances;
pub mod common;
pub mod covenant;
