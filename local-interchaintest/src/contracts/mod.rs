//! JSON message shapes of the covenant contracts the suites drive.
//!
//! Only the parts the harness sends or reads are mirrored; the contracts
//! themselves are deployed from prebuilt artifacts.

pub mod common;
pub mod stride;
pub mod swap;
pub mod two_party_pol;
