//! Game implementations.

pub mod breakthrough;
