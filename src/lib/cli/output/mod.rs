//! Defines operations or types that are related with send data to
//! a system shell
pub mod arguments;
pub mod executors;
