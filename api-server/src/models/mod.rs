//! Request/response contracts

pub mod scan;

pub use scan::*;
