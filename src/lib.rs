//! Traffic Scenario Library
//!
//! Generates road networks, signal programs and traffic demand for a
//! microscopic traffic simulator, and writes them as its XML input files.

pub mod scenario;
