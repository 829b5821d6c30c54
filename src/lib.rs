//! Junction Scheduler Library
//!
//! Lane priority scheduling for a four-way traffic junction. The library
//! runs headless; drivers feed it arrivals and read back cycle reports.

pub mod simulation;
