//! File and image I/O kept apart from the pure filter and extraction logic

pub mod io;

pub use io::{write_atomic, ImageIOService};
