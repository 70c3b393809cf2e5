/// Filesystem discovery helpers.
pub mod fs;
