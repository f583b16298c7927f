pub mod editing;
pub mod highlights;
pub mod io;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::*;
pub use highlights::*;
pub use io::*;
