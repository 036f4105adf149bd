//! Built-in byte sources

pub mod capture;
pub mod memory;

pub use capture::CaptureSource;
pub use memory::MemorySource;
