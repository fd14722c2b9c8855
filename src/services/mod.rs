// src/services/mod.rs
pub mod analysis_client;
pub mod clipboard;
pub mod image_processor;

pub use analysis_client::{AnalysisBackend, HttpAnalysisClient};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use image_processor::ImageProcessor;
