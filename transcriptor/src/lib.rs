//! Image to text transcriptor.
//!
//! Upload an image, pick the language of its text, extract it with
//! Tesseract, then review, edit and download the result as a `.txt` file.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod ocr;
pub mod session;
