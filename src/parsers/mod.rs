//! Processing of extracted page markup.

pub mod images;

pub use images::{ImageReference, ImageRewriter, find_images};
