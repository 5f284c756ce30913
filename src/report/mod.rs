//! Report module - terminal, SVG, HTML and JSON rendering of a dashboard

pub mod charts;
pub mod console;
pub mod export;
pub mod html;

pub use charts::*;
pub use console::*;
pub use export::*;
pub use html::*;
