//! Pipeline module - load, classify, summarize and analyze

pub mod categorical;
pub mod correlation;
pub mod distribution;
pub mod error;
pub mod loader;
pub mod missing;
pub mod pairwise;
pub mod schema;
pub mod session;
pub mod stats;
pub mod summary;
pub mod table;

pub use categorical::*;
pub use correlation::*;
pub use distribution::*;
pub use error::*;
pub use loader::*;
pub use missing::*;
pub use pairwise::*;
pub use schema::*;
pub use session::*;
pub use summary::*;
pub use table::*;
