pub mod errors;
pub mod pagination;
pub mod patch;

pub use errors::*;
pub use pagination::*;
pub use patch::*;
