pub mod geo;
pub mod macros;
pub mod records;

pub use geo::*;
pub use records::*;
