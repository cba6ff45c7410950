//! Safe SQL builder: identifiers from registration only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
