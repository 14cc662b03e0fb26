pub mod attribute;
pub mod compliance;
pub mod diff;
pub mod lookup;
