// HTTP routes
pub mod element_sets;
pub mod health;

pub use element_sets::*;
pub use health::*;
