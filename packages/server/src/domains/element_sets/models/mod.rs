pub mod element_set;

pub use element_set::{BatchOutcome, StoredElementSet};
