// Business domains
pub mod element_sets;
