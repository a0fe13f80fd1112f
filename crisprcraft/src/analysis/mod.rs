pub mod histograms;
pub mod off_target;
pub mod summary;
