pub mod candidates;
pub mod pam;
pub mod scoring;
