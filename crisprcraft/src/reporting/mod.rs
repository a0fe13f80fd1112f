pub mod pdf_report;
pub mod tables;
