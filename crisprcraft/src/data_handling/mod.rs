pub mod sequence_source;
