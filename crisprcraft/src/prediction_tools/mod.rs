pub mod external_model;
pub mod features;
pub mod on_target;
