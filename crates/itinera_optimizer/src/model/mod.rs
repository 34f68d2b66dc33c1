pub mod decision_assignment;
pub mod mip_model;
pub mod model_builder;
