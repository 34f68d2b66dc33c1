pub mod controller;
pub mod enumeration_params;
