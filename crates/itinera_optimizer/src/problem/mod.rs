pub mod big_m;
pub mod destination;
pub mod run_params;
pub mod trip;
pub mod trip_catalog;
