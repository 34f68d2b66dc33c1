pub mod good_lp_solver;
pub mod solver_adapter;
