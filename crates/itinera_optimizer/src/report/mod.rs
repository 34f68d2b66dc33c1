pub mod enumeration_report;
pub mod solution_record;
pub mod validator;
