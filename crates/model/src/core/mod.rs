pub mod run_date;
pub mod value;
