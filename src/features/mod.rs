pub mod requests;
pub mod uploads;
