pub mod dosing;
pub mod file_formats;
pub mod parameter;
pub mod product;
pub mod reading;
pub mod tank;
