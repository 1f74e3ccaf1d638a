pub mod reducer;
pub mod service;
