pub mod crates;
pub mod license;
pub mod run;
pub mod testing;
