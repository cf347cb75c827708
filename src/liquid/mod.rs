pub mod exec;
pub mod wallet;
