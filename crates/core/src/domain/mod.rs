pub mod catalog;
pub mod contract;
pub mod prediction;
pub mod query;
pub mod recent;
