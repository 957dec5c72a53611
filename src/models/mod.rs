pub mod config;
pub mod market;
pub mod news;
pub mod prediction;
pub mod quote;
pub mod series;
pub mod stock;
