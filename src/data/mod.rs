pub mod mock;
pub mod provider;
