pub mod events;
pub mod format;
