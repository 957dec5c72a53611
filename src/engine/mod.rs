pub mod catalog;
pub mod display;
pub mod loader;
pub mod pages;
pub mod series;
pub mod tabs;
