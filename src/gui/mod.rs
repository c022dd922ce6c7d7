pub mod application;
pub mod ring;
pub mod style;
pub mod types;
