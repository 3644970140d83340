pub mod claim;
pub mod config;
pub mod history;
pub mod result;
pub mod settings;
pub mod transcript;
