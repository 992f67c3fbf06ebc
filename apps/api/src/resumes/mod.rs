pub mod files;
pub mod handlers;
