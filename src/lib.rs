pub mod api;
pub mod config;
pub mod content_type;
pub mod dispatch;
pub mod field;
pub mod observability;
pub mod providers;
pub mod settings;
