pub mod auth;
pub mod data;
pub mod health;
pub mod hello;

pub use auth::check_auth_handler;
pub use data::get_data_handler;
pub use health::health_handler;
pub use hello::hello_world_handler;
