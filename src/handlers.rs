pub mod settings;
pub mod users;
pub mod views;
