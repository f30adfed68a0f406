pub mod auth;
pub mod health;
pub mod patients;
pub mod users;
