pub mod category;
pub mod health;
pub mod post;
pub mod user;
