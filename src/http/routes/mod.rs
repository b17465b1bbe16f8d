//! HTTP route modules, one router per resource

pub mod health;
pub mod posts;
pub mod users;
