// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod inspector;
pub mod logging;
pub mod models;
pub mod publisher;
pub mod push;
pub mod routes;
pub mod runtime;
pub mod scheduler;
pub mod sources;
pub mod version;
