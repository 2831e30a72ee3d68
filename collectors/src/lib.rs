pub mod activity;
pub mod chats;
pub mod config;
pub mod exec;
pub mod gitlog;
pub mod locate;
pub mod parse;
pub mod plans;
