pub mod auth;
pub mod items;
pub mod meta;
pub mod pages;
pub mod profile;
