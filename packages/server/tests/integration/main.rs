mod auth;
mod comment;
mod common;
mod notification;
mod suggestion;
