pub mod blog;
pub mod comment;
pub mod edit_proposal;
pub mod notification;
pub mod user;
