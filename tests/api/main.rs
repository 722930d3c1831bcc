mod comment;
mod feed;
mod follow;
mod garage;
mod helpers;
mod login;
mod user_register;
