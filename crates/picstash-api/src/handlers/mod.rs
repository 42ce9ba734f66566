pub mod health;
pub mod photo_get;
pub mod photo_upload;
