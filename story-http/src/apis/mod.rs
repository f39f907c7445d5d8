pub mod download;
pub mod form;
pub mod story;
