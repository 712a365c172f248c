pub mod content;
pub mod init;
pub mod metadata;
pub mod projects;
pub mod theme;
pub mod validate;
