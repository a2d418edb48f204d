pub mod config;
pub mod list;
pub mod note;
pub mod profile;
pub mod sync;
pub mod trash;
pub mod vfolder;
