pub mod artwork;
pub mod export;
pub mod gallery;
pub mod kodi;
pub mod render;
