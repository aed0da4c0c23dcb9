pub mod assets;
pub mod catalog;
pub mod movies;
