pub mod check;
pub mod endings;
pub mod play;
pub mod scenes;
pub mod summary;
