pub mod dir_sync;
pub mod resolver;
