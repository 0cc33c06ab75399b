pub mod canvas;
pub mod data;
pub mod fs_refs;
pub mod gui;
pub mod persistence;
pub mod state;
