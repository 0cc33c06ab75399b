pub mod connect;
pub mod controller;
pub mod disconnect;
pub mod live_cache;
