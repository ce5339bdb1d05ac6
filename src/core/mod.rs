pub mod auto_advance;
pub mod backlog;
pub mod config;
pub mod controller;
pub mod frame;
pub mod generator;
pub mod sprite;
pub mod timer;
pub mod typewriter;
pub mod visibility;
