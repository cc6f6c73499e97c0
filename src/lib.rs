pub mod combination;
pub mod config;
pub mod cursor;
pub mod error;
pub mod events;
pub mod index;
pub mod scan;
pub mod selection;
pub mod session;
pub mod slideshow;
pub mod thumbnails;
pub mod tasks {
    pub mod commands;
    pub mod controller;
    pub mod viewer;
    pub mod watch;
}
