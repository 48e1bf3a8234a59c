pub mod config;
pub mod driver;
pub mod game;
pub mod grid;
pub mod input;
pub mod piece;
pub mod shape;
pub mod ui;
