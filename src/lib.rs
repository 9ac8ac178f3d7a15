pub mod block;
pub mod controls;
pub mod field;
pub mod game;
pub mod journal;
pub mod level;
pub mod screen;
pub mod shapes;
