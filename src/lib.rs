pub mod app;
pub mod color;
pub mod geometry;
pub mod renderer;
pub mod scene;
pub mod time;
