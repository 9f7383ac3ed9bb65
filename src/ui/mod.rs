pub mod app;
mod board;
mod debug_tools;
mod dialogs;
mod hud;
mod scene;
mod state;
