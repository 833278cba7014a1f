pub mod dynamics;
pub mod error;
pub mod export;
pub mod projection;
pub mod render;
pub mod simulation;
