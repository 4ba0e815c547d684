//! Grid mazes: the passage model, seeded generation and text layouts.

pub mod generator;
pub mod layout;
pub mod maze;

pub use generator::{GenConfig, GenError, MazeGenerator, generate};
pub use layout::LayoutError;
pub use maze::{GridMaze, MazeError};
