//! **mazestar-core** — coordinate types shared by the maze generator and the
//! search engine.
//!
//! This crate provides the grid geometry primitives: [`Cell`] positions,
//! half-open [`Range`] rectangles, and the four cardinal [`Dir`]ections used
//! for passage bookkeeping.

pub mod geom;

pub use geom::{Cell, Dir, Range, RangeIter};
