//! Pathfinding on 4-connected grids with an observable A* engine.
//!
//! - **A\*** shortest-path search ([`AstarSearch`], [`search`]) that can be
//!   driven one expansion at a time and reports per-step [`SearchFrame`]s to a
//!   [`FrameSink`].
//! - **BFS** unweighted distance maps ([`bfs_map`]), used as the reference
//!   distance when checking search results and maze connectivity.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | BFS |
//! | [`WeightedPather`] : [`Pather`] | edge costs |
//! | [`AstarPather`] : [`WeightedPather`] | A* |

mod astar;
mod bfs;
mod distance;
mod error;
mod frame;
mod node;
mod traits;

pub use astar::{AstarSearch, SearchResult, SearchStats, SearchStatus, search};
pub use bfs::{DistanceMap, UNREACHABLE, bfs_map};
pub use distance::manhattan;
pub use error::SearchError;
pub use frame::{FrameSink, FrontierEntry, NoFrames, SearchFrame};
pub use traits::{AstarPather, Pather, WeightedPather};
