//! playloop core
//!
//! Editing an ordered, hierarchical per-frame update tree (insert before/after, remove,
//! replace by node identity) and running one of its nodes at an independent period.
//!
//! The host owns the tree; edits are made on a copy and installed whole.

pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod fixed_rate;
pub mod frame;
pub mod host;
pub mod identity;
pub mod node;
pub mod phase;
pub mod registry;
pub mod runner;
pub mod signals;
pub mod telemetry;
pub mod time;

pub use config::LoopConfig;
pub use context::LoopSystems;
pub use editor::InsertPosition;
pub use error::{LoopError, LoopResult};
pub use fixed_rate::{FixedRateOverride, PeriodElapsed};
pub use frame::Frame;
pub use host::{ActiveTree, LoopHost};
pub use identity::NodeId;
pub use node::{handler, Handler, UpdateNode};
pub use phase::FramePhase;
pub use runner::PlayerLoop;
pub use signals::ExitSignal;
pub use time::Time;
