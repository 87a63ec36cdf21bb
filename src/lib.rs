//! Camera control core: a real-time, stateful pipeline that turns raw
//! input into a committed camera pose for a 3D game engine.
//!
//! Each tick the [`orchestrator::Orchestrator`] reads an [`input::InputSnapshot`],
//! integrates mouse-look, runs the active [`mode::Mode`], applies the
//! [`dynamics`] cinematic post-pass, resolves obstacle [`collision`], and
//! commits a yaw/pitch/location triple to the host's [`host::Camera`].
//!
//! The core never talks to a concrete renderer, physics engine, or input
//! backend directly — it only ever sees the trait contracts in [`host`]
//! and [`physics`]. Asset loading, rendering, audio, scripting, and
//! networking are the host's concern.

pub mod collision;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod hit;
pub mod host;
pub mod input;
pub mod math;
pub mod mode;
pub mod orchestrator;
pub mod physics;
pub mod transition;
pub mod zoom;

pub use config::Config;
pub use error::{Error, Result};
pub use hit::Hit;
pub use host::{Camera, Player, PlayerModel};
pub use input::InputSnapshot;
pub use mode::{Mode, ModeMeta, ModeRegistry, Quality};
pub use orchestrator::{Orchestrator, OrchestratorKeys};
pub use physics::{BodyId, PhysicsWorld};
