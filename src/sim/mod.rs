//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep for physics, frame time only for camera and hazard
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies; presentation goes through events

pub mod aabb;
pub mod camera;
pub mod events;
pub mod hazard;
pub mod impulse;
pub mod knockback;
pub mod level;
pub mod motion;
pub mod state;
pub mod surface;
pub mod tick;
pub mod triggers;

pub use aabb::Aabb;
pub use camera::{Boundary, CameraMode, CameraScroller, Projection, Side};
pub use events::{NullPresenter, Presenter, SimEvent, SoundCue, Tint, dispatch_all};
pub use hazard::HazardCycle;
pub use impulse::{OneShot, apply_impulse};
pub use knockback::{JumpPad, Launcher, Projectile, Woofer, WooferOutput, WooferPhase};
pub use level::{Level, Platform};
pub use motion::MotionController;
pub use state::{
    CameraState, ChargeState, HazardCycleState, HazardPhase, ImpulseRequest, MotionState,
    PlayerState,
};
pub use surface::{
    ContactTag, ProbeHit, SurfaceClass, SurfaceClassifier, SurfaceProbe, SurfaceReading,
};
pub use tick::{JumpButton, TickInput, World};
pub use triggers::{TriggerKind, TriggerZone};
