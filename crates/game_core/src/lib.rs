//! # Game Core
//!
//! Lifecycle and component composition for the objects of a real-time scene.
//!
//! ## Features
//!
//! - **GameObjects**: named, identified containers of components with a
//!   strict five-state lifecycle
//! - **Components**: behaviour units that receive lifecycle, per-frame and
//!   collision callbacks in a stable order
//! - **Deferred mutation**: adds, removes and releases requested mid-dispatch
//!   are queued and applied on the next resolve pass
//! - **Transform hierarchy**: every object carries a transform; child objects
//!   compose their parent's world matrix
//! - **Registry and scenes**: pluggable seams for object tracking and placement
//!
//! ## Quick Start
//!
//! ```rust
//! use game_core::prelude::*;
//!
//! let manager = GameManager::new();
//! let services = manager.services();
//! let scene: SceneRef = ListScene::shared("level");
//!
//! let ship = GameObject::new_in_scene(&services, Some(&scene), "ship", "q0");
//! let turret = GameObject::new_child(&services, Some(&ship), "turret");
//!
//! manager.run_frame(1.0 / 60.0);
//! assert!(ship.is_initialized());
//! assert!(turret.is_initialized());
//!
//! manager.release_all();
//! assert!(ship.is_released());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod config;
pub mod foundation;
pub mod object;
pub mod registry;
pub mod scene;

/// Common imports for core users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, CoreConfig, FrameConfig, ObjectConfig},
        foundation::{
            logging,
            math::{Mat4, Quat, Vec3},
            time::{FrameClock, Stopwatch},
        },
        object::{
            component_ref, CollisionEvent, CollisionInfo, ComponentLifecycle, ComponentRef,
            GameObject, GameObjectComponent, GameObjectRef, LifecycleStatus, Message, MessageArg,
            Messenger, ObjectId, Transform,
        },
        registry::{GameManager, Registry, Services},
        scene::{ListScene, Scene, SceneRef},
    };
}
