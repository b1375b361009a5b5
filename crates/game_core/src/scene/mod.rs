//! Scene seam
//!
//! A scene is where root objects live. The core only needs to hand objects
//! to a scene on construction and take them back on release; spatial
//! partitioning, streaming and rendering belong to concrete scenes.
//!
//! ## Ownership
//!
//! ```text
//! Registry ──strong──▶ GameObject ──strong──▶ Scene
//!                          ▲                    │
//!                          └──────weak──────────┘
//! ```
//!
//! Scenes never keep objects alive; the registry does.

mod list_scene;

pub use list_scene::ListScene;

use crate::object::{GameObject, GameObjectRef};
use std::rc::Rc;

/// Shared handle to a scene
pub type SceneRef = Rc<dyn Scene>;

/// Container for root objects
pub trait Scene {
    /// Place `object` at the opaque placement hint `quad_index`
    fn add_game_object(&self, object: &GameObjectRef, quad_index: &str);

    /// Forget `object`; unknown objects are ignored
    fn remove_game_object(&self, object: &GameObject);
}
