//! Entity records
//!
//! An entity owns its forward geometric state: pose, shape descriptor,
//! collision group and a lazily resolved world-space shape. Which grid cells
//! it is filed under is owned by the spatial hash, not by the entity.

use super::RoomKey;
use crate::foundation::math::{distance, Vec2};
use crate::geometry::{Pose, ShapeDescriptor, WorldShape};
use bitflags::bitflags;
use std::borrow::Cow;
use std::cell::OnceCell;

slotmap::new_key_type! {
    /// Handle to a live entity
    pub struct EntityKey;
}

bitflags! {
    /// What changed on an entity since the last maintenance pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TransformChange: u8 {
        /// Position changed; the entity may belong to different cells
        const POSITION = 1 << 0;
        /// Scale changed
        const SCALE = 1 << 1;
        /// Rotation changed
        const ROTATION = 1 << 2;
        /// Shape descriptor was replaced
        const SHAPE = 1 << 3;
    }
}

/// Creation parameters for an entity
#[derive(Debug, Clone)]
pub struct EntityDesc {
    /// Gameplay type name, used by `meet`, `nearest` and `furthest`
    pub type_name: String,
    /// Placement
    pub pose: Pose,
    /// Collision shape in model space
    pub shape: ShapeDescriptor,
    /// Collision group used by group-filtered queries
    pub group: Option<String>,
}

impl EntityDesc {
    /// An unscaled, unrotated point entity of `type_name` at `(x, y)`
    pub fn new(type_name: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            type_name: type_name.into(),
            pose: Pose::at(Vec2::new(x, y)),
            shape: ShapeDescriptor::Point,
            group: None,
        }
    }

    /// Set the shape descriptor
    pub fn with_shape(mut self, shape: ShapeDescriptor) -> Self {
        self.shape = shape;
        self
    }

    /// Set the collision group
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the scale
    pub fn with_scale(mut self, x: f32, y: f32) -> Self {
        self.pose.scale = Vec2::new(x, y);
        self
    }

    /// Set the rotation in degrees
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.pose.rotation = degrees;
        self
    }
}

/// A live game object as seen by the collision engine
#[derive(Debug, Clone)]
pub struct Entity {
    uid: u64,
    type_name: String,
    room: RoomKey,
    pose: Pose,
    shape: ShapeDescriptor,
    group: Option<String>,
    /// Facing direction in degrees, updated by goal-seeking movement
    pub direction: f32,
    shape_cache: OnceCell<WorldShape>,
    changes: TransformChange,
    destroyed: bool,
}

impl Entity {
    pub(crate) fn new(uid: u64, room: RoomKey, desc: EntityDesc) -> Self {
        Self {
            uid,
            type_name: desc.type_name,
            room,
            pose: desc.pose,
            shape: desc.shape,
            group: desc.group,
            direction: 0.0,
            shape_cache: OnceCell::new(),
            changes: TransformChange::empty(),
            destroyed: false,
        }
    }

    /// Process-unique id, increasing in creation order
    pub fn uid(&self) -> u64 {
        self.uid
    }

    /// Gameplay type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Room the entity lives in
    pub fn room(&self) -> RoomKey {
        self.room
    }

    /// Current pose
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Current position
    pub fn position(&self) -> Vec2 {
        self.pose.position
    }

    /// Current scale
    pub fn scale(&self) -> Vec2 {
        self.pose.scale
    }

    /// Current rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.pose.rotation
    }

    /// Shape descriptor
    pub fn shape(&self) -> &ShapeDescriptor {
        &self.shape
    }

    /// Collision group
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Whether the entity is flagged for removal at the end of the frame
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Distance from the entity's origin to `point`
    pub fn distance_to(&self, point: Vec2) -> f32 {
        distance(self.pose.position, point)
    }

    /// Move to `position`
    pub fn set_position(&mut self, position: Vec2) {
        if position != self.pose.position {
            self.pose.position = position;
            self.touch(TransformChange::POSITION);
        }
    }

    /// Move by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.pose.position + delta);
    }

    /// Change the scale
    pub fn set_scale(&mut self, scale: Vec2) {
        if scale != self.pose.scale {
            self.pose.scale = scale;
            self.touch(TransformChange::SCALE);
        }
    }

    /// Change the rotation, in degrees
    pub fn set_rotation(&mut self, degrees: f32) {
        if degrees != self.pose.rotation {
            self.pose.rotation = degrees;
            self.touch(TransformChange::ROTATION);
        }
    }

    /// Replace the shape descriptor wholesale
    pub fn set_shape(&mut self, shape: ShapeDescriptor) {
        self.shape = shape;
        self.touch(TransformChange::SHAPE);
    }

    /// Change the collision group
    pub fn set_group(&mut self, group: Option<String>) {
        self.group = group;
    }

    fn touch(&mut self, change: TransformChange) {
        self.shape_cache = OnceCell::new();
        self.changes |= change;
    }

    /// World-space shape for the current pose, resolved on first use
    pub fn world_shape(&self, ellipse_segments: usize) -> &WorldShape {
        self.shape_cache
            .get_or_init(|| self.shape.resolve(&self.pose, ellipse_segments))
    }

    /// World-space shape as if the entity stood at `position`
    ///
    /// Leaves the entity untouched; `None` or the current position reuses
    /// the cached shape.
    pub fn shape_at(&self, position: Option<Vec2>, ellipse_segments: usize) -> Cow<'_, WorldShape> {
        match position {
            Some(position) if position != self.pose.position => Cow::Owned(
                self.shape.resolve(&self.pose.with_position(position), ellipse_segments),
            ),
            _ => Cow::Borrowed(self.world_shape(ellipse_segments)),
        }
    }

    /// Drop the cached world shape so the next read resolves it again
    pub fn invalidate_shape(&mut self) {
        self.shape_cache = OnceCell::new();
    }

    /// Whether a resolved shape is currently cached
    pub fn has_cached_shape(&self) -> bool {
        self.shape_cache.get().is_some()
    }

    pub(crate) fn take_changes(&mut self) -> TransformChange {
        std::mem::take(&mut self.changes)
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }
}
