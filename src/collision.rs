//! Pairwise overlap tests and touch point classification.
//!
//! Every ordered pair (this, other) of live collidable objects is visited in
//! active-list insertion order and `this` gets its own `collision_action`.
//! A reaction runs before later pairs are measured, so an object moved or
//! flagged by an early pair is seen that way by later ones in the same tick.
//! With several simultaneous contacts the last writer wins.

use crate::context::SimulationContext;
use crate::engine::Rect;
use crate::object::{Entity, GameObject, ObjectTag};

/// Contact as seen from one participant. At most one side is set : `top`
/// means this participant rests on top of the other, `left` means it is on
/// the other's left, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Touch {
    pub tag: ObjectTag,
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Touch {
    pub fn is_side(&self) -> bool {
        self.left || self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoints {
    pub this: Touch,
    pub other: Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionData {
    pub touch_points: TouchPoints,
    pub other_slot: usize,
    pub other_rect: Rect,
    /// x that moves `this` clear of `other` on the side it came from, or
    /// centers it over `other` for a vertical contact
    pub new_x: f64,
}

impl CollisionData {
    pub fn this(&self) -> &Touch {
        &self.touch_points.this
    }

    pub fn other(&self) -> &Touch {
        &self.touch_points.other
    }
}

/// Measure `this` against `other`; `None` when they do not overlap
pub fn check(this: &Entity, other: &Entity) -> Option<CollisionData> {
    let a = this.rect();
    let b = other.rect();
    if !a.intersects(&b) {
        return None;
    }
    let (a_center, b_center) = (a.center(), b.center());

    // resting on top : feet inside the upper half of the other
    let this_on_top = a_center.y < b_center.y && a.bottom() - b.top() <= b.height() * 0.5;
    let this_beneath = b_center.y < a_center.y && b.bottom() - a.top() <= a.height() * 0.5;
    let vertical = this_on_top || this_beneath;
    let this_left = !vertical && a_center.x < b_center.x;
    let this_right = !vertical && a_center.x > b_center.x;

    let new_x = if this_left {
        b.left() - a.width()
    } else if this_right {
        b.right()
    } else {
        b_center.x - a.width() * 0.5
    };

    Some(CollisionData {
        touch_points: TouchPoints {
            this: Touch {
                tag: this.tag,
                top: this_on_top,
                bottom: this_beneath,
                left: this_left,
                right: this_right,
            },
            other: Touch {
                tag: other.tag,
                top: this_beneath,
                bottom: this_on_top,
                left: this_right,
                right: this_left,
            },
        },
        other_slot: other.slot,
        other_rect: b,
        new_x,
    })
}

fn takes_part(entity: &Entity) -> bool {
    entity.collidable && !entity.is_destroyed()
}

/// One full pass over the active list
pub fn collision_pass(objects: &mut [Box<dyn GameObject>], ctx: &mut SimulationContext) {
    for i in 0..objects.len() {
        for j in 0..objects.len() {
            if i == j {
                continue;
            }
            // re-read both sides every pair, earlier reactions may have
            // moved or destroyed either of them
            let collision = {
                let (this, other) = (objects[i].entity(), objects[j].entity());
                if !takes_part(this) {
                    break;
                }
                if !takes_part(other) {
                    continue;
                }
                check(this, other)
            };
            if let Some(collision) = collision {
                objects[i].collision_action(&collision, ctx);
            }
        }
    }
}
