//! Collision detection between bodies
//!
//! Everything is approximated by circles except the hero, which is a box.
//! Both checks walk every enemy against every candidate; counts are small
//! enough that no spatial partitioning is needed.

use glam::Vec2;

use super::entity::{Body, Entity};
use super::player::Player;
use super::pool::{EntityId, Pool, PoolKind};

/// A collider striking an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaserHit {
    pub enemy: EntityId,
    pub collider: EntityId,
    /// Enemy position at impact (where the explosion goes)
    pub point: Vec2,
    /// Whether the kill is worth points
    pub scores: bool,
}

/// Result of checking the hero against the enemy field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerContact {
    /// Enemies burnt by the fire shield
    pub explosions: Vec<Vec2>,
    /// An enemy reached an unshielded hero
    pub fatal: bool,
}

impl PlayerContact {
    pub fn clear() -> Self {
        Self::default()
    }
}

/// Two circles overlap when their centers are closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Circle against an axis-aligned box given by center and half extents.
/// Any circle whose center lies inside the box grown by `radius` on each axis
/// is in contact.
pub fn circle_box_contact(box_center: Vec2, half: Vec2, circle: Vec2, radius: f32) -> bool {
    let dist = (circle - box_center).abs();
    dist.x <= half.x + radius && dist.y <= half.y + radius
}

/// Destroy every enemy/collider pair that touches and report the hits.
///
/// Destroyed bodies are skipped, so a collider that already hit something
/// this tick cannot hit again.
pub fn resolve_laser_hits(pool: &mut Pool<Body>, colliders: &[EntityId]) -> Vec<LaserHit> {
    let mut hits = Vec::new();

    for enemy_id in pool.ids(PoolKind::Enemies) {
        for &collider_id in colliders {
            if collider_id == enemy_id {
                continue;
            }
            let (Some(enemy), Some(collider)) = (pool.get(enemy_id), pool.get(collider_id))
            else {
                continue;
            };
            if enemy.destroyed {
                break;
            }
            if collider.destroyed
                || !circles_overlap(enemy.position, enemy.size, collider.position, collider.size)
            {
                continue;
            }

            hits.push(LaserHit {
                enemy: enemy_id,
                collider: collider_id,
                point: enemy.position,
                scores: collider.is_projectile() && !enemy.effected,
            });

            if let Some(enemy) = pool.get_mut(enemy_id) {
                enemy.destroy();
            }
            if let Some(collider) = pool.get_mut(collider_id) {
                collider.destroy();
            }
        }
    }

    hits
}

/// Check the hero against every live enemy.
///
/// With the fire shield up, touching enemies are destroyed. Without it the
/// first touch is fatal and the scan stops there.
pub fn resolve_player_contact(player: &Player, pool: &mut Pool<Body>) -> PlayerContact {
    let mut contact = PlayerContact::clear();
    if player.destroyed {
        return contact;
    }

    let center = player.center();
    let half = player.half_extents();

    for enemy in pool.slice_mut(PoolKind::Enemies) {
        if enemy.destroyed || !circle_box_contact(center, half, enemy.position, enemy.size) {
            continue;
        }

        if player.fire_active {
            contact.explosions.push(enemy.position);
            enemy.destroy();
        } else {
            contact.fatal = true;
            break;
        }
    }

    contact
}
