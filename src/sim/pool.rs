//! Fixed-capacity projectile pools
//!
//! Each owner category gets its own arena of bullet slots sized once at
//! construction. Acquiring from a full pool yields `None` and the shot is
//! simply not fired.

use glam::Vec2;

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A pooled projectile slot
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: BulletOwner,
    pub active: bool,
}

impl Bullet {
    fn idle(owner: BulletOwner) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            owner,
            active: false,
        }
    }
}

/// Arena of bullet slots for one owner category
#[derive(Debug, Clone)]
pub struct BulletPool {
    owner: BulletOwner,
    slots: Vec<Bullet>,
}

impl BulletPool {
    pub fn new(owner: BulletOwner, capacity: usize) -> Self {
        Self {
            owner,
            slots: (0..capacity).map(|_| Bullet::idle(owner)).collect(),
        }
    }

    pub fn owner(&self) -> BulletOwner {
        self.owner
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Claim an inactive slot, placing it at `pos` with velocity `vel`.
    /// Returns the slot index, or `None` when every slot is live.
    pub fn acquire(&mut self, pos: Vec2, vel: Vec2) -> Option<usize> {
        let index = self.slots.iter().position(|b| !b.active)?;
        let slot = &mut self.slots[index];
        slot.pos = pos;
        slot.vel = vel;
        slot.active = true;
        Some(index)
    }

    /// Return a slot to the pool. Releasing an idle or out-of-range slot is a no-op.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.active = false;
        }
    }

    pub fn get(&self, index: usize) -> Option<&Bullet> {
        self.slots.get(index)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|b| b.active).count()
    }

    /// Live bullets with their slot index
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Bullet)> {
        self.slots.iter().enumerate().filter(|(_, b)| b.active)
    }

    /// Move live bullets and release the ones that left `bounds` (min, max)
    pub fn advance(&mut self, dt: f32, bounds: (Vec2, Vec2)) {
        let (min, max) = bounds;
        for slot in self.slots.iter_mut().filter(|b| b.active) {
            slot.pos += slot.vel * dt;
            if slot.pos.x < min.x || slot.pos.x > max.x || slot.pos.y < min.y || slot.pos.y > max.y {
                slot.active = false;
            }
        }
    }

    /// Deactivate every slot (session reset)
    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }
}

/// The pools for both categories
#[derive(Debug, Clone)]
pub struct BulletPools {
    pub player: BulletPool,
    pub enemy: BulletPool,
}

impl BulletPools {
    pub fn new(player_capacity: usize, enemy_capacity: usize) -> Self {
        Self {
            player: BulletPool::new(BulletOwner::Player, player_capacity),
            enemy: BulletPool::new(BulletOwner::Enemy, enemy_capacity),
        }
    }

    pub fn pool_mut(&mut self, owner: BulletOwner) -> &mut BulletPool {
        match owner {
            BulletOwner::Player => &mut self.player,
            BulletOwner::Enemy => &mut self.enemy,
        }
    }

    pub fn acquire(&mut self, owner: BulletOwner, pos: Vec2, vel: Vec2) -> Option<usize> {
        self.pool_mut(owner).acquire(pos, vel)
    }

    pub fn release(&mut self, owner: BulletOwner, index: usize) {
        self.pool_mut(owner).release(index);
    }
}
