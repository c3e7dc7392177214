//! Sub-entity arena
//!
//! Sub-entities live in a private `hecs` world. Iteration follows spawn
//! order. Expired entities are only marked during a frame and despawned by
//! [`Pool::compact`] at its end, so removal never disturbs an iteration.

use hecs::{Entity, World};
use serde::Serialize;

use crate::render::Canvas;

/// Sub-entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SubEntityKind {
    Tentacle,
    FireBall,
    Crusher,
    FloatingEye,
    ProjectileOrb,
}

impl SubEntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            SubEntityKind::Tentacle => "tentacle",
            SubEntityKind::FireBall => "fireball",
            SubEntityKind::Crusher => "crusher",
            SubEntityKind::FloatingEye => "floating eye",
            SubEntityKind::ProjectileOrb => "orb",
        }
    }
}

/// Whether a sub-entity survives this update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Expired,
}

/// Something a boss spawns and keeps in a pool
pub trait SubEntity: Send + Sync + 'static {
    const KIND: SubEntityKind;

    fn draw(&self, canvas: &mut dyn Canvas, now: f32);
}

/// Stable reference to a pooled sub-entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(Entity);

/// Marks an entity for removal at the end of the frame
struct Retired;

/// Ordered collection of one sub-entity variant
pub struct Pool<T: SubEntity> {
    world: World,
    order: Vec<Entity>,
    _kind: std::marker::PhantomData<T>,
}

impl<T: SubEntity> Pool<T> {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            order: Vec::new(),
            _kind: std::marker::PhantomData,
        }
    }

    pub fn spawn(&mut self, item: T) -> Handle {
        let entity = self.world.spawn((item,));
        self.order.push(entity);
        Handle(entity)
    }

    fn is_retired(&self, entity: Entity) -> bool {
        self.world
            .entity(entity)
            .map(|e| e.has::<Retired>())
            .unwrap_or(true)
    }

    /// Run `update` on every live entity in spawn order. Entities reporting
    /// [`Lifecycle::Expired`] are retired. Returns how many expired.
    pub fn update_all(&mut self, mut update: impl FnMut(Handle, &mut T) -> Lifecycle) -> usize {
        let mut expired = Vec::new();
        for &entity in &self.order {
            if self.is_retired(entity) {
                continue;
            }
            if let Ok(mut item) = self.world.get::<&mut T>(entity) {
                if update(Handle(entity), &mut item) == Lifecycle::Expired {
                    expired.push(entity);
                }
            }
        }

        for &entity in &expired {
            let _ = self.world.insert_one(entity, Retired);
        }
        expired.len()
    }

    /// Visit every live entity in spawn order
    pub fn for_each(&self, mut visit: impl FnMut(Handle, &T)) {
        for &entity in &self.order {
            if self.is_retired(entity) {
                continue;
            }
            if let Ok(item) = self.world.get::<&T>(entity) {
                visit(Handle(entity), &item);
            }
        }
    }

    pub fn for_each_mut(&mut self, mut visit: impl FnMut(Handle, &mut T)) {
        for &entity in &self.order {
            if self.is_retired(entity) {
                continue;
            }
            if let Ok(mut item) = self.world.get::<&mut T>(entity) {
                visit(Handle(entity), &mut item);
            }
        }
    }

    /// Mark an entity for removal at the end of the frame
    pub fn retire(&mut self, handle: Handle) -> bool {
        if self.is_retired(handle.0) {
            return false;
        }
        self.world.insert_one(handle.0, Retired).is_ok()
    }

    /// Despawn everything retired this frame. Returns how many went.
    pub fn compact(&mut self) -> usize {
        let world = &mut self.world;
        let before = self.order.len();
        self.order.retain(|&entity| {
            let retired = world.entity(entity).map(|e| e.has::<Retired>()).unwrap_or(true);
            if retired {
                let _ = world.despawn(entity);
            }
            !retired
        });
        before - self.order.len()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        !self.is_retired(handle.0)
    }

    pub fn get(&self, handle: Handle) -> Option<hecs::Ref<'_, T>> {
        if self.is_retired(handle.0) {
            return None;
        }
        self.world.get::<&T>(handle.0).ok()
    }

    /// Number of live (not retired) entities
    pub fn len(&self) -> usize {
        self.order.iter().filter(|&&e| !self.is_retired(e)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything immediately
    pub fn clear(&mut self) {
        self.world.clear();
        self.order.clear();
    }

    pub fn draw_all(&self, canvas: &mut dyn Canvas, now: f32) {
        self.for_each(|_, item| item.draw(&mut *canvas, now));
    }
}

impl<T: SubEntity> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawList;

    struct Counter {
        id: u32,
        ticks: u32,
        lifetime: u32,
    }

    impl SubEntity for Counter {
        const KIND: SubEntityKind = SubEntityKind::FireBall;

        fn draw(&self, canvas: &mut dyn Canvas, _now: f32) {
            canvas.sprite("counter", crate::geometry::Vec2::ZERO, 255.0);
        }
    }

    fn counter(id: u32, lifetime: u32) -> Counter {
        Counter { id, ticks: 0, lifetime }
    }

    #[test]
    fn test_iterates_in_spawn_order() {
        let mut pool = Pool::new();
        for id in 0..5 {
            pool.spawn(counter(id, 10));
        }
        let mut seen = Vec::new();
        pool.for_each(|_, c| seen.push(c.id));
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_expired_neighbours_are_not_skipped() {
        let mut pool = Pool::new();
        pool.spawn(counter(0, 1));
        pool.spawn(counter(1, 1));
        pool.spawn(counter(2, 5));

        let mut visited = Vec::new();
        let expired = pool.update_all(|_, c| {
            visited.push(c.id);
            c.ticks += 1;
            if c.ticks >= c.lifetime {
                Lifecycle::Expired
            } else {
                Lifecycle::Alive
            }
        });

        assert_eq!(visited, vec![0, 1, 2]);
        assert_eq!(expired, 2);
        // Retired entities are gone from iteration before the compact
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.compact(), 2);

        let mut remaining = Vec::new();
        pool.for_each(|_, c| remaining.push((c.id, c.ticks)));
        assert_eq!(remaining, vec![(2, 1)]);
    }

    #[test]
    fn test_order_survives_removal_in_the_middle() {
        let mut pool = Pool::new();
        let handles: Vec<_> = (0..4).map(|id| pool.spawn(counter(id, 10))).collect();
        assert!(pool.retire(handles[1]));
        assert!(!pool.retire(handles[1]));
        pool.compact();

        let mut seen = Vec::new();
        pool.for_each(|_, c| seen.push(c.id));
        assert_eq!(seen, vec![0, 2, 3]);
        assert!(!pool.contains(handles[1]));
        assert_eq!(pool.get(handles[3]).map(|c| c.id), Some(3));
    }

    #[test]
    fn test_clear_and_draw() {
        let mut pool = Pool::new();
        pool.spawn(counter(0, 1));
        pool.spawn(counter(1, 1));

        let mut canvas = DrawList::new();
        pool.draw_all(&mut canvas, 0.0);
        assert_eq!(canvas.count_sprites("counter"), 2);

        pool.clear();
        assert!(pool.is_empty());
    }
}
