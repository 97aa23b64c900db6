//! Resource id allocation.
//!
//! The allocator hands out free ids in five independent namespaces, each
//! over `1..=9999`. It stays uninitialized until the first allocation; that
//! call scans the entity list once to learn which ids are taken. After the
//! scan, the list's change journal ([`IdAllocator::sync`]) keeps it current
//! without rescanning.

use std::collections::BTreeSet;

use levelkit_foundation::{Error, ErrorKind, Namespace, Result, Value, MAX_ID, MIN_ID};
use levelkit_schema::codec;
use tracing::debug;

use crate::entity::Entity;
use crate::list::EntityList;

const NAMESPACES: usize = Namespace::ALL.len();

#[derive(Clone, Debug, Default)]
struct Pool {
    used: BTreeSet<i64>,
    free: BTreeSet<i64>,
}

impl Pool {
    fn seeded(used: BTreeSet<i64>) -> Self {
        let free = (MIN_ID..=MAX_ID).filter(|id| !used.contains(id)).collect();
        Self { used, free }
    }

    fn mark(&mut self, id: i64) {
        self.free.remove(&id);
        self.used.insert(id);
    }
}

/// Hands out unused ids per namespace.
///
/// `Uninitialized --(first next/next_many)--> Active --(reset)--> Uninitialized`
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    pools: Option<[Pool; NAMESPACES]>,
    reserved: [BTreeSet<i64>; NAMESPACES],
}

impl IdAllocator {
    /// Creates an uninitialized allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the entity list has been scanned.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.pools.is_some()
    }

    /// Returns the smallest free id in `namespace` and marks it used.
    ///
    /// # Errors
    ///
    /// Returns `AllocatorExhausted` if no ids remain.
    pub fn next(&mut self, namespace: Namespace, list: &EntityList) -> Result<i64> {
        let pool = &mut self.activate(list)[namespace.index()];
        let id = pool
            .free
            .pop_first()
            .ok_or_else(|| Error::exhausted(namespace))?;
        pool.used.insert(id);
        Ok(id)
    }

    /// Returns `count` free ids in allocation order.
    ///
    /// # Errors
    ///
    /// Returns `AllocatorExhausted` if fewer than `count` ids remain; no ids
    /// are consumed in that case.
    pub fn next_many(
        &mut self,
        namespace: Namespace,
        count: usize,
        list: &EntityList,
    ) -> Result<Vec<i64>> {
        let pool = &mut self.activate(list)[namespace.index()];
        if pool.free.len() < count {
            return Err(Error::exhausted(namespace));
        }
        let ids: Vec<i64> = (0..count).filter_map(|_| pool.free.pop_first()).collect();
        pool.used.extend(ids.iter().copied());
        Ok(ids)
    }

    /// Marks an id as used so it is never handed out.
    ///
    /// Works before or after the scan; earlier reservations are merged into
    /// the scan's results.
    ///
    /// # Errors
    ///
    /// Returns `IdOutOfRange` for ids outside `1..=9999`.
    pub fn reserve(&mut self, namespace: Namespace, id: i64) -> Result<()> {
        if !(MIN_ID..=MAX_ID).contains(&id) {
            return Err(Error::new(ErrorKind::IdOutOfRange { namespace, id }));
        }
        match &mut self.pools {
            Some(pools) => pools[namespace.index()].mark(id),
            None => {
                self.reserved[namespace.index()].insert(id);
            }
        }
        Ok(())
    }

    /// Returns true if the id is known to be taken.
    #[must_use]
    pub fn is_used(&self, namespace: Namespace, id: i64) -> bool {
        match &self.pools {
            Some(pools) => pools[namespace.index()].used.contains(&id),
            None => self.reserved[namespace.index()].contains(&id),
        }
    }

    /// Returns the number of free ids, or `None` before the scan.
    #[must_use]
    pub fn free_count(&self, namespace: Namespace) -> Option<usize> {
        self.pools
            .as_ref()
            .map(|pools| pools[namespace.index()].free.len())
    }

    /// Forgets everything, including reservations.
    pub fn reset(&mut self) {
        self.pools = None;
        self.reserved = Default::default();
        debug!("id allocator reset");
    }

    /// Marks every id an entity carries as used. No-op before the scan.
    pub fn observe(&mut self, entity: &Entity) {
        if let Some(pools) = &mut self.pools {
            harvest(entity, |namespace, id| pools[namespace.index()].mark(id));
        }
    }

    /// Applies the list's journaled changes.
    ///
    /// Before the scan the journal is discarded, since the scan will see
    /// the same entities.
    pub fn sync(&mut self, list: &mut EntityList) {
        let changes = list.drain_changes();
        if self.pools.is_some() {
            for entity in &changes {
                self.observe(entity);
            }
        }
    }

    fn activate(&mut self, list: &EntityList) -> &mut [Pool; NAMESPACES] {
        let reserved = &self.reserved;
        self.pools.get_or_insert_with(|| scan(list, reserved))
    }
}

fn scan(list: &EntityList, reserved: &[BTreeSet<i64>; NAMESPACES]) -> [Pool; NAMESPACES] {
    let mut used = reserved.clone();
    for entity in list.iter() {
        harvest(entity, |namespace, id| {
            used[namespace.index()].insert(id);
        });
    }
    debug!(
        entities = list.len(),
        groups = used[Namespace::Group.index()].len(),
        items = used[Namespace::Item.index()].len(),
        colors = used[Namespace::Color.index()].len(),
        collisions = used[Namespace::Collision.index()].len(),
        controls = used[Namespace::Control.index()].len(),
        "scanned level for used ids"
    );
    used.map(Pool::seeded)
}

fn harvest(entity: &Entity, mut mark: impl FnMut(Namespace, i64)) {
    let registry = entity.validator().registry();
    let mut take = |namespace, id: i64| {
        if (MIN_ID..=MAX_ID).contains(&id) {
            mark(namespace, id);
        }
    };
    for (key, namespace) in registry.id_fields(entity.entity_type()) {
        match entity.get(*key) {
            Some(Value::Int(id)) => take(*namespace, *id),
            Some(Value::Groups(groups)) => {
                for id in groups.iter() {
                    take(*namespace, *id);
                }
            }
            Some(Value::Remap(remap)) => {
                for (source, target) in remap.iter() {
                    take(*namespace, *source);
                    take(*namespace, *target);
                }
            }
            Some(Value::Str(text)) => {
                if let Ok(ids) = codec::parse_int_list(text) {
                    for id in ids.iter() {
                        take(*namespace, *id);
                    }
                }
            }
            _ => {}
        }
    }
}
