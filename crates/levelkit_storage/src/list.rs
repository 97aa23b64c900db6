//! The mutation-tracked entity list.
//!
//! [`EntityList`] is the only way to change a level's entities. Every
//! insertion is validated, entities appended this session are remembered as
//! "added", and the list's [`Mode`] decides which edits are legal: a
//! live-connected list only grows.

use std::collections::HashSet;
use std::ops::{Index, Range};

use levelkit_foundation::{Error, ErrorKind, FieldKey, Result, Value};
use tracing::debug;

use crate::entity::Entity;

/// Connectivity mode, fixed for a list's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Backed by a file; every edit is allowed.
    File,
    /// Connected to a live editor; only appends and inserts are allowed.
    Live,
}

/// Stable identity of a stored entity, unaffected by index shifts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u64);

/// Value pattern for a [`PartialMatch`] field.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    /// The field must be present and equal to this value.
    Exactly(Value),
    /// The field must be present; its value is ignored.
    Present,
}

/// Selects entities for [`EntityList::delete_where`].
pub trait Matcher {
    /// Returns true if the entity is selected.
    fn matches(&self, entity: &Entity) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&Entity) -> bool,
{
    fn matches(&self, entity: &Entity) -> bool {
        self(entity)
    }
}

/// Structural match on a subset of fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartialMatch {
    patterns: Vec<(FieldKey, Pattern)>,
}

impl PartialMatch {
    /// Creates an empty match, which selects every entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `key` to equal `value`.
    #[must_use]
    pub fn with(mut self, key: FieldKey, value: impl Into<Value>) -> Self {
        self.patterns.push((key, Pattern::Exactly(value.into())));
        self
    }

    /// Requires `key` to be present with any value.
    #[must_use]
    pub fn present(mut self, key: FieldKey) -> Self {
        self.patterns.push((key, Pattern::Present));
        self
    }
}

impl Matcher for PartialMatch {
    fn matches(&self, entity: &Entity) -> bool {
        self.patterns.iter().all(|(key, pattern)| match (pattern, entity.get(*key)) {
            (Pattern::Present, Some(_)) => true,
            (Pattern::Exactly(expected), Some(actual)) => expected == actual,
            (_, None) => false,
        })
    }
}

#[derive(Clone, Debug)]
struct Slot {
    handle: Handle,
    entity: Entity,
}

/// Ordered entities of one level, with provenance tracking.
///
/// No `+` or `+=` is provided; use [`EntityList::extend`].
///
/// ```compile_fail
/// use levelkit_storage::{EntityList, Mode};
/// let a = EntityList::new(Mode::File);
/// let b = EntityList::new(Mode::File);
/// let _ = a + b;
/// ```
#[derive(Clone, Debug)]
pub struct EntityList {
    mode: Mode,
    slots: Vec<Slot>,
    added: HashSet<Handle>,
    next_handle: u64,
    watching: bool,
    changes: Vec<Entity>,
}

impl EntityList {
    /// Creates an empty list.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            slots: Vec::new(),
            added: HashSet::new(),
            next_handle: 0,
            watching: false,
            changes: Vec::new(),
        }
    }

    /// Returns the connectivity mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the entity at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.slots.get(index).map(|slot| &slot.entity)
    }

    /// Returns the handle of the entity at `index`.
    #[must_use]
    pub fn handle(&self, index: usize) -> Option<Handle> {
        self.slots.get(index).map(|slot| slot.handle)
    }

    /// Returns the current index of a handle.
    #[must_use]
    pub fn position(&self, handle: Handle) -> Option<usize> {
        self.slots.iter().position(|slot| slot.handle == handle)
    }

    /// Iterates over entities in order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().map(|slot| &slot.entity)
    }

    // =========================================================================
    // Growth (legal in both modes)
    // =========================================================================

    /// Validates and appends an entity, recording it as added.
    ///
    /// # Errors
    ///
    /// Returns the first field rejection.
    pub fn append(&mut self, entity: Entity) -> Result<Handle> {
        validate(&entity)?;
        Ok(self.push(entity, true))
    }

    /// Validates and inserts an entity at `index`, recording it as added.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if `index > len`, or a field rejection.
    pub fn insert(&mut self, index: usize, entity: Entity) -> Result<Handle> {
        self.check_insert_index(index)?;
        validate(&entity)?;
        let handle = self.fresh_handle();
        self.journal(&entity);
        self.slots.insert(index, Slot { handle, entity });
        self.added.insert(handle);
        Ok(handle)
    }

    /// Validates every entity, then appends them all.
    ///
    /// # Errors
    ///
    /// Returns the first rejection, with the offending position in the
    /// error context; nothing is appended in that case.
    pub fn extend(&mut self, entities: impl IntoIterator<Item = Entity>) -> Result<Vec<Handle>> {
        let entities: Vec<Entity> = entities.into_iter().collect();
        for (i, entity) in entities.iter().enumerate() {
            validate(entity).map_err(|e| at_index(e, i))?;
        }
        Ok(entities
            .into_iter()
            .map(|entity| self.push(entity, true))
            .collect())
    }

    /// Appends a trusted entity without validation or provenance.
    pub fn import_append(&mut self, entity: Entity) -> Handle {
        self.push(entity, false)
    }

    /// Appends trusted entities without validation or provenance.
    ///
    /// Returns the number of entities imported.
    pub fn import_extend(&mut self, entities: impl IntoIterator<Item = Entity>) -> usize {
        let before = self.slots.len();
        for entity in entities {
            self.push(entity, false);
        }
        let count = self.slots.len() - before;
        debug!(count, total = self.slots.len(), "imported entities");
        count
    }

    // =========================================================================
    // Edits (file mode only)
    // =========================================================================

    /// Replaces the entity at `index`, returning the old one.
    ///
    /// The slot keeps its handle and provenance.
    ///
    /// # Errors
    ///
    /// Returns `ModeViolation` in live mode, `IndexOutOfBounds`, or a field
    /// rejection.
    pub fn set(&mut self, index: usize, entity: Entity) -> Result<Entity> {
        self.require_file_mode("set")?;
        self.check_index(index)?;
        validate(&entity)?;
        self.journal(&entity);
        Ok(std::mem::replace(&mut self.slots[index].entity, entity))
    }

    /// Replaces a range of entities, returning the removed ones.
    ///
    /// Replacement entities are recorded as added.
    ///
    /// # Errors
    ///
    /// Returns `ModeViolation` in live mode, `IndexOutOfBounds`, or a field
    /// rejection; the list is unchanged on error.
    pub fn splice(
        &mut self,
        range: Range<usize>,
        entities: impl IntoIterator<Item = Entity>,
    ) -> Result<Vec<Entity>> {
        self.require_file_mode("splice")?;
        if range.start > range.end || range.end > self.slots.len() {
            return Err(Error::new(ErrorKind::IndexOutOfBounds {
                index: range.end,
                length: self.slots.len(),
            }));
        }
        let entities: Vec<Entity> = entities.into_iter().collect();
        for (i, entity) in entities.iter().enumerate() {
            validate(entity).map_err(|e| at_index(e, range.start + i))?;
        }

        let mut replacements = Vec::with_capacity(entities.len());
        for entity in entities {
            let handle = self.fresh_handle();
            self.journal(&entity);
            self.added.insert(handle);
            replacements.push(Slot { handle, entity });
        }
        let removed: Vec<Slot> = self.slots.splice(range, replacements).collect();
        Ok(removed
            .into_iter()
            .map(|slot| {
                self.added.remove(&slot.handle);
                slot.entity
            })
            .collect())
    }

    /// Removes and returns the entity at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ModeViolation` in live mode or `IndexOutOfBounds`.
    pub fn remove(&mut self, index: usize) -> Result<Entity> {
        self.require_file_mode("remove")?;
        self.check_index(index)?;
        Ok(self.take(index))
    }

    /// Removes the first entity equal to `entity`.
    ///
    /// # Errors
    ///
    /// Returns `ModeViolation` in live mode or `EntityNotFound`.
    pub fn delete(&mut self, entity: &Entity) -> Result<()> {
        self.require_file_mode("delete")?;
        let index = self
            .slots
            .iter()
            .position(|slot| slot.entity == *entity)
            .ok_or_else(|| Error::new(ErrorKind::EntityNotFound))?;
        self.take(index);
        Ok(())
    }

    /// Edits the entity at `index` in place through a closure.
    ///
    /// The closure works on a copy; it is stored back only if the closure
    /// succeeds. Writes made through [`Entity::set`] are validated as usual.
    ///
    /// # Errors
    ///
    /// Returns `ModeViolation` in live mode, `IndexOutOfBounds`, or the
    /// closure's error.
    pub fn modify<R>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut Entity) -> Result<R>,
    ) -> Result<R> {
        self.require_file_mode("modify")?;
        self.check_index(index)?;
        let mut entity = self.slots[index].entity.clone();
        let out = edit(&mut entity)?;
        self.journal(&entity);
        self.slots[index].entity = entity;
        Ok(out)
    }

    /// Deletes matching entities, scanning from the end.
    ///
    /// Stops after `limit` deletions when given. Returns the number deleted.
    ///
    /// # Errors
    ///
    /// Returns `ModeViolation` in live mode.
    pub fn delete_where(&mut self, matcher: &impl Matcher, limit: Option<usize>) -> Result<usize> {
        self.require_file_mode("delete_where")?;
        let limit = limit.unwrap_or(usize::MAX);
        let mut deleted = 0;
        for index in (0..self.slots.len()).rev() {
            if deleted >= limit {
                break;
            }
            if matcher.matches(&self.slots[index].entity) {
                self.take(index);
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    // =========================================================================
    // Provenance
    // =========================================================================

    /// Iterates over entities added this session, in list order.
    pub fn added(&self) -> impl Iterator<Item = &Entity> {
        self.slots
            .iter()
            .filter(|slot| self.added.contains(&slot.handle))
            .map(|slot| &slot.entity)
    }

    /// Returns the number of entities added this session.
    #[must_use]
    pub fn added_len(&self) -> usize {
        self.added.len()
    }

    /// Returns true if the entity at `index` was added this session.
    #[must_use]
    pub fn is_added(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .is_some_and(|slot| self.added.contains(&slot.handle))
    }

    /// Forgets which entities were added.
    pub fn clear_added(&mut self) {
        self.added.clear();
    }

    /// Adds `group` to every added entity.
    ///
    /// Used to tag new entities at export; allowed in both modes.
    ///
    /// # Errors
    ///
    /// Returns a field rejection; no entity is changed in that case.
    pub fn tag_added(&mut self, group: i64) -> Result<usize> {
        let mut tagged = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if self.added.contains(&slot.handle) {
                let mut entity = slot.entity.clone();
                entity.add_group(group).map_err(|e| at_index(e, index))?;
                tagged.push((index, entity));
            }
        }
        let count = tagged.len();
        for (index, entity) in tagged {
            self.journal(&entity);
            self.slots[index].entity = entity;
        }
        Ok(count)
    }

    // =========================================================================
    // Change journal
    // =========================================================================

    /// Starts or stops journaling incoming and modified entities.
    pub fn watch_ids(&mut self, enabled: bool) {
        self.watching = enabled;
        if !enabled {
            self.changes.clear();
        }
    }

    /// Returns true if the journal is active.
    #[must_use]
    pub const fn is_watching(&self) -> bool {
        self.watching
    }

    /// Takes every journaled entity snapshot.
    pub fn drain_changes(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.changes)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn fresh_handle(&mut self) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn push(&mut self, entity: Entity, added: bool) -> Handle {
        let handle = self.fresh_handle();
        self.journal(&entity);
        self.slots.push(Slot { handle, entity });
        if added {
            self.added.insert(handle);
        }
        handle
    }

    fn take(&mut self, index: usize) -> Entity {
        let slot = self.slots.remove(index);
        self.added.remove(&slot.handle);
        slot.entity
    }

    fn journal(&mut self, entity: &Entity) {
        if self.watching {
            self.changes.push(entity.clone());
        }
    }

    fn require_file_mode(&self, operation: &'static str) -> Result<()> {
        match self.mode {
            Mode::File => Ok(()),
            Mode::Live => Err(Error::mode_violation(operation)),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::IndexOutOfBounds {
                index,
                length: self.slots.len(),
            }))
        }
    }

    fn check_insert_index(&self, index: usize) -> Result<()> {
        if index <= self.slots.len() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::IndexOutOfBounds {
                index,
                length: self.slots.len(),
            }))
        }
    }
}

impl Index<usize> for EntityList {
    type Output = Entity;

    fn index(&self, index: usize) -> &Entity {
        &self.slots[index].entity
    }
}

fn validate(entity: &Entity) -> Result<()> {
    entity
        .validator()
        .validate_fields(entity.entity_type(), entity.fields())
}

fn at_index(err: Error, index: usize) -> Error {
    let context = err.context.clone().unwrap_or_default().with_index(index);
    err.with_context(context)
}
