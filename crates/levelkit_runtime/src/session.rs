//! Level editing sessions.
//!
//! A [`Session`] owns everything one level edit needs: the entity list, the
//! id allocator that reads it, the codec, and the binding the level came
//! from. Nothing is process-wide, so independent sessions can coexist.
//!
//! The allocator observes the list through the list's change journal. Every
//! allocator call first drains the journal, so ids written through
//! [`Session::list_mut`] are never handed out again.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use levelkit_foundation::{EntityType, Error, ErrorKind, Namespace, Result, Value};
use levelkit_schema::{BuiltinDefaults, Registry, Validator};
use levelkit_storage::{Entity, EntityBuilder, EntityList, Handle, IdAllocator, Mode};
use tracing::debug;

use crate::config::SessionConfig;
use crate::source::{LevelSink, LevelSource, LiveChannel, ObjectStringFile};
use crate::transcode::{ObjectCodec, RawObject, TokenTranscoder};

enum Binding {
    Detached,
    File(ObjectStringFile),
    Live(Box<dyn LiveChannel>),
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached => f.write_str("Detached"),
            Self::File(file) => f.debug_tuple("File").field(&file.path()).finish(),
            Self::Live(_) => f.write_str("Live"),
        }
    }
}

fn at_index(mut err: Error, index: usize) -> Error {
    let context = err.context.take().unwrap_or_default().with_index(index);
    err.with_context(context)
}

/// One level being edited.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    codec: ObjectCodec,
    list: EntityList,
    ids: IdAllocator,
    binding: Binding,
}

impl Session {
    /// Creates a session over an empty level with the built-in schema.
    ///
    /// # Errors
    ///
    /// Returns `IdOutOfRange` if the configured tag group is outside the
    /// group domain.
    pub fn new(mode: Mode, config: SessionConfig) -> Result<Self> {
        let validator = Validator::new(Arc::new(Registry::builtin()), config.validation.clone());
        let builder = EntityBuilder::new(validator, Arc::new(BuiltinDefaults));
        let codec = ObjectCodec::new(builder, Arc::new(TokenTranscoder));
        Self::with_codec(mode, config, codec)
    }

    /// Creates a session over an empty level with a custom codec.
    ///
    /// # Errors
    ///
    /// Returns `IdOutOfRange` for an out-of-domain tag group.
    pub fn with_codec(mode: Mode, config: SessionConfig, codec: ObjectCodec) -> Result<Self> {
        let mut list = EntityList::new(mode);
        list.watch_ids(true);
        let mut session = Self {
            config,
            codec,
            list,
            ids: IdAllocator::new(),
            binding: Binding::Detached,
        };
        session.reserve_tag()?;
        Ok(session)
    }

    /// Opens a level file for file-mode editing.
    ///
    /// # Errors
    ///
    /// Returns an I/O, parse, or decode error.
    pub fn open_file(path: impl AsRef<Path>, config: SessionConfig) -> Result<Self> {
        let mut session = Self::new(Mode::File, config)?;
        let mut file = ObjectStringFile::new(path.as_ref());
        let objects = file.load()?;
        session.load(&objects)?;
        session.binding = Binding::File(file);
        Ok(session)
    }

    /// Connects to a live editor and loads its current level.
    ///
    /// # Errors
    ///
    /// Returns a channel or decode error.
    pub fn open_live(mut channel: Box<dyn LiveChannel>, config: SessionConfig) -> Result<Self> {
        let mut session = Self::new(Mode::Live, config)?;
        let objects = channel.load()?;
        session.load(&objects)?;
        session.binding = Binding::Live(channel);
        Ok(session)
    }

    /// Imports wire objects as trusted, pre-existing entities.
    ///
    /// Objects carrying the tag group were produced by an earlier session
    /// and are dropped. Returns the number of entities kept.
    ///
    /// # Errors
    ///
    /// Returns the first object that cannot be decoded; nothing is imported
    /// in that case.
    pub fn load(&mut self, objects: &[RawObject]) -> Result<usize> {
        let tag = self.config.tag_group;
        let mut entities = Vec::with_capacity(objects.len());
        for (index, object) in objects.iter().enumerate() {
            let entity = self
                .codec
                .decode_trusted(object)
                .map_err(|e| at_index(e, index))?;
            if tag.is_some_and(|tag| entity.in_group(tag)) {
                continue;
            }
            entities.push(entity);
        }
        let dropped = objects.len() - entities.len();
        let kept = self.list.import_extend(entities);
        debug!(kept, dropped, "loaded level");
        Ok(kept)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the connectivity mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.list.mode()
    }

    /// Returns the codec.
    #[must_use]
    pub const fn codec(&self) -> &ObjectCodec {
        &self.codec
    }

    /// Returns the entity list.
    #[must_use]
    pub const fn list(&self) -> &EntityList {
        &self.list
    }

    /// Returns the entity list for editing.
    pub fn list_mut(&mut self) -> &mut EntityList {
        &mut self.list
    }

    /// Returns the id allocator.
    #[must_use]
    pub const fn allocator(&self) -> &IdAllocator {
        &self.ids
    }

    /// Constructs a fresh entity with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a default is rejected.
    pub fn construct(&self, ty: EntityType) -> Result<Entity> {
        self.codec.builder().construct(ty)
    }

    /// Appends an entity to the level.
    ///
    /// # Errors
    ///
    /// Returns the first rejected field.
    pub fn append(&mut self, entity: Entity) -> Result<Handle> {
        self.list.append(entity)
    }

    // =========================================================================
    // Ids
    // =========================================================================

    /// Returns a free id in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `AllocatorExhausted` if none remain.
    pub fn next_id(&mut self, namespace: Namespace) -> Result<i64> {
        self.ids.sync(&mut self.list);
        self.ids.next(namespace, &self.list)
    }

    /// Returns `count` free ids in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `AllocatorExhausted` if fewer than `count` remain.
    pub fn next_ids(&mut self, namespace: Namespace, count: usize) -> Result<Vec<i64>> {
        self.ids.sync(&mut self.list);
        self.ids.next_many(namespace, count, &self.list)
    }

    /// Marks an id as used.
    ///
    /// # Errors
    ///
    /// Returns `IdOutOfRange` for ids outside `1..=9999`.
    pub fn reserve_id(&mut self, namespace: Namespace, id: i64) -> Result<()> {
        self.ids.sync(&mut self.list);
        self.ids.reserve(namespace, id)
    }

    /// Forgets every allocation; the next request rescans the level.
    ///
    /// The tag group stays reserved.
    ///
    /// # Errors
    ///
    /// Returns `IdOutOfRange` for an out-of-domain tag group.
    pub fn reset_ids(&mut self) -> Result<()> {
        self.ids.reset();
        self.ids.sync(&mut self.list);
        self.reserve_tag()
    }

    fn reserve_tag(&mut self) -> Result<()> {
        match self.config.tag_group {
            Some(tag) => self.ids.reserve(Namespace::Group, tag),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Runs the configured export checks over the whole level.
    ///
    /// # Errors
    ///
    /// Returns `ExportRejected` listing every failure, each with the index
    /// of its entity.
    pub fn check(&self) -> Result<()> {
        let checks = &self.config.export;
        let mut failures = Vec::new();

        if checks.revalidate {
            let validator = self.codec.builder().validator();
            for (index, entity) in self.list.iter().enumerate() {
                if let Err(e) = validator.validate_fields(entity.entity_type(), entity.fields()) {
                    failures.push(at_index(e, index));
                }
            }
        }

        if checks.targets_exist {
            let mut carried = HashSet::new();
            for entity in self.list.iter() {
                carried.extend(entity.groups().iter().copied());
            }
            let registry = self.codec.builder().validator().registry();
            for (index, entity) in self.list.iter().enumerate() {
                let ty = entity.entity_type();
                for (key, namespace) in registry.id_fields(ty) {
                    if *namespace != Namespace::Group {
                        continue;
                    }
                    if let Some(Value::Int(target)) = entity.get(*key) {
                        if !carried.contains(target) {
                            let err = Error::invalid_value(
                                ty,
                                *key,
                                Value::Int(*target),
                                format!("group {target} is not carried by any entity"),
                                Some(entity.fields().clone()),
                            );
                            failures.push(at_index(err, index));
                        }
                    }
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::ExportRejected(failures)))
        }
    }

    /// Writes the whole level to `path`, whatever the session's binding.
    ///
    /// Returns the number of objects written.
    ///
    /// # Errors
    ///
    /// Returns `ExportRejected` or an I/O error. Nothing in the session
    /// changes unless the write succeeds.
    pub fn export_to_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        self.check()?;
        let objects = self.encode_tagged(false)?;
        ObjectStringFile::new(path.as_ref()).store(&objects)?;
        self.finish_export(objects.len())?;
        Ok(objects.len())
    }

    /// Exports to the bound source.
    ///
    /// A file binding rewrites the whole level. A live binding sends only
    /// the entities added since the last export. Returns the number of
    /// objects written or sent.
    ///
    /// # Errors
    ///
    /// Returns `ModeViolation` for a session with no binding,
    /// `ExportRejected`, or an I/O or channel error. Nothing in the session
    /// changes unless the write succeeds.
    pub fn export(&mut self) -> Result<usize> {
        let added_only = match self.binding {
            Binding::Detached => return Err(Error::unbound("export")),
            Binding::File(_) => false,
            Binding::Live(_) => true,
        };
        self.check()?;
        let objects = self.encode_tagged(added_only)?;
        match &mut self.binding {
            Binding::File(file) => file.store(&objects)?,
            Binding::Live(channel) => channel.send(&objects)?,
            Binding::Detached => {}
        }
        self.finish_export(objects.len())?;
        Ok(objects.len())
    }

    /// Encodes the level with the tag group stamped on added entities. The
    /// list itself is left untagged until the write succeeds.
    fn encode_tagged(&self, added_only: bool) -> Result<Vec<RawObject>> {
        let tag = self.config.tag_group;
        let mut objects = Vec::with_capacity(self.list.len());
        for (index, entity) in self.list.iter().enumerate() {
            let added = self.list.is_added(index);
            if added_only && !added {
                continue;
            }
            match tag {
                Some(tag) if added => {
                    let mut tagged = entity.clone();
                    tagged.add_group(tag).map_err(|e| at_index(e, index))?;
                    objects.push(self.codec.encode(&tagged));
                }
                _ => objects.push(self.codec.encode(entity)),
            }
        }
        Ok(objects)
    }

    fn finish_export(&mut self, written: usize) -> Result<()> {
        if let Some(tag) = self.config.tag_group {
            let tagged = self.list.tag_added(tag)?;
            debug!(tagged, tag, "tagged added entities");
        }
        self.list.clear_added();
        debug!(written, total = self.list.len(), "exported level");
        self.reset_ids()
    }
}
