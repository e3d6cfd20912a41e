pub mod components;
pub mod systems;

use rustc_hash::FxHashMap;

use self::components::*;

/// Opaque entity id. Ids increase monotonically and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl Entity {
    pub fn id(self) -> u32 {
        self.0
    }
}

/// One component table: rows in insertion order plus an id -> row index.
///
/// Removal keeps the remaining rows in insertion order, so iteration order is
/// stable for the life of the table.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: Vec<(Entity, T)>,
    index: FxHashMap<Entity, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T> Table<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        let &row = self.index.get(&entity)?;
        Some(&self.rows[row].1)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let &row = self.index.get(&entity)?;
        Some(&mut self.rows[row].1)
    }

    /// Insert or overwrite. Overwriting keeps the row's position.
    pub fn insert(&mut self, entity: Entity, value: T) {
        match self.index.get(&entity) {
            Some(&row) => self.rows[row].1 = value,
            None => {
                self.index.insert(entity, self.rows.len());
                self.rows.push((entity, value));
            }
        }
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let row = self.index.remove(&entity)?;
        let (_, value) = self.rows.remove(row);
        for (shifted, _) in &self.rows[row..] {
            if let Some(slot) = self.index.get_mut(shifted) {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.rows.iter().map(|(e, v)| (*e, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.rows.iter_mut().map(|(e, v)| (*e, v))
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.rows.iter().map(|(e, _)| *e)
    }
}

/// A type stored in exactly one [`World`] table.
pub trait Component: Sized {
    fn table(world: &World) -> &Table<Self>;
    fn table_mut(world: &mut World) -> &mut Table<Self>;
}

macro_rules! component_tables {
    ($($field:ident: $ty:ty => $kind:ident),* $(,)?) => {
        /// Names a component table, for [`World::query`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ComponentKind {
            $($kind,)*
        }

        /// Component store: one table per component kind, keyed by entity.
        ///
        /// Tables are public so systems can borrow several of them at once.
        #[derive(Debug, Default)]
        pub struct World {
            next_entity: u32,
            $(pub $field: Table<$ty>,)*
        }

        $(
            impl Component for $ty {
                fn table(world: &World) -> &Table<Self> {
                    &world.$field
                }

                fn table_mut(world: &mut World) -> &mut Table<Self> {
                    &mut world.$field
                }
            }
        )*

        impl World {
            /// Number of rows in the table for `kind`.
            pub fn table_len(&self, kind: ComponentKind) -> usize {
                match kind {
                    $(ComponentKind::$kind => self.$field.len(),)*
                }
            }

            fn table_contains(&self, kind: ComponentKind, entity: Entity) -> bool {
                match kind {
                    $(ComponentKind::$kind => self.$field.contains(entity),)*
                }
            }

            fn table_entities(&self, kind: ComponentKind) -> Vec<Entity> {
                match kind {
                    $(ComponentKind::$kind => self.$field.entities().collect(),)*
                }
            }

            /// Remove every row belonging to `entity`. The id is not recycled.
            pub fn destroy_entity(&mut self, entity: Entity) {
                $(self.$field.remove(entity);)*
            }
        }
    };
}

component_tables! {
    transforms: Transform => Transform,
    bodies: PhysicsBody => Physics,
    inputs: InputIntent => Input,
    players: PlayerController => Player,
    interactables: Interactable => Interactable,
    scores: ScoreTracker => Score,
    heat: HeatTracker => Heat,
    heat_sources: HeatSource => HeatSource,
    humans: HumanAi => HumanAi,
    dogs: DogAi => DogAi,
    pigeons: PigeonFlock => Pigeons,
    triggers: TriggerVolume => Trigger,
    chains: ChainReaction => Chain,
    world_state: WorldState => WorldState,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id. The first id is 1.
    pub fn create_entity(&mut self) -> Entity {
        self.next_entity += 1;
        Entity(self.next_entity)
    }

    /// Insert or overwrite `entity`'s row in `C`'s table.
    pub fn add<C: Component>(&mut self, entity: Entity, value: C) {
        C::table_mut(self).insert(entity, value);
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        C::table(self).get(entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        C::table_mut(self).get_mut(entity)
    }

    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        C::table(self).contains(entity)
    }

    /// Entities present in every listed table.
    ///
    /// Scans the smallest requested table (first one on ties) and filters by
    /// membership in the rest, so results follow that table's insertion order.
    pub fn query(&self, kinds: &[ComponentKind]) -> Vec<Entity> {
        let Some(&smallest) = kinds.iter().min_by_key(|&&kind| self.table_len(kind)) else {
            return Vec::new();
        };
        self.table_entities(smallest)
            .into_iter()
            .filter(|&entity| kinds.iter().all(|&kind| self.table_contains(kind, entity)))
            .collect()
    }
}
