use crate::models::{Entity, EntityId, ListQuery, Pagination};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StorePhase {
    Idle,
    Loading,
}

/// Everything one resource store owns. Views read snapshots of this and
/// never mutate it directly.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreState<E> {
    pub items: Vec<E>,
    pub pagination: Option<Pagination>,
    pub saved: Vec<E>,
    pub saved_pagination: Option<Pagination>,
    pub current: Option<E>,
    pub query: Option<ListQuery>,
    pub error: Option<String>,
    pub(crate) in_flight: usize,
}

impl<E> Default for StoreState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
            saved: Vec::new(),
            saved_pagination: None,
            current: None,
            query: None,
            error: None,
            in_flight: 0,
        }
    }
}

impl<E: Entity> StoreState<E> {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn phase(&self) -> StorePhase {
        if self.is_loading() {
            StorePhase::Loading
        } else {
            StorePhase::Idle
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// First in-memory copy of `id`: current record, then list, then saved list.
    pub fn find(&self, id: EntityId) -> Option<&E> {
        self.current
            .iter()
            .chain(self.items.iter())
            .chain(self.saved.iter())
            .find(|entity| entity.id() == id)
    }

    pub fn holds(&self, id: EntityId) -> bool {
        self.find(id).is_some()
    }

    pub fn item_ids(&self) -> Vec<EntityId> {
        self.items.iter().map(Entity::id).collect()
    }
}
