use crate::{
    catalog::model::{Catalog, SelectionMode},
    foundation::core::{CategoryId, PartId},
};

/// Current choice within one category; the variant follows the category's [`SelectionMode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionValue {
    /// Zero or one active option.
    Exclusive(Option<PartId>),
    /// Active options in insertion order, without duplicates.
    Additive(Vec<PartId>),
}

/// What a toggle did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    /// The part became active and nothing was displaced.
    Selected(PartId),
    /// An exclusive category swapped its active option.
    Replaced { previous: PartId, current: PartId },
    /// The part was active and is now inactive.
    Deselected(PartId),
    /// Nothing changed (ignored contract violation).
    Unchanged,
}

impl SelectionChange {
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl SelectionValue {
    /// Empty value of the right shape for `mode`.
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Exclusive => Self::Exclusive(None),
            SelectionMode::Additive => Self::Additive(Vec::new()),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Exclusive(_) => SelectionMode::Exclusive,
            Self::Additive(_) => SelectionMode::Additive,
        }
    }

    /// Active ids in display order.
    pub fn ids(&self) -> &[PartId] {
        match self {
            Self::Exclusive(slot) => slot.as_slice(),
            Self::Additive(ids) => ids,
        }
    }

    pub fn contains(&self, part_id: &str) -> bool {
        self.ids().iter().any(|id| id.as_str() == part_id)
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    pub(crate) fn toggle(&mut self, part_id: PartId) -> SelectionChange {
        match self {
            Self::Exclusive(slot) => match slot.take() {
                Some(active) if active == part_id => SelectionChange::Deselected(active),
                Some(previous) => {
                    *slot = Some(part_id.clone());
                    SelectionChange::Replaced {
                        previous,
                        current: part_id,
                    }
                }
                None => {
                    *slot = Some(part_id.clone());
                    SelectionChange::Selected(part_id)
                }
            },
            Self::Additive(ids) => {
                if let Some(pos) = ids.iter().position(|id| *id == part_id) {
                    SelectionChange::Deselected(ids.remove(pos))
                } else {
                    ids.push(part_id.clone());
                    SelectionChange::Selected(part_id)
                }
            }
        }
    }

    /// Reset to the empty form; returns whether anything was active.
    pub(crate) fn clear(&mut self) -> bool {
        let had_any = !self.is_empty();
        *self = Self::empty(self.mode());
        had_any
    }
}

/// Selection value of one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySlot {
    pub category: CategoryId,
    pub value: SelectionValue,
}

/// Per-category selections, in catalog declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionState {
    slots: Vec<CategorySlot>,
}

impl SelectionState {
    /// Empty state with one slot per catalog category.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let slots = catalog
            .categories()
            .iter()
            .map(|c| CategorySlot {
                category: c.id.clone(),
                value: SelectionValue::empty(c.selection_mode),
            })
            .collect();
        Self { slots }
    }

    pub fn slots(&self) -> &[CategorySlot] {
        &self.slots
    }

    pub fn get(&self, category_id: &str) -> Option<&SelectionValue> {
        self.slots
            .iter()
            .find(|s| s.category.as_str() == category_id)
            .map(|s| &s.value)
    }

    pub(crate) fn slot_mut(&mut self, category_id: &str) -> Option<&mut SelectionValue> {
        self.slots
            .iter_mut()
            .find(|s| s.category.as_str() == category_id)
            .map(|s| &mut s.value)
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut SelectionValue> {
        self.slots.iter_mut().map(|s| &mut s.value)
    }

    /// Total number of active ids.
    pub fn count(&self) -> usize {
        self.slots.iter().map(|s| s.value.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/selection/state.rs"]
mod tests;
