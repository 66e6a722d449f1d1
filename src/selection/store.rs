use std::sync::Arc;

use crate::{
    catalog::model::{Catalog, PartOption, SelectionMode},
    foundation::{
        config::ContractPolicy,
        core::PartId,
        error::{CarfitError, CarfitResult},
    },
    selection::state::{SelectionChange, SelectionState, SelectionValue},
};

/// Owns the [`SelectionState`] and enforces per-category selection rules.
///
/// Every mutation bumps [`SelectionStore::revision`]; owners of derived state (preview, generation
/// result) compare revisions to know when their data went stale.
#[derive(Clone, Debug)]
pub struct SelectionStore {
    catalog: Arc<Catalog>,
    state: SelectionState,
    policy: ContractPolicy,
    revision: u64,
}

impl SelectionStore {
    pub fn new(catalog: Arc<Catalog>, policy: ContractPolicy) -> Self {
        let state = SelectionState::for_catalog(&catalog);
        Self {
            catalog,
            state,
            policy,
            revision: 0,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn policy(&self) -> ContractPolicy {
        self.policy
    }

    /// Monotonic mutation counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Toggle `part_id` within `category_id`.
    ///
    /// Exclusive categories deselect the active option when it is toggled again and swap
    /// otherwise. Additive categories add or remove the id. A part that is not an option of the
    /// category is an [`CarfitError::InvalidSelection`] under [`ContractPolicy::Strict`] and a
    /// logged no-op under [`ContractPolicy::Lenient`].
    pub fn toggle(&mut self, category_id: &str, part_id: &str) -> CarfitResult<SelectionChange> {
        if !self.catalog.is_option_of(category_id, part_id) {
            return self.contract_violation(category_id, part_id);
        }
        let Some(slot) = self.state.slot_mut(category_id) else {
            return self.contract_violation(category_id, part_id);
        };

        let change = slot.toggle(PartId::new(part_id));
        self.revision += 1;
        tracing::debug!(
            category = category_id,
            part = part_id,
            ?change,
            revision = self.revision,
            "selection toggled"
        );
        Ok(change)
    }

    /// Reset one category to its empty form. Returns whether anything was cleared.
    pub fn clear_category(&mut self, category_id: &str) -> bool {
        let Some(slot) = self.state.slot_mut(category_id) else {
            tracing::warn!(category = category_id, "clear_category on unknown category ignored");
            return false;
        };
        let cleared = slot.clear();
        if cleared {
            self.revision += 1;
            tracing::debug!(category = category_id, revision = self.revision, "category cleared");
        }
        cleared
    }

    /// Reset every category. Returns whether anything was cleared.
    pub fn clear_all(&mut self) -> bool {
        let mut cleared = false;
        for slot in self.state.slots_mut() {
            cleared |= slot.clear();
        }
        if cleared {
            self.revision += 1;
            tracing::debug!(revision = self.revision, "selection cleared");
        }
        cleared
    }

    /// Selection value of one category.
    pub fn selection(&self, category_id: &str) -> Option<&SelectionValue> {
        self.state.get(category_id)
    }

    /// Every selected part: exclusive categories first, then additive ones, each group in
    /// category declaration order and additive ids in insertion order.
    pub fn selected_parts(&self) -> Vec<&PartOption> {
        let exclusive = self
            .state
            .slots()
            .iter()
            .filter(|s| s.value.mode() == SelectionMode::Exclusive);
        let additive = self
            .state
            .slots()
            .iter()
            .filter(|s| s.value.mode() == SelectionMode::Additive);

        exclusive
            .chain(additive)
            .flat_map(|s| s.value.ids())
            .filter_map(|id| self.catalog.part(id.as_str()))
            .collect()
    }

    /// Selected parts in paint order: ascending `stacking_index`, ties by catalog declaration.
    pub fn selected_layers(&self) -> Vec<&PartOption> {
        let mut layers = self.selected_parts();
        layers.sort_by_key(|p| {
            (
                p.stacking_index,
                self.catalog
                    .declaration_index(p.id.as_str())
                    .unwrap_or(usize::MAX),
            )
        });
        layers
    }

    pub fn total_price(&self) -> u64 {
        self.selected_parts().iter().map(|p| p.price).sum()
    }

    pub fn selection_count(&self) -> usize {
        self.state.count()
    }

    pub fn is_selected(&self, part_id: &str) -> bool {
        self.state.slots().iter().any(|s| s.value.contains(part_id))
    }

    fn contract_violation(
        &self,
        category_id: &str,
        part_id: &str,
    ) -> CarfitResult<SelectionChange> {
        match self.policy {
            ContractPolicy::Strict => Err(CarfitError::invalid_selection(category_id, part_id)),
            ContractPolicy::Lenient => {
                tracing::warn!(
                    category = category_id,
                    part = part_id,
                    "ignoring toggle of part outside its category"
                );
                Ok(SelectionChange::Unchanged)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/selection/store.rs"]
mod tests;
