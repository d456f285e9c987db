//! Fish catalog and the inventory ledger
//!
//! The ledger only ever grows: successful catches credit one fish of a
//! catalog species. There is no debit path.

use serde::{Deserialize, Serialize};

use crate::error::FishingError;

/// Catalog entry describing a catchable species
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishKind {
    /// Stable lookup key
    pub key: String,
    pub display_name: String,
    /// Image shown in the catch notification / inventory panel
    pub image_ref: String,
}

impl FishKind {
    pub fn new(key: &str, display_name: &str, image_ref: &str) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            image_ref: image_ref.to_string(),
        }
    }
}

/// The four species found in the lake
pub fn default_catalog() -> Vec<FishKind> {
    vec![
        FishKind::new("golden_carp", "Golden Carp", "images/fish/golden_carp.png"),
        FishKind::new("silver_trout", "Silver Trout", "images/fish/silver_trout.png"),
        FishKind::new("spotted_bass", "Spotted Bass", "images/fish/spotted_bass.png"),
        FishKind::new("red_snapper", "Red Snapper", "images/fish/red_snapper.png"),
    ]
}

/// Read-only view of one ledger row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub key: String,
    pub display_name: String,
    pub image_ref: String,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct InventoryLedger {
    catalog: Vec<FishKind>,
    /// Parallel to `catalog`
    quantities: Vec<u32>,
}

impl InventoryLedger {
    pub fn new(catalog: Vec<FishKind>) -> Self {
        let quantities = vec![0; catalog.len()];
        Self { catalog, quantities }
    }

    pub fn catalog(&self) -> &[FishKind] {
        &self.catalog
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.catalog.iter().position(|k| k.key == key)
    }

    /// Add one fish of `key`, returning the new quantity
    pub fn credit(&mut self, key: &str) -> Result<u32, FishingError> {
        let index = self
            .index_of(key)
            .ok_or_else(|| FishingError::UnknownFishKind(key.to_string()))?;
        self.quantities[index] = self.quantities[index].saturating_add(1);
        Ok(self.quantities[index])
    }

    pub fn quantity(&self, key: &str) -> Option<u32> {
        self.index_of(key).map(|i| self.quantities[i])
    }

    /// Total fish across every species
    pub fn total(&self) -> u64 {
        self.quantities.iter().map(|&q| q as u64).sum()
    }

    /// Immutable copy of every row, in catalog order
    pub fn snapshot(&self) -> Vec<InventoryEntry> {
        self.catalog
            .iter()
            .zip(&self.quantities)
            .map(|(kind, &quantity)| InventoryEntry {
                key: kind.key.clone(),
                display_name: kind.display_name.clone(),
                image_ref: kind.image_ref.clone(),
                quantity,
            })
            .collect()
    }
}

impl Default for InventoryLedger {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}
