//! Item and inventory state.
//!
//! Item definitions come from the content tables; the inventory stores owned
//! copies with their quantities so the state stays self-contained for saves.

use super::status::StatusEffectKind;

/// Effect applied when a consumable is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConsumableEffect {
    Heal(u32),
    RestoreEnergy(u32),
    RemoveRadiation(u32),
    Status {
        kind: StatusEffectKind,
        duration: u32,
        value: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    Weapon { damage: u32 },
    Armor { defense: u32 },
    Consumable(ConsumableEffect),
    Material,
    Quest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub quantity: u32,
    pub stackable: bool,
    pub value: u32,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
        let stackable = matches!(kind, ItemKind::Consumable(_) | ItemKind::Material);
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            quantity: 1,
            stackable,
            value: 0,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn consumable_effect(&self) -> Option<ConsumableEffect> {
        match self.kind {
            ItemKind::Consumable(effect) => Some(effect),
            _ => None,
        }
    }
}

/// Items carried by the player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new(items: Vec<Item>) -> Self {
        let mut inventory = Self::default();
        for item in items {
            inventory.add(item);
        }
        inventory
    }

    /// Adds an item, merging stacks of stackable items with the same id.
    pub fn add(&mut self, item: Item) {
        if item.stackable
            && let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id)
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            return;
        }
        self.items.push(item);
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Removes one unit of the item, dropping the entry when it runs out.
    ///
    /// Returns the definition of the consumed unit.
    pub fn take_one(&mut self, id: &str) -> Option<Item> {
        let index = self.items.iter().position(|i| i.id == id)?;
        let entry = &mut self.items[index];
        let mut unit = entry.clone();
        unit.quantity = 1;
        entry.quantity = entry.quantity.saturating_sub(1);
        if entry.quantity == 0 {
            self.items.remove(index);
        }
        Some(unit)
    }

    pub fn quantity(&self, id: &str) -> u32 {
        self.items
            .iter()
            .filter(|i| i.id == id)
            .map(|i| i.quantity)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
