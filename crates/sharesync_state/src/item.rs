//! Items and inventories.

use crate::error::{StateError, StateResult};
use crate::fingerprint::{Fold, StateHash};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Number of equipped (armor) slots.
pub const ARMOR_SLOTS: usize = 4;

/// Default number of container slots.
pub const CONTAINER_SLOTS: usize = 36;

/// A stack of items in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item kind, e.g. `minecraft:diamond`.
    pub kind: String,
    /// Number of items in the stack.
    pub amount: u32,
    /// Accumulated damage.
    #[serde(default)]
    pub damage: u32,
    /// Display name override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    /// Enchantment levels by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub enchantments: BTreeMap<String, u32>,
}

impl ItemStack {
    /// Creates a plain stack.
    pub fn new(kind: impl Into<String>, amount: u32) -> Self {
        Self {
            kind: kind.into(),
            amount,
            damage: 0,
            custom_name: None,
            enchantments: BTreeMap::new(),
        }
    }

    /// Sets the damage.
    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    /// Adds an enchantment, replacing any previous level.
    pub fn with_enchantment(mut self, name: impl Into<String>, level: u32) -> Self {
        self.enchantments.insert(name.into(), level);
        self
    }
}

impl StateHash for ItemStack {
    fn state_hash(&self) -> i32 {
        let enchantments = self
            .enchantments
            .iter()
            .fold(Fold::new(), |fold, pair| fold.push(&pair))
            .finish();

        Fold::new()
            .push(&self.kind)
            .push(&self.amount)
            .push(&self.damage)
            .push(&self.custom_name)
            .push_raw(enchantments)
            .finish()
    }
}

/// Reference to one inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRef {
    /// Container slot by index.
    Container(usize),
    /// Equipped slot by index (0 = feet, 3 = head).
    Armor(usize),
    /// Auxiliary hand.
    Offhand,
}

impl FromStr for SlotRef {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "offhand" => Ok(SlotRef::Offhand),
            "feet" | "boots" => Ok(SlotRef::Armor(0)),
            "legs" | "leggings" => Ok(SlotRef::Armor(1)),
            "chest" | "chestplate" => Ok(SlotRef::Armor(2)),
            "head" | "helmet" => Ok(SlotRef::Armor(3)),
            other => other
                .parse::<usize>()
                .map(SlotRef::Container)
                .map_err(|_| StateError::UnknownSlot(s.to_string())),
        }
    }
}

/// Inventory contents of a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Container slots in positional order.
    pub contents: Vec<Option<ItemStack>>,
    /// Equipped slots (feet, legs, chest, head).
    #[serde(default)]
    pub armor: [Option<ItemStack>; ARMOR_SLOTS],
    /// Auxiliary hand slot.
    #[serde(default)]
    pub offhand: Option<ItemStack>,
}

impl Inventory {
    /// Creates an empty inventory with the default container size.
    pub fn empty() -> Self {
        Self::with_container_slots(CONTAINER_SLOTS)
    }

    /// Creates an empty inventory with `slots` container slots.
    pub fn with_container_slots(slots: usize) -> Self {
        Self {
            contents: vec![None; slots],
            armor: Default::default(),
            offhand: None,
        }
    }

    /// Returns an empty inventory with the same container size.
    pub fn cleared(&self) -> Self {
        Self::with_container_slots(self.contents.len())
    }

    /// Returns true if no slot holds an item.
    pub fn is_empty(&self) -> bool {
        self.contents.iter().all(Option::is_none)
            && self.armor.iter().all(Option::is_none)
            && self.offhand.is_none()
    }

    /// Returns the item in a slot.
    pub fn get(&self, slot: SlotRef) -> StateResult<Option<&ItemStack>> {
        match slot {
            SlotRef::Container(index) => self
                .contents
                .get(index)
                .map(Option::as_ref)
                .ok_or(StateError::SlotOutOfRange {
                    slot: index,
                    len: self.contents.len(),
                }),
            SlotRef::Armor(index) => self
                .armor
                .get(index)
                .map(Option::as_ref)
                .ok_or(StateError::SlotOutOfRange {
                    slot: index,
                    len: ARMOR_SLOTS,
                }),
            SlotRef::Offhand => Ok(self.offhand.as_ref()),
        }
    }

    /// Places `item` into a slot, returning the previous occupant.
    pub fn set(
        &mut self,
        slot: SlotRef,
        item: Option<ItemStack>,
    ) -> StateResult<Option<ItemStack>> {
        let target = match slot {
            SlotRef::Container(index) => {
                let len = self.contents.len();
                self.contents
                    .get_mut(index)
                    .ok_or(StateError::SlotOutOfRange { slot: index, len })?
            }
            SlotRef::Armor(index) => self
                .armor
                .get_mut(index)
                .ok_or(StateError::SlotOutOfRange {
                    slot: index,
                    len: ARMOR_SLOTS,
                })?,
            SlotRef::Offhand => &mut self.offhand,
        };
        Ok(std::mem::replace(target, item))
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::empty()
    }
}
