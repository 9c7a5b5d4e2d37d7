use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::item::{EntityId, EntityType};

/// Lookup data for an entity referenced by scheduled items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    #[serde(rename = "resourcetype")]
    pub entity_type: EntityType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
    /// For a school year: the school it belongs to.
    #[serde(default)]
    pub school: Option<EntityId>,
    /// For a student: the school they attend.
    #[serde(default)]
    pub school_attended: Option<EntityId>,
}

impl EntityRecord {
    pub fn new(id: EntityId, entity_type: EntityType, name: impl Into<String>) -> Self {
        Self {
            id,
            entity_type,
            name: name.into(),
            category: None,
            school: None,
            school_attended: None,
        }
    }

    pub fn category(&self) -> Option<Category> {
        self.category.or_else(|| self.entity_type.default_category())
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    by_id: HashMap<EntityId, EntityRecord>,
}

impl EntityIndex {
    pub fn new(records: impl IntoIterator<Item = EntityRecord>) -> Self {
        Self {
            by_id: records.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.by_id.get(&id)
    }

    /// Category of an entity, or `None` if the entity is unknown.
    pub fn category_of(&self, id: EntityId) -> Option<Category> {
        self.get(id).and_then(EntityRecord::category)
    }

    /// The school a school year belongs to.
    pub fn school_of_year(&self, school_year: EntityId) -> Option<EntityId> {
        self.get(school_year)
            .filter(|r| r.entity_type == EntityType::SchoolYear)
            .and_then(|r| r.school)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<EntityRecord> for EntityIndex {
    fn from_iter<I: IntoIterator<Item = EntityRecord>>(iter: I) -> Self {
        Self::new(iter)
    }
}
