use serde::{Deserialize, Serialize};

use super::entity::EntityIndex;
use super::item::{EntityId, EntityType, ItemKind, ResourceType, ScheduledItem};

/// Narrows a calendar to one entity, a set of entity types, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFocus {
    #[serde(default)]
    pub entity: Option<EntityId>,
    #[serde(default)]
    pub resource_types: Option<Vec<ResourceType>>,
}

impl EntityFocus {
    pub fn entity(id: EntityId) -> Self {
        Self {
            entity: Some(id),
            resource_types: None,
        }
    }

    pub fn resource_types(types: impl Into<Vec<ResourceType>>) -> Self {
        Self {
            entity: None,
            resource_types: Some(types.into()),
        }
    }

    pub fn is_unfocused(&self) -> bool {
        self.entity.is_none() && self.resource_types.is_none()
    }
}

/// Whether `item` belongs on the calendar described by `focus`.
///
/// Precedence: no focus passes everything; the focus entity itself (and
/// tasks linked to it) always passes; an allow-list then decides alone;
/// otherwise school-calendar items are resolved to their school and
/// matched against a focused School or Student.
pub fn passes_entity_filter(
    item: &ScheduledItem,
    focus: &EntityFocus,
    entities: &EntityIndex,
) -> bool {
    if focus.is_unfocused() {
        return true;
    }

    if let Some(focus_id) = focus.entity {
        let exact = matches!(item.kind, ItemKind::Entity { .. }) && item.id == focus_id;
        if exact || item.entities.contains(&focus_id) {
            return true;
        }
    }

    if let Some(types) = &focus.resource_types {
        return types.contains(&item.kind.resource_type());
    }

    match focus.entity {
        Some(focus_id) => school_matches(item, focus_id, entities),
        None => false,
    }
}

/// The school a school-parented item hangs off, if any.
fn item_school(item: &ScheduledItem, entities: &EntityIndex) -> Option<EntityId> {
    match &item.kind {
        ItemKind::Entity {
            entity_type: EntityType::SchoolYear,
        } => entities.school_of_year(item.id),
        ItemKind::Entity {
            entity_type: EntityType::Student,
        } => entities.get(item.id).and_then(|r| r.school_attended),
        ItemKind::Entity { .. } | ItemKind::Task { .. } | ItemKind::Period { .. } => None,
        ItemKind::SchoolYearStart { school_year }
        | ItemKind::SchoolYearEnd { school_year }
        | ItemKind::SchoolTerm { school_year }
        | ItemKind::SchoolTermStart { school_year }
        | ItemKind::SchoolTermEnd { school_year }
        | ItemKind::SchoolBreak { school_year } => entities.school_of_year(*school_year),
    }
}

fn school_matches(item: &ScheduledItem, focus_id: EntityId, entities: &EntityIndex) -> bool {
    let Some(focus) = entities.get(focus_id) else {
        return false;
    };
    let Some(school) = item_school(item, entities) else {
        return false;
    };
    match focus.entity_type {
        EntityType::School => school == focus_id,
        // A student's calendar shows their school's dates, not classmates
        EntityType::Student => {
            item.kind.entity_type() != Some(EntityType::Student)
                && focus.school_attended == Some(school)
        }
        _ => false,
    }
}
