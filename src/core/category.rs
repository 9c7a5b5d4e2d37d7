use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::KeywordError;

/// The fixed family-organizer category set. Wire form is the numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Category {
    Family,
    Pets,
    SocialInterests,
    Education,
    Career,
    Travel,
    HealthBeauty,
    Home,
    Garden,
    Food,
    Laundry,
    Finance,
    Transport,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Self::Family,
        Self::Pets,
        Self::SocialInterests,
        Self::Education,
        Self::Career,
        Self::Travel,
        Self::HealthBeauty,
        Self::Home,
        Self::Garden,
        Self::Food,
        Self::Laundry,
        Self::Finance,
        Self::Transport,
    ];

    pub fn id(&self) -> u32 {
        match self {
            Self::Family => 1,
            Self::Pets => 2,
            Self::SocialInterests => 3,
            Self::Education => 4,
            Self::Career => 5,
            Self::Travel => 6,
            Self::HealthBeauty => 7,
            Self::Home => 8,
            Self::Garden => 9,
            Self::Food => 10,
            Self::Laundry => 11,
            Self::Finance => 12,
            Self::Transport => 13,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Family => "FAMILY",
            Self::Pets => "PETS",
            Self::SocialInterests => "SOCIAL_INTERESTS",
            Self::Education => "EDUCATION",
            Self::Career => "CAREER",
            Self::Travel => "TRAVEL",
            Self::HealthBeauty => "HEALTH_BEAUTY",
            Self::Home => "HOME",
            Self::Garden => "GARDEN",
            Self::Food => "FOOD",
            Self::Laundry => "LAUNDRY",
            Self::Finance => "FINANCE",
            Self::Transport => "TRANSPORT",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_keyword() == s)
    }

    /// True when `selected` names every category, which filters nothing.
    pub fn is_full_set(selected: &[Category]) -> bool {
        Self::ALL.iter().all(|c| selected.contains(c))
    }
}

impl TryFrom<u32> for Category {
    type Error = KeywordError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(KeywordError::UnknownCategory(id))
    }
}

impl From<Category> for u32 {
    fn from(category: Category) -> Self {
        category.id()
    }
}

/// Information tags the backend attaches to tasks, and the category each implies.
static TAG_CATEGORIES: LazyLock<HashMap<&'static str, Category>> = LazyLock::new(|| {
    HashMap::from([
        ("TRANSPORT__INFORMATION__PUBLIC", Category::Transport),
        ("TRAVEL__INFORMATION__PUBLIC", Category::Travel),
        ("SOCIAL_INTERESTS__INFORMATION__PUBLIC", Category::SocialInterests),
        ("CAREER__INFORMATION__PUBLIC", Category::Career),
        ("PETS__INFORMATION__PUBLIC", Category::Pets),
        ("EDUCATION__INFORMATION__PUBLIC", Category::Education),
        ("HEALTH_BEAUTY__INFORMATION__PUBLIC", Category::HealthBeauty),
        ("FINANCE__INFORMATION__PUBLIC", Category::Finance),
    ])
});

pub fn tag_category(tag: &str) -> Option<Category> {
    TAG_CATEGORIES.get(tag).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_unique() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.id(), i as u32 + 1);
            assert_eq!(Category::from_id(category.id()), Some(*category));
            assert_eq!(Category::from_keyword(category.as_keyword()), Some(*category));
        }
        assert_eq!(Category::from_id(0), None);
        assert_eq!(Category::from_id(14), None);
    }

    #[test]
    fn wire_form_is_numeric() {
        assert_eq!(serde_json::to_string(&Category::Education).unwrap(), "4");
        let parsed: Vec<Category> = serde_json::from_str("[2, 13]").unwrap();
        assert_eq!(parsed, vec![Category::Pets, Category::Transport]);
        assert!(serde_json::from_str::<Category>("99").is_err());
    }

    #[test]
    fn full_set_detection() {
        assert!(Category::is_full_set(&Category::ALL));
        assert!(!Category::is_full_set(&Category::ALL[1..]));
        assert!(!Category::is_full_set(&[]));
    }

    #[test]
    fn tag_lookup() {
        assert_eq!(tag_category("TRAVEL__INFORMATION__PUBLIC"), Some(Category::Travel));
        assert_eq!(tag_category("travel"), None);
    }
}
