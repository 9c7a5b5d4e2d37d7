use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::date_range::{DateLike, dates_between};
use crate::error::KeywordError;

pub type ItemId = u64;
pub type EntityId = u64;
pub type MemberId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Task,
    Appointment,
    DueDate,
    Flight,
    Train,
    RentalCar,
    Taxi,
    DriveTime,
    HotelOrRental,
    StayWithFriend,
    Activity,
    FoodActivity,
    OtherActivity,
    Anniversary,
    Birthday,
    Holiday,
}

impl TaskType {
    pub const ALL: [TaskType; 16] = [
        Self::Task,
        Self::Appointment,
        Self::DueDate,
        Self::Flight,
        Self::Train,
        Self::RentalCar,
        Self::Taxi,
        Self::DriveTime,
        Self::HotelOrRental,
        Self::StayWithFriend,
        Self::Activity,
        Self::FoodActivity,
        Self::OtherActivity,
        Self::Anniversary,
        Self::Birthday,
        Self::Holiday,
    ];

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Task => "TASK",
            Self::Appointment => "APPOINTMENT",
            Self::DueDate => "DUE_DATE",
            Self::Flight => "FLIGHT",
            Self::Train => "TRAIN",
            Self::RentalCar => "RENTAL_CAR",
            Self::Taxi => "TAXI",
            Self::DriveTime => "DRIVE_TIME",
            Self::HotelOrRental => "HOTEL_OR_RENTAL",
            Self::StayWithFriend => "STAY_WITH_FRIEND",
            Self::Activity => "ACTIVITY",
            Self::FoodActivity => "FOOD_ACTIVITY",
            Self::OtherActivity => "OTHER_ACTIVITY",
            Self::Anniversary => "ANNIVERSARY",
            Self::Birthday => "BIRTHDAY",
            Self::Holiday => "HOLIDAY",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_keyword() == s)
    }
}

/// Backend entity kinds. Anything unrecognised lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Car,
    Boat,
    PublicTransport,
    Pet,
    Hobby,
    Event,
    Trip,
    Home,
    Garden,
    Employee,
    Finance,
    School,
    SchoolYear,
    Student,
    #[serde(other)]
    Other,
}

impl EntityType {
    /// Every named kind; `Other` only ever comes from unrecognised input.
    pub const NAMED: [EntityType; 14] = [
        Self::Car,
        Self::Boat,
        Self::PublicTransport,
        Self::Pet,
        Self::Hobby,
        Self::Event,
        Self::Trip,
        Self::Home,
        Self::Garden,
        Self::Employee,
        Self::Finance,
        Self::School,
        Self::SchoolYear,
        Self::Student,
    ];

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Boat => "Boat",
            Self::PublicTransport => "PublicTransport",
            Self::Pet => "Pet",
            Self::Hobby => "Hobby",
            Self::Event => "Event",
            Self::Trip => "Trip",
            Self::Home => "Home",
            Self::Garden => "Garden",
            Self::Employee => "Employee",
            Self::Finance => "Finance",
            Self::School => "School",
            Self::SchoolYear => "SchoolYear",
            Self::Student => "Student",
            Self::Other => "Other",
        }
    }

    /// The category an entity of this kind belongs to unless told otherwise.
    pub fn default_category(&self) -> Option<Category> {
        match self {
            Self::Car | Self::Boat | Self::PublicTransport => Some(Category::Transport),
            Self::Pet => Some(Category::Pets),
            Self::Hobby | Self::Event => Some(Category::SocialInterests),
            Self::Trip => Some(Category::Travel),
            Self::Home => Some(Category::Home),
            Self::Garden => Some(Category::Garden),
            Self::Employee => Some(Category::Career),
            Self::Finance => Some(Category::Finance),
            Self::School | Self::SchoolYear | Self::Student => Some(Category::Education),
            Self::Other => None,
        }
    }
}

/// The full `resourcetype` of an item, with entities resolved to their kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceType {
    FixedTask,
    Period,
    Entity(EntityType),
    SchoolYearStart,
    SchoolYearEnd,
    SchoolTerm,
    SchoolTermStart,
    SchoolTermEnd,
    SchoolBreak,
}

impl ResourceType {
    const FIXED: [ResourceType; 8] = [
        Self::FixedTask,
        Self::Period,
        Self::SchoolYearStart,
        Self::SchoolYearEnd,
        Self::SchoolTerm,
        Self::SchoolTermStart,
        Self::SchoolTermEnd,
        Self::SchoolBreak,
    ];

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::FixedTask => "FixedTask",
            Self::Period => "Period",
            Self::Entity(entity_type) => entity_type.as_keyword(),
            Self::SchoolYearStart => "SchoolYearStart",
            Self::SchoolYearEnd => "SchoolYearEnd",
            Self::SchoolTerm => "SchoolTerm",
            Self::SchoolTermStart => "SchoolTermStart",
            Self::SchoolTermEnd => "SchoolTermEnd",
            Self::SchoolBreak => "SchoolBreak",
        }
    }

    /// Parse a resource type name. Unknown names are `None`; `"Other"` must
    /// be spelled out to select entities of unrecognised kind.
    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::FIXED
            .into_iter()
            .chain(EntityType::NAMED.into_iter().map(Self::Entity))
            .chain([Self::Entity(EntityType::Other)])
            .find(|t| t.as_keyword() == s)
    }
}

impl From<EntityType> for ResourceType {
    fn from(entity_type: EntityType) -> Self {
        Self::Entity(entity_type)
    }
}

impl TryFrom<String> for ResourceType {
    type Error = KeywordError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_keyword(&s).ok_or(KeywordError::UnknownResourceType(s))
    }
}

impl From<ResourceType> for String {
    fn from(resource_type: ResourceType) -> Self {
        resource_type.as_keyword().to_string()
    }
}

/// What an item is, keyed on the backend's `resourcetype`.
///
/// The six school variants are generated from school calendars rather than
/// stored as real entities; they only know which school year produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resourcetype")]
pub enum ItemKind {
    #[serde(rename = "FixedTask")]
    Task {
        #[serde(rename = "type")]
        task_type: TaskType,
    },
    Period {
        #[serde(default)]
        color: Option<String>,
    },
    Entity {
        entity_type: EntityType,
    },
    SchoolYearStart {
        school_year: EntityId,
    },
    SchoolYearEnd {
        school_year: EntityId,
    },
    SchoolTerm {
        school_year: EntityId,
    },
    SchoolTermStart {
        school_year: EntityId,
    },
    SchoolTermEnd {
        school_year: EntityId,
    },
    SchoolBreak {
        school_year: EntityId,
    },
}

impl ItemKind {
    pub fn task_type(&self) -> Option<TaskType> {
        match self {
            Self::Task { task_type } => Some(*task_type),
            _ => None,
        }
    }

    pub fn entity_type(&self) -> Option<EntityType> {
        match self {
            Self::Entity { entity_type } => Some(*entity_type),
            _ => None,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Task { .. } => ResourceType::FixedTask,
            Self::Period { .. } => ResourceType::Period,
            Self::Entity { entity_type } => ResourceType::Entity(*entity_type),
            Self::SchoolYearStart { .. } => ResourceType::SchoolYearStart,
            Self::SchoolYearEnd { .. } => ResourceType::SchoolYearEnd,
            Self::SchoolTerm { .. } => ResourceType::SchoolTerm,
            Self::SchoolTermStart { .. } => ResourceType::SchoolTermStart,
            Self::SchoolTermEnd { .. } => ResourceType::SchoolTermEnd,
            Self::SchoolBreak { .. } => ResourceType::SchoolBreak,
        }
    }

    /// The school year a school-calendar pseudo entity came from.
    pub fn school_year(&self) -> Option<EntityId> {
        match self {
            Self::SchoolYearStart { school_year }
            | Self::SchoolYearEnd { school_year }
            | Self::SchoolTerm { school_year }
            | Self::SchoolTermStart { school_year }
            | Self::SchoolTermEnd { school_year }
            | Self::SchoolBreak { school_year } => Some(*school_year),
            Self::Task { .. } | Self::Period { .. } | Self::Entity { .. } => None,
        }
    }

    pub fn is_school_calendar(&self) -> bool {
        self.school_year().is_some()
    }
}

/// When an item happens. The three shapes never mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Schedule {
    Timed {
        start_datetime: DateTime<Utc>,
        end_datetime: DateTime<Utc>,
    },
    Span {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    Point {
        date: NaiveDate,
        #[serde(default)]
        duration: Option<u32>,
    },
}

impl Schedule {
    pub fn start_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timed { start_datetime, .. } => Some(*start_datetime),
            _ => None,
        }
    }

    pub fn end_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timed { end_datetime, .. } => Some(*end_datetime),
            _ => None,
        }
    }

    /// First and last bound of the schedule.
    ///
    /// A `Point` is pinned to local midnight so that it occupies exactly
    /// its own date in every zone.
    pub fn bounds(&self) -> (DateLike, DateLike) {
        match self {
            Self::Timed { start_datetime, end_datetime } => {
                ((*start_datetime).into(), (*end_datetime).into())
            }
            Self::Span { start_date, end_date } => ((*start_date).into(), (*end_date).into()),
            Self::Point { date, .. } => {
                let wall = DateLike::Local(date.and_time(NaiveTime::MIN));
                (wall, wall)
            }
        }
    }

    /// Every calendar day the schedule touches in `tz`.
    pub fn occupied_dates<Tz: TimeZone>(&self, tz: &Tz) -> Vec<NaiveDate> {
        let (start, end) = self.bounds();
        dates_between(&start, &end, tz)
    }
}

/// A task, period or entity instance resolved to a concrete date or time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledItem {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_index: Option<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(default)]
    pub members: Vec<MemberId>,
    #[serde(default)]
    pub entities: Vec<EntityId>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub action_id: Option<u64>,
}

impl ScheduledItem {
    pub fn new(id: ItemId, title: impl Into<String>, kind: ItemKind, schedule: Schedule) -> Self {
        Self {
            id,
            recurrence_index: None,
            title: title.into(),
            kind,
            schedule,
            members: Vec::new(),
            entities: Vec::new(),
            category: None,
            tags: Vec::new(),
            is_complete: false,
            action_id: None,
        }
    }

    pub fn task(
        id: ItemId,
        title: impl Into<String>,
        task_type: TaskType,
        schedule: Schedule,
    ) -> Self {
        Self::new(id, title, ItemKind::Task { task_type }, schedule)
    }

    /// Whether "incomplete" means anything for this item: it has an action
    /// attached, or it is a plain task or due date.
    pub fn is_actionable(&self) -> bool {
        self.action_id.is_some()
            || matches!(
                self.kind.task_type(),
                Some(TaskType::Task | TaskType::DueDate)
            )
    }

    pub fn is_school_calendar(&self) -> bool {
        self.kind.is_school_calendar()
    }
}
