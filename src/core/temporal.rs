use chrono::TimeZone;

use super::bucket::{DateBuckets, bucket_by_date};
use super::entity_filter::{EntityFocus, passes_entity_filter};
use super::filter::{FilterContext, FilterState, passes_filters};
use super::item::{ItemKind, ScheduledItem};
use super::placement::{PeriodSpan, PlacedPeriods, place_overlapping_periods};

/// Display-ready calendar data: the agenda list and the period bands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarView {
    pub agenda: DateBuckets,
    pub periods: PlacedPeriods,
    /// Items the filters removed.
    pub hidden: usize,
}

impl CalendarView {
    pub fn build<Tz: TimeZone>(
        items: &[ScheduledItem],
        filters: &FilterState,
        ctx: &FilterContext,
        tz: &Tz,
        default_color: &str,
    ) -> Self {
        let visible: Vec<&ScheduledItem> = items
            .iter()
            .filter(|item| passes_filters(item, filters, ctx))
            .collect();
        Self::from_visible(items.len(), &visible, tz, default_color)
    }

    /// Like `build`, but first narrowed to the calendar of `focus`.
    pub fn build_for_entity<Tz: TimeZone>(
        items: &[ScheduledItem],
        focus: &EntityFocus,
        filters: &FilterState,
        ctx: &FilterContext,
        tz: &Tz,
        default_color: &str,
    ) -> Self {
        let visible: Vec<&ScheduledItem> = items
            .iter()
            .filter(|item| passes_entity_filter(item, focus, ctx.entities))
            .filter(|item| passes_filters(item, filters, ctx))
            .collect();
        Self::from_visible(items.len(), &visible, tz, default_color)
    }

    fn from_visible<Tz: TimeZone>(
        total: usize,
        visible: &[&ScheduledItem],
        tz: &Tz,
        default_color: &str,
    ) -> Self {
        let hidden = total - visible.len();
        if hidden > 0 {
            log::debug!("Filters hid {} of {} items", hidden, total);
        }

        let spans: Vec<PeriodSpan> = visible.iter().filter_map(|item| period_span(item)).collect();

        Self {
            agenda: bucket_by_date(visible.iter().copied(), tz),
            periods: place_overlapping_periods(&spans, default_color, tz),
            hidden,
        }
    }

    pub fn total_count(&self) -> usize {
        self.agenda.total_entries()
    }
}

/// The band a `Period` item draws on the grid; other kinds draw none.
fn period_span(item: &ScheduledItem) -> Option<PeriodSpan> {
    let ItemKind::Period { color } = &item.kind else {
        return None;
    };
    let (start, end) = item.schedule.bounds();
    Some(PeriodSpan {
        id: item.id,
        start,
        end,
        color: color.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::category::Category;
    use crate::core::entity::{EntityIndex, EntityRecord};
    use crate::core::item::{EntityType, Schedule, TaskType};
    use chrono::{NaiveDate, Utc};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn period(id: u64, start: &str, end: &str, member: u64) -> ScheduledItem {
        let mut item = ScheduledItem::new(
            id,
            format!("period {id}"),
            ItemKind::Period { color: None },
            Schedule::Span {
                start_date: d(start),
                end_date: d(end),
            },
        );
        item.members = vec![member];
        item
    }

    fn chore(id: u64, date: &str, member: u64) -> ScheduledItem {
        let mut item = ScheduledItem::task(
            id,
            format!("chore {id}"),
            TaskType::Task,
            Schedule::Point {
                date: d(date),
                duration: Some(15),
            },
        );
        item.members = vec![member];
        item
    }

    fn items() -> Vec<ScheduledItem> {
        vec![
            period(1, "2024-03-01", "2024-03-03", 5),
            period(2, "2024-03-02", "2024-03-04", 7),
            chore(3, "2024-03-02", 5),
            chore(4, "2024-03-02", 7),
        ]
    }

    #[test]
    fn unfiltered_view_has_everything() {
        let index = EntityIndex::default();
        let view = CalendarView::build(
            &items(),
            &FilterState::default(),
            &FilterContext::new(&index),
            &Utc,
            "blue",
        );
        assert_eq!(view.hidden, 0);
        assert_eq!(view.agenda.get(d("2024-03-02")).unwrap().len(), 4);
        assert_eq!(view.total_count(), 3 + 3 + 1 + 1);
        assert_eq!(view.periods.max_rows(), 2);
        // Chores are not period bands
        assert!(view.periods.placements().all(|p| p.id == Some(1) || p.id == Some(2)));
    }

    #[test]
    fn member_filter_applies_to_both_views() {
        let index = EntityIndex::default();
        let filters = FilterState {
            filtered_users: vec![7],
            ..Default::default()
        };
        let ctx = FilterContext::new(&index);
        let view = CalendarView::build(&items(), &filters, &ctx, &Utc, "blue");
        assert_eq!(view.hidden, 2);
        let ids: Vec<u64> = view
            .agenda
            .get(d("2024-03-02"))
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![2, 4]);
        // Period 2 no longer collides with period 1
        assert!(view.periods.placements().all(|p| p.row == 0 && p.id == Some(2)));
    }

    #[test]
    fn period_color_reaches_the_grid() {
        let index = EntityIndex::default();
        let mut painted = period(1, "2024-03-01", "2024-03-01", 5);
        painted.kind = ItemKind::Period {
            color: Some("#ff8800".into()),
        };
        let view = CalendarView::build(
            &[painted, period(2, "2024-03-01", "2024-03-01", 5)],
            &FilterState::default(),
            &FilterContext::new(&index),
            &Utc,
            "blue",
        );
        let colors: Vec<String> = view.periods.placements().map(|p| p.color).collect();
        assert_eq!(colors, vec!["#ff8800", "blue"]);
    }

    #[test]
    fn entity_calendar_combines_focus_and_filters() {
        let index = EntityIndex::new([EntityRecord::new(40, EntityType::Pet, "Rex")]);
        let mut walk = chore(10, "2024-03-05", 5);
        walk.entities = vec![40];
        let mut vet = chore(11, "2024-03-06", 7);
        vet.entities = vec![40];
        let unrelated = chore(12, "2024-03-05", 5);
        let all = [walk, vet, unrelated];

        let focus = EntityFocus::entity(40);
        let ctx = FilterContext::new(&index);
        let unfiltered = FilterState::default();
        let view = CalendarView::build_for_entity(&all, &focus, &unfiltered, &ctx, &Utc, "blue");
        assert_eq!(view.total_count(), 2);
        assert_eq!(view.hidden, 1);

        let filters = FilterState {
            filtered_users: vec![7],
            filtered_categories: vec![Category::Pets],
            ..Default::default()
        };
        let view = CalendarView::build_for_entity(&all, &focus, &filters, &ctx, &Utc, "blue");
        assert_eq!(view.total_count(), 1);
        assert_eq!(view.agenda.get(d("2024-03-06")).unwrap()[0].id, 11);
    }
}
