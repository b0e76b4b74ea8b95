// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::{
    Color, Direction, LabelSize, Point, Rect, ShapeKind, TimeScaleSetting, TimelineItem,
    TimelineSpec,
};

use super::{IdScope, LayoutPlan, LayoutWarning, ShapePlacement};

const MS_PER_DAY: f64 = 86_400_000.0;
const MARKER: f64 = 16.0;
const DEFAULT_LANE: &str = "_default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeScale {
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeScale {
    /// Coarsest scale that keeps a span of `total_days` readable.
    pub fn pick(total_days: f64) -> Self {
        if total_days <= 120.0 {
            TimeScale::Days
        } else if total_days <= 540.0 {
            TimeScale::Weeks
        } else if total_days <= 5.0 * 365.0 {
            TimeScale::Months
        } else {
            TimeScale::Years
        }
    }

    pub fn resolve(setting: TimeScaleSetting, total_days: f64) -> Self {
        match setting {
            TimeScaleSetting::Auto => Self::pick(total_days),
            TimeScaleSetting::Days => TimeScale::Days,
            TimeScaleSetting::Weeks => TimeScale::Weeks,
            TimeScaleSetting::Months => TimeScale::Months,
            TimeScaleSetting::Years => TimeScale::Years,
        }
    }

    pub fn px_per_unit(self) -> f64 {
        match self {
            TimeScale::Days => 6.0,
            TimeScale::Weeks => 42.0,
            TimeScale::Months => 120.0,
            TimeScale::Years => 360.0,
        }
    }

    pub fn unit_days(self) -> f64 {
        match self {
            TimeScale::Days => 1.0,
            TimeScale::Weeks => 7.0,
            TimeScale::Months => 30.0,
            TimeScale::Years => 365.0,
        }
    }

    /// Pixel offset of a point `elapsed_ms` after the domain start.
    pub fn offset(self, elapsed_ms: f64) -> f64 {
        let units = elapsed_ms / (self.unit_days() * MS_PER_DAY);
        (units * self.px_per_unit()).round()
    }
}

/// RFC 3339 date-time, naive date-time (taken as UTC) or plain `YYYY-MM-DD` (midnight UTC).
pub fn parse_instant(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(dt.and_utc().timestamp_millis());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().timestamp_millis())
}

struct ParsedItem<'a> {
    item: &'a TimelineItem,
    start: i64,
    end: i64,
    milestone: bool,
}

fn parse_items<'a>(spec: &'a TimelineSpec, plan: &mut LayoutPlan) -> Vec<ParsedItem<'a>> {
    let mut parsed = Vec::with_capacity(spec.items.len());
    for item in &spec.items {
        let Some(start) = parse_instant(&item.start) else {
            plan.warn(LayoutWarning::UnparseableDate {
                item_id: item.id.clone(),
                value: item.start.clone(),
            });
            continue;
        };
        let end = match item.end.as_deref() {
            Some(raw) => match parse_instant(raw) {
                Some(end) => Some(end),
                None => {
                    plan.warn(LayoutWarning::UnparseableDate {
                        item_id: item.id.clone(),
                        value: raw.to_owned(),
                    });
                    continue;
                }
            },
            None => None,
        };
        let milestone = end.map_or(true, |end| end == start);
        parsed.push(ParsedItem { item, start, end: end.unwrap_or(start), milestone });
    }
    parsed
}

fn domain_bound(raw: Option<&str>, fallback: i64, plan: &mut LayoutPlan) -> i64 {
    match raw {
        Some(raw) => parse_instant(raw).unwrap_or_else(|| {
            plan.warn(LayoutWarning::UnparseableBound { value: raw.to_owned() });
            fallback
        }),
        None => fallback,
    }
}

/// Places items along a time axis with an automatically chosen scale and one band per lane.
///
/// Lanes are numbered in first-appearance order and offset across the time axis by
/// `i * (itemHeight + vSpacing) + i * laneSpacing`. Milestones get a marker dot and a text label,
/// spans a labelled bar at least 10 px long.
pub fn layout_timeline(spec: &TimelineSpec, scope: IdScope<'_>) -> LayoutPlan {
    let meta = &spec.metadata;
    let origin = spec.start_position.unwrap_or(Point::ORIGIN);
    let mut plan = LayoutPlan::new();

    let items = parse_items(spec, &mut plan);
    let (Some(min_start), Some(max_end)) =
        (items.iter().map(|p| p.start).min(), items.iter().map(|p| p.end).max())
    else {
        return plan;
    };

    let domain_start = domain_bound(meta.timeline_start.as_deref(), min_start, &mut plan);
    let domain_end = domain_bound(meta.timeline_end.as_deref(), max_end, &mut plan);
    let total_ms = (domain_end - domain_start).max(1) as f64;
    let scale = TimeScale::resolve(meta.scale, total_ms / MS_PER_DAY);
    tracing::debug!(?scale, items = items.len(), "timeline scale");

    let mut lanes: Vec<&str> = Vec::new();
    let item_h = meta.item_height();
    let thickness = meta.item_width(spec.layout);
    let lane_stride = item_h + meta.v_spacing() + meta.lane_spacing();

    for parsed in &items {
        let item = parsed.item;
        let lane_key = item.lane.as_deref().unwrap_or(DEFAULT_LANE);
        let lane = match lanes.iter().position(|l| *l == lane_key) {
            Some(idx) => idx,
            None => {
                lanes.push(lane_key);
                lanes.len() - 1
            }
        };

        let from = scale.offset((parsed.start - domain_start) as f64);
        let to = scale.offset((parsed.end - domain_start) as f64);
        let across = lane as f64 * lane_stride;
        let (x, y) = match spec.layout {
            Direction::Horizontal => (origin.x + from, origin.y + across),
            Direction::Vertical => (origin.x + across, origin.y + from),
        };

        if parsed.milestone {
            let (marker, label) = match spec.layout {
                Direction::Horizontal => {
                    (Point::new(x - MARKER / 2.0, y - MARKER / 2.0), Point::new(x + 10.0, y - 10.0))
                }
                Direction::Vertical => {
                    (Point::new(x, y - MARKER / 2.0), Point::new(x + 20.0, y + 10.0))
                }
            };
            plan.push_shape(ShapePlacement::solid(
                scope.shape(&format!("timeline-milestone-{}", item.id)),
                ShapeKind::Ellipse,
                Rect::new(marker.x, marker.y, MARKER, MARKER),
                item.color.unwrap_or(Color::Blue),
            ));
            plan.push_shape(ShapePlacement::text(
                scope.shape(&format!("timeline-label-{}", item.id)),
                label,
                item.title.clone(),
                LabelSize::S,
            ));
        } else {
            let length = (to - from).abs().max(10.0);
            let (w, h) = match spec.layout {
                Direction::Horizontal => (length, thickness),
                Direction::Vertical => (thickness, length),
            };
            plan.push_shape(
                ShapePlacement::solid(
                    scope.shape(&format!("timeline-bar-{}", item.id)),
                    ShapeKind::Rectangle,
                    Rect::new(x, y, w, h),
                    item.color.unwrap_or(Color::Green),
                )
                .with_label(item.title.clone()),
            );
        }
    }

    plan.keep_below(origin.y);
    plan
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{layout_timeline, parse_instant, TimeScale};
    use crate::layout::{IdScope, LayoutWarning};
    use crate::model::{Color, ShapeKind, TimeScaleSetting, TimelineSpec};

    #[rstest]
    #[case(10.0, TimeScale::Days)]
    #[case(120.0, TimeScale::Days)]
    #[case(400.0, TimeScale::Weeks)]
    #[case(800.0, TimeScale::Months)]
    #[case(3650.0, TimeScale::Years)]
    fn scale_follows_total_span(#[case] days: f64, #[case] expected: TimeScale) {
        assert_eq!(TimeScale::pick(days), expected);
        assert_eq!(TimeScale::resolve(TimeScaleSetting::Auto, days), expected);
    }

    #[test]
    fn explicit_scale_overrides_auto() {
        assert_eq!(TimeScale::resolve(TimeScaleSetting::Years, 3.0), TimeScale::Years);
    }

    #[test]
    fn parses_dates_and_date_times() {
        assert_eq!(parse_instant("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_instant("1970-01-01T00:00:01Z"), Some(1_000));
        assert_eq!(parse_instant("1970-01-01T01:00:00+01:00"), Some(0));
        assert_eq!(parse_instant("1970-01-01T00:01:00"), Some(60_000));
        assert_eq!(parse_instant("next tuesday"), None);
    }

    fn spec(items: serde_json::Value) -> TimelineSpec {
        serde_json::from_value(serde_json::json!({
            "description": "roadmap",
            "items": items,
            "startPosition": { "x": 0, "y": 100 }
        }))
        .expect("timeline spec")
    }

    #[test]
    fn spans_and_milestones_on_a_day_scale() {
        let plan = layout_timeline(
            &spec(serde_json::json!([
                { "id": "kickoff", "title": "Kickoff", "start": "2024-01-01" },
                { "id": "build", "title": "Build", "start": "2024-01-02", "end": "2024-01-11" }
            ])),
            IdScope::new(""),
        );
        let shapes: Vec<_> = plan.shapes().collect();
        assert_eq!(shapes.len(), 3);

        assert_eq!(shapes[0].kind, ShapeKind::Ellipse);
        assert_eq!(shapes[0].color, Color::Blue);
        assert_eq!(shapes[1].kind, ShapeKind::Text);
        assert_eq!(shapes[1].label.as_deref(), Some("Kickoff"));

        let bar = shapes[2];
        assert_eq!(bar.id.as_str(), "shape:timeline-bar-build");
        // nine days at 6px/day
        assert_eq!(bar.rect.w, 54.0);
        assert_eq!(bar.rect.h, 40.0);
        assert_eq!(bar.color, Color::Green);
        assert!(plan.bounds().expect("bounds").y >= 100.0);
    }

    #[test]
    fn lanes_stack_in_first_appearance_order() {
        let plan = layout_timeline(
            &spec(serde_json::json!([
                { "id": "a", "title": "A", "start": "2024-01-01", "end": "2024-01-05", "lane": "eng" },
                { "id": "b", "title": "B", "start": "2024-01-01", "end": "2024-01-05", "lane": "ops" },
                { "id": "c", "title": "C", "start": "2024-01-03", "end": "2024-01-09", "lane": "eng" }
            ])),
            IdScope::new(""),
        );
        let ys: Vec<f64> = plan.shapes().map(|s| s.rect.y).collect();
        assert_eq!(ys[0], ys[2]);
        // lane 1: itemHeight 40 + vSpacing 120 + laneSpacing 60
        assert_eq!(ys[1] - ys[0], 220.0);
    }

    #[test]
    fn short_spans_get_minimum_length() {
        let plan = layout_timeline(
            &spec(serde_json::json!([
                { "id": "a", "title": "A", "start": "2020-01-01", "end": "2020-01-02" },
                { "id": "z", "title": "Z", "start": "2030-01-01" }
            ])),
            IdScope::new(""),
        );
        let bar = plan.shapes().find(|s| s.id.as_str() == "shape:timeline-bar-a").expect("bar");
        assert_eq!(bar.rect.w, 10.0);
    }

    #[test]
    fn unparseable_items_are_skipped() {
        let plan = layout_timeline(
            &spec(serde_json::json!([
                { "id": "bad", "title": "Bad", "start": "soon" },
                { "id": "ok", "title": "Ok", "start": "2024-03-01", "end": "2024-03-04" }
            ])),
            IdScope::new(""),
        );
        assert_eq!(plan.shapes().count(), 1);
        assert_eq!(
            plan.warnings(),
            &[LayoutWarning::UnparseableDate { item_id: "bad".into(), value: "soon".into() }]
        );
    }

    #[test]
    fn vertical_layout_runs_down_the_page() {
        let mut timeline = spec(serde_json::json!([
            { "id": "a", "title": "A", "start": "2024-01-01", "end": "2024-01-11" }
        ]));
        timeline.layout = crate::model::Direction::Vertical;
        let plan = layout_timeline(&timeline, IdScope::new(""));
        let bar = plan.shapes().next().expect("bar");
        assert_eq!((bar.rect.w, bar.rect.h), (16.0, 60.0));
    }
}
