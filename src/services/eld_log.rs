//! ELD daily log sheet rendering
//!
//! Renders one log sheet per trip day: the classic 24-hour by four-row duty
//! grid with a bar per segment, plus daily totals. Sheets are built as SVG
//! and shipped as data URIs so the frontend can drop them into an <img> tag.
//! Pure presentation; consumes the final segment list and nothing else.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{Days, Utc};

use crate::types::{DutyStatus, ScheduleSegment};

const WIDTH: u32 = 1400;
const HEIGHT: u32 = 560;

const GRID_X: f64 = 130.0;
const GRID_Y: f64 = 150.0;
const GRID_W: f64 = 1180.0;
const GRID_H: f64 = 280.0;
const ROW_H: f64 = GRID_H / 4.0;

const COLOR_BG: &str = "#020810";
const COLOR_GRID: &str = "#0c2a3a";
const COLOR_GRID_HOT: &str = "#0a3d52";
const COLOR_TEXT: &str = "#c8e8f8";
const COLOR_MUTED: &str = "#2e6a86";
const COLOR_ACCENT: &str = "#00d4ff";

/// Grid row index and bar color per duty status
const fn status_row(status: DutyStatus) -> (usize, &'static str) {
    match status {
        DutyStatus::OffDuty => (0, "#1a3a4a"),
        DutyStatus::SleeperBerth => (1, "#0a2a60"),
        DutyStatus::Driving => (2, "#cc1a2e"),
        DutyStatus::OnDuty => (3, "#b87000"),
    }
}

const ROW_LABELS: [&str; 4] = ["OFF", "SB", "D", "ON"];

/// Render one log sheet per trip day, ordered by day.
pub fn generate_daily_logs(segments: &[ScheduleSegment], driver_name: &str) -> Vec<String> {
    let mut days: BTreeMap<u32, Vec<&ScheduleSegment>> = BTreeMap::new();
    for segment in segments {
        days.entry(segment.day).or_default().push(segment);
    }

    let today = Utc::now().date_naive();
    days.iter()
        .map(|(day, day_segments)| {
            let date = today
                .checked_add_days(Days::new(u64::from(*day)))
                .unwrap_or(today);
            render_daily_log(*day + 1, day_segments, driver_name, &date.to_string())
        })
        .collect()
}

/// Render a single day's sheet as an SVG data URI.
fn render_daily_log(
    day_number: u32,
    segments: &[&ScheduleSegment],
    driver_name: &str,
    date: &str,
) -> String {
    let mut svg = String::with_capacity(8 * 1024);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="monospace">"#
    ));
    svg.push_str(&format!(
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="{COLOR_BG}"/>"#
    ));

    draw_header(&mut svg, day_number, driver_name, date);
    draw_grid(&mut svg);
    draw_status_bars(&mut svg, segments);
    draw_summary(&mut svg, segments);

    svg.push_str("</svg>");

    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
}

fn draw_header(svg: &mut String, day_number: u32, driver_name: &str, date: &str) {
    svg.push_str(&format!(
        r#"<text x="{GRID_X}" y="44" fill="{COLOR_ACCENT}" font-size="26" font-weight="bold">ELD DAILY LOG // DAY {day_number:02}</text>"#
    ));
    svg.push_str(&format!(
        r#"<text x="{GRID_X}" y="76" fill="{COLOR_TEXT}" font-size="14">DRIVER: {}</text>"#,
        escape_text(&driver_name.to_uppercase())
    ));
    svg.push_str(&format!(
        r#"<text x="{GRID_X}" y="96" fill="{COLOR_MUTED}" font-size="14">DATE: {date}</text>"#
    ));
}

fn draw_grid(svg: &mut String) {
    let px_per_hour = GRID_W / 24.0;

    // Row separators and labels
    for row in 0..=4 {
        let y = GRID_Y + row as f64 * ROW_H;
        let color = if row == 0 || row == 4 { COLOR_ACCENT } else { COLOR_GRID_HOT };
        svg.push_str(&format!(
            r#"<line x1="{GRID_X}" y1="{y}" x2="{x2}" y2="{y}" stroke="{color}" stroke-width="1"/>"#,
            x2 = GRID_X + GRID_W
        ));
    }
    for (row, label) in ROW_LABELS.iter().enumerate() {
        let y = GRID_Y + row as f64 * ROW_H + ROW_H / 2.0 + 5.0;
        svg.push_str(&format!(
            r#"<text x="{x}" y="{y}" fill="{COLOR_ACCENT}" font-size="14" font-weight="bold">{label}</text>"#,
            x = GRID_X - 55.0
        ));
    }

    // Hour ticks, hot every six hours
    for hour in 0..=24 {
        let x = GRID_X + hour as f64 * px_per_hour;
        let hot = hour % 6 == 0;
        svg.push_str(&format!(
            r#"<line x1="{x}" y1="{GRID_Y}" x2="{x}" y2="{y2}" stroke="{stroke}" stroke-width="{w}"/>"#,
            y2 = GRID_Y + GRID_H,
            stroke = if hot { COLOR_GRID_HOT } else { COLOR_GRID },
            w = if hot { 2 } else { 1 },
        ));
        if hour % 2 == 0 {
            svg.push_str(&format!(
                r#"<text x="{x}" y="{y}" fill="{fill}" font-size="12" text-anchor="middle">{hour:02}</text>"#,
                y = GRID_Y + GRID_H + 20.0,
                fill = if hot { COLOR_ACCENT } else { COLOR_MUTED },
            ));
        }
    }
}

fn draw_status_bars(svg: &mut String, segments: &[&ScheduleSegment]) {
    let px_per_hour = GRID_W / 24.0;
    let pad = 6.0;

    for segment in segments {
        let (row, color) = status_row(segment.status);
        let x0 = GRID_X + segment.start_time * px_per_hour;
        let x1 = GRID_X + segment.end_time * px_per_hour;
        if x1 - x0 < 1.0 {
            continue;
        }
        let y = GRID_Y + row as f64 * ROW_H + pad;
        svg.push_str(&format!(
            r#"<rect x="{x0:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{color}"><title>{activity} ({status}) {start:.2}-{end:.2}</title></rect>"#,
            w = x1 - x0,
            h = ROW_H - 2.0 * pad,
            activity = segment.activity.as_str(),
            status = segment.status.as_str(),
            start = segment.start_time,
            end = segment.end_time,
        ));
    }
}

fn draw_summary(svg: &mut String, segments: &[&ScheduleSegment]) {
    let mut driving = 0.0;
    let mut on_duty = 0.0;
    let mut off_duty = 0.0;
    for segment in segments {
        if segment.status == DutyStatus::Driving {
            driving += segment.duration;
        }
        if segment.status.counts_toward_on_duty() {
            on_duty += segment.duration;
        } else {
            off_duty += segment.duration;
        }
    }

    let y = GRID_Y + GRID_H + 60.0;
    let items = [
        ("DRIVING", driving, "#ff2040"),
        ("ON DUTY", on_duty, "#ffaa00"),
        ("OFF DUTY", off_duty, "#2a5a70"),
    ];
    for (i, (label, hours, color)) in items.iter().enumerate() {
        let x = GRID_X + i as f64 * 260.0;
        svg.push_str(&format!(
            r#"<text x="{x}" y="{y}" fill="{color}" font-size="14">{label}</text>"#
        ));
        svg.push_str(&format!(
            r#"<text x="{x}" y="{y2}" fill="{COLOR_ACCENT}" font-size="22" font-weight="bold">{hours:.1} HRS</text>"#,
            y2 = y + 28.0
        ));
    }
    svg.push_str(&format!(
        r#"<text x="{x}" y="{y}" fill="{COLOR_MUTED}" font-size="11">FMCSA 70-HR / 8-DAY RULE</text>"#,
        x = GRID_X + 3.0 * 260.0
    ));
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Activity, DutyStatus};

    fn segment(day: u32, start: f64, hours: f64, activity: Activity, status: DutyStatus) -> ScheduleSegment {
        ScheduleSegment::new(activity, status, day, start, hours, 0.0)
    }

    fn decode(data_uri: &str) -> String {
        let encoded = data_uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap()
    }

    #[test]
    fn test_one_log_per_day() {
        let segments = vec![
            segment(0, 0.0, 8.0, Activity::DrivingToPickup, DutyStatus::Driving),
            segment(0, 11.5, 10.0, Activity::RequiredRest, DutyStatus::SleeperBerth),
            segment(1, 0.0, 4.0, Activity::DrivingToDropoff, DutyStatus::Driving),
            segment(2, 0.0, 1.0, Activity::Dropoff, DutyStatus::OnDuty),
        ];

        let logs = generate_daily_logs(&segments, "Driver");
        assert_eq!(logs.len(), 3);
    }

    #[test]
    fn test_log_is_svg_data_uri_with_header() {
        let segments = vec![segment(0, 0.0, 5.0, Activity::DrivingToPickup, DutyStatus::Driving)];

        let logs = generate_daily_logs(&segments, "J. Ruiz");
        let svg = decode(&logs[0]);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("ELD DAILY LOG // DAY 01"));
        assert!(svg.contains("DRIVER: J. RUIZ"));
        assert!(svg.contains("FMCSA 70-HR / 8-DAY RULE"));
    }

    #[test]
    fn test_summary_totals_rendered() {
        let segments = vec![
            segment(0, 0.0, 8.0, Activity::DrivingToPickup, DutyStatus::Driving),
            segment(0, 8.0, 0.5, Activity::RequiredBreak, DutyStatus::OnDuty),
            segment(0, 8.5, 10.0, Activity::RequiredRest, DutyStatus::SleeperBerth),
        ];

        let svg = decode(&generate_daily_logs(&segments, "Driver")[0]);

        // driving 8.0, on duty 8.5 (break counts), off duty 10.0
        assert!(svg.contains("8.0 HRS"));
        assert!(svg.contains("8.5 HRS"));
        assert!(svg.contains("10.0 HRS"));
    }

    #[test]
    fn test_driver_name_is_escaped() {
        let segments = vec![segment(0, 0.0, 1.0, Activity::Pickup, DutyStatus::OnDuty)];
        let svg = decode(&generate_daily_logs(&segments, "A <&> B")[0]);
        assert!(svg.contains("A &lt;&amp;&gt; B"));
        assert!(!svg.contains("A <&> B"));
    }

    #[test]
    fn test_empty_schedule_renders_nothing() {
        assert!(generate_daily_logs(&[], "Driver").is_empty());
    }
}
