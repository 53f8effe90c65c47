use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::chart::{self, BarLabel, Chart, ChartSpec, Padding};
use crate::cli::ProfileArgs;
use crate::client::JulythonClient;
use crate::collection::Collection;
use crate::error::Result;
use crate::output;
use crate::resources::CommitsResource;
use crate::types::Commit;

const JULY: u32 = 7;
const DAYS_IN_JULY: usize = 31;
/// Columns per day in the text chart
const BAR_COLUMNS: usize = 2;
/// Stop paging a very active user's history here
const MAX_COMMITS: usize = 5000;

#[derive(Serialize)]
struct Profile<'a> {
    user: &'a str,
    year: i32,
    commits: usize,
    days_active: usize,
    daily: &'a [u64],
}

fn commit_date(timestamp: &str) -> Option<NaiveDate> {
    if let Ok(dt) = timestamp.parse::<DateTime<Utc>>() {
        return Some(dt.date_naive());
    }
    if let Ok(naive) = timestamp.parse::<NaiveDateTime>() {
        return Some(naive.date());
    }
    timestamp.get(..10)?.parse::<NaiveDate>().ok()
}

/// Commits per day of July in `year`; other dates are ignored
fn daily_counts(commits: &[Commit], year: i32) -> Vec<u64> {
    let mut counts = vec![0u64; DAYS_IN_JULY];
    for date in commits.iter().filter_map(|c| commit_date(&c.timestamp)) {
        if date.year() == year && date.month() == JULY {
            counts[date.day0() as usize] += 1;
        }
    }
    counts
}

/// Commit counts under each active day, or tick marks when there were none
fn day_label(days_active: usize) -> BarLabel {
    if days_active == 0 {
        return BarLabel::Constant("·".to_string());
    }
    BarLabel::Accessor(Box::new(|v, _| {
        if v > 0.0 {
            format!("{v:.0}")
        } else {
            String::new()
        }
    }))
}

pub async fn show(client: &JulythonClient, args: ProfileArgs) -> Result<()> {
    let year = args.year.unwrap_or_else(|| Utc::now().year());
    let mut commits = Collection::with_limit(
        CommitsResource {
            user: Some(args.user.clone()),
            ..Default::default()
        },
        100,
    );
    commits.fetch_all(client, Some(MAX_COMMITS)).await?;

    let daily = daily_counts(commits.items(), year);
    let july_total: u64 = daily.iter().sum();
    let profile = Profile {
        user: &args.user,
        year,
        commits: july_total as usize,
        days_active: daily.iter().filter(|&&n| n > 0).count(),
        daily: &daily,
    };

    output::print_item(&profile, |p| {
        println!("{} - July {}", p.user.bold(), p.year);
        println!();
        println!("Commits:     {}", p.commits);
        println!("Days active: {}/{}", p.days_active, DAYS_IN_JULY);
        println!();

        // a blank headroom row above the tallest day
        let spec = ChartSpec::in_container(
            Vec::new(),
            Some((DAYS_IN_JULY * BAR_COLUMNS) as f64),
            Some(f64::from(args.rows.max(1)) + 1.0),
        )
        .padding(Padding {
            top: 1.0,
            ..Padding::default()
        })
        .y_label(|v| format!("{v:.0}"))
        .label(day_label(p.days_active))
        .x_label(|i| {
            let day = i + 1;
            if day == 1 || day % 5 == 0 {
                day.to_string()
            } else {
                String::new()
            }
        });

        let mut chart = Chart::new(spec);
        for &n in p.daily {
            chart.push(n as f64);
        }
        let bars = chart.enter();
        for line in chart::render_text(chart.spec(), &bars) {
            println!("{line}");
        }
    });

    if commits.has_more() {
        output::print_message(&format!(
            "Only the latest {} commits were counted",
            commits.len()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn commit(timestamp: &str) -> Commit {
        serde_json::from_value(json!({
            "hash": "abcdef0123",
            "author": "alice",
            "name": null,
            "email": null,
            "message": "work",
            "url": null,
            "timestamp": timestamp,
            "project": null,
            "user": "alice"
        }))
        .unwrap()
    }

    #[test]
    fn test_commit_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2013, 7, 4);
        assert_eq!(commit_date("2013-07-04T10:00:00Z"), expected);
        assert_eq!(commit_date("2013-07-04T10:00:00"), expected);
        assert_eq!(commit_date("2013-07-04T10:00:00.123456"), expected);
        assert_eq!(commit_date("2013-07-04"), expected);
        assert_eq!(commit_date("yesterday"), None);
    }

    #[test]
    fn test_daily_counts_only_july_of_year() {
        let commits = vec![
            commit("2013-07-01T00:00:00Z"),
            commit("2013-07-01T23:59:59Z"),
            commit("2013-07-31T12:00:00Z"),
            commit("2013-06-30T12:00:00Z"),
            commit("2012-07-15T12:00:00Z"),
            commit("not a date"),
        ];
        let counts = daily_counts(&commits, 2013);
        assert_eq!(counts.len(), 31);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[30], 1);
        assert_eq!(counts.iter().sum::<u64>(), 3);
    }

    #[test]
    fn test_quiet_month_chart_shows_tick_marks() {
        let spec = ChartSpec::in_container(Vec::new(), Some(4.0), Some(1.0))
            .label(day_label(0));
        let mut chart = Chart::new(spec);
        chart.push(0.0);
        chart.push(0.0);
        let bars = chart.enter();
        assert_eq!(chart::render_text(chart.spec(), &bars), vec!["", "· ·"]);

        let spec = ChartSpec::in_container(vec![0.0, 3.0], Some(4.0), Some(1.0))
            .label(day_label(1));
        assert_eq!(chart::render_text(&spec, &spec.bars()), vec!["  ██", "  3"]);
    }
}
