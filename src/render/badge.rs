//! Badge construction: colors, bands, and labels

use chrono::{TimeZone, Utc};

use crate::models::JobStats;

const DAY_MS: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

/// Marker classes identifying injected badges, one per badge kind.
/// Removal queries match all of these across the whole document.
pub const MARKER_CLASSES: [&str; 5] = [
    "custom-views-count",
    "custom-applies-count",
    "custom-expires-count",
    "custom-remote-allowed",
    "custom-loading-indicator",
];

/// Badge container candidates, highest priority first. The page ships
/// several top-card layouts; the first selector that matches wins.
pub const CONTAINER_SELECTORS: [&str; 4] = [
    ".job-details-jobs-unified-top-card__primary-description-container",
    ".jobs-unified-top-card__primary-description",
    ".job-details-jobs-unified-top-card__content",
    ".jobs-search__job-details",
];

/// Background/foreground pair for one badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
}

pub const GREEN: Palette = Palette { background: "#00b759", foreground: "white" };
pub const YELLOW: Palette = Palette { background: "#ffc107", foreground: "black" };
pub const ORANGE: Palette = Palette { background: "#ff7961", foreground: "white" };
pub const RED: Palette = Palette { background: "#e05d44", foreground: "white" };
pub const GRAY: Palette = Palette { background: "#666", foreground: "white" };

/// One renderable badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub marker_class: &'static str,
    pub text: String,
    pub palette: Palette,
}

/// Applies-count band. Boundary values land in the higher band.
pub fn applies_palette(applies: u64) -> Palette {
    if applies < 50 {
        GREEN
    } else if applies < 100 {
        YELLOW
    } else if applies < 500 {
        ORANGE
    } else {
        RED
    }
}

/// Whole days until expiration, rounded up (f64 ceil, matching the page's
/// own `Math.ceil` arithmetic). Negative once the posting has expired.
pub fn days_until(expire_at: i64, now_ms: i64) -> i64 {
    ((expire_at - now_ms) as f64 / DAY_MS).ceil() as i64
}

pub fn expiry_palette(expire_at: i64, now_ms: i64) -> Palette {
    let days = days_until(expire_at, now_ms);
    if days < 0 {
        GRAY
    } else if days <= 3 {
        RED
    } else if days <= 7 {
        ORANGE
    } else if days <= 14 {
        YELLOW
    } else {
        GREEN
    }
}

/// Relative phrase plus the absolute calendar date, e.g.
/// `Expires in 12 days (Sep 11, 2026)`.
pub fn expiration_label(expire_at: i64, now_ms: i64) -> String {
    let date = match Utc.timestamp_millis_opt(expire_at).single() {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => "unknown date".to_string(),
    };

    match days_until(expire_at, now_ms) {
        days if days < 0 => format!("Expired ({date})"),
        0 => format!("Expires today ({date})"),
        1 => format!("Expires tomorrow ({date})"),
        days => format!("Expires in {days} days ({date})"),
    }
}

/// Badge shown while a fetch is in flight. Carries no state beyond
/// "request in flight"; the DOM surface animates it via its stylesheet.
pub fn loading_badge() -> Badge {
    Badge {
        marker_class: "custom-loading-indicator",
        text: "Loading job stats\u{2026}".to_string(),
        palette: GRAY,
    }
}

/// Full badge set for one job's stats, in display order.
pub fn badges_for(stats: &JobStats, now_ms: i64) -> Vec<Badge> {
    let mut badges = Vec::with_capacity(4);

    if stats.views > 0 {
        badges.push(Badge {
            marker_class: "custom-views-count",
            text: format!("{} views", stats.views),
            palette: GRAY,
        });
    }

    badges.push(Badge {
        marker_class: "custom-applies-count",
        text: format!("{} applications", stats.applies),
        palette: applies_palette(stats.applies),
    });

    badges.push(Badge {
        marker_class: "custom-expires-count",
        text: expiration_label(stats.expire_at, now_ms),
        palette: expiry_palette(stats.expire_at, now_ms),
    });

    if let Some(remote) = stats.is_remote_allowed {
        badges.push(Badge {
            marker_class: "custom-remote-allowed",
            text: if remote {
                "Primarily Remote".to_string()
            } else {
                "Primarily On-Site".to_string()
            },
            palette: if remote { GREEN } else { RED },
        });
    }

    badges
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const DAY: i64 = 86_400_000;
    // 2026-08-01T00:00:00Z
    const NOW: i64 = 1_785_542_400_000;

    fn stats(applies: u64, views: u64, expire_at: i64, remote: Option<bool>) -> JobStats {
        JobStats {
            job_id: "1".to_string(),
            applies,
            views,
            expire_at,
            is_remote_allowed: remote,
        }
    }

    #[test_case(0, GREEN; "zero")]
    #[test_case(40, GREEN; "low")]
    #[test_case(49, GREEN; "green upper bound")]
    #[test_case(50, YELLOW; "boundary 50 picks higher band")]
    #[test_case(80, YELLOW; "mid yellow")]
    #[test_case(99, YELLOW; "yellow upper bound")]
    #[test_case(100, ORANGE; "boundary 100 picks higher band")]
    #[test_case(300, ORANGE; "mid orange")]
    #[test_case(499, ORANGE; "orange upper bound")]
    #[test_case(500, RED; "boundary 500 picks higher band")]
    #[test_case(900, RED; "high")]
    fn test_applies_banding(applies: u64, expected: Palette) {
        assert_eq!(applies_palette(applies), expected);
    }

    #[test_case(NOW - DAY, -1; "one day past")]
    #[test_case(NOW, 0; "exactly now")]
    #[test_case(NOW + 1, 1; "one ms ahead rounds up")]
    #[test_case(NOW + DAY, 1; "exactly one day")]
    #[test_case(NOW + 2 * DAY, 2; "exactly two days")]
    #[test_case(NOW + 2 * DAY + 1, 3; "just past two days rounds up")]
    fn test_days_until(expire_at: i64, expected: i64) {
        assert_eq!(days_until(expire_at, NOW), expected);
    }

    #[test_case(NOW - DAY, GRAY; "expired")]
    #[test_case(NOW + 2 * DAY, RED; "two days is urgent")]
    #[test_case(NOW + 3 * DAY, RED; "three days still urgent")]
    #[test_case(NOW + 5 * DAY, ORANGE; "within a week")]
    #[test_case(NOW + 10 * DAY, YELLOW; "within two weeks")]
    #[test_case(NOW + 30 * DAY, GREEN; "far out")]
    fn test_expiry_banding(expire_at: i64, expected: Palette) {
        assert_eq!(expiry_palette(expire_at, NOW), expected);
    }

    #[test]
    fn test_expiration_labels() {
        assert_eq!(
            expiration_label(NOW + 2 * DAY, NOW),
            "Expires in 2 days (Aug 3, 2026)"
        );
        assert_eq!(expiration_label(NOW + DAY, NOW), "Expires tomorrow (Aug 2, 2026)");
        assert_eq!(expiration_label(NOW, NOW), "Expires today (Aug 1, 2026)");
        assert_eq!(expiration_label(NOW - DAY, NOW), "Expired (Jul 31, 2026)");
    }

    #[test]
    fn test_badges_full_set_in_order() {
        let badges = badges_for(&stats(87, 1204, NOW + 2 * DAY, Some(true)), NOW);
        let classes: Vec<_> = badges.iter().map(|b| b.marker_class).collect();
        assert_eq!(
            classes,
            vec![
                "custom-views-count",
                "custom-applies-count",
                "custom-expires-count",
                "custom-remote-allowed",
            ]
        );
        assert_eq!(badges[0].text, "1204 views");
        assert_eq!(badges[1].text, "87 applications");
        assert_eq!(badges[1].palette, YELLOW);
        assert_eq!(badges[2].palette, RED);
        assert_eq!(badges[3].text, "Primarily Remote");
        assert_eq!(badges[3].palette, GREEN);
    }

    #[test]
    fn test_zero_views_badge_is_skipped() {
        let badges = badges_for(&stats(5, 0, NOW + 30 * DAY, None), NOW);
        assert!(badges.iter().all(|b| b.marker_class != "custom-views-count"));
    }

    #[test]
    fn test_unknown_remote_state_renders_no_remote_badge() {
        let badges = badges_for(&stats(5, 9, NOW + 30 * DAY, None), NOW);
        assert!(badges.iter().all(|b| b.marker_class != "custom-remote-allowed"));
    }

    #[test]
    fn test_on_site_badge() {
        let badges = badges_for(&stats(5, 9, NOW + 30 * DAY, Some(false)), NOW);
        let remote = badges.last().unwrap();
        assert_eq!(remote.text, "Primarily On-Site");
        assert_eq!(remote.palette, RED);
    }
}
