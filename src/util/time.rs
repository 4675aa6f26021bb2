use chrono::{DateTime, Datelike, Utc};

/// Format a creation timestamp relative to `now` for display.
///
/// Under a minute: "just now". Under an hour: "{m}m ago". Under a day:
/// "{h}h ago". Under a week: "{d}d ago". Otherwise "Mon D", with the year
/// appended when it differs from the current one.
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(created_at);

    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    if days < 7 {
        return format!("{}d ago", days);
    }

    if created_at.year() == now.year() {
        created_at.format("%b %-d").to_string()
    } else {
        created_at.format("%b %-d, %Y").to_string()
    }
}
