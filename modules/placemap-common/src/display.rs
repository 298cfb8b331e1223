//! Presentation helpers shared by the session and the rendering layer.

/// Longest plural name shown untruncated in a category header.
const MAX_LABEL_CHARS: usize = 22;
const TRUNCATED_LABEL_CHARS: usize = 18;

pub const DEFAULT_MARKER_ICON: &str = "img/default_marker.png";
pub const DEFAULT_COLOR: &str = "#9e9e9e";

const DAY_NAMES: [&str; 8] = ["None", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Marker icon and accent color per top-level provider category.
const ROOT_STYLES: &[(&str, &str, &str)] = &[
    ("4d4b7105d754a06374d81259", "img/food_marker.png", "#f44336"),
    ("4d4b7105d754a06376d81259", "img/nightlife_marker.png", "#e91e63"),
    ("4d4b7105d754a06377d81259", "img/exterior_marker.png", "#673ab7"),
    ("4d4b7105d754a06375d81259", "img/workplace_marker.png", "#009688"),
    ("4e67e38e036454776db1fb3a", "img/home_marker.png", "#4caf50"),
    ("4d4b7105d754a06378d81259", "img/shopping_marker.png", "#9c27b0"),
    ("4d4b7105d754a06379d81259", "img/travel_marker.png", "#795548"),
    ("4d4b7104d754a06370d81259", "img/culture_marker.png", "#00bcd4"),
    ("4d4b7105d754a06372d81259", "img/education_marker.png", "#607d8b"),
    ("4d4b7105d754a06373d81259", "img/event_marker.png", "#9e9e9e"),
];

pub fn marker_icon_for(category_id: &str) -> &'static str {
    ROOT_STYLES
        .iter()
        .find(|(id, _, _)| *id == category_id)
        .map(|(_, icon, _)| *icon)
        .unwrap_or(DEFAULT_MARKER_ICON)
}

pub fn color_for(category_id: &str) -> &'static str {
    ROOT_STYLES
        .iter()
        .find(|(id, _, _)| *id == category_id)
        .map(|(_, _, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// `img/food_marker.png` -> `img/food_marker_selected.png`
pub fn selected_icon(icon: &str) -> String {
    match icon.strip_suffix(".png") {
        Some(stem) => format!("{stem}_selected.png"),
        None => format!("{icon}_selected"),
    }
}

pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        let head: String = label.chars().take(TRUNCATED_LABEL_CHARS).collect();
        format!("{head} \u{2026}")
    } else {
        label.to_string()
    }
}

/// "0830" -> "08 h 30". Inputs shorter than two chars are returned unchanged.
pub fn format_hour(hour: &str) -> String {
    match (hour.get(..2), hour.get(2..)) {
        (Some(h), Some(m)) => format!("{h} h {m}"),
        _ => hour.to_string(),
    }
}

pub fn day_name(day: u8) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("None")
}
