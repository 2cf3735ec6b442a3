//! Static knowledge about which weather conditions and time periods may stand
//! in for one another.
//!
//! Time periods fall into three visual groups. Night images are never shown
//! for daytime contexts and vice versa; transition periods (dusk light) may
//! borrow from the day but not from the night.

/// Substitute weathers, most to least visually similar
const WEATHER_FALLBACKS: &[(&str, &[&str])] = &[
    ("Sunny", &["Partly Cloudy", "Cloudy", "Clear"]),
    ("Clear", &["Sunny", "Partly Cloudy"]),
    ("Partly Cloudy", &["Sunny", "Cloudy"]),
    ("Cloudy", &["Overcast", "Partly Cloudy"]),
    ("Overcast", &["Cloudy", "Rainy"]),
    ("Rainy", &["Stormy", "Cloudy", "Overcast"]),
    ("Stormy", &["Rainy", "Overcast"]),
    ("Snowy", &["Cloudy", "Overcast", "Foggy"]),
    ("Foggy", &["Cloudy", "Overcast"]),
    ("Windy", &["Cloudy", "Partly Cloudy"]),
];

/// Substitute time periods, most to least visually similar
const TIME_FALLBACKS: &[(&str, &[&str])] = &[
    ("Dawn", &["Early Morning", "Morning", "Golden Hour"]),
    ("Early Morning", &["Dawn", "Morning"]),
    ("Morning", &["Dawn", "Midday", "Early Morning"]),
    ("Midday", &["Afternoon", "Morning"]),
    ("Afternoon", &["Midday", "Evening", "Golden Hour"]),
    ("Golden Hour", &["Afternoon", "Evening"]),
    ("Evening", &["Golden Hour", "Afternoon", "Night"]),
    ("Night", &["Late Night", "Evening", "Dawn"]),
    ("Late Night", &["Night", "Dawn"]),
    ("Clear Night", &["Night", "Late Night", "Evening"]),
];

const NIGHT_PERIODS: &[&str] = &["Night", "Late Night", "Clear Night"];
const DAY_PERIODS: &[&str] = &["Morning", "Midday", "Afternoon", "Dawn", "Early Morning"];
const TRANSITION_PERIODS: &[&str] = &["Evening", "Golden Hour"];

/// Visual compatibility group of a time period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeGroup {
    Night,
    Day,
    Transition,
}

impl TimeGroup {
    fn members(self) -> &'static [&'static str] {
        match self {
            TimeGroup::Night => NIGHT_PERIODS,
            TimeGroup::Day => DAY_PERIODS,
            TimeGroup::Transition => TRANSITION_PERIODS,
        }
    }
}

type FallbackTable = &'static [(&'static str, &'static [&'static str])];

fn lookup(table: FallbackTable, label: &str) -> &'static [&'static str] {
    let label = label.trim();
    table
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(label))
        .map(|(_, fallbacks)| *fallbacks)
        .unwrap_or(&[])
}

/// Ordered substitute weathers for `weather`; empty for unknown labels
pub fn weather_fallbacks(weather: &str) -> &'static [&'static str] {
    lookup(WEATHER_FALLBACKS, weather)
}

/// Ordered substitute time periods for `time_period`; empty for unknown labels
pub fn time_fallbacks(time_period: &str) -> &'static [&'static str] {
    lookup(TIME_FALLBACKS, time_period)
}

pub fn time_group_of(time_period: &str) -> Option<TimeGroup> {
    let label = time_period.trim();
    [TimeGroup::Night, TimeGroup::Day, TimeGroup::Transition]
        .into_iter()
        .find(|group| group.members().iter().any(|m| m.eq_ignore_ascii_case(label)))
}

/// Time periods whose images may be shown for `time_period`.
///
/// Always contains the period itself. Unknown labels are only compatible with
/// themselves.
pub fn compatible_periods(time_period: &str) -> Vec<String> {
    let Some(group) = time_group_of(time_period) else {
        return vec![time_period.trim().to_string()];
    };

    let extra: &[&str] = match group {
        TimeGroup::Night => &["Evening"],
        TimeGroup::Day => TRANSITION_PERIODS,
        TimeGroup::Transition => DAY_PERIODS,
    };

    group
        .members()
        .iter()
        .chain(extra)
        .map(|p| p.to_string())
        .collect()
}

/// True when an image labelled `candidate` may be shown for `time_period`
pub fn is_time_compatible(time_period: &str, candidate: &str) -> bool {
    compatible_periods(time_period)
        .iter()
        .any(|p| p.eq_ignore_ascii_case(candidate.trim()))
}

/// Substitute time periods for `time_period`, most similar first.
///
/// Hand-authored fallbacks that stay inside the compatible set come first,
/// followed by the rest of the compatible set in group order. The period
/// itself is never included.
pub fn alternative_periods(time_period: &str) -> Vec<String> {
    let compatible = compatible_periods(time_period);
    let original = time_period.trim();

    let preferred = time_fallbacks(original)
        .iter()
        .filter(|alt| compatible.iter().any(|c| c.eq_ignore_ascii_case(alt)))
        .map(|alt| alt.to_string());

    let mut ordered: Vec<String> = Vec::with_capacity(compatible.len());
    for alt in preferred.chain(compatible.iter().cloned()) {
        let seen = ordered.iter().any(|o| o.eq_ignore_ascii_case(&alt));
        if seen || alt.eq_ignore_ascii_case(original) {
            continue;
        }
        ordered.push(alt);
    }
    ordered
}

fn canonical(known: impl IntoIterator<Item = &'static str>, label: &str) -> Option<String> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let canonical = known
        .into_iter()
        .find(|k| k.eq_ignore_ascii_case(label))
        .map(str::to_string)
        .unwrap_or_else(|| label.to_string());
    Some(canonical)
}

/// Normalizes a weather label: blank becomes `None`, known labels take their
/// canonical spelling, unknown labels pass through trimmed.
pub fn canonical_weather(weather: &str) -> Option<String> {
    let known = WEATHER_FALLBACKS
        .iter()
        .flat_map(|(key, fallbacks)| std::iter::once(*key).chain(fallbacks.iter().copied()));
    canonical(known, weather)
}

/// Same as [`canonical_weather`] for time periods
pub fn canonical_time_period(time_period: &str) -> Option<String> {
    let known = NIGHT_PERIODS
        .iter()
        .chain(DAY_PERIODS)
        .chain(TRANSITION_PERIODS)
        .copied();
    canonical(known, time_period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_fallbacks_ordered() {
        assert_eq!(weather_fallbacks("Sunny"), &["Partly Cloudy", "Cloudy", "Clear"]);
        assert_eq!(weather_fallbacks("rainy"), &["Stormy", "Cloudy", "Overcast"]);
    }

    #[test]
    fn test_unknown_label_has_no_fallbacks() {
        assert!(weather_fallbacks("Hail").is_empty());
        assert!(time_fallbacks("Brunch").is_empty());
        assert!(weather_fallbacks("").is_empty());
    }

    #[test]
    fn test_time_groups() {
        assert_eq!(time_group_of("Late Night"), Some(TimeGroup::Night));
        assert_eq!(time_group_of("early morning"), Some(TimeGroup::Day));
        assert_eq!(time_group_of("Golden Hour"), Some(TimeGroup::Transition));
        assert_eq!(time_group_of("Brunch"), None);
    }

    #[test]
    fn test_night_compatible_with_evening_only() {
        let periods = compatible_periods("Night");
        assert_eq!(periods, vec!["Night", "Late Night", "Clear Night", "Evening"]);
        assert!(!periods.iter().any(|p| p == "Morning" || p == "Golden Hour"));
    }

    #[test]
    fn test_day_and_transition_share_periods() {
        let day = compatible_periods("Morning");
        assert_eq!(day.len(), 7);
        assert!(day.contains(&"Golden Hour".to_string()));
        assert!(!day.contains(&"Night".to_string()));

        let transition = compatible_periods("Evening");
        assert!(transition.contains(&"Midday".to_string()));
        assert!(!transition.contains(&"Night".to_string()));
    }

    #[test]
    fn test_unknown_period_compatible_with_itself() {
        assert_eq!(compatible_periods("Brunch"), vec!["Brunch"]);
        assert!(is_time_compatible("Brunch", "brunch"));
        assert!(!is_time_compatible("Brunch", "Morning"));
    }

    #[test]
    fn test_alternative_periods_prefer_hand_authored_order() {
        // Night falls back to Late Night then Evening; Dawn is filtered out
        assert_eq!(
            alternative_periods("Night"),
            vec!["Late Night", "Evening", "Clear Night"]
        );

        let morning = alternative_periods("Morning");
        assert_eq!(&morning[..3], &["Dawn", "Midday", "Early Morning"]);
        assert!(!morning.contains(&"Morning".to_string()));
        assert_eq!(morning.len(), 6);
    }

    #[test]
    fn test_alternative_periods_for_unknown_label_empty() {
        assert!(alternative_periods("Brunch").is_empty());
    }

    #[test]
    fn test_canonical_labels() {
        assert_eq!(canonical_weather(" partly cloudy "), Some("Partly Cloudy".to_string()));
        assert_eq!(canonical_weather("Hail"), Some("Hail".to_string()));
        assert_eq!(canonical_weather("  "), None);
        assert_eq!(canonical_time_period("GOLDEN HOUR"), Some("Golden Hour".to_string()));
    }
}
