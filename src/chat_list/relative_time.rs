//! Relative age labels ("há 5 minutos", "in 2 hours").

use chrono::{DateTime, NaiveDateTime, Utc};

/// Locale used for relative-time phrasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    /// Brazilian Portuguese.
    #[default]
    PtBr,
    /// English.
    En,
}

impl Locale {
    /// Pick a locale from a language tag; anything not English is `PtBr`.
    pub fn from_tag(tag: &str) -> Self {
        let lang = tag.split(['-', '_']).next().unwrap_or_default();
        if lang.eq_ignore_ascii_case("en") {
            Self::En
        } else {
            Self::PtBr
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

const MINUTES_PER_HOUR: f64 = 60.0;
const MINUTES_PER_DAY: f64 = 24.0 * MINUTES_PER_HOUR;
const MINUTES_PER_WEEK: f64 = 7.0 * MINUTES_PER_DAY;
const MINUTES_PER_MONTH: f64 = 30.0 * MINUTES_PER_DAY;
const MINUTES_PER_YEAR: f64 = 365.0 * MINUTES_PER_DAY;

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Label describing how long ago (or how far ahead) `updated_at` is.
///
/// Returns an empty string when the timestamp cannot be parsed.
pub fn relative_time(updated_at: &str, now: DateTime<Utc>, locale: Locale) -> String {
    let Some(then) = parse_timestamp(updated_at) else {
        return String::new();
    };

    #[allow(clippy::cast_precision_loss)]
    let delta_minutes = (then - now).num_milliseconds() as f64 / 60_000.0;
    let magnitude = delta_minutes.abs();

    if magnitude < 1.0 {
        return now_label(locale).to_string();
    }

    let (unit, per_unit) = if magnitude < MINUTES_PER_HOUR {
        (Unit::Minute, 1.0)
    } else if magnitude < MINUTES_PER_DAY {
        (Unit::Hour, MINUTES_PER_HOUR)
    } else if magnitude < MINUTES_PER_WEEK {
        (Unit::Day, MINUTES_PER_DAY)
    } else if magnitude < 5.0 * MINUTES_PER_WEEK {
        (Unit::Week, MINUTES_PER_WEEK)
    } else if magnitude < 12.0 * MINUTES_PER_MONTH {
        (Unit::Month, MINUTES_PER_MONTH)
    } else {
        (Unit::Year, MINUTES_PER_YEAR)
    };

    #[allow(clippy::cast_possible_truncation)]
    let count = (magnitude / per_unit).round() as i64;
    format_relative(count, unit, delta_minutes < 0.0, locale)
}

fn now_label(locale: Locale) -> &'static str {
    match locale {
        Locale::PtBr => "agora",
        Locale::En => "now",
    }
}

fn unit_name(unit: Unit, count: i64, locale: Locale) -> &'static str {
    let one = count == 1;
    match (locale, unit) {
        (Locale::PtBr, Unit::Minute) => if one { "minuto" } else { "minutos" },
        (Locale::PtBr, Unit::Hour) => if one { "hora" } else { "horas" },
        (Locale::PtBr, Unit::Day) => if one { "dia" } else { "dias" },
        (Locale::PtBr, Unit::Week) => if one { "semana" } else { "semanas" },
        (Locale::PtBr, Unit::Month) => if one { "mês" } else { "meses" },
        (Locale::PtBr, Unit::Year) => if one { "ano" } else { "anos" },
        (Locale::En, Unit::Minute) => if one { "minute" } else { "minutes" },
        (Locale::En, Unit::Hour) => if one { "hour" } else { "hours" },
        (Locale::En, Unit::Day) => if one { "day" } else { "days" },
        (Locale::En, Unit::Week) => if one { "week" } else { "weeks" },
        (Locale::En, Unit::Month) => if one { "month" } else { "months" },
        (Locale::En, Unit::Year) => if one { "year" } else { "years" },
    }
}

fn format_relative(count: i64, unit: Unit, past: bool, locale: Locale) -> String {
    let name = unit_name(unit, count, locale);
    match (locale, past) {
        (Locale::PtBr, true) => format!("há {count} {name}"),
        (Locale::PtBr, false) => format!("em {count} {name}"),
        (Locale::En, true) => format!("{count} {name} ago"),
        (Locale::En, false) => format!("in {count} {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn ago(d: Duration) -> String {
        (now() - d).to_rfc3339()
    }

    #[test]
    fn locale_from_tag() {
        assert_eq!(Locale::from_tag("en-US"), Locale::En);
        assert_eq!(Locale::from_tag("EN"), Locale::En);
        assert_eq!(Locale::from_tag("pt-BR"), Locale::PtBr);
        assert_eq!(Locale::from_tag(""), Locale::PtBr);
    }

    #[test]
    fn under_a_minute_is_now() {
        assert_eq!(relative_time(&ago(Duration::seconds(30)), now(), Locale::En), "now");
        assert_eq!(relative_time(&ago(Duration::seconds(30)), now(), Locale::PtBr), "agora");
        let ahead = (now() + Duration::seconds(20)).to_rfc3339();
        assert_eq!(relative_time(&ahead, now(), Locale::En), "now");
    }

    #[test]
    fn minutes_bucket() {
        assert_eq!(
            relative_time(&ago(Duration::minutes(5)), now(), Locale::En),
            "5 minutes ago"
        );
        assert_eq!(
            relative_time(&ago(Duration::seconds(61)), now(), Locale::PtBr),
            "há 1 minuto"
        );
    }

    #[test]
    fn ninety_minutes_rounds_into_hours() {
        assert_eq!(
            relative_time(&ago(Duration::minutes(90)), now(), Locale::En),
            "2 hours ago"
        );
        assert_eq!(
            relative_time(&ago(Duration::minutes(90)), now(), Locale::PtBr),
            "há 2 horas"
        );
    }

    #[test]
    fn days_weeks_months() {
        assert_eq!(relative_time(&ago(Duration::days(3)), now(), Locale::En), "3 days ago");
        assert_eq!(relative_time(&ago(Duration::days(14)), now(), Locale::En), "2 weeks ago");
        assert_eq!(relative_time(&ago(Duration::days(90)), now(), Locale::En), "3 months ago");
        assert_eq!(relative_time(&ago(Duration::days(60)), now(), Locale::PtBr), "há 2 meses");
    }

    #[test]
    fn four_hundred_days_is_years() {
        assert_eq!(relative_time(&ago(Duration::days(400)), now(), Locale::En), "1 year ago");
        assert_eq!(relative_time(&ago(Duration::days(400)), now(), Locale::PtBr), "há 1 ano");
    }

    #[test]
    fn future_timestamps_use_future_phrasing() {
        let ahead = (now() + Duration::hours(3)).to_rfc3339();
        assert_eq!(relative_time(&ahead, now(), Locale::En), "in 3 hours");
        assert_eq!(relative_time(&ahead, now(), Locale::PtBr), "em 3 horas");
    }

    #[test]
    fn unparseable_is_empty() {
        assert_eq!(relative_time("yesterday-ish", now(), Locale::En), "");
        assert_eq!(relative_time("", now(), Locale::PtBr), "");
    }

    #[test]
    fn naive_timestamps_are_utc() {
        assert_eq!(
            relative_time("2025-06-15T10:00:00.000000", now(), Locale::En),
            "2 hours ago"
        );
    }
}
