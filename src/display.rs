use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use clap::ValueEnum;
use serde::Serialize;

/// Locale used for date and time labels. Labels are derived on every page
/// build, so switching locale between renders takes effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
pub enum DisplayLocale {
    #[default]
    #[value(name = "en-US")]
    EnUs,
    #[value(name = "en-GB")]
    EnGb,
    #[value(name = "de-DE")]
    DeDe,
    #[value(name = "fr-FR")]
    FrFr,
    #[value(name = "iso")]
    Iso,
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parses a scheduled time. Offset-free values are wall-clock times; RFC 3339
/// values keep the wall-clock time of their own offset.
pub fn parse_scheduled_at(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

pub fn local_date(at: NaiveDateTime, locale: DisplayLocale) -> String {
    let date = at.date();
    match locale {
        DisplayLocale::EnUs => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        DisplayLocale::EnGb | DisplayLocale::FrFr => date.format("%d/%m/%Y").to_string(),
        DisplayLocale::DeDe => date.format("%d.%m.%Y").to_string(),
        DisplayLocale::Iso => date.format("%Y-%m-%d").to_string(),
    }
}

pub fn local_time(at: NaiveDateTime, locale: DisplayLocale) -> String {
    match locale {
        DisplayLocale::EnUs => {
            let (is_pm, hour) = at.hour12();
            let suffix = if is_pm { "PM" } else { "AM" };
            format!("{}:{:02} {}", hour, at.minute(), suffix)
        }
        _ => at.format("%H:%M").to_string(),
    }
}

/// Label for the recent-interviews preview: "Today, 2:00 PM", "Tomorrow, 14:00",
/// or the local date and time when further out.
pub fn relative_label(at: NaiveDateTime, today: NaiveDate, locale: DisplayLocale) -> String {
    let day = match at.date() {
        date if date == today => "Today".to_string(),
        date if Some(date) == today.checked_add_signed(Duration::days(1)) => {
            "Tomorrow".to_string()
        }
        date if Some(date) == today.checked_sub_signed(Duration::days(1)) => {
            "Yesterday".to_string()
        }
        _ => local_date(at, locale),
    };
    format!("{}, {}", day, local_time(at, locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(value: &str) -> NaiveDateTime {
        parse_scheduled_at(value).unwrap()
    }

    #[test]
    fn parses_supported_timestamp_shapes() {
        let expected = NaiveDate::from_ymd_opt(2023, 12, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        assert_eq!(parse_scheduled_at("2023-12-10T14:00:00"), Some(expected));
        assert_eq!(parse_scheduled_at("2023-12-10T14:00"), Some(expected));
        assert_eq!(parse_scheduled_at("2023-12-10T14:00:00.000"), Some(expected));
        assert_eq!(parse_scheduled_at("2023-12-10T14:00:00+02:00"), Some(expected));
        assert_eq!(parse_scheduled_at("2023-12-10"), None);
        assert_eq!(parse_scheduled_at("soon"), None);
    }

    #[test]
    fn local_date_follows_locale() {
        let value = at("2023-12-03T14:00:00");
        assert_eq!(local_date(value, DisplayLocale::EnUs), "12/3/2023");
        assert_eq!(local_date(value, DisplayLocale::EnGb), "03/12/2023");
        assert_eq!(local_date(value, DisplayLocale::FrFr), "03/12/2023");
        assert_eq!(local_date(value, DisplayLocale::DeDe), "03.12.2023");
        assert_eq!(local_date(value, DisplayLocale::Iso), "2023-12-03");
    }

    #[test]
    fn local_time_uses_twelve_hour_clock_for_en_us_only() {
        assert_eq!(local_time(at("2023-12-10T14:00:00"), DisplayLocale::EnUs), "2:00 PM");
        assert_eq!(local_time(at("2023-12-10T00:05:00"), DisplayLocale::EnUs), "12:05 AM");
        assert_eq!(local_time(at("2023-12-10T14:00:00"), DisplayLocale::DeDe), "14:00");
    }

    #[test]
    fn relative_label_names_nearby_days() {
        let today = NaiveDate::from_ymd_opt(2023, 12, 10).unwrap();
        let locale = DisplayLocale::EnUs;
        assert_eq!(relative_label(at("2023-12-10T14:00:00"), today, locale), "Today, 2:00 PM");
        assert_eq!(relative_label(at("2023-12-11T10:00:00"), today, locale), "Tomorrow, 10:00 AM");
        assert_eq!(relative_label(at("2023-12-09T09:30:00"), today, locale), "Yesterday, 9:30 AM");
        assert_eq!(relative_label(at("2023-12-20T15:30:00"), today, locale), "12/20/2023, 3:30 PM");
    }
}
