//! Translation of iCalendar VEVENTs into Kalendas events.

use chrono::{NaiveDateTime, NaiveTime};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

use crate::error::{ImportError, ImportResult};
use crate::models::FeedEvent;

const DEFAULT_TITLE: &str = "Sin título";
const DEFAULT_LOCATION: &str = "Remoto";
const SHORT_TITLE_SUFFIX: &str = " (Importado)";
const MIN_TITLE_CHARS: usize = 3;
const MAX_TEXT_CHARS: usize = 100;
const DEFAULT_DURATION_MINUTES: i64 = 60;
const FALLBACK_DURATION_MINUTES: i64 = 30;

/// Parse a feed and translate each VEVENT.
///
/// The outer error means the content is not a calendar at all. Each inner
/// `Err` is one VEVENT that could not be translated, with the reason. When the
/// feed does not parse as a whole, its VEVENTs are parsed one by one so a
/// malformed line only fails the VEVENT that carries it.
pub fn parse_feed(content: &str) -> ImportResult<Vec<Result<FeedEvent, String>>> {
    if !has_calendar_framing(content) {
        return Err(ImportError::InvalidFeed);
    }

    let unfolded = unfold(content);
    let parsed = read_calendar(&unfolded);
    match parsed {
        Ok(calendar) => Ok(translate_all(&calendar.components)),
        Err(e) => {
            tracing::info!(error = %e, "Feed does not parse as a whole, reading VEVENTs one by one");
            let blocks = vevent_blocks(&unfolded);
            if blocks.is_empty() {
                return Err(ImportError::InvalidFeed);
            }
            Ok(blocks.iter().flat_map(|block| parse_block(block)).collect())
        }
    }
}

fn has_calendar_framing(content: &str) -> bool {
    const MARKER: &str = "BEGIN:VCALENDAR";
    content
        .trim_start()
        .get(..MARKER.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(MARKER))
}

fn translate_all(components: &[Component<'_>]) -> Vec<Result<FeedEvent, String>> {
    let mut vevents = Vec::new();
    collect_vevents(components, &mut vevents);
    vevents.into_iter().map(translate).collect()
}

/// `BEGIN:VEVENT` to `END:VEVENT` blocks of unfolded content, markers included
fn vevent_blocks(unfolded: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for line in unfolded.lines() {
        let line = line.trim_end();
        if line.eq_ignore_ascii_case("BEGIN:VEVENT") {
            current = Some(String::new());
        }
        if let Some(block) = current.as_mut() {
            block.push_str(line);
            block.push_str("\r\n");
        }
        if line.eq_ignore_ascii_case("END:VEVENT") {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
        }
    }
    blocks
}

fn parse_block(block: &str) -> Vec<Result<FeedEvent, String>> {
    let wrapped = format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n{block}END:VCALENDAR\r\n");
    let parsed = read_calendar(&wrapped);
    match parsed {
        Ok(calendar) => translate_all(&calendar.components),
        Err(e) => vec![Err(format!("Malformed VEVENT: {e}"))],
    }
}

/// Translate one VEVENT
pub fn translate(vevent: &Component<'_>) -> Result<FeedEvent, String> {
    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let title = if title.chars().count() < MIN_TITLE_CHARS {
        format!("{}{}", title, SHORT_TITLE_SUFFIX)
    } else {
        title
    };

    let start_prop = vevent
        .find_prop("DTSTART")
        .ok_or_else(|| "VEVENT has no DTSTART".to_string())?;
    let starts_at = DatePerhapsTime::try_from(start_prop)
        .map(wall_clock)
        .map_err(|_| format!("Unparsable DTSTART '{}'", start_prop.val.as_ref()))?;

    let minutes = match vevent.find_prop("DTEND") {
        Some(end_prop) => {
            let ends_at = DatePerhapsTime::try_from(end_prop)
                .map(wall_clock)
                .map_err(|_| format!("Unparsable DTEND '{}'", end_prop.val.as_ref()))?;
            (ends_at - starts_at).num_minutes()
        }
        None => DEFAULT_DURATION_MINUTES,
    };
    let minutes = if minutes <= 0 { FALLBACK_DURATION_MINUTES } else { minutes };

    let location = vevent
        .find_prop("LOCATION")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    Ok(FeedEvent {
        title: truncate(&title, MAX_TEXT_CHARS),
        starts_at,
        duration_minutes: i32::try_from(minutes).unwrap_or(i32::MAX),
        location: truncate(&location, MAX_TEXT_CHARS),
    })
}

/// Naive wall clock of a DTSTART/DTEND value.
///
/// Dates become midnight, UTC values keep their UTC clock, zoned and floating
/// values keep their local clock.
fn wall_clock(value: DatePerhapsTime) -> NaiveDateTime {
    match value {
        DatePerhapsTime::Date(date) => date.and_time(NaiveTime::MIN),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => dt.naive_utc(),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => naive,
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, .. }) => date_time,
    }
}

/// Undo iCalendar TEXT escaping (`\,` `\;` `\n` `\\`)
fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn feed(events: &[&str]) -> String {
        let mut content = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//test//EN\r\n");
        for event in events {
            content.push_str("BEGIN:VEVENT\r\n");
            content.push_str(event);
            content.push_str("END:VEVENT\r\n");
        }
        content.push_str("END:VCALENDAR\r\n");
        content
    }

    fn single(event: &str) -> Result<FeedEvent, String> {
        parse_feed(&feed(&[event])).unwrap().remove(0)
    }

    #[test]
    fn test_two_valid_one_malformed() {
        let results = parse_feed(&feed(&[
            "UID:1\r\nSUMMARY:Año Nuevo\r\nDTSTART;VALUE=DATE:20250101\r\nDTEND;VALUE=DATE:20250102\r\n",
            "UID:2\r\nSUMMARY:Reyes\r\nDTSTART:20250106T100000Z\r\n",
            "UID:3\r\nSUMMARY:Roto\r\nDTSTART:no-es-una-fecha\r\n",
        ]))
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
        assert!(results[2].is_err());
    }

    #[test]
    fn test_malformed_line_only_fails_its_vevent() {
        let results = parse_feed(&feed(&[
            "UID:1\r\nSUMMARY:Año Nuevo\r\nDTSTART;VALUE=DATE:20250101\r\n",
            "UID:2\r\nSUMMARY:Linea rota\r\nESTA LINEA NO TIENE DOS PUNTOS\r\nDTSTART:20250105T100000Z\r\n",
            "UID:3\r\nSUMMARY:Reyes\r\nDTSTART:20250106T100000Z\r\n",
        ]))
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().title, "Año Nuevo");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().starts_at, at(2025, 1, 6, 10, 0));
    }

    #[test]
    fn test_vevent_blocks_split_unfolded_content() {
        let blocks = vevent_blocks(&feed(&["UID:1\r\n", "UID:2\r\n"]));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], "BEGIN:VEVENT\r\nUID:2\r\nEND:VEVENT\r\n");
    }

    #[test]
    fn test_calendar_framing_ignores_case() {
        assert!(has_calendar_framing("begin:vcalendar\r\nEND:VCALENDAR\r\n"));
        assert!(has_calendar_framing("\r\n  Begin:VCalendar\r\n"));
        assert!(!has_calendar_framing("BEGIN:VCAL"));
        assert!(!has_calendar_framing("<html>"));
    }

    #[test]
    fn test_date_only_becomes_midnight() {
        let event = single("SUMMARY:Festivo\r\nDTSTART;VALUE=DATE:20250101\r\nDTEND;VALUE=DATE:20250102\r\n")
            .unwrap();
        assert_eq!(event.starts_at, at(2025, 1, 1, 0, 0));
        assert_eq!(event.duration_minutes, 1440);
    }

    #[test]
    fn test_utc_and_zoned_keep_their_wall_clock() {
        let utc = single("SUMMARY:UTC\r\nDTSTART:20250301T093000Z\r\nDTEND:20250301T103000Z\r\n").unwrap();
        assert_eq!(utc.starts_at, at(2025, 3, 1, 9, 30));
        assert_eq!(utc.duration_minutes, 60);

        let zoned = single(
            "SUMMARY:Madrid\r\nDTSTART;TZID=Europe/Madrid:20250301T093000\r\nDTEND;TZID=Europe/Madrid:20250301T111500\r\n",
        )
        .unwrap();
        assert_eq!(zoned.starts_at, at(2025, 3, 1, 9, 30));
        assert_eq!(zoned.duration_minutes, 105);

        let floating = single("SUMMARY:Local\r\nDTSTART:20250301T093000\r\n").unwrap();
        assert_eq!(floating.starts_at, at(2025, 3, 1, 9, 30));
    }

    #[test]
    fn test_duration_defaults() {
        let no_end = single("SUMMARY:Sin fin\r\nDTSTART:20250301T093000\r\n").unwrap();
        assert_eq!(no_end.duration_minutes, 60);

        let backwards =
            single("SUMMARY:Al reves\r\nDTSTART:20250301T093000\r\nDTEND:20250301T090000\r\n").unwrap();
        assert_eq!(backwards.duration_minutes, 30);

        let bad_end = single("SUMMARY:Fin roto\r\nDTSTART:20250301T093000\r\nDTEND:mañana\r\n");
        assert!(bad_end.is_err());
    }

    #[test]
    fn test_title_and_location_rules() {
        let untitled = single("DTSTART:20250301T093000\r\n").unwrap();
        assert_eq!(untitled.title, "Sin título");
        assert_eq!(untitled.location, "Remoto");

        let short = single("SUMMARY:Yo\r\nDTSTART:20250301T093000\r\n").unwrap();
        assert_eq!(short.title, "Yo (Importado)");

        let escaped = single(
            "SUMMARY:Cena\\, copas\\; baile\r\nLOCATION:Bar\\, Málaga\r\nDTSTART:20250301T093000\r\n",
        )
        .unwrap();
        assert_eq!(escaped.title, "Cena, copas; baile");
        assert_eq!(escaped.location, "Bar, Málaga");

        let long = format!("SUMMARY:{}\r\nDTSTART:20250301T093000\r\n", "x".repeat(150));
        assert_eq!(single(&long).unwrap().title.chars().count(), 100);
    }

    #[test]
    fn test_missing_start_fails() {
        assert!(single("SUMMARY:Sin inicio\r\n").is_err());
    }

    #[test]
    fn test_rejects_non_calendar_content() {
        assert!(matches!(
            parse_feed("<html><body>Not found</body></html>"),
            Err(ImportError::InvalidFeed)
        ));
        assert!(matches!(parse_feed(""), Err(ImportError::InvalidFeed)));
    }

    #[test]
    fn test_unescape_text() {
        assert_eq!(unescape_text(r"a\\b\nc"), "a\\b\nc");
        assert_eq!(unescape_text(r"trailing\"), "trailing\\");
    }
}
