use std::sync::OnceLock;

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use regex::Regex;
use roxmltree::Node;

use super::{DateProperty, ValidationContext};
use crate::error::Result;
use crate::xml_utils::text_content;

/// Extended format: `2008-10-21`, `2008-10-21T10:30`, `2008-10-21T10:30:00.5+02:00`
static EXTENDED_REGEX: OnceLock<Regex> = OnceLock::new();

/// Basic format: `20081021`, `20081021T1030`, `20081021T103000Z`
static BASIC_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_extended_regex() -> &'static Regex {
    EXTENDED_REGEX.get_or_init(|| {
        Regex::new(
            r"^(\d{4})-(\d{2})-(\d{2})(?:T(\d{2}):(\d{2})(?::(\d{2})(?:[.,]\d+)?)?(Z|[+-]\d{2}(?::?\d{2})?)?)?$",
        )
        .expect("Failed to compile extended date regex")
    })
}

fn get_basic_regex() -> &'static Regex {
    BASIC_REGEX.get_or_init(|| {
        Regex::new(
            r"^(\d{4})(\d{2})(\d{2})(?:T(\d{2})(\d{2})(?:(\d{2})(?:[.,]\d+)?)?(Z|[+-]\d{2}(?::?\d{2})?)?)?$",
        )
        .expect("Failed to compile basic date regex")
    })
}

/// Date value of a property node
///
/// `abbr` elements carry the machine readable value in `title`, `time`
/// elements in `datetime`; anything else uses its text.
pub fn date_value(node: Node<'_, '_>) -> String {
    let attribute = match node.tag_name().name() {
        "abbr" => node.attribute("title"),
        "time" => node.attribute("datetime"),
        _ => None,
    };
    match attribute {
        Some(value) => value.trim().to_string(),
        None => text_content(node).trim().to_string(),
    }
}

/// True if `value` is an ISO 8601 calendar date or date-time
pub fn is_iso8601(value: &str) -> bool {
    let captures = match get_extended_regex()
        .captures(value)
        .or_else(|| get_basic_regex().captures(value))
    {
        Some(captures) => captures,
        None => return false,
    };

    let number = |index: usize| -> Option<u32> {
        captures.get(index).and_then(|m| m.as_str().parse().ok())
    };

    let date_ok = match (number(1), number(2), number(3)) {
        (Some(year), Some(month), Some(day)) => {
            NaiveDate::from_ymd_opt(year as i32, month, day).is_some()
        }
        _ => false,
    };
    if !date_ok {
        return false;
    }

    if let Some(hour) = number(4) {
        let minute = number(5).unwrap_or(0);
        let second = number(6).unwrap_or(0);
        if NaiveTime::from_hms_opt(hour, minute, second).is_none() {
            return false;
        }
    }

    match captures.get(7).map(|m| m.as_str()) {
        None | Some("Z") => true,
        Some(offset) => parse_offset(offset).is_some(),
    }
}

fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let digits: String = offset[1..].chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..) {
        Some("") | None => 0,
        Some(m) => m.parse().ok()?,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Date format rule of an `updated` or `published` node
pub fn analyze<'a, 'input>(
    ctx: &mut ValidationContext<'a, 'input>,
    node: Node<'a, 'input>,
    property: DateProperty,
) -> Result<()> {
    let value = date_value(node);

    if value.is_empty() {
        ctx.report_at(format!("{} keyword has an empty date value", property.keyword()), node);
    } else if !is_iso8601(&value) {
        ctx.report_at(
            format!(
                "{} keyword value {} is not a valid ISO 8601 date",
                property.keyword(),
                value
            ),
            node,
        );
    }

    Ok(())
}
