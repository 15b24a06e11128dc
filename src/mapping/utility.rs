//! Scalar conversions between exchange-schema datatypes and their internal
//! counterparts. Every function is pure; external-to-internal conversions fail
//! with `DataFormat` on malformed input and `InvalidData` on values outside
//! their domain, never coercing silently.

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, VmrMappingError};
use crate::internal;
use crate::schema::{Bl, Cd, Ii, Int, IvlTs, Ts};

static TS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})(\d{2})?(\d{2})?(\d{2})?(\d{2})?(\d{2})?(?:\.(\d{1,4}))?(?:([+-])(\d{2})(\d{2}))?$",
    )
    .expect("TS pattern is a valid regex")
});

const ID_SEPARATOR: char = '^';

pub fn ii_to_id(source: &Ii, field: &str) -> Result<String> {
    let root = source
        .root
        .as_deref()
        .filter(|root| !root.is_empty())
        .ok_or_else(|| VmrMappingError::data_format(format!("{field}: II has no root")))?;

    Ok(match source.extension.as_deref() {
        Some(extension) if !extension.is_empty() => format!("{root}{ID_SEPARATOR}{extension}"),
        _ => root.to_string(),
    })
}

pub fn id_to_ii(id: &str) -> Ii {
    match id.split_once(ID_SEPARATOR) {
        Some((root, extension)) => Ii::new(root).with_extension(extension),
        None => Ii::new(id),
    }
}

pub fn iis_to_ids(source: &[Ii], field: &str) -> Result<Vec<String>> {
    source.iter().map(|ii| ii_to_id(ii, field)).collect()
}

pub fn ids_to_iis(ids: &[String]) -> Vec<Ii> {
    ids.iter().map(|id| id_to_ii(id)).collect()
}

pub fn cd_to_cd_internal(source: &Cd, field: &str) -> Result<internal::Cd> {
    let code = source
        .code
        .as_ref()
        .ok_or_else(|| VmrMappingError::data_format(format!("{field}: CD has no code")))?;
    let code_system = source
        .code_system
        .as_ref()
        .ok_or_else(|| VmrMappingError::data_format(format!("{field}: CD has no codeSystem")))?;

    if code.trim().is_empty() {
        return Err(VmrMappingError::invalid_data(format!(
            "{field}: CD code is blank (codeSystem {code_system})"
        )));
    }
    if code_system.trim().is_empty() {
        return Err(VmrMappingError::invalid_data(format!(
            "{field}: CD codeSystem is blank (code {code})"
        )));
    }

    Ok(internal::Cd {
        code: code.clone(),
        code_system: code_system.clone(),
        code_system_name: source.code_system_name.clone(),
        display_name: source.display_name.clone(),
        original_text: source.original_text.clone(),
    })
}

pub fn cd_internal_to_cd(source: &internal::Cd) -> Cd {
    Cd {
        code: Some(source.code.clone()),
        code_system: Some(source.code_system.clone()),
        code_system_name: source.code_system_name.clone(),
        display_name: source.display_name.clone(),
        original_text: source.original_text.clone(),
    }
}

pub fn cds_to_cds_internal(source: &[Cd], field: &str) -> Result<Vec<internal::Cd>> {
    source.iter().map(|cd| cd_to_cd_internal(cd, field)).collect()
}

pub fn cds_internal_to_cds(source: &[internal::Cd]) -> Vec<Cd> {
    source.iter().map(cd_internal_to_cd).collect()
}

/// Parses a TS value. Missing trailing components default to the start of
/// their period; a timezone offset is normalised to UTC.
pub fn ts_to_date_internal(source: &Ts, field: &str) -> Result<NaiveDateTime> {
    let value = source
        .value
        .as_deref()
        .ok_or_else(|| VmrMappingError::data_format(format!("{field}: TS has no value")))?;
    parse_ts(value.trim(), field)
}

fn parse_ts(value: &str, field: &str) -> Result<NaiveDateTime> {
    let captures = TS_PATTERN.captures(value).ok_or_else(|| {
        VmrMappingError::data_format(format!("{field}: '{value}' is not a valid TS value"))
    })?;

    let number = |index: usize, default: u32| -> u32 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(default)
    };

    if captures.get(7).is_some() && captures.get(6).is_none() {
        return Err(VmrMappingError::data_format(format!(
            "{field}: '{value}' has fractional seconds without seconds"
        )));
    }

    let year = number(1, 0) as i32;
    let nanos = captures
        .get(7)
        .map(|m| {
            let digits = m.as_str();
            let scale = 10u32.pow(9 - digits.len() as u32);
            digits.parse::<u32>().unwrap_or(0) * scale
        })
        .unwrap_or(0);

    let date_time = NaiveDate::from_ymd_opt(year, number(2, 1), number(3, 1))
        .and_then(|date| date.and_hms_nano_opt(number(4, 0), number(5, 0), number(6, 0), nanos))
        .ok_or_else(|| {
            VmrMappingError::invalid_data(format!(
                "{field}: '{value}' is not a valid calendar date-time"
            ))
        })?;

    match captures.get(8) {
        Some(sign) => {
            let seconds = (number(9, 0) * 3600 + number(10, 0) * 60) as i32;
            let seconds = if sign.as_str() == "-" { -seconds } else { seconds };
            let offset = FixedOffset::east_opt(seconds).ok_or_else(|| {
                VmrMappingError::invalid_data(format!(
                    "{field}: '{value}' has an out-of-range timezone offset"
                ))
            })?;
            Ok(date_time - TimeDelta::seconds(offset.local_minus_utc() as i64))
        }
        None => Ok(date_time),
    }
}

/// Formats a date-time as a full-precision TS value. The TS grammar carries
/// four fractional digits, so anything below 100 microseconds is truncated.
/// Years outside `0..=9999` have no TS form and are `InvalidData`.
pub fn date_internal_to_ts(source: &NaiveDateTime) -> Result<Ts> {
    if !(0..=9999).contains(&source.year()) {
        return Err(VmrMappingError::invalid_data(format!(
            "{source} has a year outside the four-digit TS range"
        )));
    }

    let mut value = source.format("%Y%m%d%H%M%S").to_string();
    let fraction = source.nanosecond() / 100_000;
    if fraction > 0 {
        let digits = format!("{fraction:04}");
        value.push('.');
        value.push_str(digits.trim_end_matches('0'));
    }
    Ok(Ts { value: Some(value) })
}

pub fn ivl_ts_to_ivl_date_internal(source: &IvlTs, field: &str) -> Result<internal::IvlDate> {
    let low = source
        .low
        .as_ref()
        .map(|ts| ts_to_date_internal(ts, &format!("{field}.low")))
        .transpose()?;
    let high = source
        .high
        .as_ref()
        .map(|ts| ts_to_date_internal(ts, &format!("{field}.high")))
        .transpose()?;

    if let (Some(low), Some(high)) = (low, high) {
        if low > high {
            return Err(VmrMappingError::invalid_data(format!(
                "{field}: interval low {low} is after high {high}"
            )));
        }
    }

    Ok(internal::IvlDate { low, high })
}

pub fn ivl_date_internal_to_ivl_ts(source: &internal::IvlDate) -> Result<IvlTs> {
    Ok(IvlTs {
        low: source.low.as_ref().map(date_internal_to_ts).transpose()?,
        high: source.high.as_ref().map(date_internal_to_ts).transpose()?,
    })
}

pub fn int_to_int_internal(source: &Int, field: &str) -> Result<i32> {
    let value = source
        .value
        .ok_or_else(|| VmrMappingError::data_format(format!("{field}: INT has no value")))?;
    i32::try_from(value).map_err(|_| {
        VmrMappingError::invalid_data(format!("{field}: INT value {value} is out of range"))
    })
}

pub fn int_internal_to_int(source: i32) -> Int {
    Int {
        value: Some(source as i64),
    }
}

pub fn bl_to_bool_internal(source: &Bl, field: &str) -> Result<bool> {
    source
        .value
        .ok_or_else(|| VmrMappingError::data_format(format!("{field}: BL has no value")))
}

pub fn bool_internal_to_bl(source: bool) -> Bl {
    Bl {
        value: Some(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn ii_with_extension_joins_with_caret() {
        let ii = Ii::new("2.16.840.1.113883.3.795").with_extension("42");
        let id = ii_to_id(&ii, "test").unwrap();
        assert_eq!(id, "2.16.840.1.113883.3.795^42");
        assert_eq!(id_to_ii(&id), ii);
    }

    #[test]
    fn ii_without_root_is_a_format_error() {
        let err = ii_to_id(&Ii::default(), "ClinicalStatement.id").unwrap_err();
        assert!(matches!(err, VmrMappingError::DataFormat { .. }));
        assert!(err.to_string().contains("ClinicalStatement.id"));
    }

    #[test]
    fn cd_requires_code_and_system() {
        let missing_system = Cd {
            code: Some("1".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            cd_to_cd_internal(&missing_system, "f"),
            Err(VmrMappingError::DataFormat { .. })
        ));

        let blank = Cd::new("  ", "2.16.840.1.113883.6.96");
        assert!(matches!(
            cd_to_cd_internal(&blank, "f"),
            Err(VmrMappingError::InvalidData { .. })
        ));
    }

    #[test]
    fn cd_keeps_optional_parts() {
        let cd = Cd::new("394848005", "2.16.840.1.113883.6.96").with_display_name("Normal");
        let internal = cd_to_cd_internal(&cd, "f").unwrap();
        assert_eq!(internal.display_name.as_deref(), Some("Normal"));
        assert_eq!(cd_internal_to_cd(&internal), cd);
    }

    #[test]
    fn ts_partial_precision_fills_start_of_period() {
        assert_eq!(
            ts_to_date_internal(&Ts::new("2011"), "f").unwrap(),
            at(2011, 1, 1, 0, 0, 0)
        );
        assert_eq!(
            ts_to_date_internal(&Ts::new("201103151230"), "f").unwrap(),
            at(2011, 3, 15, 12, 30, 0)
        );
    }

    #[test]
    fn ts_offset_is_normalised_to_utc() {
        let parsed = ts_to_date_internal(&Ts::new("20110315123000-0500"), "f").unwrap();
        assert_eq!(parsed, at(2011, 3, 15, 17, 30, 0));
    }

    #[test]
    fn ts_fraction_survives_formatting() {
        let parsed = ts_to_date_internal(&Ts::new("20110315123000.25"), "f").unwrap();
        assert_eq!(parsed.nanosecond(), 250_000_000);
        assert_eq!(
            date_internal_to_ts(&parsed).unwrap().value.as_deref(),
            Some("20110315123000.25")
        );
    }

    #[test]
    fn ts_output_truncates_below_four_fraction_digits() {
        let parsed = at(2011, 3, 15, 12, 30, 0) + TimeDelta::microseconds(123_456);
        assert_eq!(
            date_internal_to_ts(&parsed).unwrap().value.as_deref(),
            Some("20110315123000.1234")
        );
    }

    #[test]
    fn year_without_ts_form_is_invalid_on_output() {
        let far = at(10_000, 1, 1, 0, 0, 0);
        assert!(matches!(
            date_internal_to_ts(&far),
            Err(VmrMappingError::InvalidData { .. })
        ));
        let interval = internal::IvlDate::new(at(2011, 1, 1, 0, 0, 0), far);
        assert!(ivl_date_internal_to_ivl_ts(&interval).is_err());

        let last = at(9999, 12, 31, 23, 59, 59);
        let ts = date_internal_to_ts(&last).unwrap();
        assert_eq!(ts_to_date_internal(&ts, "f").unwrap(), last);
    }

    #[test]
    fn ts_grammar_and_calendar_errors_differ() {
        assert!(matches!(
            ts_to_date_internal(&Ts::new("2011-03-15"), "f"),
            Err(VmrMappingError::DataFormat { .. })
        ));
        assert!(matches!(
            ts_to_date_internal(&Ts::new("20110230"), "f"),
            Err(VmrMappingError::InvalidData { .. })
        ));
        assert!(matches!(
            ts_to_date_internal(&Ts::new("2011031512.5"), "f"),
            Err(VmrMappingError::DataFormat { .. })
        ));
    }

    #[test]
    fn ivl_rejects_inverted_bounds() {
        let ivl = IvlTs::new("20120101", "20110101");
        let err = ivl_ts_to_ivl_date_internal(&ivl, "AppointmentRequest.requestIssuanceTime")
            .unwrap_err();
        assert!(matches!(err, VmrMappingError::InvalidData { .. }));
    }

    #[test]
    fn ivl_half_open_is_allowed() {
        let ivl = IvlTs {
            low: Some(Ts::new("20110101")),
            high: None,
        };
        let internal = ivl_ts_to_ivl_date_internal(&ivl, "f").unwrap();
        assert_eq!(internal.low, Some(at(2011, 1, 1, 0, 0, 0)));
        assert!(internal.high.is_none());
    }

    #[test]
    fn int_out_of_range_is_invalid() {
        assert_eq!(int_to_int_internal(&Int::new(3), "f").unwrap(), 3);
        assert!(matches!(
            int_to_int_internal(&Int::new(i64::from(i32::MAX) + 1), "f"),
            Err(VmrMappingError::InvalidData { .. })
        ));
        assert!(matches!(
            int_to_int_internal(&Int::default(), "f"),
            Err(VmrMappingError::DataFormat { .. })
        ));
    }
}
