//! Resolution of a raw UTC offset to a timezone id Customer.io accepts.
//!
//! # Design
//! The offset-to-zone lookup sits behind `TimezoneDatabase` so the choice of
//! zone data is injectable. `SystemTimezones` reads the IANA data bundled with
//! `chrono-tz`; `StaticTimezoneTable` is a fixed table. Resolution itself is a
//! pure function of the offset, the database and `SUPPORTED_TIMEZONES`.

use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz, TZ_VARIANTS};

const HOUR_MILLIS: i64 = 3_600_000;

/// Zones whose tzdb rules keep summer time as the standard offset and apply
/// a negative save in winter. Their winter offset is the standard one.
const NEGATIVE_DST_ZONES: &[&str] = &["Africa/Casablanca", "Africa/El_Aaiun", "Eire", "Europe/Dublin"];

/// IANA ids accepted by Customer.io for the `timezone` attribute.
///
/// Kept sorted so membership is a binary search.
pub const SUPPORTED_TIMEZONES: &[&str] = &[
    "Africa/Algiers",
    "Africa/Cairo",
    "Africa/Casablanca",
    "Africa/Harare",
    "Africa/Johannesburg",
    "Africa/Monrovia",
    "Africa/Nairobi",
    "America/Argentina/Buenos_Aires",
    "America/Bogota",
    "America/Caracas",
    "America/Chicago",
    "America/Chihuahua",
    "America/Denver",
    "America/Godthab",
    "America/Guatemala",
    "America/Guyana",
    "America/Halifax",
    "America/Indiana/Indianapolis",
    "America/Juneau",
    "America/La_Paz",
    "America/Lima",
    "America/Los_Angeles",
    "America/Mazatlan",
    "America/Mexico_City",
    "America/Monterrey",
    "America/Montevideo",
    "America/New_York",
    "America/Phoenix",
    "America/Puerto_Rico",
    "America/Regina",
    "America/Santiago",
    "America/Sao_Paulo",
    "America/St_Johns",
    "America/Tijuana",
    "Asia/Almaty",
    "Asia/Baghdad",
    "Asia/Baku",
    "Asia/Bangkok",
    "Asia/Chongqing",
    "Asia/Colombo",
    "Asia/Dhaka",
    "Asia/Hong_Kong",
    "Asia/Irkutsk",
    "Asia/Jakarta",
    "Asia/Jerusalem",
    "Asia/Kabul",
    "Asia/Kamchatka",
    "Asia/Karachi",
    "Asia/Kathmandu",
    "Asia/Kolkata",
    "Asia/Krasnoyarsk",
    "Asia/Kuala_Lumpur",
    "Asia/Kuwait",
    "Asia/Magadan",
    "Asia/Muscat",
    "Asia/Novosibirsk",
    "Asia/Rangoon",
    "Asia/Riyadh",
    "Asia/Seoul",
    "Asia/Shanghai",
    "Asia/Singapore",
    "Asia/Srednekolymsk",
    "Asia/Taipei",
    "Asia/Tashkent",
    "Asia/Tbilisi",
    "Asia/Tehran",
    "Asia/Tokyo",
    "Asia/Ulaanbaatar",
    "Asia/Urumqi",
    "Asia/Vladivostok",
    "Asia/Yakutsk",
    "Asia/Yekaterinburg",
    "Asia/Yerevan",
    "Atlantic/Azores",
    "Atlantic/Cape_Verde",
    "Atlantic/South_Georgia",
    "Australia/Adelaide",
    "Australia/Brisbane",
    "Australia/Darwin",
    "Australia/Hobart",
    "Australia/Melbourne",
    "Australia/Perth",
    "Australia/Sydney",
    "Etc/GMT+12",
    "Etc/UTC",
    "Europe/Amsterdam",
    "Europe/Athens",
    "Europe/Belgrade",
    "Europe/Berlin",
    "Europe/Bratislava",
    "Europe/Brussels",
    "Europe/Bucharest",
    "Europe/Budapest",
    "Europe/Copenhagen",
    "Europe/Dublin",
    "Europe/Helsinki",
    "Europe/Istanbul",
    "Europe/Kaliningrad",
    "Europe/Kiev",
    "Europe/Lisbon",
    "Europe/Ljubljana",
    "Europe/London",
    "Europe/Madrid",
    "Europe/Minsk",
    "Europe/Moscow",
    "Europe/Paris",
    "Europe/Prague",
    "Europe/Riga",
    "Europe/Rome",
    "Europe/Samara",
    "Europe/Sarajevo",
    "Europe/Skopje",
    "Europe/Sofia",
    "Europe/Stockholm",
    "Europe/Tallinn",
    "Europe/Vienna",
    "Europe/Vilnius",
    "Europe/Volgograd",
    "Europe/Warsaw",
    "Europe/Zagreb",
    "Europe/Zurich",
    "Pacific/Apia",
    "Pacific/Auckland",
    "Pacific/Chatham",
    "Pacific/Fakaofo",
    "Pacific/Fiji",
    "Pacific/Guadalcanal",
    "Pacific/Guam",
    "Pacific/Honolulu",
    "Pacific/Majuro",
    "Pacific/Midway",
    "Pacific/Noumea",
    "Pacific/Pago_Pago",
    "Pacific/Port_Moresby",
    "Pacific/Tongatapu",
];

pub fn is_supported(timezone_id: &str) -> bool {
    SUPPORTED_TIMEZONES.binary_search(&timezone_id).is_ok()
}

/// Source of timezone ids for a given UTC offset.
pub trait TimezoneDatabase: Send + Sync {
    /// Every known id whose standard UTC offset is `offset_millis`.
    fn zone_ids_with_offset(&self, offset_millis: i32) -> Vec<String>;
}

/// Standard (non-DST) offset of `tz` in effect at `at`.
///
/// chrono-tz reports the tzdb main-format base offset, which is one hour
/// ahead of the winter offset for the zones in `NEGATIVE_DST_ZONES`; those
/// are shifted back so Dublin is UTC+0 like London.
pub fn standard_offset_millis(tz: Tz, at: &NaiveDateTime) -> i64 {
    let base = tz.offset_from_utc_datetime(at).base_utc_offset().num_milliseconds();
    if NEGATIVE_DST_ZONES.contains(&tz.name()) {
        base - HOUR_MILLIS
    } else {
        base
    }
}

/// The IANA database bundled with `chrono-tz`.
///
/// Matches on each zone's standard (non-DST) offset at the current instant,
/// so `America/New_York` answers to UTC-5 and `Europe/Dublin` to UTC+0 all
/// year round.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimezones;

impl TimezoneDatabase for SystemTimezones {
    fn zone_ids_with_offset(&self, offset_millis: i32) -> Vec<String> {
        let now = Utc::now().naive_utc();
        TZ_VARIANTS
            .iter()
            .filter(|tz| standard_offset_millis(**tz, &now) == i64::from(offset_millis))
            .map(|tz| tz.name().to_string())
            .collect()
    }
}

/// A fixed `(id, offset_millis)` table.
#[derive(Debug, Clone, Default)]
pub struct StaticTimezoneTable {
    zones: Vec<(String, i32)>,
}

impl StaticTimezoneTable {
    pub fn new<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Self {
            zones: zones.into_iter().map(|(id, offset)| (id.into(), offset)).collect(),
        }
    }
}

impl TimezoneDatabase for StaticTimezoneTable {
    fn zone_ids_with_offset(&self, offset_millis: i32) -> Vec<String> {
        self.zones
            .iter()
            .filter(|(_, offset)| *offset == offset_millis)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// Pick a supported timezone id for `offset_millis`.
///
/// Ties are broken by taking the lexicographically smallest supported id.
pub fn resolve_timezone<Z: TimezoneDatabase + ?Sized>(db: &Z, offset_millis: i32) -> Option<String> {
    let resolved = db
        .zone_ids_with_offset(offset_millis)
        .into_iter()
        .filter(|id| is_supported(id))
        .min();
    if resolved.is_none() {
        tracing::debug!(offset_millis, "no supported timezone for offset");
    }
    resolved
}
