use std::fmt::Formatter;

use crate::{base32, Error, RANDOMNESS_BYTE_LEN, ULID_BYTE_LEN, ULID_STR_LEN};

pub fn as_bytes(bytes: &[u8]) -> Result<&[u8; ULID_BYTE_LEN], Error> {
    bytes.try_into().map_err(|_| Error::InvalidByteLength(bytes.len()))
}

pub fn as_text(bytes: &[u8]) -> Result<&[u8; ULID_STR_LEN], Error> {
    bytes.try_into().map_err(|_| Error::InvalidTextLength(bytes.len()))
}

/// Takes the first 10 bytes, ignoring any excess.
pub fn as_randomness(bytes: &[u8]) -> Result<[u8; RANDOMNESS_BYTE_LEN], Error> {
    bytes
        .get(..RANDOMNESS_BYTE_LEN)
        .and_then(|head| head.try_into().ok())
        .ok_or(Error::InvalidRandomnessLength(bytes.len()))
}

pub fn debug_ulid(name: &str, ulid: &[u8; ULID_BYTE_LEN], f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
    struct Timestamp(u64);
    impl std::fmt::Debug for Timestamp {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
            write!(f, "\"{ts}\"", ts = timestamp_to_string(self.0))
        }
    }

    struct Randomness<'a>(&'a [u8]);
    impl std::fmt::Debug for Randomness<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
            f.write_str("\"")?;
            for byte in self.0 {
                write!(f, "{byte:02X}")?;
            }
            f.write_str("\"")
        }
    }

    let mut buffer = [0; ULID_STR_LEN];

    let string = base32::encode_to_buffer(ulid, &mut buffer);
    let timestamp = Timestamp(crate::timestamp::unpack([ulid[0], ulid[1], ulid[2], ulid[3], ulid[4], ulid[5]]));
    let randomness = Randomness(&ulid[6..]);

    f.debug_struct(name)
        .field("string", &string)
        .field("timestamp", &timestamp)
        .field("randomness", &randomness)
        .finish()
}

/// Formats milliseconds since the Unix epoch as an ISO-8601 UTC timestamp.
fn timestamp_to_string(millis: u64) -> String {
    let (secs, millis) = (millis / 1000, millis % 1000);
    let (days, secs_of_day) = (secs / 86_400, secs % 86_400);
    let (year, month, day) = civil_date(days);

    format!(
        "{year:04}-{month:02}-{day:02}T{hh:02}:{mm:02}:{ss:02}.{millis:03}Z",
        hh = secs_of_day / 3600,
        mm = secs_of_day / 60 % 60,
        ss = secs_of_day % 60,
    )
}

/// Converts days since 1970-01-01 into a proleptic Gregorian `(year, month, day)`.
///
/// Counts in 400 year eras starting at March 1st, so the leap day is the last
/// day of each computed year.
fn civil_date(days: u64) -> (u64, u64, u64) {
    const DAYS_PER_ERA: u64 = 146_097;
    // 0000-03-01 to 1970-01-01
    const EPOCH_SHIFT: u64 = 719_468;

    let z = days + EPOCH_SHIFT;
    let era = z / DAYS_PER_ERA;
    let day_of_era = z % DAYS_PER_ERA;
    let year_of_era = (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);

    let shifted_month = (5 * day_of_year + 2) / 153; // 0 = March
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 { shifted_month + 3 } else { shifted_month - 9 };
    let year = era * 400 + year_of_era + u64::from(month <= 2);

    (year, month, day)
}
