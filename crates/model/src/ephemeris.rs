//! Sun and moon ephemeris
//!
//! Low-precision positional astronomy (errors of a minute or two), enough for
//! a wall display. Sun events use the standard sunrise equation with a
//! −0.833° horizon; moon rise/set search the local day hour by hour with
//! quadratic interpolation; moon transit is the zero crossing of the lunar
//! hour angle.
//!
//! All event times are returned as local wall-clock times, i.e. UTC shifted
//! by [`Location::utc_offset_seconds`].

use std::f64::consts::PI;

use chrono::{DateTime, NaiveDateTime, NaiveTime};

use crate::timestamp::Timestamp;
use crate::value::Value;

/// Mean synodic month in days
pub const LUNAR_CYCLE_DAYS: f64 = 29.530_588_853;

const RAD: f64 = PI / 180.0;
const OBLIQUITY: f64 = RAD * 23.4397;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const J0: f64 = 0.0009;
const SUN_HORIZON: f64 = -0.833 * RAD;
const MOON_HORIZON: f64 = 0.133 * RAD;
const SUN_DISTANCE_KM: f64 = 149_598_000.0;

/// Widest offset any real time zone uses (UTC−12 to UTC+14)
pub const MAX_UTC_OFFSET_SECONDS: i64 = 14 * 3600;

const PHASE_NAMES: [&str; 8] = [
    "New Moon",
    "Waxing Crescent",
    "First Quarter",
    "Waxing Gibbous",
    "Full Moon",
    "Waning Gibbous",
    "Last Quarter",
    "Waning Crescent",
];

/// Observer position, from the telemetry's `config.location`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
    /// Offset of local wall time from UTC
    pub utc_offset_seconds: i64,
}

impl Location {
    /// Read `{latitude, longitude, utc_offset_seconds}`; numbers may be strings.
    ///
    /// Latitude and longitude are required, the offset defaults to zero. An
    /// offset beyond [`MAX_UTC_OFFSET_SECONDS`] rejects the whole location.
    pub fn from_value(location: &Value) -> Option<Self> {
        let latitude = location.get("latitude").and_then(Value::as_f64)?;
        let longitude = location.get("longitude").and_then(Value::as_f64)?;
        let utc_offset_seconds = location
            .get("utc_offset_seconds")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        if !(-MAX_UTC_OFFSET_SECONDS..=MAX_UTC_OFFSET_SECONDS).contains(&utc_offset_seconds) {
            tracing::warn!(utc_offset_seconds, "location offset out of range");
            return None;
        }
        Some(Self {
            latitude,
            longitude,
            utc_offset_seconds,
        })
    }
}

/// Rise, transit and set of one body, in local time
///
/// `None` when the event does not happen that day (polar day or night, or a
/// moonrise that slips into the next day).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyEvents {
    /// Crosses the horizon upwards
    pub rise: Option<NaiveDateTime>,
    /// Highest point
    pub transit: Option<NaiveDateTime>,
    /// Crosses the horizon downwards
    pub set: Option<NaiveDateTime>,
}

impl BodyEvents {
    /// `[rise, transit, set]` as `HH:MM`, `--:--` for missing events
    pub fn texts(&self) -> [String; 3] {
        [self.rise, self.transit, self.set].map(|t| {
            t.map_or_else(|| "--:--".to_owned(), |t| t.format("%H:%M").to_string())
        })
    }
}

/// Sun and moon data for one local day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ephemeris {
    /// Sun events
    pub sun: BodyEvents,
    /// Moon events
    pub moon: BodyEvents,
    /// Lunar phase in `0.0..1.0`: 0 new, 0.25 first quarter, 0.5 full
    pub moon_phase: f64,
    /// Days since new moon
    pub moon_age_days: f64,
}

impl Ephemeris {
    /// Compute for the local day containing `local`.
    ///
    /// `None` when shifting by the location's offset leaves the `i64` range.
    pub fn compute(local: &Timestamp, location: &Location) -> Option<Self> {
        let offset = location.utc_offset_seconds;
        let midnight = local.naive().date().and_time(NaiveTime::MIN);
        let midnight_utc = unix_seconds(midnight).checked_sub(offset)?;
        let noon_utc = midnight_utc.checked_add(12 * 3600)?;
        let now_utc = unix_seconds(local.naive()).checked_sub(offset)?;

        let observer = Observer::new(location);
        let sun = sun_events(to_days(noon_utc), &observer, offset);
        let moon = moon_events(midnight_utc, &observer, offset);

        let moon_phase = moon_phase(to_days(now_utc));
        tracing::debug!(moon_phase, "ephemeris computed");
        Some(Self {
            sun,
            moon,
            moon_phase,
            moon_age_days: moon_phase * LUNAR_CYCLE_DAYS,
        })
    }

    /// One of the eight conventional phase names
    pub fn phase_name(&self) -> &'static str {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bucket = ((self.moon_phase * 8.0).round() as usize) % PHASE_NAMES.len();
        PHASE_NAMES.get(bucket).copied().unwrap_or("New Moon")
    }

    /// Glyph of the moon-phase font for this age
    pub fn phase_letter(&self) -> char {
        moon_phase_letter(self.moon_age_days)
    }
}

/// Moon-phase font glyph for a lunar age in days
///
/// `'0'` within a day of new moon, otherwise `'A'..='Z'` stepping through
/// 26 buckets of the cycle.
pub fn moon_phase_letter(age_days: f64) -> char {
    if age_days < 1.0 || age_days > LUNAR_CYCLE_DAYS - 1.0 {
        return '0';
    }
    #[allow(clippy::cast_possible_truncation)]
    let index = ((age_days / LUNAR_CYCLE_DAYS) * 26.0).round() as i64;
    let index = u8::try_from(index.rem_euclid(26)).unwrap_or(0);
    char::from(b'A' + index)
}

struct Observer {
    /// Longitude west, radians
    lw: f64,
    /// Latitude, radians
    phi: f64,
}

impl Observer {
    fn new(location: &Location) -> Self {
        Self {
            lw: RAD * -location.longitude,
            phi: RAD * location.latitude,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Equatorial {
    ra: f64,
    dec: f64,
    dist_km: f64,
}

fn unix_seconds(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp()
}

#[allow(clippy::cast_precision_loss)]
fn to_days(unix: i64) -> f64 {
    unix as f64 / SECONDS_PER_DAY - 0.5 + J1970 - J2000
}

#[allow(clippy::cast_possible_truncation)]
fn from_julian(j: f64, utc_offset_seconds: i64) -> Option<NaiveDateTime> {
    if !j.is_finite() {
        return None;
    }
    let unix = ((j + 0.5 - J1970) * SECONDS_PER_DAY).round() as i64;
    DateTime::from_timestamp(unix.checked_add(utc_offset_seconds)?, 0).map(|dt| dt.naive_utc())
}

fn from_days(days: f64, utc_offset_seconds: i64) -> Option<NaiveDateTime> {
    from_julian(days + J2000, utc_offset_seconds)
}

fn right_ascension(l: f64, b: f64) -> f64 {
    (l.sin() * OBLIQUITY.cos() - b.tan() * OBLIQUITY.sin()).atan2(l.cos())
}

fn declination(l: f64, b: f64) -> f64 {
    (b.sin() * OBLIQUITY.cos() + b.cos() * OBLIQUITY.sin() * l.sin()).asin()
}

fn altitude(hour_angle: f64, phi: f64, dec: f64) -> f64 {
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * hour_angle.cos()).asin()
}

fn sidereal_time(days: f64, lw: f64) -> f64 {
    RAD * (280.16 + 360.985_623_5 * days) - lw
}

fn astro_refraction(h: f64) -> f64 {
    let h = h.max(0.0);
    0.000_296_7 / (h + 0.003_125_36 / (h + 0.089_011_79)).tan()
}

fn solar_mean_anomaly(days: f64) -> f64 {
    RAD * (357.5291 + 0.985_600_28 * days)
}

fn ecliptic_longitude(m: f64) -> f64 {
    let center = RAD * (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin());
    let perihelion = RAD * 102.9372;
    m + center + perihelion + PI
}

fn sun_coords(days: f64) -> Equatorial {
    let l = ecliptic_longitude(solar_mean_anomaly(days));
    Equatorial {
        ra: right_ascension(l, 0.0),
        dec: declination(l, 0.0),
        dist_km: SUN_DISTANCE_KM,
    }
}

fn moon_coords(days: f64) -> Equatorial {
    let l = RAD * (218.316 + 13.176_396 * days);
    let m = RAD * (134.963 + 13.064_993 * days);
    let f = RAD * (93.272 + 13.229_350 * days);

    let lon = l + RAD * 6.289 * m.sin();
    let lat = RAD * 5.128 * f.sin();
    Equatorial {
        ra: right_ascension(lon, lat),
        dec: declination(lon, lat),
        dist_km: 385_001.0 - 20_905.0 * m.cos(),
    }
}

fn julian_cycle(days: f64, lw: f64) -> f64 {
    (days - J0 - lw / (2.0 * PI)).round()
}

fn approx_transit(hour_angle: f64, lw: f64, cycle: f64) -> f64 {
    J0 + (hour_angle + lw) / (2.0 * PI) + cycle
}

fn solar_transit_j(ds: f64, m: f64, l: f64) -> f64 {
    J2000 + ds + 0.0053 * m.sin() - 0.0069 * (2.0 * l).sin()
}

/// Hour angle at which a body of declination `dec` reaches altitude `h`
fn hour_angle(h: f64, phi: f64, dec: f64) -> Option<f64> {
    let x = (h.sin() - phi.sin() * dec.sin()) / (phi.cos() * dec.cos());
    (-1.0..=1.0).contains(&x).then(|| x.acos())
}

fn sun_events(days: f64, observer: &Observer, utc_offset_seconds: i64) -> BodyEvents {
    let cycle = julian_cycle(days, observer.lw);
    let ds = approx_transit(0.0, observer.lw, cycle);
    let m = solar_mean_anomaly(ds);
    let l = ecliptic_longitude(m);
    let dec = declination(l, 0.0);
    let noon = solar_transit_j(ds, m, l);

    let set = hour_angle(SUN_HORIZON, observer.phi, dec)
        .map(|w| solar_transit_j(approx_transit(w, observer.lw, cycle), m, l));
    let rise = set.map(|set| noon - (set - noon));

    BodyEvents {
        rise: rise.and_then(|j| from_julian(j, utc_offset_seconds)),
        transit: from_julian(noon, utc_offset_seconds),
        set: set.and_then(|j| from_julian(j, utc_offset_seconds)),
    }
}

/// Apparent moon altitude above the horizon at `days`, radians
fn moon_altitude(days: f64, observer: &Observer) -> f64 {
    let c = moon_coords(days);
    let h = sidereal_time(days, observer.lw) - c.ra;
    let alt = altitude(h, observer.phi, c.dec);
    alt + astro_refraction(alt)
}

/// Moon hour angle normalised to `(-π, π]`
fn moon_hour_angle(days: f64, observer: &Observer) -> f64 {
    let c = moon_coords(days);
    let h = (sidereal_time(days, observer.lw) - c.ra).rem_euclid(2.0 * PI);
    if h > PI {
        h - 2.0 * PI
    } else {
        h
    }
}

fn moon_events(midnight_utc: i64, observer: &Observer, utc_offset_seconds: i64) -> BodyEvents {
    let start = to_days(midnight_utc);
    let hour = 1.0 / 24.0;
    let alt_at = |hours: f64| moon_altitude(start + hours * hour, observer) - MOON_HORIZON;

    let mut rise: Option<f64> = None;
    let mut set: Option<f64> = None;
    let mut h0 = alt_at(0.0);

    // Fit a parabola through each pair of hours and look for its roots.
    for i in (1..=23).step_by(2) {
        let i = f64::from(i);
        let h1 = alt_at(i);
        let h2 = alt_at(i + 1.0);

        let a = (h0 + h2) / 2.0 - h1;
        let b = (h2 - h0) / 2.0;
        let xe = -b / (2.0 * a);
        let ye = (a * xe + b) * xe + h1;
        let d = b * b - 4.0 * a * h1;

        if d >= 0.0 && a.is_normal() {
            let dx = d.sqrt() / (a.abs() * 2.0);
            let mut x1 = xe - dx;
            let x2 = xe + dx;
            let mut roots = 0;
            if x1.abs() <= 1.0 {
                roots += 1;
            }
            if x2.abs() <= 1.0 {
                roots += 1;
            }
            if x1 < -1.0 {
                x1 = x2;
            }

            if roots == 1 {
                if h0 < 0.0 {
                    rise = Some(i + x1);
                } else {
                    set = Some(i + x1);
                }
            } else if roots == 2 {
                rise = Some(i + if ye < 0.0 { x2 } else { x1 });
                set = Some(i + if ye < 0.0 { x1 } else { x2 });
            }
        }

        if rise.is_some() && set.is_some() {
            break;
        }
        h0 = h2;
    }

    BodyEvents {
        rise: rise.and_then(|hours| from_days(start + hours * hour, utc_offset_seconds)),
        transit: moon_transit(start, observer)
            .and_then(|days| from_days(days, utc_offset_seconds)),
        set: set.and_then(|hours| from_days(start + hours * hour, utc_offset_seconds)),
    }
}

/// Upper transit within the day starting at `start`, sampled every ten minutes
fn moon_transit(start: f64, observer: &Observer) -> Option<f64> {
    const STEPS: u32 = 144;
    let step = 1.0 / f64::from(STEPS);
    let mut prev = moon_hour_angle(start, observer);
    for k in 1..=STEPS {
        let t = start + f64::from(k) * step;
        let h = moon_hour_angle(t, observer);
        // Crossing from east to west of the meridian; skip the ±π wrap.
        if prev < 0.0 && h >= 0.0 && (h - prev) < PI {
            let frac = -prev / (h - prev);
            return Some(t - step + frac * step);
        }
        prev = h;
    }
    None
}

/// Illuminated phase in `0.0..1.0` at `days` since J2000
fn moon_phase(days: f64) -> f64 {
    let s = sun_coords(days);
    let m = moon_coords(days);

    let elongation = (s.dec.sin() * m.dec.sin() + s.dec.cos() * m.dec.cos() * (s.ra - m.ra).cos())
        .clamp(-1.0, 1.0)
        .acos();
    let inc = (s.dist_km * elongation.sin()).atan2(m.dist_km - s.dist_km * elongation.cos());
    let angle = (s.dec.cos() * (s.ra - m.ra).sin())
        .atan2(s.dec.sin() * m.dec.cos() - s.dec.cos() * m.dec.sin() * (s.ra - m.ra).cos());

    let sign = if angle < 0.0 { -1.0 } else { 1.0 };
    (0.5 + 0.5 * inc * sign / PI).rem_euclid(1.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn london_summer() -> Location {
        Location {
            latitude: 51.5074,
            longitude: -0.1278,
            utc_offset_seconds: 3600,
        }
    }

    #[test]
    fn location_accepts_numeric_strings() {
        let v = Value::from(json!({"latitude": "51.5", "longitude": -0.12, "utc_offset_seconds": "3600"}));
        let loc = Location::from_value(&v).unwrap();
        assert_eq!(loc.latitude, 51.5);
        assert_eq!(loc.utc_offset_seconds, 3600);
    }

    #[test]
    fn location_requires_coordinates() {
        let v = Value::from(json!({"latitude": 51.5}));
        assert!(Location::from_value(&v).is_none());
    }

    #[test]
    fn location_rejects_offsets_no_zone_uses() {
        let at = |offset: serde_json::Value| {
            Location::from_value(&Value::from(
                json!({"latitude": 52.1, "longitude": 5.1, "utc_offset_seconds": offset}),
            ))
        };
        assert_eq!(at(json!(50_400)).unwrap().utc_offset_seconds, 50_400);
        assert_eq!(at(json!(-43_200)).unwrap().utc_offset_seconds, -43_200);
        assert!(at(json!(50_401)).is_none());
        assert!(at(json!(-50_401)).is_none());
        assert!(at(json!(i64::MIN)).is_none());
        assert!(at(json!(i64::MAX)).is_none());
    }

    #[test]
    fn compute_refuses_offsets_outside_i64() {
        let local = Timestamp::parse("2025-11-03T20:00:00").unwrap();
        let loc = Location {
            utc_offset_seconds: i64::MIN,
            ..london_summer()
        };
        assert!(Ephemeris::compute(&local, &loc).is_none());
        let loc = Location {
            utc_offset_seconds: i64::MAX,
            ..london_summer()
        };
        assert!(Ephemeris::compute(&local, &loc).is_none());
    }

    #[test]
    fn london_midsummer_sun() {
        let local = Timestamp::parse("2025-06-21T10:00:00").unwrap();
        let eph = Ephemeris::compute(&local, &london_summer()).unwrap();
        let [rise, transit, set] = eph.sun.texts();
        assert!(rise.starts_with("04:"), "rise {rise}");
        assert!(transit.starts_with("13:0"), "transit {transit}");
        assert!(set.starts_with("21:"), "set {set}");
    }

    #[test]
    fn polar_day_has_no_sunrise() {
        let svalbard = Location {
            latitude: 78.22,
            longitude: 15.65,
            utc_offset_seconds: 7200,
        };
        let local = Timestamp::parse("2025-06-21T12:00:00").unwrap();
        let eph = Ephemeris::compute(&local, &svalbard).unwrap();
        let [rise, _, set] = eph.sun.texts();
        assert_eq!(rise, "--:--");
        assert_eq!(set, "--:--");
        assert!(eph.sun.transit.is_some());
    }

    #[test]
    fn full_moon_phase() {
        // Full moon 2025-11-05 13:19 UTC
        let local = Timestamp::parse("2025-11-05T13:00:00").unwrap();
        let loc = Location {
            utc_offset_seconds: 0,
            ..london_summer()
        };
        let eph = Ephemeris::compute(&local, &loc).unwrap();
        assert!((eph.moon_phase - 0.5).abs() < 0.02, "phase {}", eph.moon_phase);
        assert_eq!(eph.phase_name(), "Full Moon");
        assert_eq!(eph.phase_letter(), 'N');
    }

    #[test]
    fn new_moon_phase() {
        // New moon 2025-10-21 12:25 UTC
        let local = Timestamp::parse("2025-10-21T12:00:00").unwrap();
        let loc = Location {
            utc_offset_seconds: 0,
            ..london_summer()
        };
        let eph = Ephemeris::compute(&local, &loc).unwrap();
        assert_eq!(eph.phase_name(), "New Moon");
        assert_eq!(eph.phase_letter(), '0');
    }

    #[test]
    fn moon_has_a_transit_most_days() {
        let local = Timestamp::parse("2025-11-05T12:00:00").unwrap();
        let eph = Ephemeris::compute(&local, &london_summer()).unwrap();
        assert!(eph.moon.transit.is_some());
        assert!(eph.moon.rise.is_some() || eph.moon.set.is_some());
    }

    #[test]
    fn phase_letters() {
        assert_eq!(moon_phase_letter(0.5), '0');
        assert_eq!(moon_phase_letter(29.0), '0');
        assert_eq!(moon_phase_letter(1.0), 'B');
        assert_eq!(moon_phase_letter(7.0), 'G');
        assert_eq!(moon_phase_letter(14.765), 'N');
        assert_eq!(moon_phase_letter(28.5), 'Z');
    }
}
