//! Unit conversions and derived metrics.
//!
//! All rounding is half-up (`floor(x + 0.5)`), so `-2.5` rounds to `-2`.

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

pub const KPH_TO_MPH: f64 = 0.621371;
pub const KM_TO_MILES: f64 = 0.621371;
pub const MB_TO_INHG: f64 = 0.02953;
pub const MM_TO_INCHES: f64 = 0.0393701;

pub const UV_MIN: u8 = 1;
pub const UV_MAX: u8 = 11;

pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Half-up rounding to two decimal places.
pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Whole-number rounding into an `i32`; NaN becomes 0 and infinities saturate.
pub fn round_to_i32(value: f64) -> i32 {
    round_half_up(value) as i32
}

pub fn celsius_to_fahrenheit(celsius: f64) -> i32 {
    round_to_i32(celsius * 9.0 / 5.0 + 32.0)
}

pub fn kph_to_mph(kph: f64) -> i32 {
    round_to_i32(kph * KPH_TO_MPH)
}

pub fn km_to_miles(km: f64) -> i32 {
    round_to_i32(km * KM_TO_MILES)
}

pub fn mb_to_inhg(mb: f64) -> f64 {
    round_2dp(mb * MB_TO_INHG)
}

pub fn mm_to_inches(mm: f64) -> f64 {
    round_2dp(mm * MM_TO_INCHES)
}

/// 16-point compass label for a bearing in degrees.
///
/// Any finite bearing is accepted and wrapped, so 360 and -360 are both "N".
/// Non-finite bearings are reported as "N".
pub fn compass_direction(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return COMPASS_POINTS[0];
    }
    let index = (round_half_up(degrees / 22.5) as i64).rem_euclid(16);
    COMPASS_POINTS[index as usize]
}

/// Rough UV index guess from air temperature and the provider condition code.
///
/// The provider does not report UV. This is a display heuristic only: warmer
/// readings step the index up in 5 °C bands above 15 °C, storms and rain pull
/// it down, clear skies push it up. The result is always within 1..=11.
pub fn estimate_uv_index(temp_c: f64, condition_code: i32) -> u8 {
    let min = f64::from(UV_MIN);
    let max = f64::from(UV_MAX);

    let mut uv = if temp_c > 25.0 {
        6.0 + ((temp_c - 25.0) / 5.0).floor()
    } else if temp_c > 20.0 {
        4.0 + ((temp_c - 20.0) / 5.0).floor()
    } else if temp_c > 15.0 {
        2.0 + ((temp_c - 15.0) / 5.0).floor()
    } else {
        min
    };

    match condition_code {
        // thunderstorm
        200..=299 => uv = (uv - 2.0).max(min),
        // drizzle, rain
        300..=399 | 500..=599 => uv = (uv - 1.0).max(min),
        // clear and clouds
        800..=899 => uv = (uv + 2.0).min(max),
        _ => {}
    }

    uv.clamp(min, max) as u8
}
