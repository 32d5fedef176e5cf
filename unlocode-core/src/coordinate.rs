//! Packed degree-minute coordinates.
//!
//! The code list writes positions as `DDMM[N|S] DDDMM[E|W]`, for example
//! `"4338N 07215W"`. Decoding divides the numeric part by 100, so `4338N`
//! becomes `43.38`. The fractional part therefore still holds minutes rather
//! than decimal degrees; callers needing true decimal degrees must convert
//! separately. Positions are `geo::Coord` values with `x = longitude` and
//! `y = latitude`.

use geo::Coord;

/// Value persisted for both axes when a location has no known position.
///
/// It lies outside the valid latitude range, so it cannot be confused with a
/// real position such as `(0, 0)`.
pub const UNKNOWN_COORDINATE: f64 = 91.0;

/// Decode a packed coordinate pair.
///
/// Returns `None` unless the text splits into exactly two whitespace
/// separated tokens that each carry a finite number followed by a valid
/// direction letter (`N`/`S` first, `E`/`W` second).
///
/// # Examples
/// ```
/// use unlocode_core::decode_coordinates;
///
/// let position = decode_coordinates("2503N 12131E").expect("valid coordinates");
/// assert!((position.y - 25.03).abs() < 1e-9);
/// assert!((position.x - 121.31).abs() < 1e-9);
/// assert!(decode_coordinates("2503N").is_none());
/// ```
pub fn decode_coordinates(text: &str) -> Option<Coord<f64>> {
    let mut tokens = text.split_whitespace();
    let (Some(latitude), Some(longitude), None) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return None;
    };
    let latitude = decode_axis(latitude, 'N', 'S')?;
    let longitude = decode_axis(longitude, 'E', 'W')?;
    Some(Coord {
        x: longitude,
        y: latitude,
    })
}

fn decode_axis(token: &str, positive: char, negative: char) -> Option<f64> {
    let mut chars = token.chars();
    let direction = chars.next_back()?;
    let packed: f64 = chars.as_str().parse().ok()?;
    if !packed.is_finite() {
        return None;
    }
    let degrees = packed / 100.0;
    if direction == positive {
        Some(degrees)
    } else if direction == negative {
        Some(-degrees)
    } else {
        None
    }
}

/// Split a position into the `(longitude, latitude)` columns, using the
/// sentinel for unknown positions.
pub fn to_columns(position: Option<Coord<f64>>) -> (f64, f64) {
    position.map_or((UNKNOWN_COORDINATE, UNKNOWN_COORDINATE), |coord| {
        (coord.x, coord.y)
    })
}

/// Rebuild a position from stored columns. Any latitude outside `[-90, 90]`
/// (the sentinel included) yields `None`.
pub fn from_columns(longitude: f64, latitude: f64) -> Option<Coord<f64>> {
    (latitude.is_finite() && longitude.is_finite() && (-90.0..=90.0).contains(&latitude)).then_some(
        Coord {
            x: longitude,
            y: latitude,
        },
    )
}
