/// Stepper positions the fuel gauge resolves, keyed by percent full.
const FUEL_POSITIONS: [(i64, u8); 5] = [(0, 4), (25, 8), (50, 16), (75, 32), (100, 64)];

/// Convert a tide percentage into a fuel gauge position.
///
/// The gauge only settles on quarter marks, so the percentage is rounded to
/// the nearest multiple of 25 (ties to even) and clamped to 0-100 before the
/// lookup. A value missing from the table is passed through unchanged.
pub fn map_tide_to_fuel_position(pct: f64) -> u8 {
    let rounded = ((pct / 25.0).round_ties_even() * 25.0).clamp(0.0, 100.0) as i64;

    FUEL_POSITIONS
        .iter()
        .find(|(percent, _)| *percent == rounded)
        .map_or(rounded as u8, |(_, position)| *position)
}

/// Percent full represented by a fuel gauge position, if it is one of the
/// stepper's quarter marks.
pub fn fuel_position_to_percent(position: u8) -> Option<u8> {
    FUEL_POSITIONS
        .iter()
        .find(|(_, p)| *p == position)
        .map(|(percent, _)| *percent as u8)
}
