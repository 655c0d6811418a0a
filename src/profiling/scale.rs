//! Stanine <-> SAS conversion.
//!
//! One canonical lookup table is used in both directions so the round trip
//! `sas_to_stanine(stanine_to_sas(s)) == s` holds for every integer stanine.

/// SAS equivalent for integer stanines 1..=9.
const STANINE_SAS_TABLE: [f64; 9] = [74.0, 81.0, 88.0, 96.0, 103.0, 112.0, 119.0, 127.0, 141.0];

/// Converts a stanine (1-9) to a standardized ability score (60-140 scale).
///
/// Out-of-range stanines clamp to the nearest table entry; decimal stanines
/// interpolate linearly between adjacent entries. Total over all inputs.
pub fn stanine_to_sas(stanine: f64) -> f64 {
    if !stanine.is_finite() || stanine <= 1.0 {
        return STANINE_SAS_TABLE[0];
    }
    if stanine >= 9.0 {
        return STANINE_SAS_TABLE[8];
    }

    let lower = stanine.floor() as usize;
    let fraction = stanine - lower as f64;
    let lower_sas = STANINE_SAS_TABLE[lower - 1];
    if fraction == 0.0 {
        return lower_sas;
    }
    let upper_sas = STANINE_SAS_TABLE[lower];
    lower_sas + (upper_sas - lower_sas) * fraction
}

/// Converts a SAS back to a stanine band, treating the table values as
/// inclusive upper bounds of each band.
pub fn sas_to_stanine(sas: f64) -> f64 {
    for (index, bound) in STANINE_SAS_TABLE.iter().enumerate().take(8) {
        if sas <= *bound {
            return (index + 1) as f64;
        }
    }
    9.0
}
