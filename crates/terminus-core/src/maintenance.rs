//! Running costs derived from station facilities.

use terminus_station::StationPool;
use terminus_types::{CompanyId, StationFacility};

/// Yearly upkeep of every airport `owner` runs.
///
/// Each airport costs `base_price` times its layout's maintenance factor;
/// the factors are in eighths, so the sum drops its three fractional bits.
pub fn airport_maintenance_cost(pool: &StationPool, owner: CompanyId, base_price: u64) -> u64 {
    let total = pool
        .iter()
        .filter(|st| st.owner == Some(owner) && st.facilities.contains(StationFacility::Airport))
        .filter_map(|st| st.airport.as_ref())
        .fold(0_u64, |acc, airport| {
            acc.saturating_add(base_price.saturating_mul(airport.kind.spec().maintenance_cost))
        });
    total >> 3
}
