use crate::error::Result;
use crate::number::PAdic;
use crate::ops::difference;
use crate::valuation::Valuation;

/// `base^(-v(x))`, 0 for zero.
pub fn norm(x: &PAdic) -> f64 {
    x.valuation().norm(x.base())
}

/// Number of agreeing low-order places: `v(x - y)`.
pub fn agreement(x: &PAdic, y: &PAdic) -> Result<Valuation> {
    Ok(difference(x, y)?.valuation())
}

pub fn padic_distance(x: &PAdic, y: &PAdic) -> Result<f64> {
    Ok(norm(&difference(x, y)?))
}

pub fn are_close(x: &PAdic, y: &PAdic, min_valuation: i64) -> Result<bool> {
    Ok(agreement(x, y)? >= Valuation::new(min_valuation))
}

/// Index of the candidate agreeing with `reference` to the most places.
pub fn find_closest(reference: &PAdic, candidates: &[PAdic]) -> Result<Option<usize>> {
    let mut best: Option<(usize, Valuation)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let val = agreement(reference, candidate)?;
        if best.map_or(true, |(_, best_val)| val > best_val) {
            best = Some((i, val));
        }
    }
    Ok(best.map(|(i, _)| i))
}
