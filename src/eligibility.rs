//! Zone and sector gate between reps and prospects.

use crate::model::{Prospect, Rep};

/// A rep may serve a prospect only when both its zone and its sector are
/// among the rep's assignments. There is no partial match.
pub fn is_eligible(prospect: &Prospect, rep: &Rep) -> bool {
    rep.zones.contains(&prospect.zone) && rep.sectors.contains(&prospect.sector)
}

/// Reps allowed to serve `prospect`, in input order.
pub fn eligible_reps<'a>(prospect: &Prospect, reps: &'a [Rep]) -> Vec<&'a Rep> {
    reps.iter().filter(|rep| is_eligible(prospect, rep)).collect()
}

/// Prospects `rep` is allowed to serve, in input order.
pub fn eligible_prospects<'a>(rep: &Rep, prospects: &'a [Prospect]) -> Vec<&'a Prospect> {
    prospects
        .iter()
        .filter(|prospect| is_eligible(prospect, rep))
        .collect()
}
