//! Travel cost model.
//!
//! Two mutually exclusive policies: a per-kilometre mileage indemnity, or the
//! price of the fuel actually burnt.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CostPolicy {
    Indemnity {
        rate_per_km: f64,
    },
    Consumption {
        liters_per_100km: f64,
        fuel_price_per_liter: f64,
    },
}

impl Default for CostPolicy {
    fn default() -> Self {
        CostPolicy::Indemnity { rate_per_km: 0.5 }
    }
}

impl CostPolicy {
    /// Cost of driving `distance_km` under this policy.
    pub fn cost(&self, distance_km: f64) -> Result<f64, EngineError> {
        if distance_km.is_nan() || distance_km < 0.0 {
            return Err(EngineError::NegativeDistance(distance_km));
        }

        let amount = match *self {
            CostPolicy::Indemnity { rate_per_km } => distance_km * rate_per_km,
            CostPolicy::Consumption {
                liters_per_100km,
                fuel_price_per_liter,
            } => distance_km * liters_per_100km / 100.0 * fuel_price_per_liter,
        };
        Ok(amount)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let rates: Vec<(&'static str, f64)> = match self {
            CostPolicy::Indemnity { rate_per_km } => vec![("rate_per_km", *rate_per_km)],
            CostPolicy::Consumption {
                liters_per_100km,
                fuel_price_per_liter,
            } => vec![
                ("liters_per_100km", *liters_per_100km),
                ("fuel_price_per_liter", *fuel_price_per_liter),
            ],
        };

        for (name, value) in rates {
            if value.is_nan() || value < 0.0 {
                return Err(EngineError::InvalidRate { name, value });
            }
        }
        Ok(())
    }
}
