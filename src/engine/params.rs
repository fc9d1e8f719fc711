use crate::error::{Result, SimError};

/// Rates of one run. `total_departure_rate` is derived and kept in sync by the
/// constructor, which is why the fields are private.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    arrival_rate: f64,
    server_a_rate: f64,
    server_b_rate: f64,
    total_departure_rate: f64,
}

fn check_rate(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidRate { name, value })
    }
}

impl SimParams {
    pub fn new(arrival_rate: f64, server_a_rate: f64, server_b_rate: f64) -> Result<Self> {
        let arrival_rate = check_rate("arrival rate", arrival_rate)?;
        let server_a_rate = check_rate("server A rate", server_a_rate)?;
        let server_b_rate = check_rate("server B rate", server_b_rate)?;
        Ok(Self {
            arrival_rate,
            server_a_rate,
            server_b_rate,
            total_departure_rate: server_a_rate + server_b_rate,
        })
    }

    pub fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    pub fn server_a_rate(&self) -> f64 {
        self.server_a_rate
    }

    pub fn server_b_rate(&self) -> f64 {
        self.server_b_rate
    }

    pub fn total_departure_rate(&self) -> f64 {
        self.total_departure_rate
    }

    /// Fails with [SimError::UnstableConfiguration] when λ > μa + μb.
    pub fn check_stable(&self) -> Result<()> {
        if self.arrival_rate > self.total_departure_rate {
            return Err(SimError::UnstableConfiguration {
                arrival_rate: self.arrival_rate,
                total_departure_rate: self.total_departure_rate,
            });
        }
        Ok(())
    }

    /// Probability that the next transition is an arrival.
    ///
    /// Server B only serves once the occupancy reaches [K](super::K), so below
    /// that only server A competes with arrivals.
    pub fn arrival_threshold(&self, occupancy: usize) -> f64 {
        if occupancy < super::K {
            self.arrival_rate / (self.arrival_rate + self.server_a_rate)
        } else {
            self.arrival_rate / (self.arrival_rate + self.total_departure_rate)
        }
    }
}
