//! Scalar performance counters for a dispersion run.

/// Counters updated inline by the simulation tick.
///
/// Per-robot step and presence counts live on the robot records; this
/// struct carries the run-wide aggregates consumers poll between ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Ticks executed since the last map load or reset.
    pub simulation_steps: u32,
    /// Tick index of the last settlement; monotone during a run.
    /// Consumers freeze the value when the run first reports complete.
    pub makespan: u32,
    /// Sum over robots of positional moves taken.
    pub t_total: u32,
    /// Maximum over robots of positional moves taken.
    pub t_max: u32,
    /// Sum over robots of ticks spent active in the arena.
    pub e_total: u32,
    /// Maximum over robots of ticks spent active in the arena.
    pub e_max: u32,
}

impl Metrics {
    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = Metrics::default();
        assert_eq!(m.simulation_steps, 0);
        assert_eq!(m.makespan, 0);
        assert_eq!(m.t_total, 0);
        assert_eq!(m.t_max, 0);
        assert_eq!(m.e_total, 0);
        assert_eq!(m.e_max, 0);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut m = Metrics {
            simulation_steps: 9,
            makespan: 9,
            t_total: 4,
            t_max: 2,
            e_total: 12,
            e_max: 5,
        };
        m.reset();
        assert_eq!(m, Metrics::default());
    }
}
