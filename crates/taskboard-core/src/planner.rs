//! Production time estimate for a linear flow line.
//!
//! One unit passes through every stage once; each further unit is gated by
//! the slowest stage. This is a throughput approximation with a single
//! resource per stage, not a scheduler.

use serde::{Deserialize, Serialize};

/// Total minutes to push `order_count` units through the stages.
///
/// `sum(stages) + (order_count - 1) * max(stages)`. Zero orders or no stages
/// take no time.
pub fn production_bottleneck(order_count: u32, stage_durations: &[f64]) -> f64 {
    if order_count == 0 || stage_durations.is_empty() {
        return 0.0;
    }
    let bottleneck = stage_durations.iter().copied().fold(f64::MIN, f64::max);
    let first_unit: f64 = stage_durations.iter().sum();
    first_unit + f64::from(order_count - 1) * bottleneck
}

/// A named stage with its per-unit duration in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub minutes: f64,
}

impl Stage {
    pub fn new(name: impl Into<String>, minutes: f64) -> Self {
        Self {
            name: name.into(),
            minutes,
        }
    }
}

/// Work a stage does across the whole order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageLoad {
    pub name: String,
    /// `minutes * orders`
    pub total_minutes: f64,
}

/// Estimate for one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPlan {
    pub orders: u32,
    pub total_minutes: f64,
    /// Name of the slowest stage, first one on ties
    pub bottleneck: Option<String>,
    pub stage_loads: Vec<StageLoad>,
}

impl ProductionPlan {
    pub fn estimate(orders: u32, stages: &[Stage]) -> Self {
        let durations: Vec<f64> = stages.iter().map(|s| s.minutes).collect();

        let bottleneck = stages
            .iter()
            .fold(None::<&Stage>, |slowest, stage| match slowest {
                Some(s) if s.minutes >= stage.minutes => Some(s),
                _ => Some(stage),
            })
            .map(|s| s.name.clone());

        let stage_loads = stages
            .iter()
            .map(|s| StageLoad {
                name: s.name.clone(),
                total_minutes: s.minutes * f64::from(orders),
            })
            .collect();

        Self {
            orders,
            total_minutes: production_bottleneck(orders, &durations),
            bottleneck,
            stage_loads,
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.total_minutes / 60.0
    }
}
