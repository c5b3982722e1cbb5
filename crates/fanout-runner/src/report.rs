use std::fmt::Write;

use fanout_core::{RunBatch, Strategy};
use serde::Serialize;

/// Descriptive statistics of tokens per second for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two runs.
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

/// Summaries for every strategy that has at least one successful run,
/// in `Strategy` order.
pub fn summarize(batch: &RunBatch) -> Vec<StrategySummary> {
    Strategy::ALL
        .iter()
        .filter_map(|&strategy| {
            let mut values: Vec<f64> = batch
                .by_strategy(strategy)
                .map(|o| o.tokens_per_second())
                .collect();
            summarize_values(strategy, &mut values)
        })
        .collect()
}

fn summarize_values(strategy: Strategy, values: &mut [f64]) -> Option<StrategySummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sq / (count - 1) as f64).sqrt()
    });

    Some(StrategySummary {
        strategy,
        count,
        mean,
        std,
        min: values[0],
        p25: quantile(values, 0.25),
        p50: quantile(values, 0.5),
        p75: quantile(values, 0.75),
        max: values[count - 1],
    })
}

/// Linear-interpolated quantile of sorted, non-empty `values`.
fn quantile(values: &[f64], q: f64) -> f64 {
    let pos = q * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (pos - lo as f64)
}

/// Render summaries as a fixed-width text table.
pub fn render_table(summaries: &[StrategySummary]) -> String {
    if summaries.is_empty() {
        return "no successful runs\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>5} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "strategy", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for s in summaries {
        let std = s.std.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
        let _ = writeln!(
            out,
            "{:<10} {:>5} {:>10.2} {:>10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            s.strategy.as_str(),
            s.count,
            s.mean,
            std,
            s.min,
            s.p25,
            s.p50,
            s.p75,
            s.max
        );
    }
    out
}
