use super::error::PlannerError;
use super::stats::{geometric_mean, population_std_dev, round_money};
use super::types::{BenchmarkComparison, PerformanceSummary, ProjectionResult, YearlyProjectionPoint};

/// Contributions arrive through the year, so on average they earn half of
/// that year's return.
const CONTRIBUTION_RETURN_SHARE: f64 = 0.5;

const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, Copy)]
struct RunningBalance {
    value: f64,
    contributions: f64,
}

impl RunningBalance {
    fn apply_year(&mut self, yearly_contribution: f64, year_return: f64) {
        let contribution_growth =
            yearly_contribution * (1.0 + year_return * CONTRIBUTION_RETURN_SHARE);
        self.value *= 1.0 + year_return;
        self.value += contribution_growth;
        self.contributions += yearly_contribution;
    }
}

/// Projects a balance year by year through `annual_returns`, adding
/// `monthly_contribution * 12` each year.
pub fn calculate_variable_returns(
    principal: f64,
    monthly_contribution: f64,
    annual_returns: &[f64],
) -> Result<ProjectionResult, PlannerError> {
    validate_inputs(principal, monthly_contribution, annual_returns)?;

    let yearly_contribution = monthly_contribution * 12.0;
    let mut balance = RunningBalance {
        value: principal,
        contributions: principal,
    };

    let mut yearly_breakdown = Vec::with_capacity(annual_returns.len());
    for (idx, &year_return) in annual_returns.iter().enumerate() {
        balance.apply_year(yearly_contribution, year_return);
        let value = round_money(balance.value);
        let cumulative_contributions = round_money(balance.contributions);
        yearly_breakdown.push(YearlyProjectionPoint {
            year: idx as u32 + 1,
            value,
            annual_return: year_return,
            cumulative_contributions,
            growth: value - cumulative_contributions,
        });
    }

    let years = annual_returns.len();
    let average_return = geometric_mean(annual_returns);
    let volatility = population_std_dev(annual_returns);
    let cagr = compound_annual_growth_rate(principal, balance.value, years);
    let (best_year, worst_year) = extreme_years(&yearly_breakdown);
    let benchmark = benchmark_against_fixed_rate(
        balance.value,
        balance.contributions,
        average_return,
        years,
    );

    let final_value = round_money(balance.value);
    let total_contributions = round_money(balance.contributions);

    Ok(ProjectionResult {
        final_value,
        total_contributions,
        total_growth: final_value - total_contributions,
        performance: PerformanceSummary {
            average_return,
            volatility,
            cagr,
            best_year,
            worst_year,
        },
        yearly_breakdown,
        benchmark,
    })
}

fn validate_inputs(
    principal: f64,
    monthly_contribution: f64,
    annual_returns: &[f64],
) -> Result<(), PlannerError> {
    if annual_returns.is_empty() {
        return Err(PlannerError::EmptyReturnSeries);
    }
    if !principal.is_finite() || principal < 0.0 {
        return Err(PlannerError::invalid("principal must be finite and >= 0"));
    }
    if !monthly_contribution.is_finite() || monthly_contribution < 0.0 {
        return Err(PlannerError::invalid(
            "monthly contribution must be finite and >= 0",
        ));
    }
    if let Some(idx) = annual_returns.iter().position(|r| !r.is_finite()) {
        return Err(PlannerError::invalid(format!(
            "annual return at index {idx} must be finite"
        )));
    }
    Ok(())
}

fn compound_annual_growth_rate(principal: f64, final_value: f64, years: usize) -> Option<f64> {
    if principal <= 0.0 || years == 0 {
        log::debug!("cagr undefined for principal {principal} over {years} years");
        return None;
    }
    let ratio = final_value / principal;
    if ratio < 0.0 {
        log::debug!("cagr undefined for negative value ratio {ratio}");
        return None;
    }
    Some(ratio.powf(1.0 / years as f64) - 1.0)
}

/// Best and worst years by return. Ties keep the earliest year.
fn extreme_years(points: &[YearlyProjectionPoint]) -> (YearlyProjectionPoint, YearlyProjectionPoint) {
    let mut best = points[0];
    let mut worst = points[0];
    for point in &points[1..] {
        if point.annual_return > best.annual_return {
            best = *point;
        }
        if point.annual_return < worst.annual_return {
            worst = *point;
        }
    }
    (best, worst)
}

fn benchmark_against_fixed_rate(
    final_value: f64,
    total_contributions: f64,
    average_return: f64,
    years: usize,
) -> BenchmarkComparison {
    let naive_value = total_contributions * (1.0 + average_return).powi(years as i32);
    let ahead_of_naive = final_value > naive_value;

    let yearly_contribution_pace = total_contributions / years as f64 * 12.0;
    let day_difference = if yearly_contribution_pace > 0.0 {
        Some(((final_value - naive_value).abs() / yearly_contribution_pace * DAYS_PER_MONTH).round())
    } else {
        None
    };

    BenchmarkComparison {
        naive_value: round_money(naive_value),
        ahead_of_naive,
        day_difference,
    }
}
