//! Arithmetic behind the strategy explanations: annuity growth, a fixed
//! dollar-cost-averaging price path, inflation drift and the cost of
//! delaying the first contribution.

use serde::Serialize;

pub const ASSUMED_INVESTMENT_RETURN: f64 = 0.07;
pub const ASSUMED_INFLATION: f64 = 0.03;
pub const ASSUMED_SAVINGS_RATE: f64 = 0.02;

const DCA_PRICE_PATH: [(&str, f64); 6] = [
    ("January", 100.0),
    ("February", 80.0),
    ("March", 90.0),
    ("April", 110.0),
    ("May", 85.0),
    ("June", 105.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainerProfile {
    pub monthly_foundation: f64,
    pub current_age: u32,
    pub retirement_age: u32,
    pub dream_name: String,
    pub dream_amount: f64,
    pub dream_timeline: u32,
    pub monthly_dream: f64,
}

impl ExplainerProfile {
    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }
}

impl Default for ExplainerProfile {
    fn default() -> Self {
        Self {
            monthly_foundation: 423.0,
            current_age: 28,
            retirement_age: 65,
            dream_name: "cottage".to_string(),
            dream_amount: 400_000.0,
            dream_timeline: 7,
            monthly_dream: 634.0,
        }
    }
}

/// Future value of an ordinary annuity paying `monthly` at month end.
pub fn future_value_of_monthly(monthly: f64, annual_rate: f64, years: u32) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    let months = years as f64 * 12.0;
    if monthly_rate == 0.0 {
        return monthly * months;
    }
    monthly * ((1.0 + monthly_rate).powf(months) - 1.0) / monthly_rate
}

pub fn monthly_for_target(target: f64, annual_rate: f64, years: u32) -> Option<f64> {
    if years == 0 {
        return None;
    }
    let monthly_rate = annual_rate / 12.0;
    let months = years as f64 * 12.0;
    if monthly_rate == 0.0 {
        return Some(target / months);
    }
    Some(target * monthly_rate / ((1.0 + monthly_rate).powf(months) - 1.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub year: u32,
    pub contributions: f64,
    pub amount: f64,
    pub share_of_dream: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundInterestBreakdown {
    pub years: u32,
    pub final_amount: f64,
    pub total_contributions: f64,
    pub growth_from_compounding: f64,
    /// Growth earned per contributed dollar.
    pub growth_multiple: f64,
    pub dream_equivalents: u32,
    pub milestones: Vec<Milestone>,
    pub monthly_cost_of_delay: f64,
}

pub fn explain_compound_interest(profile: &ExplainerProfile) -> CompoundInterestBreakdown {
    let years = profile.years_to_retirement();
    let monthly = profile.monthly_foundation;
    let final_amount = future_value_of_monthly(monthly, ASSUMED_INVESTMENT_RETURN, years);
    let total_contributions = monthly * 12.0 * years as f64;
    let growth_from_compounding = final_amount - total_contributions;

    let milestone = |year: u32| {
        let amount = future_value_of_monthly(monthly, ASSUMED_INVESTMENT_RETURN, year);
        Milestone {
            year,
            contributions: monthly * 12.0 * year as f64,
            amount,
            share_of_dream: ratio(amount, profile.dream_amount),
        }
    };

    let one_year_late =
        future_value_of_monthly(monthly, ASSUMED_INVESTMENT_RETURN, years.saturating_sub(1));

    CompoundInterestBreakdown {
        years,
        final_amount,
        total_contributions,
        growth_from_compounding,
        growth_multiple: ratio(growth_from_compounding, total_contributions),
        dream_equivalents: whole_multiples(final_amount, profile.dream_amount),
        milestones: vec![milestone(10), milestone(20), milestone(years)],
        monthly_cost_of_delay: (final_amount - one_year_late) / 12.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DcaMonth {
    pub month: &'static str,
    pub price: f64,
    pub shares: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DcaIllustration {
    pub monthly_amount: f64,
    pub months: Vec<DcaMonth>,
    pub total_invested: f64,
    pub total_shares: f64,
    pub average_cost_per_share: f64,
    pub final_share_price: f64,
    pub portfolio_value: f64,
    pub gain: f64,
    pub lump_sum_at_high: f64,
    pub lump_sum_at_low: f64,
}

pub fn illustrate_dollar_cost_averaging(monthly_amount: f64) -> DcaIllustration {
    let months: Vec<DcaMonth> = DCA_PRICE_PATH
        .iter()
        .map(|&(month, price)| DcaMonth {
            month,
            price,
            shares: monthly_amount / price,
        })
        .collect();

    let total_invested = monthly_amount * months.len() as f64;
    let total_shares: f64 = months.iter().map(|m| m.shares).sum();
    let final_share_price = DCA_PRICE_PATH[DCA_PRICE_PATH.len() - 1].1;
    let high = DCA_PRICE_PATH.iter().map(|(_, p)| *p).fold(f64::MIN, f64::max);
    let low = DCA_PRICE_PATH.iter().map(|(_, p)| *p).fold(f64::MAX, f64::min);
    let portfolio_value = total_shares * final_share_price;

    DcaIllustration {
        monthly_amount,
        total_invested,
        total_shares,
        average_cost_per_share: ratio(total_invested, total_shares),
        final_share_price,
        portfolio_value,
        gain: portfolio_value - total_invested,
        lump_sum_at_high: total_invested / high * final_share_price,
        lump_sum_at_low: total_invested / low * final_share_price,
        months,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationImpact {
    pub years: u32,
    pub current_cost: f64,
    pub future_cost: f64,
    pub inflation_cost: f64,
    pub first_year_drift: f64,
    pub savings_account_value: f64,
    pub buying_power_loss: f64,
    pub investment_value: f64,
    pub investment_surplus: f64,
    /// Annual return needed just to keep pace with inflation.
    pub needed_return: Option<f64>,
    pub monthly_via_savings: Option<f64>,
    pub monthly_via_investing: Option<f64>,
}

pub fn project_inflation_impact(profile: &ExplainerProfile) -> InflationImpact {
    let years = profile.dream_timeline;
    let current_cost = profile.dream_amount;
    let future_cost = current_cost * (1.0 + ASSUMED_INFLATION).powi(years as i32);
    let savings_account_value = current_cost * (1.0 + ASSUMED_SAVINGS_RATE).powi(years as i32);
    let investment_value = current_cost * (1.0 + ASSUMED_INVESTMENT_RETURN).powi(years as i32);

    let needed_return = if years > 0 && current_cost > 0.0 {
        Some((future_cost / current_cost).powf(1.0 / years as f64) - 1.0)
    } else {
        None
    };

    InflationImpact {
        years,
        current_cost,
        future_cost,
        inflation_cost: future_cost - current_cost,
        first_year_drift: current_cost * ASSUMED_INFLATION,
        savings_account_value,
        buying_power_loss: future_cost - savings_account_value,
        investment_value,
        investment_surplus: investment_value - future_cost,
        needed_return,
        monthly_via_savings: monthly_for_target(future_cost, 0.0, years),
        monthly_via_investing: monthly_for_target(future_cost, ASSUMED_INVESTMENT_RETURN, years),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayedStart {
    pub delay_years: u32,
    pub start_age: u32,
    pub final_amount: f64,
    pub lost_growth: f64,
    pub dreams_lost: u32,
    /// Monthly amount that would still reach the start-now outcome.
    pub monthly_needed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostOfWaiting {
    pub start_now: f64,
    pub delayed: Vec<DelayedStart>,
    pub daily_cost_of_waiting: f64,
}

pub fn cost_of_waiting(profile: &ExplainerProfile) -> CostOfWaiting {
    let years = profile.years_to_retirement();
    let monthly = profile.monthly_foundation;
    let start_now = future_value_of_monthly(monthly, ASSUMED_INVESTMENT_RETURN, years);

    let delayed: Vec<DelayedStart> = [5_u32, 10]
        .iter()
        .map(|&delay_years| {
            let remaining = years.saturating_sub(delay_years);
            let final_amount = future_value_of_monthly(monthly, ASSUMED_INVESTMENT_RETURN, remaining);
            let lost_growth = start_now - final_amount;
            DelayedStart {
                delay_years,
                start_age: profile.current_age.saturating_add(delay_years),
                final_amount,
                lost_growth,
                dreams_lost: whole_multiples(lost_growth, profile.dream_amount),
                monthly_needed: monthly_for_target(start_now, ASSUMED_INVESTMENT_RETURN, remaining),
            }
        })
        .collect();

    let daily_cost_of_waiting = delayed[0].lost_growth / (5.0 * 365.0);

    CostOfWaiting {
        start_now,
        delayed,
        daily_cost_of_waiting,
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() <= f64::EPSILON {
        return 0.0;
    }
    numerator / denominator
}

fn whole_multiples(amount: f64, unit: f64) -> u32 {
    if unit <= 0.0 || amount <= 0.0 {
        return 0;
    }
    (amount / unit).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_rate_annuity_is_plain_sum() {
        assert_relative_eq!(future_value_of_monthly(100.0, 0.0, 10), 12_000.0);
        assert_relative_eq!(
            monthly_for_target(12_000.0, 0.0, 10).expect("years > 0"),
            100.0
        );
    }

    #[test]
    fn monthly_for_target_inverts_future_value() {
        let fv = future_value_of_monthly(423.0, 0.07, 37);
        let monthly = monthly_for_target(fv, 0.07, 37).expect("years > 0");
        assert_relative_eq!(monthly, 423.0, epsilon = 1e-6);
        assert!(monthly_for_target(fv, 0.07, 0).is_none());
    }

    #[test]
    fn compound_interest_breakdown_for_default_profile() {
        let profile = ExplainerProfile::default();
        let breakdown = explain_compound_interest(&profile);

        assert_eq!(breakdown.years, 37);
        assert_relative_eq!(breakdown.total_contributions, 423.0 * 12.0 * 37.0);
        assert_relative_eq!(
            breakdown.final_amount,
            future_value_of_monthly(423.0, 0.07, 37),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            breakdown.growth_from_compounding,
            breakdown.final_amount - breakdown.total_contributions,
            epsilon = 1e-9
        );
        assert_eq!(
            breakdown.dream_equivalents,
            (breakdown.final_amount / 400_000.0).floor() as u32
        );
        let years: Vec<u32> = breakdown.milestones.iter().map(|m| m.year).collect();
        assert_eq!(years, vec![10, 20, 37]);
        assert!(breakdown.monthly_cost_of_delay > 0.0);
        assert!(breakdown.growth_multiple > 1.0);
    }

    #[test]
    fn dca_buys_more_shares_when_prices_fall() {
        let dca = illustrate_dollar_cost_averaging(600.0);
        assert_eq!(dca.months.len(), 6);
        assert_relative_eq!(dca.total_invested, 3_600.0);
        assert_relative_eq!(dca.months[1].shares, 7.5);
        assert_relative_eq!(dca.lump_sum_at_high, 3_600.0 / 110.0 * 105.0, epsilon = 1e-9);
        assert_relative_eq!(dca.lump_sum_at_low, 3_600.0 / 80.0 * 105.0, epsilon = 1e-9);
        // Average cost is the harmonic mean of the prices, below their arithmetic mean.
        assert!(dca.average_cost_per_share < 95.0);
        assert!(dca.portfolio_value > dca.lump_sum_at_high);
        assert!(dca.portfolio_value < dca.lump_sum_at_low);
    }

    #[test]
    fn inflation_impact_for_default_profile() {
        let impact = project_inflation_impact(&ExplainerProfile::default());
        assert_relative_eq!(impact.future_cost, 400_000.0 * 1.03_f64.powi(7), epsilon = 1e-6);
        assert_relative_eq!(impact.first_year_drift, 12_000.0, epsilon = 1e-9);
        assert!(impact.buying_power_loss > 0.0);
        assert!(impact.investment_surplus > 0.0);
        assert_relative_eq!(impact.needed_return.expect("years > 0"), 0.03, epsilon = 1e-9);
        let savings = impact.monthly_via_savings.expect("years > 0");
        let investing = impact.monthly_via_investing.expect("years > 0");
        assert!(investing < savings);
    }

    #[test]
    fn inflation_impact_without_timeline_has_no_rates() {
        let profile = ExplainerProfile {
            dream_timeline: 0,
            ..ExplainerProfile::default()
        };
        let impact = project_inflation_impact(&profile);
        assert!(impact.needed_return.is_none());
        assert!(impact.monthly_via_savings.is_none());
        assert_relative_eq!(impact.inflation_cost, 0.0);
    }

    #[test]
    fn waiting_costs_grow_with_delay() {
        let waiting = cost_of_waiting(&ExplainerProfile::default());
        assert_eq!(waiting.delayed.len(), 2);
        let five = waiting.delayed[0];
        let ten = waiting.delayed[1];
        assert_eq!(five.start_age, 33);
        assert_eq!(ten.start_age, 38);
        assert!(ten.lost_growth > five.lost_growth);
        assert!(ten.monthly_needed.expect("years remain") > five.monthly_needed.expect("years remain"));
        assert_relative_eq!(waiting.daily_cost_of_waiting, five.lost_growth / 1_825.0);
    }

    #[test]
    fn waiting_past_retirement_leaves_nothing() {
        let profile = ExplainerProfile {
            current_age: 60,
            retirement_age: 63,
            ..ExplainerProfile::default()
        };
        let waiting = cost_of_waiting(&profile);
        assert_relative_eq!(waiting.delayed[0].final_amount, 0.0);
        assert!(waiting.delayed[0].monthly_needed.is_none());
        assert_relative_eq!(waiting.delayed[0].lost_growth, waiting.start_now);
    }

    #[test]
    fn start_ages_saturate_at_extreme_ages() {
        let profile = ExplainerProfile {
            current_age: u32::MAX - 6,
            retirement_age: u32::MAX,
            ..ExplainerProfile::default()
        };
        let waiting = cost_of_waiting(&profile);
        assert_eq!(waiting.delayed[0].start_age, u32::MAX - 1);
        assert_eq!(waiting.delayed[1].start_age, u32::MAX);
    }
}
