use super::engine::calculate_variable_returns;
use super::error::PlannerError;
use super::market::MarketAssumptions;
use super::stats::round_money;
use super::types::{
    AdjustedTimeline, ExpenseAdjustment, ExpenseStrategy, FinancialProfile, LifeExpense,
    LifeExpenseAdjustment, TimelineDelay,
};

pub fn adjust_for_life_expenses(
    profile: &FinancialProfile,
    expenses: &[LifeExpense],
) -> Result<LifeExpenseAdjustment, PlannerError> {
    adjust_for_life_expenses_with(profile, expenses, &MarketAssumptions::default())
}

/// Reduces the profile's savings capacity by the anticipated expenses and
/// re-projects it over the historical return table.
pub fn adjust_for_life_expenses_with(
    profile: &FinancialProfile,
    expenses: &[LifeExpense],
    market: &MarketAssumptions,
) -> Result<LifeExpenseAdjustment, PlannerError> {
    validate_profile(profile)?;

    let expense_impacts: Vec<ExpenseAdjustment> = expenses
        .iter()
        .filter_map(|expense| expense_adjustment(expense, profile))
        .collect();
    let cumulative_impact: f64 = expense_impacts.iter().map(|adj| adj.total_impact).sum();

    let horizon_years = profile.horizon_years();
    let average_annual_reduction = cumulative_impact / horizon_years as f64;
    let adjusted_monthly_savings =
        (profile.monthly_contribution - average_annual_reduction / 12.0).max(0.0);

    let adjusted_projection = calculate_variable_returns(
        profile.current_savings,
        adjusted_monthly_savings,
        market.historical_slice(horizon_years),
    )?;

    let goal_achievable = adjusted_projection.final_value >= profile.target_amount;
    let shortfall = if goal_achievable {
        0.0
    } else {
        profile.target_amount - adjusted_projection.final_value
    };
    let timeline_delay = timeline_delay(shortfall, adjusted_monthly_savings);
    if timeline_delay == TimelineDelay::Unreachable {
        log::debug!(
            "shortfall of {shortfall} cannot be closed: adjusted monthly savings are zero"
        );
    }

    let strategies = expense_strategies(&expense_impacts, shortfall, timeline_delay, horizon_years);

    Ok(LifeExpenseAdjustment {
        original_timeline: profile.clone(),
        adjusted_timeline: AdjustedTimeline {
            profile: profile.clone(),
            adjusted_monthly_savings: round_money(adjusted_monthly_savings),
            projected_value: adjusted_projection.final_value,
            goal_achievable,
            shortfall,
            timeline_delay,
        },
        expense_impacts,
        total_impact: round_money(cumulative_impact),
        strategies,
        adjusted_projection,
    })
}

fn validate_profile(profile: &FinancialProfile) -> Result<(), PlannerError> {
    if profile.target_age <= profile.current_age {
        return Err(PlannerError::invalid("targetAge must be > currentAge"));
    }
    if !profile.monthly_contribution.is_finite() || profile.monthly_contribution < 0.0 {
        return Err(PlannerError::invalid(
            "monthlyContribution must be finite and >= 0",
        ));
    }
    if !profile.current_savings.is_finite() || profile.current_savings < 0.0 {
        return Err(PlannerError::invalid("currentSavings must be finite and >= 0"));
    }
    if !profile.target_amount.is_finite() {
        return Err(PlannerError::invalid("targetAmount must be finite"));
    }
    Ok(())
}

fn expense_adjustment(expense: &LifeExpense, profile: &FinancialProfile) -> Option<ExpenseAdjustment> {
    let monthly_cost = if expense.monthly_cost.is_finite() {
        expense.monthly_cost
    } else {
        0.0
    };
    let monthly_reduction = round_money(monthly_cost * expense.category.savings_factor());
    if monthly_reduction <= 0.0 {
        return None;
    }

    let start_age = expense.start_age.unwrap_or(profile.current_age);
    let impact_years = expense
        .duration
        .min(profile.target_age.saturating_sub(start_age));

    Some(ExpenseAdjustment {
        category: expense.category,
        start_age,
        duration: impact_years,
        monthly_reduction,
        total_impact: monthly_reduction * 12.0 * impact_years as f64,
        one_time_cost: if expense.one_time_cost.is_finite() {
            expense.one_time_cost
        } else {
            0.0
        },
        description: expense.description.clone(),
        strategy: expense.category.advice(),
    })
}

fn timeline_delay(shortfall: f64, monthly_savings: f64) -> TimelineDelay {
    if shortfall <= 0.0 {
        return TimelineDelay::OnTrack;
    }
    if monthly_savings <= 0.0 {
        return TimelineDelay::Unreachable;
    }
    TimelineDelay::Months {
        months: shortfall / monthly_savings,
    }
}

fn expense_strategies(
    adjustments: &[ExpenseAdjustment],
    shortfall: f64,
    delay: TimelineDelay,
    horizon_years: u32,
) -> Vec<ExpenseStrategy> {
    let mut strategies = Vec::with_capacity(adjustments.len() + 2);

    if shortfall > 0.0 {
        strategies.push(ExpenseStrategy::IncreaseIncome {
            monthly_amount: round_money(shortfall / horizon_years as f64 / 12.0),
        });
        if let TimelineDelay::Months { months } = delay {
            strategies.push(ExpenseStrategy::ExtendTimeline {
                months: months.round(),
            });
        }
    }

    strategies.extend(adjustments.iter().map(|adj| ExpenseStrategy::CategoryAdvice {
        category: adj.category,
        advice: adj.strategy,
    }));
    strategies
}
