use super::engine::calculate_variable_returns;
use super::error::PlannerError;
use super::market::MarketAssumptions;
use super::stats::round_money;
use super::types::{
    CatchUpOutcome, CatchUpPlan, CatchUpScenario, Difficulty, Feasibility, GoalDetails,
    MissedImpact, Recommendation, ScenarioKind, ScenarioProjection,
};

/// Share of the deficit the hybrid scenario absorbs through a higher monthly amount.
const HYBRID_MONTHLY_SHARE: f64 = 0.6;
const HYBRID_TIMELINE_SHARE: f64 = 0.4;

const SUCCESS_STEPS: [(f64, u32); 6] = [
    (1.10, 95),
    (1.05, 90),
    (1.00, 85),
    (0.95, 75),
    (0.90, 65),
    (0.80, 50),
];
const SUCCESS_FLOOR: u32 = 35;

/// Longest remaining horizon a catch-up plan is sized for.
pub const MAX_CATCH_UP_YEARS: u32 = 100;
/// Most missed contributions a catch-up plan accepts.
pub const MAX_MISSED_MONTHS: u32 = MAX_CATCH_UP_YEARS * 12;

pub fn calculate_catch_up_strategy(
    missed_months: u32,
    remaining_years: u32,
    goal: &GoalDetails,
) -> Result<CatchUpOutcome, PlannerError> {
    calculate_catch_up_strategy_with(missed_months, remaining_years, goal, &MarketAssumptions::default())
}

/// Sizes the three remediation scenarios for `missed_months` of skipped
/// contributions and recommends the best-scoring one.
pub fn calculate_catch_up_strategy_with(
    missed_months: u32,
    remaining_years: u32,
    goal: &GoalDetails,
    market: &MarketAssumptions,
) -> Result<CatchUpOutcome, PlannerError> {
    if missed_months == 0 || remaining_years == 0 {
        return Ok(CatchUpOutcome::NotNeeded);
    }
    validate_counts(missed_months, remaining_years)?;
    validate_goal(goal)?;

    let planned = goal.planned_monthly_contribution;
    if planned <= 0.0 {
        log::debug!("no catch-up scenario for planned monthly contribution {planned}");
        return Ok(CatchUpOutcome::NoViableScenario { missed_months });
    }

    let missed_contributions = missed_months as f64 * planned;
    let lost_growth = lost_compound_growth(missed_contributions, market.catch_up_return, remaining_years);
    let total_deficit = missed_contributions + lost_growth;

    let remaining_months = remaining_years as f64 * 12.0;
    let monthly_deficit = total_deficit / remaining_months;
    let increase_feasibility = if monthly_deficit < planned * 0.5 {
        Feasibility::High
    } else {
        Feasibility::Medium
    };

    let mut scenarios = Vec::with_capacity(ScenarioKind::ALL.len());
    for kind in ScenarioKind::ALL {
        let scenario = build_scenario(kind, total_deficit, remaining_years, planned)?;
        scenarios.push(project_scenario(scenario, goal, market)?);
    }
    let recommendation = select_recommendation(&scenarios);

    Ok(CatchUpOutcome::Planned(CatchUpPlan {
        missed_impact: MissedImpact {
            missed_months,
            missed_contributions: round_money(missed_contributions),
            lost_growth: round_money(lost_growth),
            total_deficit: round_money(total_deficit),
        },
        remaining_years,
        monthly_deficit,
        increase_feasibility,
        scenarios,
        recommendation,
    }))
}

/// Coarse step function of projected value over target, in percent.
pub fn calculate_success_probability(projected_value: f64, target_value: f64) -> u32 {
    if target_value <= 0.0 {
        return SUCCESS_STEPS[0].1;
    }
    let ratio = projected_value / target_value;
    SUCCESS_STEPS
        .iter()
        .find(|(threshold, _)| ratio >= *threshold)
        .map(|(_, probability)| *probability)
        .unwrap_or(SUCCESS_FLOOR)
}

fn validate_counts(missed_months: u32, remaining_years: u32) -> Result<(), PlannerError> {
    if remaining_years > MAX_CATCH_UP_YEARS {
        return Err(PlannerError::invalid(format!(
            "remainingYears must be at most {MAX_CATCH_UP_YEARS}"
        )));
    }
    if missed_months > MAX_MISSED_MONTHS {
        return Err(PlannerError::invalid(format!(
            "missedMonths must be at most {MAX_MISSED_MONTHS}"
        )));
    }
    Ok(())
}

fn validate_goal(goal: &GoalDetails) -> Result<(), PlannerError> {
    if !goal.target_amount.is_finite() {
        return Err(PlannerError::invalid("targetAmount must be finite"));
    }
    if !goal.current_savings.is_finite() || goal.current_savings < 0.0 {
        return Err(PlannerError::invalid("currentSavings must be finite and >= 0"));
    }
    if !goal.planned_monthly_contribution.is_finite() {
        return Err(PlannerError::invalid(
            "plannedMonthlyContribution must be finite",
        ));
    }
    Ok(())
}

/// `years` is bounded by [`MAX_CATCH_UP_YEARS`] before this runs.
fn lost_compound_growth(missed_amount: f64, annual_rate: f64, years: u32) -> f64 {
    missed_amount * (1.0 + annual_rate).powi(years as i32) - missed_amount
}

fn build_scenario(
    kind: ScenarioKind,
    deficit: f64,
    remaining_years: u32,
    planned_monthly: f64,
) -> Result<CatchUpScenario, PlannerError> {
    let per_month = deficit / (remaining_years as f64 * 12.0);
    let contribution_years = deficit / (planned_monthly * 12.0);

    let scenario = match kind {
        ScenarioKind::MonthlyIncrease => {
            let additional_monthly = per_month.ceil();
            CatchUpScenario {
                kind,
                additional_monthly,
                additional_years: 0,
                total_monthly: planned_monthly + additional_monthly,
                new_timeline: remaining_years,
                timeline_impact: 0,
                difficulty: Difficulty::Medium,
            }
        }
        ScenarioKind::ExtendTimeline => {
            let additional_years = whole_years(contribution_years / 2.0)?;
            CatchUpScenario {
                kind,
                additional_monthly: 0.0,
                additional_years,
                total_monthly: planned_monthly,
                new_timeline: extended_timeline(remaining_years, additional_years)?,
                timeline_impact: additional_years,
                difficulty: Difficulty::Low,
            }
        }
        ScenarioKind::Hybrid => {
            let additional_monthly = (per_month * HYBRID_MONTHLY_SHARE).ceil();
            let additional_years = whole_years(contribution_years * HYBRID_TIMELINE_SHARE)?;
            CatchUpScenario {
                kind,
                additional_monthly,
                additional_years,
                total_monthly: planned_monthly + additional_monthly,
                new_timeline: extended_timeline(remaining_years, additional_years)?,
                // Scored as if the timeline were untouched.
                timeline_impact: 0,
                difficulty: Difficulty::Medium,
            }
        }
    };
    Ok(scenario)
}

/// Rounds a fractional year count up, rejecting counts `u32` cannot hold.
fn whole_years(years: f64) -> Result<u32, PlannerError> {
    let whole = years.ceil();
    if !whole.is_finite() || whole < 0.0 || whole > u32::MAX as f64 {
        return Err(PlannerError::invalid(format!(
            "catch-up extension of {years} years is out of range"
        )));
    }
    Ok(whole as u32)
}

fn extended_timeline(remaining_years: u32, additional_years: u32) -> Result<u32, PlannerError> {
    remaining_years
        .checked_add(additional_years)
        .ok_or_else(|| PlannerError::invalid("extended catch-up timeline is out of range"))
}

fn project_scenario(
    scenario: CatchUpScenario,
    goal: &GoalDetails,
    market: &MarketAssumptions,
) -> Result<ScenarioProjection, PlannerError> {
    let projection = calculate_variable_returns(
        goal.current_savings,
        scenario.total_monthly,
        market.historical_slice(scenario.new_timeline),
    )?;
    let success_probability = calculate_success_probability(projection.final_value, goal.target_amount);
    let score = strategy_score(success_probability, &scenario, projection.growth_ratio());

    Ok(ScenarioProjection {
        scenario,
        projection,
        success_probability,
        score,
    })
}

fn strategy_score(success_probability: u32, scenario: &CatchUpScenario, growth_ratio: f64) -> f64 {
    let success_weight = success_probability as f64 * 40.0;
    let difficulty_weight = (3.0 - scenario.difficulty.score() as f64) * 20.0;
    let timeline_weight = if scenario.timeline_impact > 0 {
        10.0 / scenario.timeline_impact as f64 * 20.0
    } else {
        20.0
    };
    let growth_weight = growth_ratio * 20.0;
    success_weight + difficulty_weight + timeline_weight + growth_weight
}

fn select_recommendation(scenarios: &[ScenarioProjection]) -> Recommendation {
    let mut best = &scenarios[0];
    for candidate in &scenarios[1..] {
        if candidate.score > best.score {
            best = candidate;
        }
    }
    Recommendation {
        kind: best.scenario.kind,
        scenario: best.scenario,
        projected_final_value: best.projection.final_value,
        success_probability: best.success_probability,
        score: best.score,
    }
}
