mod catch_up;
mod engine;
mod error;
mod expenses;
pub mod explainer;
mod market;
mod stats;
mod types;

pub use catch_up::{
    MAX_CATCH_UP_YEARS, MAX_MISSED_MONTHS, calculate_catch_up_strategy, calculate_catch_up_strategy_with, calculate_success_probability,
};
pub use engine::calculate_variable_returns;
pub use error::PlannerError;
pub use expenses::{adjust_for_life_expenses, adjust_for_life_expenses_with};
pub use market::{ASSUMED_CATCH_UP_RETURN, CANONICAL_HISTORICAL_RETURNS, MarketAssumptions};
pub use stats::{geometric_mean, population_std_dev};
pub use types::{
    AdjustedTimeline, BenchmarkComparison, CatchUpOutcome, CatchUpPlan, CatchUpScenario,
    Difficulty, ExpenseAdjustment, ExpenseCategory, ExpenseStrategy, Feasibility,
    FinancialProfile, GoalDetails, LifeExpense, LifeExpenseAdjustment, MissedImpact,
    PerformanceSummary, ProjectionResult, Recommendation, ScenarioKind, ScenarioProjection,
    TimelineDelay, YearlyProjectionPoint,
};
