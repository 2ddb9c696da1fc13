//! Human-readable insights built from the engine's structured results.
//!
//! The engine never produces prose; everything a person reads comes from a
//! [`Narrator`]. [`PlainNarrator`] is the stock wording.

mod explain;

use serde::Serialize;

use crate::core::{
    CatchUpOutcome, CatchUpPlan, Difficulty, ExpenseStrategy, Feasibility, LifeExpenseAdjustment,
    ProjectionResult, Recommendation, ScenarioKind, TimelineDelay, explainer::ExplainerProfile,
};

pub use explain::{
    ComprehensiveExplanation, ConceptDetails, Explanation, ExplanationFocus,
    comprehensive_explanation,
};

const HIGH_VOLATILITY: f64 = 0.15;
const SHORT_DELAY_MONTHS: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInsights {
    pub primary_message: String,
    pub timeline_impact: String,
    pub encouragement: String,
    pub key_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyText {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub impact: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeExpenseInsights {
    pub primary_message: String,
    pub action_required: bool,
    pub timeline_impact: String,
    pub encouragement: String,
    pub top_strategies: Vec<StrategyText>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchUpInsights {
    pub primary_message: String,
    pub action_required: bool,
    pub timeline_impact: String,
    pub encouragement: String,
    pub confidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyCard {
    pub name: &'static str,
    pub description: String,
    pub pros: Vec<&'static str>,
    pub cons: Vec<&'static str>,
    pub feasibility: Feasibility,
}

pub trait Narrator {
    fn projection(&self, result: &ProjectionResult) -> ProjectionInsights;

    fn expense_strategy(&self, strategy: &ExpenseStrategy) -> StrategyText;

    fn life_expenses(&self, adjustment: &LifeExpenseAdjustment) -> LifeExpenseInsights;

    fn catch_up(&self, outcome: &CatchUpOutcome, dream_title: &str) -> CatchUpInsights;

    fn strategy_cards(&self, plan: &CatchUpPlan, dream_title: &str) -> Vec<StrategyCard>;

    fn recommendation_reasoning(&self, recommendation: &Recommendation) -> String;

    fn explanation(&self, details: &ConceptDetails, profile: &ExplainerProfile) -> Explanation;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainNarrator;

impl Narrator for PlainNarrator {
    fn projection(&self, result: &ProjectionResult) -> ProjectionInsights {
        let growth_pct = percent(result.growth_ratio());
        let best = percent(result.performance.best_year.annual_return);
        let worst = percent(result.performance.worst_year.annual_return);
        let ahead_days = if result.benchmark.ahead_of_naive {
            result.benchmark.day_difference
        } else {
            None
        };

        let (primary_message, timeline_impact) = match ahead_days {
            Some(days) => (
                format!(
                    "Based on typical market patterns, you'll likely reach your goal {days:.0} days earlier than projected."
                ),
                format!("{days:.0} days ahead"),
            ),
            None => (
                "Market volatility adds some uncertainty, but you're still well on track for your goal."
                    .to_string(),
                "On track".to_string(),
            ),
        };

        let encouragement = if result.performance.volatility > HIGH_VOLATILITY {
            format!(
                "Even with market ups and downs (your best year: +{best}%, worst: {worst}%), consistent investing built {growth_pct}% growth on your contributions!"
            )
        } else {
            format!(
                "Steady market conditions helped your money grow {growth_pct}% beyond your contributions. Consistency pays off!"
            )
        };

        ProjectionInsights {
            primary_message,
            timeline_impact,
            encouragement,
            key_insights: vec![
                format!(
                    "Your money grew by {} beyond contributions",
                    format_currency(result.total_growth)
                ),
                format!(
                    "Market volatility of {:.1}% didn't prevent strong growth",
                    result.performance.volatility * 100.0
                ),
                "Dollar-cost averaging smoothed out the market's ups and downs".to_string(),
            ],
        }
    }

    fn expense_strategy(&self, strategy: &ExpenseStrategy) -> StrategyText {
        match strategy {
            ExpenseStrategy::IncreaseIncome { monthly_amount } => StrategyText {
                kind: "increase_income".to_string(),
                description: format!(
                    "Consider increasing income by ${monthly_amount:.0}/month"
                ),
                impact: "Gets you back on track for your original timeline".to_string(),
                difficulty: Difficulty::Medium,
            },
            ExpenseStrategy::ExtendTimeline { months } => StrategyText {
                kind: "extend_timeline".to_string(),
                description: format!("Extend your timeline by {months:.0} months"),
                impact: "Reduces pressure while still achieving your goal".to_string(),
                difficulty: Difficulty::Low,
            },
            ExpenseStrategy::CategoryAdvice { category, advice } => StrategyText {
                kind: category.label().to_string(),
                description: advice.to_string(),
                impact: format!("Could reduce {} impact by 15-25%", category.label()),
                difficulty: Difficulty::Low,
            },
        }
    }

    fn life_expenses(&self, adjustment: &LifeExpenseAdjustment) -> LifeExpenseInsights {
        let timeline = &adjustment.adjusted_timeline;
        let dream = &timeline.profile.dream_title;

        let (primary_message, timeline_impact) = match timeline.timeline_delay {
            _ if timeline.goal_achievable => (
                format!(
                    "Life expenses will impact your {dream}, but you can still achieve it with minor adjustments."
                ),
                "No delay".to_string(),
            ),
            TimelineDelay::Months { months } if months.round() <= SHORT_DELAY_MONTHS => (
                format!(
                    "Major expenses delay your {dream} by about {:.0} months, but it's still very achievable.",
                    months.round()
                ),
                delay_text(timeline.timeline_delay),
            ),
            TimelineDelay::Months { .. } => (
                "Life expenses significantly impact your timeline, but smart strategies can get you back on track."
                    .to_string(),
                delay_text(timeline.timeline_delay),
            ),
            TimelineDelay::OnTrack => (
                format!("Your {dream} stays on track despite these expenses."),
                "No delay".to_string(),
            ),
            TimelineDelay::Unreachable => (
                format!(
                    "These expenses absorb all of your monthly savings, so your {dream} needs a new plan to stay within reach."
                ),
                delay_text(timeline.timeline_delay),
            ),
        };

        LifeExpenseInsights {
            primary_message,
            action_required: !timeline.goal_achievable,
            timeline_impact,
            encouragement: format!(
                "Life happens, and that's okay! The key is adjusting your strategy, not abandoning your {dream}."
            ),
            top_strategies: adjustment
                .strategies
                .iter()
                .take(3)
                .map(|s| self.expense_strategy(s))
                .collect(),
        }
    }

    fn catch_up(&self, outcome: &CatchUpOutcome, dream_title: &str) -> CatchUpInsights {
        match outcome {
            CatchUpOutcome::NotNeeded => CatchUpInsights {
                primary_message: "No catch-up strategy needed".to_string(),
                action_required: false,
                timeline_impact: "On track".to_string(),
                encouragement: "You're on track with your savings!".to_string(),
                confidence: None,
            },
            CatchUpOutcome::NoViableScenario { missed_months } => CatchUpInsights {
                primary_message: format!(
                    "Missing {missed_months} months can't be turned into a catch-up plan until a monthly contribution is set."
                ),
                action_required: true,
                timeline_impact: "Unknown until contributions resume".to_string(),
                encouragement: format!(
                    "Setting even a small monthly amount is the first step back toward your {dream_title}."
                ),
                confidence: None,
            },
            CatchUpOutcome::Planned(plan) => {
                let rec = &plan.recommendation;
                let gap_months = if rec.scenario.total_monthly > 0.0 {
                    (plan.missed_impact.total_deficit / rec.scenario.total_monthly).round()
                } else {
                    0.0
                };
                let timeline_impact = if rec.scenario.timeline_impact > 0 {
                    format!("{} months longer", rec.scenario.timeline_impact * 12)
                } else {
                    "Back on original track".to_string()
                };
                CatchUpInsights {
                    primary_message: format!(
                        "Missing {} months of savings created a {gap_months:.0}-month gap, but you can catch up with the right strategy.",
                        plan.missed_impact.missed_months
                    ),
                    action_required: true,
                    timeline_impact,
                    encouragement: format!(
                        "Life interrupts everyone's plans! The important thing is you're getting back on track toward your {dream_title}."
                    ),
                    confidence: Some(format!(
                        "{}% confidence in achieving your goal with this approach",
                        rec.success_probability
                    )),
                }
            }
        }
    }

    fn strategy_cards(&self, plan: &CatchUpPlan, dream_title: &str) -> Vec<StrategyCard> {
        vec![
            StrategyCard {
                name: "Increase Monthly Savings",
                description: format!(
                    "Add {} to monthly contributions",
                    format_currency(plan.monthly_deficit)
                ),
                pros: vec!["Keeps original timeline", "Builds stronger savings habit"],
                cons: vec!["Requires budget adjustments", "Higher monthly commitment"],
                feasibility: plan.increase_feasibility,
            },
            StrategyCard {
                name: "Extend Timeline",
                description: format!("Delay {dream_title} by 1-2 years"),
                pros: vec!["No budget pressure", "More time for opportunities"],
                cons: vec!["Delayed gratification", "Inflation impact"],
                feasibility: Feasibility::High,
            },
            StrategyCard {
                name: "Hybrid Approach",
                description: "Small monthly increase + slight timeline extension".to_string(),
                pros: vec!["Balanced solution", "Manageable adjustments"],
                cons: vec!["Still requires some sacrifice"],
                feasibility: Feasibility::High,
            },
        ]
    }

    fn recommendation_reasoning(&self, recommendation: &Recommendation) -> String {
        let probability = recommendation.success_probability;
        match recommendation.kind {
            ScenarioKind::MonthlyIncrease => format!(
                "Increasing monthly contributions is the most direct path back to your original timeline with {probability}% confidence."
            ),
            ScenarioKind::ExtendTimeline => format!(
                "Extending your timeline reduces pressure while maintaining a {probability}% success rate with your current savings rate."
            ),
            ScenarioKind::Hybrid => "A balanced approach that requires modest increases while providing timeline flexibility - the best of both worlds.".to_string(),
        }
    }

    fn explanation(&self, details: &ConceptDetails, profile: &ExplainerProfile) -> Explanation {
        explain::plain_explanation(details, profile)
    }
}

/// `$1.2M`, `$12k` or `$123`.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    if abs >= 1_000_000.0 {
        format!("{sign}${:.1}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{sign}${:.0}k", (abs / 1_000.0).round())
    } else {
        format!("{sign}${:.0}", abs.round())
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.0}", fraction * 100.0)
}

fn delay_text(delay: TimelineDelay) -> String {
    match delay.months().map(f64::round) {
        Some(rounded) if rounded > 0.0 => format!("{rounded:.0} months"),
        Some(_) => "No delay".to_string(),
        None => "Unreachable at the current savings rate".to_string(),
    }
}
