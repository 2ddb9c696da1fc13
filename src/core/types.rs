use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    pub current_age: u32,
    pub target_age: u32,
    pub current_savings: f64,
    pub monthly_contribution: f64,
    pub target_amount: f64,
    pub dream_title: String,
}

impl FinancialProfile {
    pub fn horizon_years(&self) -> u32 {
        self.target_age.saturating_sub(self.current_age)
    }
}

impl Default for FinancialProfile {
    fn default() -> Self {
        Self {
            current_age: 30,
            target_age: 65,
            current_savings: 0.0,
            monthly_contribution: 1_000.0,
            target_amount: 500_000.0,
            dream_title: "retirement".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjectionPoint {
    pub year: u32,
    pub value: f64,
    #[serde(rename = "return")]
    pub annual_return: f64,
    pub cumulative_contributions: f64,
    pub growth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub average_return: f64,
    pub volatility: f64,
    /// `None` when the principal is zero and growth has no base to compound from.
    pub cagr: Option<f64>,
    pub best_year: YearlyProjectionPoint,
    pub worst_year: YearlyProjectionPoint,
}

/// How the variable-return path compares with compounding every contribution
/// at the geometric-mean return for the whole horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub naive_value: f64,
    pub ahead_of_naive: bool,
    pub day_difference: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub final_value: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
    pub performance: PerformanceSummary,
    pub yearly_breakdown: Vec<YearlyProjectionPoint>,
    pub benchmark: BenchmarkComparison,
}

impl ProjectionResult {
    pub fn years(&self) -> usize {
        self.yearly_breakdown.len()
    }

    pub fn growth_ratio(&self) -> f64 {
        if self.total_contributions.abs() <= f64::EPSILON {
            return 0.0;
        }
        self.total_growth / self.total_contributions
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Childcare,
    College,
    Eldercare,
    Medical,
    Other,
}

impl ExpenseCategory {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "childcare" => Self::Childcare,
            "college" => Self::College,
            "eldercare" => Self::Eldercare,
            "medical" => Self::Medical,
            _ => Self::Other,
        }
    }

    /// Share of the raw monthly cost that competes with discretionary savings.
    pub fn savings_factor(self) -> f64 {
        match self {
            Self::Childcare => 0.8,
            Self::College => 0.6,
            Self::Eldercare => 0.9,
            Self::Medical => 0.7,
            Self::Other => 0.8,
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Self::Childcare => "Consider dependent care FSA for tax savings",
            Self::College => "Explore 529 plans and education tax credits",
            Self::Eldercare => "Look into long-term care insurance options",
            Self::Medical => "Maximize HSA contributions for tax advantages",
            Self::Other => "Plan ahead to minimize impact on long-term goals",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Childcare => "childcare",
            Self::College => "college",
            Self::Eldercare => "eldercare",
            Self::Medical => "medical",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LifeExpense {
    pub category: ExpenseCategory,
    /// Defaults to the profile's current age when absent.
    pub start_age: Option<u32>,
    pub duration: u32,
    pub monthly_cost: f64,
    pub one_time_cost: f64,
    pub description: String,
}

impl Default for LifeExpense {
    fn default() -> Self {
        Self {
            category: ExpenseCategory::Other,
            start_age: None,
            duration: 1,
            monthly_cost: 0.0,
            one_time_cost: 0.0,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseAdjustment {
    #[serde(rename = "type")]
    pub category: ExpenseCategory,
    pub start_age: u32,
    pub duration: u32,
    pub monthly_reduction: f64,
    pub total_impact: f64,
    pub one_time_cost: f64,
    pub description: String,
    pub strategy: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TimelineDelay {
    OnTrack,
    Months { months: f64 },
    /// A shortfall exists but the adjusted savings rate is zero.
    Unreachable,
}

impl TimelineDelay {
    pub fn months(self) -> Option<f64> {
        match self {
            Self::OnTrack => Some(0.0),
            Self::Months { months } => Some(months),
            Self::Unreachable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedTimeline {
    #[serde(flatten)]
    pub profile: FinancialProfile,
    pub adjusted_monthly_savings: f64,
    pub projected_value: f64,
    pub goal_achievable: bool,
    pub shortfall: f64,
    pub timeline_delay: TimelineDelay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ExpenseStrategy {
    IncreaseIncome {
        monthly_amount: f64,
    },
    ExtendTimeline {
        months: f64,
    },
    CategoryAdvice {
        category: ExpenseCategory,
        advice: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeExpenseAdjustment {
    pub original_timeline: FinancialProfile,
    pub adjusted_timeline: AdjustedTimeline,
    pub expense_impacts: Vec<ExpenseAdjustment>,
    pub total_impact: f64,
    pub strategies: Vec<ExpenseStrategy>,
    pub adjusted_projection: ProjectionResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDetails {
    pub target_amount: f64,
    pub current_savings: f64,
    pub planned_monthly_contribution: f64,
    pub dream_title: String,
    pub current_age: u32,
}

impl Default for GoalDetails {
    fn default() -> Self {
        Self {
            target_amount: 500_000.0,
            current_savings: 50_000.0,
            planned_monthly_contribution: 1_000.0,
            dream_title: "goal".to_string(),
            current_age: 35,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

impl Difficulty {
    pub fn score(self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feasibility {
    High,
    Medium,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioKind {
    MonthlyIncrease,
    ExtendTimeline,
    Hybrid,
}

impl ScenarioKind {
    /// Evaluation order; ties in scoring keep the earlier entry.
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::MonthlyIncrease,
        ScenarioKind::ExtendTimeline,
        ScenarioKind::Hybrid,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchUpScenario {
    pub kind: ScenarioKind,
    pub additional_monthly: f64,
    pub additional_years: u32,
    pub total_monthly: f64,
    pub new_timeline: u32,
    pub timeline_impact: u32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedImpact {
    pub missed_months: u32,
    pub missed_contributions: f64,
    pub lost_growth: f64,
    pub total_deficit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProjection {
    pub scenario: CatchUpScenario,
    pub projection: ProjectionResult,
    pub success_probability: u32,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub kind: ScenarioKind,
    pub scenario: CatchUpScenario,
    pub projected_final_value: f64,
    pub success_probability: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchUpPlan {
    pub missed_impact: MissedImpact,
    pub remaining_years: u32,
    pub monthly_deficit: f64,
    pub increase_feasibility: Feasibility,
    pub scenarios: Vec<ScenarioProjection>,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CatchUpOutcome {
    NotNeeded,
    /// The planned monthly contribution is zero or negative, so no scenario
    /// can be sized from it.
    NoViableScenario {
        missed_months: u32,
    },
    Planned(CatchUpPlan),
}

impl CatchUpOutcome {
    pub fn catch_up_needed(&self) -> bool {
        !matches!(self, Self::NotNeeded)
    }

    pub fn plan(&self) -> Option<&CatchUpPlan> {
        match self {
            Self::Planned(plan) => Some(plan),
            _ => None,
        }
    }
}
