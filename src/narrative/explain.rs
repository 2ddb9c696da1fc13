use serde::Serialize;

use super::{Narrator, format_currency};
use crate::core::explainer::{
    self, CompoundInterestBreakdown, CostOfWaiting, DcaIllustration, ExplainerProfile,
    InflationImpact,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationFocus {
    #[default]
    Compound,
    Dca,
    Inflation,
    Timing,
}

impl ExplanationFocus {
    pub const ALL: [ExplanationFocus; 4] = [
        ExplanationFocus::Compound,
        ExplanationFocus::Dca,
        ExplanationFocus::Inflation,
        ExplanationFocus::Timing,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "compound" => Some(Self::Compound),
            "dca" => Some(Self::Dca),
            "inflation" => Some(Self::Inflation),
            "timing" => Some(Self::Timing),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Compound => "compound",
            Self::Dca => "dca",
            Self::Inflation => "inflation",
            Self::Timing => "timing",
        }
    }
}

/// Numbers behind one concept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "concept", content = "figures", rename_all = "lowercase")]
pub enum ConceptDetails {
    Compound(CompoundInterestBreakdown),
    Dca(DcaIllustration),
    Inflation(InflationImpact),
    Timing(CostOfWaiting),
}

impl ConceptDetails {
    pub fn compute(focus: ExplanationFocus, profile: &ExplainerProfile) -> Self {
        match focus {
            ExplanationFocus::Compound => {
                Self::Compound(explainer::explain_compound_interest(profile))
            }
            ExplanationFocus::Dca => Self::Dca(explainer::illustrate_dollar_cost_averaging(
                profile.monthly_foundation,
            )),
            ExplanationFocus::Inflation => {
                Self::Inflation(explainer::project_inflation_impact(profile))
            }
            ExplanationFocus::Timing => Self::Timing(explainer::cost_of_waiting(profile)),
        }
    }

    pub fn focus(&self) -> ExplanationFocus {
        match self {
            Self::Compound(_) => ExplanationFocus::Compound,
            Self::Dca(_) => ExplanationFocus::Dca,
            Self::Inflation(_) => ExplanationFocus::Inflation,
            Self::Timing(_) => ExplanationFocus::Timing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub concept: ExplanationFocus,
    pub main_explanation: String,
    pub action_message: String,
    pub details: ConceptDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveExplanation {
    pub focus: ExplanationFocus,
    pub primary: Explanation,
    pub supporting: Vec<Explanation>,
    pub overall_message: String,
    pub next_steps: Vec<String>,
}

/// Primary explanation for `focus` plus the other three concepts as support.
pub fn comprehensive_explanation<N: Narrator + ?Sized>(
    narrator: &N,
    profile: &ExplainerProfile,
    focus: ExplanationFocus,
) -> ComprehensiveExplanation {
    let primary = narrator.explanation(&ConceptDetails::compute(focus, profile), profile);
    let supporting = ExplanationFocus::ALL
        .iter()
        .filter(|&&f| f != focus)
        .map(|&f| narrator.explanation(&ConceptDetails::compute(f, profile), profile))
        .collect();

    let monthly = format_currency(profile.monthly_foundation);
    let dream = &profile.dream_name;
    ComprehensiveExplanation {
        focus,
        primary,
        supporting,
        overall_message: format!(
            "Your financial strategy isn't just about numbers - it's about making your {dream} inevitable. Time, consistency, and smart growth work together to turn your {monthly} monthly Foundation into lasting wealth."
        ),
        next_steps: vec![
            format!("Set up automatic {monthly} monthly investments"),
            format!(
                "Open a high-yield account for your {} Dream bucket",
                format_currency(profile.monthly_dream)
            ),
            "Review and increase contributions annually".to_string(),
            format!("Track progress toward your {dream} milestone"),
        ],
    }
}

pub(super) fn plain_explanation(
    details: &ConceptDetails,
    profile: &ExplainerProfile,
) -> Explanation {
    let (main_explanation, action_message) = match details {
        ConceptDetails::Compound(b) => compound_text(b, profile),
        ConceptDetails::Dca(d) => dca_text(d, profile),
        ConceptDetails::Inflation(i) => inflation_text(i, profile),
        ConceptDetails::Timing(c) => timing_text(c, profile),
    };
    Explanation {
        concept: details.focus(),
        main_explanation,
        action_message,
        details: details.clone(),
    }
}

fn compound_text(b: &CompoundInterestBreakdown, p: &ExplainerProfile) -> (String, String) {
    let main = format!(
        "Your {} monthly Foundation payment will grow to {} by {} because each dollar earns friends. \
         After {} years you'll have contributed {}, but compounding adds {} more. \
         That's how your {} savings also become your security.",
        format_currency(p.monthly_foundation),
        format_currency(b.final_amount),
        p.retirement_age,
        b.years,
        format_currency(b.total_contributions),
        format_currency(b.growth_from_compounding),
        p.dream_name,
    );
    let action = format!(
        "Every month you delay costs you about {} in retirement money. \
         Your future {}-owning self will thank you for starting today.",
        format_currency(b.monthly_cost_of_delay),
        p.dream_name,
    );
    (main, action)
}

fn dca_text(d: &DcaIllustration, p: &ExplainerProfile) -> (String, String) {
    let monthly = format_currency(d.monthly_amount);
    let main = format!(
        "Your {monthly} monthly investment buys more shares when markets crash and fewer when they boom. \
         Over {} months you'd pay an average of ${:.2} per share, so you never buy everything at the worst price \
         and your {} fund grows steadily regardless of market drama.",
        d.months.len(),
        d.average_cost_per_share,
        p.dream_name,
    );
    let action = format!(
        "Market timing is impossible, but dollar cost averaging is automatic. \
         Your {monthly}/month removes emotion and gets you closer to that {} regardless of market headlines.",
        p.dream_name,
    );
    (main, action)
}

fn inflation_text(i: &InflationImpact, p: &ExplainerProfile) -> (String, String) {
    let main = format!(
        "Your {} {} will cost {} in {} years due to inflation. \
         That's like the {} getting {} more expensive just for waiting. \
         Your {} monthly Dream bucket needs to grow, not just sit in savings, to keep up.",
        format_currency(i.current_cost),
        p.dream_name,
        format_currency(i.future_cost),
        i.years,
        p.dream_name,
        format_currency(i.inflation_cost),
        format_currency(p.monthly_dream),
    );
    let action = match i.needed_return {
        Some(rate) => format!(
            "Inflation never sleeps, so your {} money shouldn't either. \
             Every dollar that earns less than {:.1}% annually is losing a race against time.",
            p.dream_name,
            rate * 100.0,
        ),
        None => format!(
            "Inflation never sleeps, so your {} money shouldn't either. Give it a timeline and let it grow.",
            p.dream_name,
        ),
    };
    (main, action)
}

fn timing_text(c: &CostOfWaiting, p: &ExplainerProfile) -> (String, String) {
    let monthly = format_currency(p.monthly_foundation);
    let main = match c.delayed.first() {
        Some(five) => format!(
            "Starting your {monthly} Foundation payments at {} gets you {} by retirement. \
             Wait just {} years and you lose {} - that's {} {}s worth of wealth that time could have created for you.",
            p.current_age,
            format_currency(c.start_now),
            five.delay_years,
            format_currency(five.lost_growth),
            five.dreams_lost,
            p.dream_name,
        ),
        None => format!(
            "Starting your {monthly} Foundation payments at {} gets you {} by retirement.",
            p.current_age,
            format_currency(c.start_now),
        ),
    };
    let action = format!(
        "Every day you wait costs you about ${:.0} in future wealth. \
         Your {}-year-old self has a superpower your {}-year-old self will never have: more time.",
        c.daily_cost_of_waiting,
        p.current_age,
        p.current_age.saturating_add(5),
    );
    (main, action)
}
