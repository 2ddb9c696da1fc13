use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use super::{
    CatchUpPayload, ExplainPayload, GoalDetailsPayload, LifeExpensesPayload, ProjectionPayload,
    adjust_life_expenses, build_catch_up_request, build_explainer_request,
    build_life_expenses_request, build_projection_request, explain, plan_catch_up, project,
    run_http_server,
};
use crate::core::MarketAssumptions;
use crate::narrative::ExplanationFocus;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFocus {
    Compound,
    Dca,
    Inflation,
    Timing,
}

impl From<CliFocus> for ExplanationFocus {
    fn from(value: CliFocus) -> Self {
        match value {
            CliFocus::Compound => ExplanationFocus::Compound,
            CliFocus::Dca => ExplanationFocus::Dca,
            CliFocus::Inflation => ExplanationFocus::Inflation,
            CliFocus::Timing => ExplanationFocus::Timing,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dream-planner",
    about = "Savings projections, life-expense adjustments and catch-up plans for a savings goal"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "JSON file overriding the historical return table and catch-up rate"
    )]
    assumptions: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compound a principal and monthly contribution over a return series.
    Project {
        #[arg(long)]
        principal: Option<f64>,
        #[arg(long)]
        monthly_contribution: Option<f64>,
        #[arg(
            long,
            value_delimiter = ',',
            allow_hyphen_values = true,
            help = "Comma-separated annual returns as fractions, e.g. 0.07,-0.12"
        )]
        returns: Option<Vec<f64>>,
        #[arg(
            long,
            conflicts_with = "returns",
            help = "Use the first N years of the historical table (default 30)"
        )]
        historical_years: Option<u32>,
    },
    /// Size a plan for recovering missed monthly contributions.
    CatchUp {
        #[arg(long, allow_hyphen_values = true)]
        missed_months: i64,
        #[arg(long, allow_hyphen_values = true)]
        remaining_years: i64,
        #[arg(long)]
        target_amount: Option<f64>,
        #[arg(long)]
        current_savings: Option<f64>,
        #[arg(long)]
        planned_monthly: Option<f64>,
        #[arg(long)]
        dream_title: Option<String>,
        #[arg(long)]
        current_age: Option<u32>,
    },
    /// Adjust a savings timeline for the expenses listed in a JSON file.
    LifeExpenses {
        #[arg(long, help = "JSON file with `timeline` and `expenses`")]
        input: PathBuf,
    },
    /// Explain compounding, dollar-cost averaging, inflation or timing.
    Explain {
        #[arg(long, value_enum, default_value_t = CliFocus::Compound)]
        focus: CliFocus,
        #[arg(long)]
        monthly_foundation: Option<f64>,
        #[arg(long)]
        current_age: Option<u32>,
        #[arg(long)]
        retirement_age: Option<u32>,
        #[arg(long)]
        dream_name: Option<String>,
        #[arg(long)]
        dream_amount: Option<f64>,
        #[arg(long)]
        dream_timeline: Option<u32>,
        #[arg(long)]
        monthly_dream: Option<f64>,
    },
    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn load_assumptions(path: Option<&PathBuf>) -> Result<MarketAssumptions, String> {
    match path {
        Some(path) => MarketAssumptions::from_json_file(path).map_err(|e| e.to_string()),
        None => Ok(MarketAssumptions::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

pub async fn run(cli: Cli) -> Result<(), String> {
    let assumptions = load_assumptions(cli.assumptions.as_ref())?;

    match cli.command {
        Command::Project {
            principal,
            monthly_contribution,
            returns,
            historical_years,
        } => {
            let payload = ProjectionPayload {
                principal,
                monthly_contribution,
                annual_returns: returns,
                historical_years,
            };
            let request = build_projection_request(payload, &assumptions)?;
            print_json(&project(request).map_err(|e| e.to_string())?)
        }
        Command::CatchUp {
            missed_months,
            remaining_years,
            target_amount,
            current_savings,
            planned_monthly,
            dream_title,
            current_age,
        } => {
            let payload = CatchUpPayload {
                missed_months: Some(missed_months),
                remaining_years: Some(remaining_years),
                goal_details: GoalDetailsPayload {
                    target_amount,
                    current_savings,
                    planned_monthly_contribution: planned_monthly,
                    dream_title,
                    current_age,
                },
            };
            let request = build_catch_up_request(payload)?;
            print_json(&plan_catch_up(&request, &assumptions).map_err(|e| e.to_string())?)
        }
        Command::LifeExpenses { input } => {
            let raw = fs::read_to_string(&input)
                .map_err(|e| format!("failed to read {}: {e}", input.display()))?;
            let payload: LifeExpensesPayload = serde_json::from_str(&raw)
                .map_err(|e| format!("invalid life-expenses JSON: {e}"))?;
            let (profile, expenses) = build_life_expenses_request(payload)?;
            let response = adjust_life_expenses(&profile, &expenses, &assumptions)
                .map_err(|e| e.to_string())?;
            print_json(&response)
        }
        Command::Explain {
            focus,
            monthly_foundation,
            current_age,
            retirement_age,
            dream_name,
            dream_amount,
            dream_timeline,
            monthly_dream,
        } => {
            let payload = ExplainPayload {
                monthly_foundation,
                current_age,
                retirement_age,
                dream_name,
                dream_amount,
                dream_timeline,
                monthly_dream,
                focus: Some(ExplanationFocus::from(focus).label().to_string()),
            };
            let (profile, focus) = build_explainer_request(payload)?;
            print_json(&explain(&profile, focus))
        }
        Command::Serve { port } => run_http_server(port, assumptions)
            .await
            .map_err(|e| format!("server error: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_project_returns_list() {
        let cli = Cli::try_parse_from([
            "dream-planner",
            "project",
            "--principal",
            "1000",
            "--returns",
            "0.1,-0.05,0.2",
        ])
        .expect("valid args");
        match cli.command {
            Command::Project {
                principal, returns, ..
            } => {
                assert_eq!(principal, Some(1_000.0));
                assert_eq!(returns, Some(vec![0.1, -0.05, 0.2]));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn returns_conflict_with_historical_years() {
        let parsed = Cli::try_parse_from([
            "dream-planner",
            "project",
            "--returns",
            "0.1",
            "--historical-years",
            "5",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn serve_defaults_port_and_accepts_global_assumptions() {
        let cli = Cli::try_parse_from(["dream-planner", "serve", "--assumptions", "market.json"])
            .expect("valid args");
        assert_eq!(cli.assumptions, Some(PathBuf::from("market.json")));
        match cli.command {
            Command::Serve { port } => assert_eq!(port, 8080),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn explain_focus_maps_to_explanation_focus() {
        let cli = Cli::try_parse_from(["dream-planner", "explain", "--focus", "inflation"])
            .expect("valid args");
        match cli.command {
            Command::Explain { focus, .. } => {
                assert_eq!(ExplanationFocus::from(focus), ExplanationFocus::Inflation)
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn catch_up_accepts_negative_counts() {
        let cli = Cli::try_parse_from([
            "dream-planner",
            "catch-up",
            "--missed-months",
            "-3",
            "--remaining-years",
            "10",
        ])
        .expect("valid args");
        match cli.command {
            Command::CatchUp {
                missed_months,
                remaining_years,
                ..
            } => {
                assert_eq!(missed_months, -3);
                assert_eq!(remaining_years, 10);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn missing_assumptions_file_is_reported() {
        let err = load_assumptions(Some(&PathBuf::from("/nonexistent/market.json")))
            .err()
            .expect("should fail");
        assert!(err.contains("failed to read market assumptions"));
    }
}
