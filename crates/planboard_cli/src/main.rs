//! Week grid printer.
//!
//! # Responsibility
//! - Open the configured planner database and print one week of the meal
//!   plan.
//! - Select the week from an optional `YYYY-MM-DD` argument; without one the
//!   current week is shown, and a malformed date is a usage error.

use chrono::NaiveDate;
use clap::Parser;
use log::info;
use planboard_core::calendar::{format_date, parse_date, week_of};
use planboard_core::{
    init_from_config, open_db, MealPlanService, PlannerConfig, SqliteMealPlanRepository,
    SqliteRecipeRepository, WeekPlan,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "planboard", about = "Print one week of the meal plan")]
struct Cli {
    /// Any day of the week to show, as YYYY-MM-DD (defaults to this week)
    #[arg(value_parser = parse_week_date)]
    week: Option<NaiveDate>,

    /// Database file (overrides PLANBOARD_DB_PATH and the config file)
    #[arg(long)]
    db: Option<PathBuf>,
}

fn parse_week_date(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("`{value}` is not a YYYY-MM-DD date"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("planboard: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = PlannerConfig::from_env()?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    init_from_config(&config)?;

    let conn = open_db(&config.database_path)?;
    let service = MealPlanService::new(
        SqliteMealPlanRepository::try_new(&conn)?,
        SqliteRecipeRepository::try_new(&conn)?,
    );

    let week = week_of(cli.week)?;
    let plan = service.week_plan(week)?;
    info!(
        "event=cli_week module=cli status=ok meals={}",
        plan.meal_count()
    );
    print!("{}", render_week(&plan));
    Ok(())
}

fn render_week(plan: &WeekPlan) -> String {
    let mut out = format!(
        "Week {} .. {}\n",
        format_date(plan.week.start()),
        format_date(plan.week.end())
    );
    for day in &plan.days {
        out.push_str(&format!(
            "{:<9} {}\n",
            day.slot.day_name(),
            format_date(day.date())
        ));
        if day.is_empty() {
            out.push_str("    -\n");
        }
        for meal in &day.meals {
            let marker = if meal.linked_recipe().is_some() { "*" } else { " " };
            out.push_str(&format!("  {marker} {}\n", meal.display_text));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{render_week, Cli};
    use chrono::NaiveDate;
    use clap::{CommandFactory, Parser};
    use planboard_core::{DayPlan, Week, WeekPlan};
    use std::path::PathBuf;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn week_argument_is_optional() {
        let cli = Cli::try_parse_from(["planboard"]).unwrap();
        assert_eq!(cli.week, None);
        assert_eq!(cli.db, None);

        let cli = Cli::try_parse_from(["planboard", "2024-03-06", "--db", "/tmp/p.db"]).unwrap();
        assert_eq!(cli.week, NaiveDate::from_ymd_opt(2024, 3, 6));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/p.db")));
    }

    #[test]
    fn malformed_week_argument_is_a_usage_error() {
        assert!(Cli::try_parse_from(["planboard", "bad-date"]).is_err());
        assert!(Cli::try_parse_from(["planboard", "2024-13-40"]).is_err());
    }

    #[test]
    fn extra_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["planboard", "2024-03-06", "2024-03-13"]).is_err());
    }

    #[test]
    fn empty_week_renders_seven_placeholder_rows() {
        let week = Week::containing(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()).unwrap();
        let plan = WeekPlan {
            week,
            days: week
                .days()
                .into_iter()
                .map(|slot| DayPlan {
                    slot,
                    meals: Vec::new(),
                })
                .collect(),
        };

        let rendered = render_week(&plan);
        assert!(rendered.starts_with("Week 2024-03-04 .. 2024-03-10\n"));
        assert_eq!(rendered.matches("    -\n").count(), 7);
        assert!(rendered.contains("Monday    2024-03-04"));
    }
}
