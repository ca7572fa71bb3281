mod common;

use assert_cmd::Command;
use common::scratch_dir;
use finance_core::{
    core::{Clock, SystemClock},
    period::work_period_containing,
};
use predicates::{prelude::PredicateBooleanExt, str::contains};

const BIN_NAME: &str = "finance_core_cli";

fn cli() -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("FINANCE_CORE_HOME", scratch_dir());
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands() {
    cli()
        .arg("help")
        .assert()
        .success()
        .stdout(contains("summary").and(contains("periods")).and(contains("add")));
}

#[test]
fn version_prints_build_metadata() {
    cli()
        .arg("version")
        .assert()
        .success()
        .stdout(contains("Finance Core").and(contains("Build hash")));
}

#[test]
fn add_then_report_a_month() {
    let file = scratch_dir().join("entries.json");
    let file_arg = file.to_string_lossy().to_string();

    for args in [
        ["ingreso", "Ventas", "1000", "2024-06-06"],
        ["gasto", "Carne", "300", "2024-06-07"],
        ["inversion", "Bonos", "200", "2024-06-10"],
    ] {
        cli()
            .arg("add")
            .args(["--file", file_arg.as_str()])
            .args(args)
            .assert()
            .success()
            .stdout(contains("Recorded"));
    }

    cli()
        .args(["summary", "--file", file_arg.as_str(), "--month", "2024-06"])
        .assert()
        .success()
        .stdout(contains("1000.00 USD").and(contains("Insights")));

    cli()
        .args(["periods", "--file", file_arg.as_str(), "--month", "2024-06"])
        .assert()
        .success()
        .stdout(contains("30/05 - 09/06").and(contains("roi -100.0%")));
}

#[test]
fn empty_month_still_lists_overflow_work_periods() {
    let file = scratch_dir().join("entries.json");
    let file_arg = file.to_string_lossy().to_string();
    cli()
        .args(["add", "--file", file_arg.as_str(), "ingreso", "Ventas", "250", "2024-05-30"])
        .assert()
        .success();

    // May 30 is outside June, but inside June's first work period.
    cli()
        .args(["summary", "--file", file_arg.as_str(), "--month", "2024-06"])
        .assert()
        .success()
        .stdout(
            contains("No entries yet")
                .and(contains("Work periods"))
                .and(contains("30/05 - 09/06"))
                .and(contains("Current work period")),
        );
}

#[test]
fn recent_periods_reach_back_from_today() {
    let file = scratch_dir().join("entries.json");
    let file_arg = file.to_string_lossy().to_string();
    let today = SystemClock.today();
    let current = work_period_containing(today);
    let older = current.previous().previous();

    for day in [today, older.start] {
        cli()
            .args(["add", "--file", file_arg.as_str(), "gasto", "Gas", "20"])
            .arg(day.format("%Y-%m-%d").to_string())
            .assert()
            .success();
    }

    cli()
        .args(["periods", "--file", file_arg.as_str(), "--recent", "8"])
        .assert()
        .success()
        .stdout(
            contains("Last 8 work periods")
                .and(contains(current.to_string()))
                .and(contains(older.to_string()))
                .and(contains(current.previous().to_string()).not()),
        );
}

#[test]
fn summary_shows_day_of_period_and_most_used() {
    let file = scratch_dir().join("entries.json");
    let file_arg = file.to_string_lossy().to_string();
    let today = SystemClock.today();
    let day = work_period_containing(today)
        .day_of(today)
        .expect("today is inside its own period");

    cli()
        .args(["add", "--file", file_arg.as_str(), "gasto", "Gas", "20"])
        .arg(today.format("%Y-%m-%d").to_string())
        .assert()
        .success();

    cli()
        .args(["summary", "--file", file_arg.as_str()])
        .assert()
        .success()
        .stdout(
            contains(format!("(day {day} of 11)"))
                .and(contains("Most used categories"))
                .and(contains("1 entries")),
        );
}

#[test]
fn unknown_command_fails() {
    cli()
        .arg("export")
        .assert()
        .failure()
        .stderr(contains("unknown command"));
}

#[test]
fn bad_month_fails() {
    cli()
        .args(["periods", "--month", "June"])
        .assert()
        .failure()
        .stderr(contains("YYYY-MM"));
}
