use std::{collections::HashMap, path::PathBuf, str::FromStr, sync::Arc};

use chrono::NaiveDate;

use super::{
    args::{parse_month, ParsedArgs},
    output, CliContext,
};
use crate::{
    core::services::{PeriodSummary, SummaryRequest, SummaryService},
    domain::{category::is_known, parse_calendar_date, EntryKind, NewEntry},
    engine::{aggregate_by_work_period, PeriodAggregate},
    errors::{FinanceError, Result},
    period::{RangeSelector, WORK_PERIOD_DAYS},
    storage::{EntryRepository, JsonEntryStore},
    utils::build_info::build_info,
};

const MOST_USED_SHOWN: usize = 5;

pub type CommandHandler = fn(&mut CliContext, &[String]) -> Result<()>;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Commands keyed by name, remembering registration order for help output.
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
            order: Vec::new(),
        };
        for entry in definitions() {
            registry.register(entry);
        }
        registry
    }
}

impl CommandRegistry {
    pub fn register(&mut self, entry: CommandEntry) {
        if !self.commands.contains_key(entry.name) {
            self.order.push(entry.name);
        }
        self.commands.insert(entry.name, entry);
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.order.iter().filter_map(|name| self.commands.get(name))
    }
}

fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Totals, ratios, categories, work periods and insights",
            "summary [--file PATH] [--range week|month|year] [--month YYYY-MM]",
            cmd_summary,
        ),
        CommandEntry::new(
            "periods",
            "11-day work periods of a month, or the most recent ones",
            "periods [--file PATH] [--month YYYY-MM | --recent N]",
            cmd_periods,
        ),
        CommandEntry::new(
            "add",
            "Record an entry",
            "add [--file PATH] <gasto|ingreso|inversion> <category> <amount> <YYYY-MM-DD> [description]",
            cmd_add,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
    ]
}

fn store_for(context: &CliContext, args: &ParsedArgs) -> JsonEntryStore {
    let path = match args.flag("file") {
        Some(path) => PathBuf::from(path),
        None => context.config.store_path(&context.base_dir),
    };
    JsonEntryStore::with_clock(path, Arc::clone(&context.clock))
}

fn reference_month(context: &CliContext, args: &ParsedArgs) -> Result<NaiveDate> {
    match args.flag("month") {
        Some(raw) => parse_month(raw),
        None => Ok(context.clock.today()),
    }
}

fn cmd_summary(context: &mut CliContext, raw: &[String]) -> Result<()> {
    let args = ParsedArgs::parse(raw)?;
    args.expect_flags(&["file", "range", "month"])?;
    let selector = match args.flag("range") {
        Some(raw) => RangeSelector::from_str(raw)?,
        None => RangeSelector::Month,
    };
    let reference = reference_month(context, &args)?;
    let today = context.clock.today();

    let snapshot = store_for(context, &args).list()?;
    let summary = SummaryService::summarize(
        &snapshot,
        &SummaryRequest::new(selector, reference),
        today,
    );
    render_summary(context, selector, &summary);

    if selector == RangeSelector::Year {
        output::section("Months");
        for month in SummaryService::yearly_overview(&snapshot.entries, today) {
            output::info(format!(
                "{}  income {}  expense {}  invested {}",
                month.month.start.format("%Y-%m"),
                output::money(month.totals.income, &context.config.currency),
                output::money(month.totals.expense, &context.config.currency),
                output::money(month.totals.investment, &context.config.currency),
            ));
        }
    }
    Ok(())
}

fn render_summary(context: &CliContext, selector: RangeSelector, summary: &PeriodSummary) {
    let currency = context.config.currency.as_str();
    output::section(format!("Summary ({selector}) {}", summary.range));
    if summary.rejected_records > 0 {
        output::warning(format!(
            "{} stored record(s) could not be read and were skipped",
            summary.rejected_records
        ));
    }

    let current = &summary.current_period;
    output::info(format!(
        "Current work period {} (day {} of {WORK_PERIOD_DAYS})",
        current.period, summary.current_period_day
    ));
    render_period(current, currency);

    // Work periods overflow the range, so they can hold entries even when it is empty.
    let active: Vec<&PeriodAggregate> = summary
        .work_periods
        .iter()
        .filter(|period| !period.is_empty())
        .take(context.config.recent_periods)
        .collect();
    if !active.is_empty() {
        output::section("Work periods");
        for period in active {
            render_period(period, currency);
        }
    }

    if summary.is_empty() {
        output::info("No entries yet for this range.");
        return;
    }

    let totals = &summary.totals;
    output::section("Totals");
    output::info(format!("Income      : {}", output::money(totals.income, currency)));
    output::info(format!("Expenses    : {}", output::money(totals.expense, currency)));
    output::info(format!("Investments : {}", output::money(totals.investment, currency)));
    output::info(format!("Balance     : {}", output::money(totals.balance, currency)));
    output::info(format!("Entries     : {}", totals.entry_count));

    let ratios = &summary.ratios;
    output::section("Ratios");
    output::info(format!(
        "Avg income/day  : {}",
        output::money(ratios.avg_income_per_day, currency)
    ));
    output::info(format!(
        "Avg expense/day : {}",
        output::money(ratios.avg_expense_per_day, currency)
    ));
    output::info(format!("Savings rate    : {:.1}%", ratios.savings_rate));
    output::info(format!("Investment eff. : {:.1}%", ratios.investment_efficiency));

    output::section("Categories");
    for kind in EntryKind::ALL {
        for aggregate in summary.categories.for_kind(kind).iter().take(3) {
            output::info(format!(
                "{kind:<10} {:<24} {} ({:.1}%)",
                aggregate.category,
                output::money(aggregate.amount, currency),
                aggregate.percentage_of_type_total
            ));
        }
    }

    output::section("Most used categories");
    for usage in summary.most_used.iter().take(MOST_USED_SHOWN) {
        output::info(format!(
            "{:<10} {:<24} {} entries",
            usage.kind, usage.category, usage.count
        ));
    }

    if !summary.findings.is_empty() || !summary.report_findings.is_empty() {
        output::section("Insights");
        for finding in summary.findings.iter().chain(&summary.report_findings) {
            output::finding(finding);
        }
    }
}

fn render_period(aggregate: &PeriodAggregate, currency: &str) {
    output::info(format!(
        "{}  income {}  invested {}  roi {:.1}%  ({} entries)",
        aggregate.period,
        output::money(aggregate.totals.income, currency),
        output::money(aggregate.totals.investment, currency),
        aggregate.roi,
        aggregate.totals.entry_count
    ));
}

fn cmd_periods(context: &mut CliContext, raw: &[String]) -> Result<()> {
    let args = ParsedArgs::parse(raw)?;
    args.expect_flags(&["file", "month", "recent"])?;
    if let Some(count) = args.flag("recent") {
        if args.flag("month").is_some() {
            return Err(FinanceError::InvalidInput(
                "`--recent` and `--month` cannot be combined".into(),
            ));
        }
        let count = parse_count(count)?;
        return recent_periods(context, &args, count);
    }

    let anchor = reference_month(context, &args)?;
    let snapshot = store_for(context, &args).list()?;

    output::section(format!("Work periods for {}", anchor.format("%Y-%m")));
    for aggregate in aggregate_by_work_period(&snapshot.entries, anchor) {
        render_period(&aggregate, &context.config.currency);
    }
    Ok(())
}

fn parse_count(raw: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| FinanceError::InvalidInput(format!("expected a period count, got `{raw}`")))
}

fn recent_periods(context: &CliContext, args: &ParsedArgs, count: usize) -> Result<()> {
    let snapshot = store_for(context, args).list()?;
    let history =
        SummaryService::work_period_history(&snapshot.entries, context.clock.today(), count);

    output::section(format!("Last {count} work periods"));
    if history.is_empty() {
        output::info("No entries in these work periods.");
    }
    for aggregate in &history {
        render_period(aggregate, &context.config.currency);
    }
    Ok(())
}

fn cmd_add(context: &mut CliContext, raw: &[String]) -> Result<()> {
    let args = ParsedArgs::parse(raw)?;
    args.expect_flags(&["file"])?;
    let (kind, category, amount, date, description) = match args.positional.as_slice() {
        [kind, category, amount, date, rest @ ..] => {
            (kind, category, amount, date, (!rest.is_empty()).then(|| rest.join(" ")))
        }
        _ => {
            return Err(FinanceError::InvalidInput(
                "usage: add <type> <category> <amount> <YYYY-MM-DD> [description]".into(),
            ))
        }
    };

    let kind = EntryKind::from_str(kind)?;
    let amount: f64 = amount
        .parse()
        .map_err(|_| FinanceError::InvalidInput(format!("`{amount}` is not a number")))?;
    let date = parse_calendar_date(date)
        .ok_or_else(|| FinanceError::InvalidInput(format!("`{date}` is not YYYY-MM-DD")))?;
    if !is_known(kind, category) {
        output::warning(format!("`{category}` is not a standard {kind} category"));
    }

    let mut entry = NewEntry::new(kind, category.as_str(), amount, date);
    if let Some(description) = description {
        entry = entry.with_description(description);
    }
    let store = store_for(context, &args);
    let created = store.create(entry)?;
    output::success(format!(
        "Recorded {} in {}",
        created.display_label(),
        store.path().display()
    ));
    Ok(())
}

fn cmd_version(_context: &mut CliContext, _args: &[String]) -> Result<()> {
    let info = build_info();
    output::section(format!("Finance Core {}", info.version));
    output::info(format!("  Build hash : {} ({})", info.git_hash, info.git_status));
    output::info(format!("  Built at   : {}", info.built_at));
    output::info(format!("  Target     : {} ({})", info.target, info.profile));
    output::info(format!("  Rustc      : {}", info.rustc));
    Ok(())
}

fn cmd_help(_context: &mut CliContext, args: &[String]) -> Result<()> {
    let registry = CommandRegistry::default();
    if let Some(name) = args.first() {
        let entry = registry
            .get(name)
            .ok_or_else(|| FinanceError::InvalidInput(format!("unknown command `{name}`")))?;
        output::info(format!("{}\n  usage: {}", entry.description, entry.usage));
        return Ok(());
    }
    output::section("Commands");
    for entry in registry.iter() {
        output::info(format!("{:<8} {}", entry.name, entry.description));
        output::info(format!("         usage: {}", entry.usage));
    }
    Ok(())
}
