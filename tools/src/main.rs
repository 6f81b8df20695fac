//! growth-runner: headless cohort/projection pipeline runner.
//!
//! Usage:
//!   growth-runner --data sales.csv --cac 100 --investment 10000 \
//!       --cpv 10 --margin 0.3 --months 12
//!   growth-runner --data sales.csv --multiplier 1.5 --db metrics.db
//!   growth-runner --data sales.csv --json > report.json

use anyhow::{bail, Context, Result};
use growthlens_core::{
    cohort::RETENTION_PERIODS, AnalysisConfig, AnalysisEngine, AnalysisReport, DateInput,
    FinancialParams, MemoryMetricsStore, SaleRecord, SqliteMetricsStore, YearMonth,
};
use std::env;

// Header aliases accepted for the three required columns. Column mapping
// beyond this lives in upstream tooling, not here.
const CUSTOMER_COLUMNS: &[&str] = &["customer_id", "cpf", "id", "customer"];
const DATE_COLUMNS: &[&str] = &["sale_date", "date", "purchase_date", "data_compra"];
const VALUE_COLUMNS: &[&str] = &["sale_value", "value", "purchase_value", "valor_compra"];

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data = arg_str(&args, "--data", "sales.csv");
    let months = parse_arg(&args, "--months", 12u32);
    let window = parse_arg(&args, "--window", 3usize);
    let multiplier = parse_arg(&args, "--multiplier", 1.0f64);
    let db = opt_arg(&args, "--db");
    let json_out = args.iter().any(|a| a == "--json");

    let params = FinancialParams {
        cac: parse_arg(&args, "--cac", 100.0),
        cpv: parse_arg(&args, "--cpv", 10.0),
        monthly_investment: parse_arg(&args, "--investment", 10_000.0),
        margin: parse_arg(&args, "--margin", 0.3),
        monetization_investment: parse_arg(&args, "--monetization", 0.0),
        projection_months: months,
    };

    let config = AnalysisConfig {
        history_window: window,
        retention_multiplier: multiplier,
        average_ticket: opt_arg(&args, "--ticket")
            .map(|t| t.parse().context("--ticket must be a number"))
            .transpose()?,
    };

    // The anchor month defaults to the current calendar month; the engine
    // itself never reads the clock.
    let anchor = match opt_arg(&args, "--anchor") {
        Some(raw) => match YearMonth::parse(&raw) {
            Some(ym) => ym,
            None => bail!("--anchor must be YYYY-MM, got '{raw}'"),
        },
        None => YearMonth::from_date(chrono::Local::now().date_naive()),
    };

    if !json_out {
        println!("GrowthLens — growth-runner");
        println!("  data:       {data}");
        println!("  anchor:     {anchor}");
        println!("  cac:        {:.2}", params.cac);
        println!("  investment: {:.2}", params.monthly_investment);
        println!("  cpv:        {:.2}", params.cpv);
        println!("  margin:     {:.1}%", params.margin * 100.0);
        println!("  months:     {months}");
        println!();
    }

    let records = read_sales_csv(&data)?;
    log::info!("loaded {} sale records from {data}", records.len());

    let report = match db {
        Some(path) => {
            let store = SqliteMetricsStore::open(&path)?;
            let mut engine = AnalysisEngine::new(config, store);
            let report = engine.analyze_and_store(&records, &params, anchor)?;
            log::info!("dataset metrics persisted to {path}");
            report
        }
        None => {
            let engine = AnalysisEngine::new(config, MemoryMetricsStore::new());
            engine.analyze(&records, &params, anchor)?
        }
    };

    if json_out {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !report.warnings.is_empty() {
        println!(
            "WARNING: {} of {} rows skipped or partially used (run with RUST_LOG=debug for detail)",
            report.warnings.len(),
            records.len()
        );
        println!();
    }

    print_cohort_table(&report);
    print_projection_table(&report);
    print_kpi_summary(&report);

    Ok(())
}

fn read_sales_csv(path: &str) -> Result<Vec<SaleRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("cannot open {path}"))?;

    let headers = reader.headers()?.clone();
    let customer_col = find_column(&headers, CUSTOMER_COLUMNS)
        .context("no customer id column (expected one of: customer_id, cpf, id, customer)")?;
    let date_col = find_column(&headers, DATE_COLUMNS)
        .context("no sale date column (expected one of: sale_date, date, purchase_date)")?;
    let value_col = find_column(&headers, VALUE_COLUMNS)
        .context("no sale value column (expected one of: sale_value, value, purchase_value)")?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let customer_id = row.get(customer_col).unwrap_or("").to_string();
        if customer_id.is_empty() {
            log::warn!("row {} has no customer id, skipped", records.len() + 1);
            continue;
        }

        let raw_date = row.get(date_col).unwrap_or("");
        // Spreadsheet exports sometimes carry dates as day serials.
        let sale_date = match raw_date.parse::<f64>() {
            Ok(serial) => DateInput::Serial(serial),
            Err(_) => DateInput::Text(raw_date.to_string()),
        };

        let sale_value = row.get(value_col).and_then(|v| v.parse::<f64>().ok());

        records.push(SaleRecord {
            customer_id,
            sale_date,
            sale_value,
        });
    }
    Ok(records)
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.trim().to_ascii_lowercase().as_str()))
}

fn print_cohort_table(report: &AnalysisReport) {
    println!("=== COHORT RETENTION ===");
    print!("  {:<8} {:>9}", "month", "customers");
    for p in 1..=RETENTION_PERIODS {
        print!(" {:>6}", format!("M{p}"));
    }
    println!();

    for cohort in &report.cohorts {
        print!("  {:<8} {:>9}", cohort.month.to_string(), cohort.initial_customers);
        for p in 1..=RETENTION_PERIODS {
            match cohort.retention_rates.get(&p) {
                Some(rate) => print!(" {:>5.1}%", rate * 100.0),
                None => print!(" {:>6}", "-"),
            }
        }
        println!();
    }
    println!();
}

fn print_projection_table(report: &AnalysisReport) {
    println!("=== PROJECTIONS ===");
    println!(
        "  {:<8} {:>6} {:>8} {:>6} {:>12} {:>12} {:>12} {:>8} {:>7} {:>10}",
        "month", "new", "retained", "total", "revenue", "cost", "profit", "roi", "roas", "ltv"
    );
    for p in &report.projections {
        println!(
            "  {:<8} {:>6} {:>8} {:>6} {:>12.2} {:>12.2} {:>12.2} {:>7.1}% {:>7.2} {:>10.2}",
            p.month.to_string(),
            p.new_customers,
            p.retained_customers,
            p.total_customers,
            p.revenue,
            p.total_cost,
            p.profit,
            p.roi_pct,
            p.roas,
            p.ltv,
        );
    }
    println!();
}

fn print_kpi_summary(report: &AnalysisReport) {
    println!("=== SUMMARY ===");
    println!("  cohorts:          {}", report.cohorts.len());
    println!("  customers:        {}", report.metrics.total_customers);
    println!("  total revenue:    {:.2}", report.metrics.total_revenue);
    println!("  avg ticket:       {:.2}", report.summary.average_ticket);
    println!("  retention (M1):   {:.1}%", report.summary.retention_rate * 100.0);
    println!(
        "  repeat purchase:  {:.1}%",
        report.summary.repeat_purchase_rate * 100.0
    );

    if let Some(last) = report.projections.last() {
        let total_profit: f64 = report.projections.iter().map(|p| p.profit).sum();
        println!("  horizon:          {} months", report.projections.len());
        println!("  final customers:  {}", last.total_customers);
        println!("  cumulative profit: {total_profit:.2}");
        println!("  ltv:              {:.2}", last.ltv);
    }
}

fn arg_str(args: &[String], flag: &str, default: &str) -> String {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
        .unwrap_or_else(|| default.to_string())
}

fn opt_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
