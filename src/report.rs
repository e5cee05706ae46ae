//! Terminal rendering for the CLI commands.

use crate::combiner::{CombineReport, ServiceOutcome};
use crate::query::CostsOverview;
use colored::Colorize;

pub struct ReportRenderer;

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Combine outcome: one line per service plus totals.
    pub fn render_combine(&self, report: &CombineReport, json_output: bool) {
        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
            );
            return;
        }

        println!(
            "\n{} {} ({} to {})",
            "Period:".bold(),
            report.period.label.cyan(),
            report.period.start_date,
            report.period.end_date
        );

        for entry in &report.services {
            let label = format!("{:<16}", entry.service.to_string());
            match &entry.outcome {
                ServiceOutcome::Collected { records, skipped } => {
                    let mut line = format!("{} {} records", label, records);
                    if !skipped.is_empty() {
                        line.push_str(&format!(", {} skipped", skipped.len()));
                    }
                    println!("  {}", line.green());
                }
                ServiceOutcome::Empty => {
                    println!("  {} {}", label, "no resources".dimmed());
                }
                ServiceOutcome::Failed { reason } => {
                    println!("  {} {} ({})", label, "failed".red(), reason);
                }
            }
        }

        println!(
            "\n{} {} records -> {}",
            "Total:".bold(),
            report.records,
            report.dataset_path.display()
        );
    }

    /// Dashboard overview: per-service totals, trend, top resources.
    pub fn render_overview(&self, label: &str, overview: &CostsOverview, json_output: bool) {
        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(overview).unwrap_or_else(|_| "{}".to_string())
            );
            return;
        }

        if let Some(error) = &overview.error {
            println!("{} {}", "Error:".red().bold(), error);
            return;
        }

        println!("\n{} {}", "Cost report for".bold(), label.cyan());
        println!("{}", "=".repeat(50));

        for (service, cost) in &overview.service_costs {
            println!("  {:<24} {}", service, format!("${:.2}", cost).yellow());
        }

        println!("{}", "-".repeat(50));
        println!(
            "  {:<24} {}",
            "Total",
            format!("${:.2}", overview.summary.total_cost).yellow().bold()
        );
        println!(
            "  {:<24} {} (${:.2})",
            "Most expensive",
            overview.summary.most_expensive_service.name.cyan(),
            overview.summary.most_expensive_service.cost
        );

        if !overview.monthly_trend.months.is_empty() {
            println!("\n{}", "Monthly trend".bold());
            for (month, cost) in overview
                .monthly_trend
                .months
                .iter()
                .zip(&overview.monthly_trend.costs)
            {
                println!("  {:<12} ${:.2}", month, cost);
            }
        }

        if !overview.top_resources.is_empty() {
            println!("\n{}", "Top resources".bold());
            for resource in &overview.top_resources {
                let name = if resource.resource_name.is_empty() {
                    "-"
                } else {
                    &resource.resource_name
                };
                println!(
                    "  {:<40} {:<16} ${:.2}",
                    name,
                    resource.service.to_string(),
                    resource.cost_usd
                );
            }
        }
    }
}
