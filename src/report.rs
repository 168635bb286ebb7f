//! Daily sales report
//!
//! Composes ledger rollups into a report and asks the completion client
//! for a narrative. When the client yields nothing the narrative falls
//! back to one of two fixed lines keyed on today's count vs target, so a
//! report always carries a summary sentence.

use crate::config::Config;
use crate::llm::CompletionClient;
use crate::store::{today_label, DailySummary, ProductRollup, PurchaseLedger, StoreError, TrendPoint};

const REPORT_WINDOW_DAYS: u32 = 7;
const TOP_PRODUCT_LIMIT: u32 = 3;

pub const BELOW_TARGET_NOTE: &str =
    "Sales are below target. Consider follow-ups on warm leads.";
pub const ON_TRACK_NOTE: &str =
    "Sales are on track. Keep momentum with demos and follow-ups.";

#[derive(Debug, Clone)]
pub struct DailyReport {
    pub date: String,
    pub summary: DailySummary,
    pub alerts: Vec<String>,
    pub top_products: Vec<ProductRollup>,
    pub trend: Vec<TrendPoint>,
    pub narrative: String,
}

/// Two independent checks; both may fire for the same day.
pub fn check_alerts(today_count: i64, low_threshold: i64) -> Vec<String> {
    let mut alerts = Vec::new();
    if today_count == 0 {
        alerts.push("No sales recorded today".to_string());
    }
    if today_count < low_threshold {
        alerts.push(format!(
            "Sales below threshold: {today_count} < {low_threshold}"
        ));
    }
    alerts
}

pub fn fallback_narrative(count: i64, target: i64) -> &'static str {
    if count < target {
        BELOW_TARGET_NOTE
    } else {
        ON_TRACK_NOTE
    }
}

pub fn build_daily_report(
    ledger: &PurchaseLedger,
    client: &dyn CompletionClient,
    config: &Config,
) -> Result<DailyReport, StoreError> {
    let date = today_label();
    let summary = ledger.daily_summary(&date)?;
    let trend = ledger.trend(REPORT_WINDOW_DAYS)?;
    let top_products = ledger.top_products(REPORT_WINDOW_DAYS, TOP_PRODUCT_LIMIT)?;

    let target = config.monitoring.daily_sales_target;
    let alerts = check_alerts(summary.count, config.monitoring.low_sales_threshold);

    let product_names: Vec<&str> = top_products.iter().map(|p| p.product.as_str()).collect();
    let user_prompt = format!(
        "Sales count: {}\nRevenue: {:.2}\nAverage deal: {:.2}\nTarget: {}\nTop products: {:?}",
        summary.count, summary.revenue, summary.average, target, product_names
    );
    let system_prompt = "You are a sales analytics assistant. Provide a short summary with \
         trends and 1-2 recommendations.";

    let narrative = client
        .complete(system_prompt, &user_prompt)
        .unwrap_or_else(|| fallback_narrative(summary.count, target).to_string());

    Ok(DailyReport {
        date,
        summary,
        alerts,
        top_products,
        trend,
        narrative,
    })
}
