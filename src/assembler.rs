//! # Montagem de Insights
//!
//! Converte um [`PredictionResult`] + [`ParameterSet`] numa lista
//! ordenada de [`Insight`]s com texto em inglês gerado por templates
//! fixos. Mesma entrada → mesmo texto, byte a byte.
//!
//! ## Ordem por intent
//!
//! ```text
//! Forecast  : headline → opportunity (meses out–dez) → risk (trend < 0)
//! Inventory : headline → risk (surge > 15% e horizonte < 30 dias) → breakdown (surge > 0)
//! Shipping  : headline → risk (atrasos ≥ 50% ou carga de pico > 1) → breakdown (melhores)
//! Sentiment : headline → risk (compound ≤ −0.05) → breakdown (notas)
//! Warehouse : headline → opportunity (economia de tempo > 0)
//! General   : help
//! ```
//!
//! Os limiares são avaliados sempre nessa ordem e a lista nunca é
//! reordenada por magnitude.

use std::collections::BTreeSet;

use chrono::Month;
use serde_json::json;

use crate::core::{Insight, InsightKind, Intent, LabeledValue, ParameterSet, PredictionResult};
use crate::error::{AssemblyError, PredictorError};

/// Quantos itens de uma lista rotulada aparecem no texto.
const LIST_PREVIEW: usize = 3;

const STOCKOUT_SURGE_THRESHOLD: f64 = 0.15;
const STOCKOUT_DAYS_THRESHOLD: f64 = 30.0;
const HIGH_PRIORITY_SURGE: f64 = 0.20;
const LATE_SHARE_THRESHOLD: f64 = 0.5;
const SENTIMENT_POSITIVE: f64 = 0.05;
const SENTIMENT_NEGATIVE: f64 = -0.05;

/// Gerador determinístico de insights.
#[derive(Clone, Copy, Debug, Default)]
pub struct InsightAssembler;

impl InsightAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Monta os insights de um resultado.
    ///
    /// # Erros
    ///
    /// Métrica ausente ou com forma inesperada, ou lista vazia.
    pub fn assemble(
        &self,
        intent: Intent,
        params: &ParameterSet,
        result: &PredictionResult,
    ) -> Result<Vec<Insight>, AssemblyError> {
        let insights = match intent {
            Intent::Forecast => forecast(params, result)?,
            Intent::Inventory => inventory(result)?,
            Intent::Shipping => shipping(result)?,
            Intent::Sentiment => sentiment(result)?,
            Intent::Warehouse => warehouse(result)?,
            Intent::General => vec![self.help()],
        };
        if insights.is_empty() {
            return Err(AssemblyError::Empty(intent.label().to_string()));
        }
        Ok(insights)
    }

    /// Insight estático do intent `General`.
    pub fn help(&self) -> Insight {
        let text = "I can help you with supply chain questions:\n\n\
            • **Forecasting**: demand predictions, seasonal trends\n\
            • **Inventory**: stock recommendations, sufficiency checks\n\
            • **Shipping**: courier performance, delay analysis\n\
            • **Sentiment**: customer review analysis\n\
            • **Warehouse**: efficiency and optimization\n\n\
            Try asking something like:\n\
            • \"What will Q4 demand look like?\"\n\
            • \"If demand increases by 20%, what stock adjustments are needed?\"\n\
            • \"How are customer reviews trending?\"";
        let capabilities: Vec<&str> = Intent::ALL
            .iter()
            .filter(|i| **i != Intent::General)
            .map(|i| i.label())
            .collect();
        Insight::new(
            Intent::General,
            InsightKind::Help,
            text,
            json!({ "capabilities": capabilities }),
        )
    }

    /// Insight único que substitui os normais quando o predictor falhou.
    pub fn unavailable(&self, intent: Intent, error: &PredictorError) -> Insight {
        let text = match error {
            PredictorError::Unavailable { .. } => format!(
                "**{} is temporarily unavailable**\n\n\
                 The model behind this answer could not be loaded. \
                 Other questions can still be answered.",
                capitalize(intent.capability())
            ),
            PredictorError::Failed { .. } => format!(
                "**{} could not produce a result**\n\n\
                 Please try rephrasing your question or adjusting the time window.",
                capitalize(intent.capability())
            ),
        };
        Insight::new(
            intent,
            InsightKind::Unavailable,
            text,
            json!({ "predictor": error.predictor(), "capability": intent.capability() }),
        )
    }

    /// Resposta de falha quando nenhum modelo carregou.
    pub fn outage(&self) -> Insight {
        Insight::new(
            Intent::General,
            InsightKind::Error,
            "**No forecasting models are available right now.**\n\n\
             The service is running but could not load any of its models. \
             Please try again later.",
            json!({ "models_loaded": 0 }),
        )
    }

    /// Pedido de desculpas genérico da resposta de falha.
    pub fn apology(&self) -> Insight {
        Insight::new(
            Intent::General,
            InsightKind::Error,
            "**Sorry, something went wrong while preparing this answer.**\n\n\
             Please try rephrasing your question.",
            json!({}),
        )
    }
}

fn forecast(params: &ParameterSet, r: &PredictionResult) -> Result<Vec<Insight>, AssemblyError> {
    let avg = r.value("avg_demand")?;
    let trend = r.value("trend")?;
    let peak = r.value("peak_demand")?;
    let low = r.value("low_demand")?;
    let days = r.value("horizon_days")?;
    let preview = r.series("forecast")?;
    let period_avg = r.optional_value("period_avg")?;

    let direction = if trend > 0.0 {
        "Increasing"
    } else if trend < 0.0 {
        "Decreasing"
    } else {
        "Flat"
    };

    let mut text = format!(
        "**Demand Forecast (Next {days:.0} Days)**\n\n\
         • Average demand index: {avg:.2}\n\
         • Trend: {direction} ({:.2} points)\n\
         • Peak demand expected: {peak:.2}\n\
         • Lowest demand expected: {low:.2}",
        trend.abs()
    );
    if let Some(period) = period_avg {
        let label = match params.quarter {
            Some(q) => format!("{q} average"),
            None => "Selected months average".to_string(),
        };
        text.push_str(&format!("\n• {label}: {period:.2}"));
    }

    let mut data = json!({
        "avg_demand": avg,
        "trend": trend,
        "peak_demand": peak,
        "low_demand": low,
        "horizon_days": days,
        "forecast": preview,
    });
    if let Some(period) = period_avg {
        data["period_avg"] = json!(period);
    }

    let mut insights = vec![Insight::new(Intent::Forecast, InsightKind::Headline, text, data)];

    if params.touches_peak_season() {
        let uplift = r.value("expected_uplift")?;
        insights.push(Insight::new(
            Intent::Forecast,
            InsightKind::Opportunity,
            format!(
                "**Seasonal Analysis**\n\n\
                 • Requested months run {:+.0}% against the annual average\n\
                 • October to December is peak season, with December driven by holiday shopping\n\
                 • Recommend preparing inventory 2-3 weeks in advance",
                uplift * 100.0
            ),
            json!({ "months": peak_months(&params.months), "expected_uplift": uplift }),
        ));
    }

    if trend < 0.0 {
        insights.push(Insight::new(
            Intent::Forecast,
            InsightKind::Risk,
            format!(
                "**Demand Decline Risk**\n\n\
                 • Demand is projected to fall {:.2} points over the next {days:.0} days\n\
                 • Review open purchase orders to avoid overstock",
                trend.abs()
            ),
            json!({ "trend": trend, "horizon_days": days }),
        ));
    }

    Ok(insights)
}

fn inventory(r: &PredictionResult) -> Result<Vec<Insight>, AssemblyError> {
    let surge = r.value("surge_pct")?;
    let days = r.value("horizon_days")?;
    let current = r.value("current_demand")?;
    let predicted = r.labeled("predicted_demand")?;
    let investment = r.value("total_investment")?;
    let cover = r.value("stock_cover_days")?;

    let pct = surge * 100.0;
    let action = if surge > 0.0 {
        let priority = if surge >= HIGH_PRIORITY_SURGE { "High" } else { "Medium" };
        format!("increase stock by {pct:.0}% (Priority: {priority})")
    } else if surge < 0.0 {
        format!("reduce stock by {:.0}%", pct.abs())
    } else {
        "hold current stock levels".to_string()
    };

    let lines: Vec<String> = predicted
        .iter()
        .map(|c| format!("• **{}**: {:.0} units projected, {action}", c.label, c.value))
        .collect();
    let text = format!(
        "**Stock Adjustment Recommendations** (for a {pct:+.0}% demand change over {days:.0} days)\n\n\
         {}\n\n\
         Total investment needed: ₹{investment:.0}",
        lines.join("\n")
    );
    let mut insights = vec![Insight::new(
        Intent::Inventory,
        InsightKind::Headline,
        text,
        json!({
            "surge_pct": surge,
            "horizon_days": days,
            "current_demand": current,
            "predicted_demand": predicted,
            "total_investment": investment,
        }),
    )];

    if surge > STOCKOUT_SURGE_THRESHOLD && days < STOCKOUT_DAYS_THRESHOLD {
        let risky = labels(predicted, LIST_PREVIEW);
        insights.push(Insight::new(
            Intent::Inventory,
            InsightKind::Risk,
            format!(
                "**Stockout Risk Assessment**\n\n\
                 • High risk categories: {}\n\
                 • Current stock covers about {cover:.0} days at the projected rate\n\
                 • Recommend safety stock of 30% above predicted demand",
                risky.join(", ")
            ),
            json!({ "high_risk_categories": risky, "stock_cover_days": cover }),
        ));
    }

    if surge > 0.0 {
        let sufficient = cover >= days;
        let (verdict, action) = if sufficient {
            ("SUFFICIENT", "No, monitor inventory levels weekly")
        } else {
            ("INSUFFICIENT", "Yes, begin procurement within 2 weeks")
        };
        insights.push(Insight::new(
            Intent::Inventory,
            InsightKind::Breakdown,
            format!(
                "**Inventory Sufficiency Check**\n\n\
                 Based on a predicted {pct:.0}% demand increase:\n\
                 • Current inventory: {verdict} for the next {days:.0} days (covers about {cover:.0} days)\n\
                 • Action required: {action}"
            ),
            json!({ "sufficient": sufficient, "action_needed": !sufficient, "stock_cover_days": cover }),
        ));
    }

    Ok(insights)
}

fn shipping(r: &PredictionResult) -> Result<Vec<Insight>, AssemblyError> {
    let avg = r.value("avg_delivery_days")?;
    let at_risk = r.labeled("at_risk")?;
    let best = r.labeled("best")?;
    let late_share = r.value("late_route_share")?;
    let peak_load = r.value("peak_load_factor")?;

    let risk_lines = if at_risk.is_empty() {
        "• No courier is slower than the median".to_string()
    } else {
        bullet_list(at_risk, |c| format!("• {}: {:.1} days avg", c.label, c.value))
    };
    let mut insights = vec![Insight::new(
        Intent::Shipping,
        InsightKind::Headline,
        format!(
            "**Shipping Delay Analysis**\n\n\
             Average delivery time: {avg:.1} days\n\n\
             **Courier Partners at Risk of Delays:**\n{risk_lines}"
        ),
        json!({ "avg_delivery_days": avg, "at_risk": at_risk }),
    )];

    if late_share >= LATE_SHARE_THRESHOLD || peak_load > 1.0 {
        let capacity = if peak_load > 1.0 {
            "capacity exceeded"
        } else {
            "within capacity"
        };
        insights.push(Insight::new(
            Intent::Shipping,
            InsightKind::Risk,
            format!(
                "**Delivery Risk**\n\n\
                 If delays persist:\n\
                 • Late delivery rate: {:.0}% of routes\n\
                 • Peak load factor: {peak_load:.2} ({capacity})\n\n\
                 **Mitigation strategies:**\n\
                 • Shift load to faster couriers\n\
                 • Add buffer time for peak season",
                late_share * 100.0
            ),
            json!({ "late_route_share": late_share, "peak_load_factor": peak_load }),
        ));
    }

    if !best.is_empty() {
        insights.push(Insight::new(
            Intent::Shipping,
            InsightKind::Breakdown,
            format!(
                "**Top Performing Couriers**\n\n{}",
                bullet_list(best, |c| format!("• {}: {:.1} days", c.label, c.value))
            ),
            json!({ "best": best }),
        ));
    }

    Ok(insights)
}

fn sentiment(r: &PredictionResult) -> Result<Vec<Insight>, AssemblyError> {
    let compound = r.value("compound")?;
    let positive = r.value("positive_pct")?;
    let negative = r.value("negative_pct")?;
    let neutral = r.value("neutral_pct")?;
    let analyzed = r.value("reviews_analyzed")?;
    let avg_rating = r.value("avg_rating")?;
    let high = r.value("high_ratings")?;
    let low = r.value("low_ratings")?;
    let month_reviews = r.value("month_reviews")?;
    let month = r.value("month")?;
    let total = r.optional_value("total_reviews")?.unwrap_or(analyzed);

    let (overall, trend) = if compound >= SENTIMENT_POSITIVE {
        ("Positive", "Customer sentiment is generally positive")
    } else if compound <= SENTIMENT_NEGATIVE {
        ("Negative", "Customer sentiment needs attention")
    } else {
        ("Neutral", "Customer sentiment is mixed")
    };
    let month_name = Month::try_from(month as u8)
        .map(|m| m.name())
        .unwrap_or("the selected month");

    let mut insights = vec![Insight::new(
        Intent::Sentiment,
        InsightKind::Headline,
        format!(
            "**Customer Sentiment Analysis**\n\n\
             Overall sentiment: **{overall}**\n\
             • Positive: {positive:.1}%\n\
             • Negative: {negative:.1}%\n\
             • Neutral: {neutral:.1}%\n\n\
             **Trend**: {trend}\n\
             **Compound score**: {compound:.3} (-1 to +1 scale)\n\
             • Reviews analyzed: {analyzed:.0}\n\
             • Reviews in {month_name}: {month_reviews:.0}"
        ),
        json!({
            "overall": overall,
            "compound": compound,
            "positive_pct": positive,
            "negative_pct": negative,
            "neutral_pct": neutral,
            "reviews_analyzed": analyzed,
            "month": month,
            "month_reviews": month_reviews,
        }),
    )];

    if compound <= SENTIMENT_NEGATIVE {
        insights.push(Insight::new(
            Intent::Sentiment,
            InsightKind::Risk,
            format!(
                "**Sentiment Alert**\n\n\
                 • {low:.0} low ratings (1-2 stars) need follow-up\n\
                 • Action: review common complaints and address them"
            ),
            json!({ "compound": compound, "low_ratings": low }),
        ));
    }

    let share = |n: f64| if total > 0.0 { n / total * 100.0 } else { 0.0 };
    insights.push(Insight::new(
        Intent::Sentiment,
        InsightKind::Breakdown,
        format!(
            "**Rating Breakdown**\n\n\
             • High ratings (4-5 stars): {high:.0} reviews ({:.1}%)\n\
             • Low ratings (1-2 stars): {low:.0} reviews ({:.1}%)\n\
             • Average rating: {avg_rating:.2}/5.0",
            share(high),
            share(low)
        ),
        json!({ "high_ratings": high, "low_ratings": low, "avg_rating": avg_rating }),
    ));

    Ok(insights)
}

fn warehouse(r: &PredictionResult) -> Result<Vec<Insight>, AssemblyError> {
    let avg = r.value("avg_processing_hours")?;
    let slow = r.labeled("underperforming")?;
    let fast = r.labeled("efficient")?;
    let savings_hours = r.value("time_savings_hours")?;
    let monthly_savings = r.value("monthly_cost_savings")?;

    let slow_lines = if slow.is_empty() {
        "• None, every warehouse is at or below the median".to_string()
    } else {
        bullet_list(slow, |w| format!("• {}: {:.1} hrs", w.label, w.value))
    };
    let mut insights = vec![Insight::new(
        Intent::Warehouse,
        InsightKind::Headline,
        format!(
            "**Warehouse Efficiency Analysis**\n\n\
             Average processing time: {avg:.1} hours\n\n\
             **Underperforming Warehouses:**\n{slow_lines}\n\n\
             **Top Performers:**\n{}",
            bullet_list(fast, |w| format!("• {}: {:.1} hrs", w.label, w.value))
        ),
        json!({ "avg_processing_hours": avg, "underperforming": slow, "efficient": fast }),
    )];

    if savings_hours > 0.0 {
        let mut text = format!(
            "**Optimization Recommendations**\n\n\
             • Redistribute load from slow warehouses to efficient ones\n\
             • Potential time savings: {savings_hours:.1} hours per order\n\
             • Cost reduction opportunity: ₹{monthly_savings:.0} per month"
        );
        let mut data = json!({
            "time_savings_hours": savings_hours,
            "monthly_cost_savings": monthly_savings,
        });
        if let (Some(days), Some(horizon)) = (
            r.optional_value("horizon_days")?,
            r.optional_value("horizon_cost_savings")?,
        ) {
            text.push_str(&format!(" (₹{horizon:.0} over the next {days:.0} days)"));
            data["horizon_cost_savings"] = json!(horizon);
        }
        insights.push(Insight::new(Intent::Warehouse, InsightKind::Opportunity, text, data));
    }

    Ok(insights)
}

fn bullet_list(items: &[LabeledValue], line: impl Fn(&LabeledValue) -> String) -> String {
    items
        .iter()
        .take(LIST_PREVIEW)
        .map(line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn labels(items: &[LabeledValue], n: usize) -> Vec<String> {
    items.iter().take(n).map(|c| c.label.clone()).collect()
}

fn peak_months(months: &BTreeSet<u32>) -> Vec<u32> {
    months.iter().copied().filter(|m| (10..=12).contains(m)).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Quarter;

    fn assembler() -> InsightAssembler {
        InsightAssembler::new()
    }

    fn forecast_result(trend: f64) -> PredictionResult {
        PredictionResult::new("seasonal")
            .with_value("avg_demand", 104.2)
            .with_value("trend", trend)
            .with_value("peak_demand", 131.0)
            .with_value("low_demand", 88.5)
            .with_value("horizon_days", 90.0)
            .with_series("forecast", vec![100.0, 101.0])
            .with_value("expected_uplift", 0.27)
            .with_value("period_avg", 127.0)
    }

    fn q4() -> ParameterSet {
        ParameterSet {
            months: [10, 11, 12].into_iter().collect(),
            quarter: Some(Quarter::Q4),
            ..Default::default()
        }
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn forecast_q4_with_growth() {
        let out = assembler()
            .assemble(Intent::Forecast, &q4(), &forecast_result(3.5))
            .unwrap();
        assert_eq!(kinds(&out), vec![InsightKind::Headline, InsightKind::Opportunity]);
        assert!(out.iter().all(|i| i.intent == Intent::Forecast));
        assert!(out[0].text.contains("Next 90 Days"));
        assert!(out[0].text.contains("Increasing (3.50 points)"));
        assert!(out[0].text.contains("Q4 average: 127.00"));
        assert!(out[1].text.contains("+27%"));
        assert_eq!(out[1].data["months"], json!([10, 11, 12]));
    }

    #[test]
    fn forecast_decline_adds_risk_last() {
        let out = assembler()
            .assemble(Intent::Forecast, &q4(), &forecast_result(-2.0))
            .unwrap();
        assert_eq!(
            kinds(&out),
            vec![InsightKind::Headline, InsightKind::Opportunity, InsightKind::Risk]
        );

        let plain = assembler()
            .assemble(Intent::Forecast, &ParameterSet::default(), &forecast_result(-2.0))
            .unwrap();
        assert_eq!(kinds(&plain), vec![InsightKind::Headline, InsightKind::Risk]);
    }

    fn inventory_result(surge: f64, days: f64, cover: f64) -> PredictionResult {
        PredictionResult::new("orders")
            .with_value("surge_pct", surge)
            .with_value("horizon_days", days)
            .with_value("current_demand", 1000.0)
            .with_labeled(
                "predicted_demand",
                vec![
                    LabeledValue::new("Fashion", 720.0),
                    LabeledValue::new("Electronics", 480.0),
                ],
            )
            .with_value("total_investment", 5000.0)
            .with_value("stock_cover_days", cover)
    }

    #[test]
    fn inventory_thresholds() {
        // 20% em 14 dias: risco + checagem
        let out = assembler()
            .assemble(Intent::Inventory, &ParameterSet::default(), &inventory_result(0.2, 14.0, 10.0))
            .unwrap();
        assert_eq!(
            kinds(&out),
            vec![InsightKind::Headline, InsightKind::Risk, InsightKind::Breakdown]
        );
        assert!(out[0].text.contains("+20% demand change"));
        assert!(out[0].text.contains("Priority: High"));
        assert_eq!(out[1].data["high_risk_categories"], json!(["Fashion", "Electronics"]));
        assert_eq!(out[2].data["sufficient"], json!(false));

        // 30 dias não é < 30: sem risco
        let out = assembler()
            .assemble(Intent::Inventory, &ParameterSet::default(), &inventory_result(0.2, 30.0, 45.0))
            .unwrap();
        assert_eq!(kinds(&out), vec![InsightKind::Headline, InsightKind::Breakdown]);
        assert_eq!(out[1].data["sufficient"], json!(true));

        // 15% exatos não ultrapassa o limiar
        let out = assembler()
            .assemble(Intent::Inventory, &ParameterSet::default(), &inventory_result(0.15, 7.0, 45.0))
            .unwrap();
        assert_eq!(kinds(&out), vec![InsightKind::Headline, InsightKind::Breakdown]);

        // Sem surge: só o headline
        let out = assembler()
            .assemble(Intent::Inventory, &ParameterSet::default(), &inventory_result(0.0, 30.0, 45.0))
            .unwrap();
        assert_eq!(kinds(&out), vec![InsightKind::Headline]);
        assert!(out[0].text.contains("hold current stock levels"));
    }

    fn shipping_result(share: f64, load: f64) -> PredictionResult {
        PredictionResult::new("transport")
            .with_value("avg_delivery_days", 3.5)
            .with_labeled("at_risk", vec![LabeledValue::new("Ecom", 4.8)])
            .with_labeled("best", vec![LabeledValue::new("BlueDart", 2.4)])
            .with_value("late_route_share", share)
            .with_value("peak_load_factor", load)
    }

    #[test]
    fn shipping_risk_on_share_or_load() {
        let calm = assembler()
            .assemble(Intent::Shipping, &ParameterSet::default(), &shipping_result(0.3, 0.8))
            .unwrap();
        assert_eq!(kinds(&calm), vec![InsightKind::Headline, InsightKind::Breakdown]);
        assert!(calm[0].text.contains("Ecom: 4.8 days avg"));

        for (share, load) in [(0.5, 0.8), (0.2, 1.2)] {
            let out = assembler()
                .assemble(Intent::Shipping, &ParameterSet::default(), &shipping_result(share, load))
                .unwrap();
            assert_eq!(
                kinds(&out),
                vec![InsightKind::Headline, InsightKind::Risk, InsightKind::Breakdown]
            );
        }
    }

    fn sentiment_result(compound: f64) -> PredictionResult {
        PredictionResult::new("sentiment")
            .with_value("compound", compound)
            .with_value("positive_pct", 20.0)
            .with_value("negative_pct", 10.0)
            .with_value("neutral_pct", 70.0)
            .with_value("reviews_analyzed", 16.0)
            .with_value("total_reviews", 16.0)
            .with_value("avg_rating", 3.6)
            .with_value("high_ratings", 8.0)
            .with_value("low_ratings", 4.0)
            .with_value("month_reviews", 6.0)
            .with_value("month", 10.0)
    }

    #[test]
    fn sentiment_labels_and_alert() {
        let out = assembler()
            .assemble(Intent::Sentiment, &ParameterSet::default(), &sentiment_result(0.3))
            .unwrap();
        assert_eq!(kinds(&out), vec![InsightKind::Headline, InsightKind::Breakdown]);
        assert!(out[0].text.contains("**Positive**"));
        assert!(out[0].text.contains("Reviews in October: 6"));
        assert!(out[1].text.contains("8 reviews (50.0%)"));

        let out = assembler()
            .assemble(Intent::Sentiment, &ParameterSet::default(), &sentiment_result(-0.05))
            .unwrap();
        assert_eq!(
            kinds(&out),
            vec![InsightKind::Headline, InsightKind::Risk, InsightKind::Breakdown]
        );
        assert!(out[0].text.contains("**Negative**"));

        let out = assembler()
            .assemble(Intent::Sentiment, &ParameterSet::default(), &sentiment_result(0.0))
            .unwrap();
        assert!(out[0].text.contains("**Neutral**"));
    }

    #[test]
    fn warehouse_opportunity_only_with_savings() {
        let base = PredictionResult::new("warehouse")
            .with_value("avg_processing_hours", 6.9)
            .with_labeled("underperforming", vec![LabeledValue::new("WH-KOL-01", 9.1)])
            .with_labeled("efficient", vec![LabeledValue::new("WH-HYD-01", 4.8)]);

        let with_savings = base
            .clone()
            .with_value("time_savings_hours", 3.1)
            .with_value("monthly_cost_savings", 120_000.0);
        let out = assembler()
            .assemble(Intent::Warehouse, &ParameterSet::default(), &with_savings)
            .unwrap();
        assert_eq!(kinds(&out), vec![InsightKind::Headline, InsightKind::Opportunity]);
        assert!(out[1].text.contains("₹120000 per month"));

        let none = base
            .with_value("time_savings_hours", 0.0)
            .with_value("monthly_cost_savings", 0.0);
        let out = assembler()
            .assemble(Intent::Warehouse, &ParameterSet::default(), &none)
            .unwrap();
        assert_eq!(kinds(&out), vec![InsightKind::Headline]);
    }

    #[test]
    fn general_is_static_help() {
        let out = assembler()
            .assemble(Intent::General, &ParameterSet::default(), &PredictionResult::default())
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, InsightKind::Help);
        assert_eq!(out[0].intent, Intent::General);
        assert_eq!(out[0].data["capabilities"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn missing_metric_is_an_error() {
        let err = assembler()
            .assemble(Intent::Forecast, &ParameterSet::default(), &PredictionResult::new("seasonal"))
            .unwrap_err();
        assert!(matches!(err, AssemblyError::MissingMetric { .. }));

        let wrong = forecast_result(1.0).with_value("forecast", 1.0);
        let err = assembler()
            .assemble(Intent::Forecast, &ParameterSet::default(), &wrong)
            .unwrap_err();
        assert!(matches!(err, AssemblyError::WrongShape { expected: "series", .. }));
    }

    #[test]
    fn assembly_is_deterministic() {
        let a = assembler()
            .assemble(Intent::Forecast, &q4(), &forecast_result(-1.0))
            .unwrap();
        let b = assembler()
            .assemble(Intent::Forecast, &q4(), &forecast_result(-1.0))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fallback_insights() {
        let err = PredictorError::Unavailable {
            predictor: "seasonal".into(),
            reason: "missing".into(),
        };
        let i = assembler().unavailable(Intent::Forecast, &err);
        assert_eq!(i.kind, InsightKind::Unavailable);
        assert_eq!(i.intent, Intent::Forecast);
        assert!(i.text.starts_with("**Demand forecasting is temporarily unavailable**"));
        assert_eq!(i.data["predictor"], json!("seasonal"));

        for insight in [assembler().apology(), assembler().outage()] {
            assert_eq!(insight.intent, Intent::General);
            assert_eq!(insight.kind, InsightKind::Error);
        }
    }
}
