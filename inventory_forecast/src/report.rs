//! Plain-text rendering of a dashboard snapshot
//!
//! Labels live here only; the pipeline never sees them.

use crate::pipeline::{DashboardSnapshot, ProductForecast};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Language of the rendered labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Locale {
    #[default]
    En,
    PtBr,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Locale::En),
            "pt" | "pt-br" | "pt_br" | "portuguese" => Ok(Locale::PtBr),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

struct Labels {
    title: &'static str,
    product: &'static str,
    forecast: &'static str,
    columns: [&'static str; 5],
    no_history: &'static str,
    metrics: &'static str,
    average_delta: &'static str,
    promotion_applied: &'static str,
    critical: &'static str,
    critical_columns: [&'static str; 4],
    none: &'static str,
    promotion_impact: &'static str,
    with_promotion: &'static str,
    without_promotion: &'static str,
    insights: &'static str,
    low_stock: &'static str,
    weekend_uplift: &'static str,
    recommendations_title: &'static str,
    recommendations: [&'static str; 4],
}

const EN: Labels = Labels {
    title: "INVENTORY FORECAST REPORT",
    product: "Product",
    forecast: "7-day forecast",
    columns: ["Date", "Predicted", "Lower", "Upper", "Confidence"],
    no_history: "No history for this product.",
    metrics: "Baseline metrics",
    average_delta: "Average daily delta",
    promotion_applied: "Promotion offset applied",
    critical: "Critical products",
    critical_columns: ["Product", "Min stock", "Avg stock", "Critical days"],
    none: "none",
    promotion_impact: "Promotion impact",
    with_promotion: "With promotion",
    without_promotion: "Without promotion",
    insights: "Insights",
    low_stock: "products reached critical stock below",
    weekend_uplift: "Sales increase on weekends by",
    recommendations_title: "Recommendations",
    recommendations: [
        "Monitor products with a declining 7-day trend",
        "Trigger alerts for stock below 30 units",
        "Increase stock by 40% during promotions",
        "Review the forecast monthly",
    ],
};

const PT_BR: Labels = Labels {
    title: "RELATÓRIO DE PREVISÃO DE ESTOQUE",
    product: "Produto",
    forecast: "Previsão de 7 dias",
    columns: ["Data", "Previsto", "Mínimo", "Máximo", "Confiança"],
    no_history: "Sem histórico para este produto.",
    metrics: "Métricas da linha de base",
    average_delta: "Variação média diária",
    promotion_applied: "Ajuste de promoção aplicado",
    critical: "Produtos críticos",
    critical_columns: ["Produto", "Estoque mín.", "Estoque médio", "Dias críticos"],
    none: "nenhum",
    promotion_impact: "Impacto das promoções",
    with_promotion: "Com promoção",
    without_promotion: "Sem promoção",
    insights: "Insights",
    low_stock: "produtos atingiram estoque crítico abaixo de",
    weekend_uplift: "As vendas aumentam nos fins de semana em",
    recommendations_title: "Recomendações",
    recommendations: [
        "Monitorar produtos com tendência de queda em 7 dias",
        "Disparar alertas para estoque abaixo de 30 unidades",
        "Aumentar o estoque em 40% durante promoções",
        "Revisar a previsão mensalmente",
    ],
};

impl Locale {
    fn labels(&self) -> &'static Labels {
        match self {
            Locale::En => &EN,
            Locale::PtBr => &PT_BR,
        }
    }

    fn yes_no(&self, value: bool) -> &'static str {
        match (self, value) {
            (Locale::En, true) => "yes",
            (Locale::En, false) => "no",
            (Locale::PtBr, true) => "sim",
            (Locale::PtBr, false) => "não",
        }
    }
}

/// A snapshot paired with the locale it is rendered in
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    snapshot: &'a DashboardSnapshot,
    locale: Locale,
}

impl<'a> Report<'a> {
    pub fn new(snapshot: &'a DashboardSnapshot, locale: Locale) -> Self {
        Self { snapshot, locale }
    }

    fn write_forecast(&self, f: &mut fmt::Formatter<'_>, forecast: &ProductForecast) -> fmt::Result {
        let l = self.locale.labels();
        writeln!(f, "{} {} ({})", l.product, forecast.product_id, forecast.model)?;
        writeln!(f, "{}:", l.forecast)?;

        if forecast.is_empty() {
            return writeln!(f, "  {}", l.no_history);
        }

        let [date, predicted, lower, upper, confidence] = l.columns;
        writeln!(
            f,
            "  {:<12}{:>10}{:>10}{:>10}{:>12}",
            date, predicted, lower, upper, confidence
        )?;
        for point in &forecast.points {
            writeln!(
                f,
                "  {:<12}{:>10}{:>10}{:>10}{:>11.0}%",
                point.date.format("%Y-%m-%d").to_string(),
                point.predicted,
                point.lower,
                point.upper,
                point.confidence * 100.0
            )?;
        }

        writeln!(f, "  {}: {:.2}", l.average_delta, forecast.average_delta)?;
        writeln!(
            f,
            "  {}: {}",
            l.promotion_applied,
            self.locale.yes_no(forecast.promotion_applied)
        )?;

        if let Some(metrics) = &forecast.metrics {
            writeln!(f, "{}:", l.metrics)?;
            writeln!(f, "  RMSE:  {:.4}", metrics.rmse)?;
            writeln!(f, "  MAPE:  {:.2}%", metrics.mape)?;
            writeln!(f, "  MAE:   ±{:.1}", metrics.mae)?;
            writeln!(f, "  R²:    {:.4}", metrics.r2)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let l = self.locale.labels();
        let snapshot = self.snapshot;

        writeln!(f, "{}", "=".repeat(70))?;
        writeln!(f, "{}", l.title)?;
        writeln!(f, "{}", "=".repeat(70))?;

        if let Some(forecast) = &snapshot.selected {
            self.write_forecast(f, forecast)?;
            writeln!(f)?;
        }

        writeln!(f, "{}:", l.critical)?;
        if snapshot.critical_products.is_empty() {
            writeln!(f, "  {}", l.none)?;
        } else {
            let [product, min, avg, days] = l.critical_columns;
            writeln!(f, "  {:<10}{:>14}{:>16}{:>16}", product, min, avg, days)?;
            for summary in &snapshot.critical_products {
                writeln!(
                    f,
                    "  {:<10}{:>14}{:>16.2}{:>16}",
                    summary.product_id, summary.min_stock, summary.avg_stock, summary.critical_days
                )?;
            }
        }
        writeln!(f)?;

        let impact = &snapshot.promotion_impact;
        writeln!(f, "{}:", l.promotion_impact)?;
        for (label, bucket) in [
            (l.with_promotion, &impact.with_promotion),
            (l.without_promotion, &impact.without_promotion),
        ] {
            writeln!(
                f,
                "  {:<20} n={:<6} stock={:>7.2} sales={:>6.2}",
                label, bucket.records, bucket.avg_stock, bucket.avg_sales
            )?;
        }
        writeln!(f)?;

        let insights = &snapshot.insights;
        writeln!(f, "{}:", l.insights)?;
        writeln!(
            f,
            "  • {} {} {}",
            insights.low_stock_products, l.low_stock, insights.low_stock_level
        )?;
        if let Some(uplift) = insights.weekday_pattern.weekend_uplift_pct() {
            writeln!(f, "  • {} {:.1}%", l.weekend_uplift, uplift)?;
        }
        writeln!(f)?;

        writeln!(f, "{}:", l.recommendations_title)?;
        for (i, line) in l.recommendations.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, line)?;
        }
        Ok(())
    }
}

/// Render a snapshot as a plain-text report
pub fn render(snapshot: &DashboardSnapshot, locale: Locale) -> String {
    Report::new(snapshot, locale).to_string()
}
