use inventory_forecast::config::Settings;
use inventory_forecast::data::{DataLoader, SAMPLE_CSV};
use inventory_forecast::features::{product_history, FeatureEngineer};
use inventory_forecast::metrics::BaselineEvaluator;
use inventory_forecast::models::{ForecastModel, LinearDeltaModel, TrainedForecastModel};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Inventory Forecast: Basic Forecasting Example");
    println!("=============================================\n");

    let settings = Settings::default();

    // Parse the bundled sample
    let raw = DataLoader::from_text(SAMPLE_CSV, settings.parser.row_policy)?;
    println!("Loaded {} records", raw.len());

    // Derive features
    let engineer = FeatureEngineer::new(&settings.features)?;
    let enriched = engineer.enrich(&raw);

    // Pick the first product and train the model on its history
    let product_id = enriched.first().ok_or("sample has no records")?.product_id();
    let history = product_history(&enriched, product_id);
    println!("Product {}: {} days of history\n", product_id, history.len());

    let model = LinearDeltaModel::new(&settings.forecast)?;
    let trained = model.train(&history)?;
    println!("Model: {}", trained.name());
    println!("Average daily delta: {:.2}\n", trained.average_delta());

    for point in trained.forecast()? {
        println!(
            "  {}  predicted {:>3}  [{:>3}, {:>3}]  confidence {:.0}%",
            point.date,
            point.predicted,
            point.lower,
            point.upper,
            point.confidence * 100.0
        );
    }

    // Score the carry-forward baseline on the held-out tail
    let evaluator = BaselineEvaluator::new(&settings.evaluation)?;
    let mut rng = StdRng::seed_from_u64(42);
    if let Some(metrics) =
        evaluator.evaluate_history(&history, settings.forecast.train_ratio, &mut rng)
    {
        println!(
            "\nRMSE {:.3}  MAPE {:.2}%  MAE {:.3}  R² {:.3}",
            metrics.rmse, metrics.mape, metrics.mae, metrics.r2
        );
    }

    Ok(())
}
