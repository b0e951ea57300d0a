//! CLI logic for the kinfolk chart tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use error_adapter::render_report;

use std::fs;

use log::{info, warn};

use kinfolk::{ChartBuilder, KinfolkError, config::AppConfig, store::RelationshipStore};

/// Run the kinfolk CLI application
///
/// Loads the input table (or the built-in sample), lays it out and writes the
/// SVG to the output file.
///
/// Unless `--strict` is given, an input that cannot be loaded is reported at
/// `warn` and the sample dataset is rendered instead.
///
/// # Errors
///
/// Returns `KinfolkError` for:
/// - Configuration loading errors
/// - Input errors when running with `--strict`
/// - Rendering errors
/// - Failure to write the output file
pub fn run(args: &Args) -> Result<(), KinfolkError> {
    info!(
        input_path:? = args.input,
        output_path = args.output;
        "Rendering family chart"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(width) = args.width {
        let layout = app_config.layout().clone().with_canvas_width(width);
        app_config = AppConfig::new(layout, app_config.style().clone());
    }
    app_config.validate().map_err(KinfolkError::Config)?;

    let builder = ChartBuilder::new(app_config);
    let store = load_store(&builder, args)?;
    let svg = builder.render_svg(&store)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output, people = store.len(); "SVG exported successfully");

    Ok(())
}

/// Picks the dataset to render, applying the sample fallback.
fn load_store(builder: &ChartBuilder, args: &Args) -> Result<RelationshipStore, KinfolkError> {
    let input = match (&args.input, args.sample) {
        (Some(input), false) => input,
        _ => {
            info!("Using the built-in sample dataset");
            return Ok(builder.sample());
        }
    };

    let loaded = fs::read(input)
        .map_err(KinfolkError::from)
        .and_then(|bytes| builder.load_bytes(&bytes));

    match loaded {
        Ok(store) if store.is_empty() && !args.strict => {
            warn!(input = input; "Input has no usable rows, rendering the sample dataset instead");
            Ok(builder.sample())
        }
        Ok(store) => Ok(store),
        Err(err) if !args.strict => {
            warn!(
                input = input;
                "Failed to load input, rendering the sample dataset instead\n{}",
                render_report(&err)
            );
            Ok(builder.sample())
        }
        Err(err) => Err(err),
    }
}
