//! sgdsvm Command Line Interface
//!
//! Train, evaluate and inspect linear SVM models trained by stochastic
//! gradient descent, and convert datasets between the LibSVM text format
//! and the native binary format.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use sgdsvm::api::Trainer;
use sgdsvm::core::{BiasPolicy, Dataset, Result, SgdConfig, SvmError};
use sgdsvm::data::{load_binary, load_libsvm, save_binary, save_libsvm, SvmDataset};
use sgdsvm::loss::{Loss, LossKind};
use sgdsvm::persistence::SerializableModel;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "sgdsvm")]
#[command(about = "Linear SVM training with stochastic gradient descent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "sgdsvm Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new model
    Train(TrainArgs),
    /// Make predictions using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on test data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
    /// Convert a dataset between storage formats
    Convert(ConvertArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (LibSVM or binary format)
    #[arg(long)]
    data: PathBuf,

    /// Output model file
    #[arg(short, long)]
    output: PathBuf,

    /// Data format: auto, libsvm, or binary
    #[arg(short, long, default_value = "auto")]
    format: CliFormat,

    /// L2 regularization strength
    #[arg(short, long, default_value = "1e-5")]
    lambda: f64,

    /// Initial learning rate (calibrated automatically when omitted)
    #[arg(long)]
    eta0: Option<f64>,

    /// Number of training epochs
    #[arg(short, long, default_value = "5")]
    epochs: usize,

    /// Loss function
    #[arg(long, default_value = "log")]
    loss: CliLoss,

    /// Train without a bias term
    #[arg(long)]
    no_bias: bool,

    /// Apply L2 regularization to the bias term
    #[arg(long, conflicts_with = "no_bias")]
    regularize_bias: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliLoss {
    /// Logistic loss
    #[value(name = "log")]
    Log,
    /// Hinge loss
    #[value(name = "hinge")]
    Hinge,
    /// Squared hinge loss
    #[value(name = "squared-hinge")]
    SquaredHinge,
    /// Smoothed hinge loss
    #[value(name = "smooth-hinge")]
    SmoothHinge,
}

impl From<CliLoss> for LossKind {
    fn from(cli_loss: CliLoss) -> Self {
        match cli_loss {
            CliLoss::Log => LossKind::Log,
            CliLoss::Hinge => LossKind::Hinge,
            CliLoss::SquaredHinge => LossKind::SquaredHinge,
            CliLoss::SmoothHinge => LossKind::SmoothHinge,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum CliFormat {
    /// Detect by file extension (.bin/.dat are binary, anything else libsvm)
    Auto,
    /// LibSVM text format
    Libsvm,
    /// Native binary format
    Binary,
}

#[derive(Args)]
struct PredictArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file
    #[arg(long)]
    data: PathBuf,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Data format: auto, libsvm, or binary
    #[arg(short, long, default_value = "auto")]
    format: CliFormat,

    /// Show decision values alongside the labels
    #[arg(long)]
    confidence: bool,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file
    #[arg(long)]
    data: PathBuf,

    /// Data format: auto, libsvm, or binary
    #[arg(short, long, default_value = "auto")]
    format: CliFormat,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input dataset file
    input: PathBuf,

    /// Output dataset file
    output: PathBuf,

    /// Input format: auto, libsvm, or binary
    #[arg(long, default_value = "auto")]
    from: CliFormat,

    /// Output format: auto, libsvm, or binary
    #[arg(long, default_value = "auto")]
    to: CliFormat,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Predict(args) => predict_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
        Commands::Convert(args) => convert_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn resolve_format(path: &Path, format: CliFormat) -> CliFormat {
    if format != CliFormat::Auto {
        return format;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("bin") | Some("dat") => CliFormat::Binary,
        _ => CliFormat::Libsvm,
    }
}

fn load_dataset(path: &Path, format: CliFormat) -> Result<SvmDataset> {
    match resolve_format(path, format) {
        CliFormat::Binary => {
            info!("Loading dataset as binary format");
            load_binary(path)
        }
        _ => {
            info!("Loading dataset as libsvm format");
            load_libsvm(path)
        }
    }
}

fn save_dataset(data: &SvmDataset, path: &Path, format: CliFormat) -> Result<()> {
    match resolve_format(path, format) {
        CliFormat::Binary => save_binary(data, path),
        _ => save_libsvm(data, path),
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Training linear SVM with SGD...");
    info!("Data file: {:?}", args.data);

    let data = load_dataset(&args.data, args.format)?;
    info!(
        "Loaded {} examples ({} positive, {} negative), {} features",
        data.len(),
        data.positive(),
        data.negative(),
        data.dim()
    );

    let bias = if args.no_bias {
        BiasPolicy::None
    } else if args.regularize_bias {
        BiasPolicy::Regularized
    } else {
        BiasPolicy::Unregularized
    };
    let loss: LossKind = args.loss.into();
    info!(
        "Parameters: lambda={}, epochs={}, loss={}, bias={}",
        args.lambda,
        args.epochs,
        loss.name(),
        bias.name()
    );

    let config = SgdConfig {
        lambda: args.lambda,
        eta0: args.eta0,
        loss,
        bias,
    };
    let mut trainer = Trainer::with_config(data.dim(), config)?;

    for epoch in 1..=args.epochs {
        trainer.epoch(&data)?;
        let metrics = trainer.eval(&data)?;
        info!(
            "epoch {epoch}: loss={:.6} cost={:.6} misclassification={:.2}%",
            metrics.loss,
            metrics.cost,
            metrics.error_percent()
        );
    }
    info!("Training completed successfully");

    let model = SerializableModel::from_trainer(&mut trainer);
    model.save_to_file(&args.output)?;
    info!("Model saved to: {:?}", args.output);

    Ok(())
}

fn predict_command(args: PredictArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let model = SerializableModel::load_from_file(&args.model)?;

    info!("Loading prediction data from: {:?}", args.data);
    let data = load_dataset(&args.data, args.format)?;

    let mut lines = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let prediction = model.predict(data.feature(i));
        if args.confidence {
            lines.push(format!(
                "{} {:.6}",
                prediction.label, prediction.decision_value
            ));
        } else {
            lines.push(format!("{}", prediction.label));
        }
    }

    match &args.output {
        Some(output_path) => {
            std::fs::write(output_path, lines.join("\n") + "\n").map_err(SvmError::IoError)?;
            info!("Predictions saved to: {output_path:?}");
        }
        None => {
            for line in lines {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let model = SerializableModel::load_from_file(&args.model)?;

    info!("Loading test data from: {:?}", args.data);
    let data = load_dataset(&args.data, args.format)?;

    let metrics = model.evaluate(&data)?;
    println!("Loss: {:.6}", metrics.loss);
    println!("Cost: {:.6}", metrics.cost);
    println!("Misclassification: {:.2}%", metrics.error_percent());

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    let model = SerializableModel::load_from_file(&args.model)?;
    model.print_summary();
    Ok(())
}

fn convert_command(args: ConvertArgs) -> Result<()> {
    info!("Converting {:?} -> {:?}", args.input, args.output);
    let data = load_dataset(&args.input, args.from)?;
    save_dataset(&data, &args.output, args.to)?;
    info!(
        "Wrote {} examples ({} features)",
        data.len(),
        data.dim()
    );
    Ok(())
}
