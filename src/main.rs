use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use console::style;
use image::ImageFormat;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use walkdir::WalkDir;

use image_classify_rs::config::{Cli, Command, InferenceCommand, PredictArgs, TransformCommand};
use image_classify_rs::stub::parse_class_names;
use image_classify_rs::{build_backend, BackendKind, ImageInput, PredictionBackend};

fn main() -> Result<()> {
    image_classify_rs::init_tracing();
    let cli = Cli::parse();

    // Failures are reported on stderr; the exit status stays 0.
    let outcome = match &cli.command {
        Command::Inference(InferenceCommand::Predict(args)) => predict(&cli, args),
        Command::Inference(InferenceCommand::PredictDir { dir }) => predict_dir(&cli, dir),
        Command::Transform(TransformCommand::Resize {
            image_path,
            width,
            height,
        }) => image_classify_rs::resize(image_path.as_path(), *width, *height)
            .map(|(w, h)| format!("Resized to: ({w}, {h})"))
            .map_err(Into::into),
    };

    match outcome {
        Ok(message) => println!("{}", style(message).green()),
        Err(e) => eprintln!("{}", style(format!("Error: {e}")).red()),
    }

    Ok(())
}

fn backend_for(cli: &Cli, class_names: Option<&str>) -> Result<Box<dyn PredictionBackend>> {
    let class_names = class_names.map(parse_class_names);
    let kind = if class_names.is_some() {
        BackendKind::Stub
    } else {
        cli.backend
    };
    Ok(build_backend(kind, cli.model_options(), class_names)?)
}

fn predict(cli: &Cli, args: &PredictArgs) -> Result<String> {
    let backend = backend_for(cli, args.class_names.as_deref())?;
    let label = backend.predict(&ImageInput::from(args.image_path.as_path()))?;
    Ok(format!("Predicted class: {label}"))
}

fn predict_dir(cli: &Cli, dir: &Path) -> Result<String> {
    anyhow::ensure!(dir.is_dir(), "{} is not a directory", dir.display());
    let backend = backend_for(cli, None)?;

    let mut image_paths = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| ImageFormat::from_path(e.path()).is_ok())
        .map(|e| e.into_path())
        .collect::<Vec<PathBuf>>();
    image_paths.sort();

    let progress_bar = ProgressBar::new(image_paths.len() as u64);
    progress_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec} {eta})",
        )?
        .progress_chars("#>-"),
    );

    let results = image_paths
        .par_iter()
        .progress_with(progress_bar.clone())
        .map(|path| {
            let outcome = backend.predict(&ImageInput::from(path.as_path()));
            (path, outcome)
        })
        .collect::<Vec<_>>();
    progress_bar.finish_and_clear();

    let lines = results
        .into_iter()
        .map(|(path, outcome)| match outcome {
            Ok(label) => format!("{}: {label}", path.display()),
            Err(e) => format!("{}: Error: {e}", path.display()),
        })
        .collect::<Vec<_>>();

    Ok(format!(
        "Predicted {} images\n{}",
        lines.len(),
        lines.join("\n")
    ))
}
