// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use clap::{Parser, Subcommand};
use log::info;
use showui_fiftyone::{
    Error, Progress, Settings,
    fiftyone::{BoxPolicy, FiftyOneWriteOptions, FiftyOneWriter},
    showui::{
        DESKTOP_DATASET_NAME, DESKTOP_HUB_REPO, DESKTOP_HUB_SPLIT, DESKTOP_HUB_SUBSET,
        DesktopOptions, WEB_DATASET_NAME, WEB_PARQUET_PATH, WebOptions, build_desktop_dataset,
        build_web_dataset, read_dataframe,
    },
};
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (TOML). Defaults to config.toml in the user config
    /// directory when present.
    #[clap(long, env = "SHOWUI_CONFIG")]
    config: Option<PathBuf>,

    /// Root directory holding the ShowUI-web and ShowUI-desktop checkouts.
    #[clap(long)]
    base_dir: Option<PathBuf>,

    /// Hub endpoint for dataset downloads
    #[clap(long, env = "HF_ENDPOINT")]
    hub_endpoint: Option<String>,

    /// Hub access token
    #[clap(long, env = "HF_TOKEN", hide_env_values = true)]
    hub_token: Option<String>,

    /// Conversion Command
    #[command(subcommand)]
    cmd: Command,
}

/// Options shared by both conversions.
#[derive(clap::Args, PartialEq, Clone, Debug)]
struct OutputArgs {
    /// Directory the dataset folder is written into.
    #[clap(long, default_value = "datasets")]
    output: PathBuf,

    /// Dataset name, used as the folder name under the output directory.
    #[clap(long)]
    name: Option<String>,

    /// Directory that image_url values are relative to.
    #[clap(long)]
    images: Option<PathBuf>,

    /// Replace an existing dataset of the same name.
    #[clap(long, default_value_t = true, action = clap::ArgAction::Set)]
    overwrite: bool,

    /// Handling of inverted or non-finite boxes: reject, clamp or allow.
    #[clap(long)]
    box_policy: Option<BoxPolicy>,

    /// Do not read image sizes and dimensions.
    #[clap(long)]
    skip_metadata: bool,

    /// Pretty-print the JSON documents.
    #[clap(long)]
    pretty: bool,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// Convert the ShowUI-web Parquet table into a FiftyOne dataset.  Every
    /// screenshot becomes one sample with a detection and a keypoint per
    /// annotated UI element.
    Web {
        /// Parquet/Arrow file or directory of Parquet shards.  Defaults to
        /// ShowUI-web/data/train-00000-of-00001.parquet under the base
        /// directory.
        #[clap(long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Convert ShowUI-desktop into a FiftyOne dataset.  Without --input the
    /// published snapshot is downloaded from the hub.
    Desktop {
        /// Local Parquet/Arrow file or directory of Parquet shards.
        #[clap(long)]
        input: Option<PathBuf>,

        /// Hub repository
        #[clap(long, default_value = DESKTOP_HUB_REPO)]
        repo: String,

        /// Hub subset
        #[clap(long, default_value = DESKTOP_HUB_SUBSET)]
        subset: String,

        /// Hub split
        #[clap(long, default_value = DESKTOP_HUB_SPLIT)]
        split: String,

        /// Seed for a reproducible sample order.
        #[clap(long)]
        seed: Option<u64>,

        /// Keep the input row order.
        #[clap(long)]
        no_shuffle: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

fn progress_channel(message: &'static str) -> mpsc::Sender<Progress> {
    use indicatif::{ProgressBar, ProgressStyle};

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise} ETA: {eta}] {msg}: {wide_bar:.yellow} {human_pos}/{human_len}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▇▆▅▄▃▂▁  "),
    );
    bar.set_message(message);

    let (tx, mut rx) = mpsc::channel::<Progress>(16);

    tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            if let Some(status) = progress.status {
                bar.set_message(status);
            }
            if progress.total > 0 {
                bar.set_length(progress.total as u64);
                bar.set_position(progress.current as u64);
            }
        }
        bar.finish_and_clear();
    });

    tx
}

fn writer(output: &OutputArgs) -> FiftyOneWriter {
    FiftyOneWriter::with_options(FiftyOneWriteOptions {
        overwrite: output.overwrite,
        pretty: output.pretty,
    })
}

async fn handle_web(
    settings: &Settings,
    input: Option<PathBuf>,
    output: OutputArgs,
) -> Result<(), Error> {
    let input = input.unwrap_or_else(|| settings.base_dir.join(WEB_PARQUET_PATH));
    let df = read_dataframe(&input)?;

    let defaults = WebOptions::from_base_dir(&settings.base_dir);
    let options = WebOptions {
        name: output.name.clone().unwrap_or_else(|| WEB_DATASET_NAME.to_owned()),
        images_dir: output.images.clone().unwrap_or(defaults.images_dir),
        box_policy: output.box_policy.unwrap_or(settings.box_policy),
        compute_metadata: !output.skip_metadata,
    };

    let collection = build_web_dataset(&df, &options, Some(progress_channel("web"))).await?;
    let dir = writer(&output).write(&collection, &output.output)?;
    println!("{} samples written to {}", collection.len(), dir.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_desktop(
    settings: &Settings,
    input: Option<PathBuf>,
    repo: String,
    subset: String,
    split: String,
    seed: Option<u64>,
    no_shuffle: bool,
    output: OutputArgs,
) -> Result<(), Error> {
    let df = match input {
        Some(input) => read_dataframe(&input)?,
        None => {
            let hub = settings.hub_client()?;
            info!("fetching {} from {}", repo, hub.endpoint());
            hub.load_dataframe(&repo, &subset, &split, Some(progress_channel("download")))
                .await?
        }
    };

    let defaults = DesktopOptions::from_base_dir(&settings.base_dir);
    let options = DesktopOptions {
        name: output
            .name
            .clone()
            .unwrap_or_else(|| DESKTOP_DATASET_NAME.to_owned()),
        images_dir: output.images.clone().unwrap_or(defaults.images_dir),
        box_policy: output.box_policy.unwrap_or(settings.box_policy),
        shuffle: !no_shuffle,
        seed: seed.or(settings.seed),
        compute_metadata: !output.skip_metadata,
    };

    let collection =
        build_desktop_dataset(&df, &options, Some(progress_channel("desktop"))).await?;
    let dir = writer(&output).write(&collection, &output.output)?;
    println!("{} samples written to {}", collection.len(), dir.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(base_dir) = args.base_dir {
        settings.base_dir = base_dir;
    }
    if let Some(endpoint) = args.hub_endpoint {
        settings.hub_endpoint = endpoint;
    }
    if args.hub_token.is_some() {
        settings.hub_token = args.hub_token;
    }

    match args.cmd {
        Command::Web { input, output } => handle_web(&settings, input, output).await,
        Command::Desktop {
            input,
            repo,
            subset,
            split,
            seed,
            no_shuffle,
            output,
        } => {
            handle_desktop(
                &settings, input, repo, subset, split, seed, no_shuffle, output,
            )
            .await
        }
    }
}
