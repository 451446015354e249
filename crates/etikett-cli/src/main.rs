// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Etikett — courier voucher to A4 sticker-sheet composer.
//
// Entry point. Initialises logging, parses the command line, and drives the
// composition pipeline (or the courier download for `fetch`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use etikett_core::error::{EtikettError, Result};
use etikett_core::types::{DocumentKind, OutputFormat, Slot};
use etikett_core::ComposeConfig;
use etikett_compose::{Placement, SourceVoucher};
use etikett_courier::{CourierClient, CourierConfig, PrintType};

#[derive(Debug, Parser)]
#[command(
    name = "etikett",
    version,
    about = "Compose courier voucher documents onto 3-slot A4 sticker sheets"
)]
struct Cli {
    /// Raster and output resolution in DPI.
    #[arg(long, global = true, default_value_t = 300)]
    dpi: u32,

    /// Per-slot content margin as a fraction of the slot size.
    #[arg(long, global = true, default_value_t = 0.10)]
    margin_ratio: f32,

    /// Output document format.
    #[arg(long, global = true, value_enum, default_value_t = FormatArg::Pdf)]
    format: FormatArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Place identical voucher copies in all three slots (replicate mode).
    ComposeAll {
        /// Source voucher document (PDF, PNG, or JPEG).
        source: PathBuf,
    },
    /// Place the voucher in one named slot, or produce all three variants.
    ComposeOne {
        /// Source voucher document (PDF, PNG, or JPEG).
        source: PathBuf,
        /// Target slot: 1 (top), 2 (middle), 3 (bottom), or "all".
        slot: SlotArg,
    },
    /// Download a voucher document from the courier API (needs ACS_* env vars).
    Fetch {
        /// Courier voucher number.
        voucher_no: String,
        /// Output file (defaults to voucher_<no>.pdf).
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Pdf,
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

/// Slot selector as accepted on the command line. Anything outside 1–3/all is
/// rejected by clap with a usage error before it can reach the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SlotArg {
    #[value(name = "1")]
    Top,
    #[value(name = "2")]
    Middle,
    #[value(name = "3")]
    Bottom,
    All,
}

impl SlotArg {
    fn slot(self) -> Option<Slot> {
        match self {
            Self::Top => Some(Slot::Top),
            Self::Middle => Some(Slot::Middle),
            Self::Bottom => Some(Slot::Bottom),
            Self::All => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    dotenvy::dotenv().ok();
    tracing::debug!("etikett starting");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = ComposeConfig {
        dpi: cli.dpi,
        margin_ratio: cli.margin_ratio,
        output_format: cli.format.into(),
    };

    match cli.command {
        Command::ComposeAll { source } => {
            let voucher = load_voucher(&source, &config)?;
            let sheet = etikett_compose::compose(&Placement::AllFilled(&voucher), &config)?;
            let path = output_path(&source, "_3stickers", config.output_format);
            etikett_compose::encode::write_sheet(&sheet, config.output_format, &path)?;
            println!("Wrote {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::ComposeOne { source, slot } => match slot.slot() {
            Some(slot) => {
                let voucher = load_voucher(&source, &config)?;
                let sheet =
                    etikett_compose::compose(&Placement::SingleFilled(slot, &voucher), &config)?;
                let path = output_path(
                    &source,
                    &format!("_sticker_{}", slot.file_suffix()),
                    config.output_format,
                );
                etikett_compose::encode::write_sheet(&sheet, config.output_format, &path)?;
                println!("Wrote {} ({} position)", path.display(), slot);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                let failed = compose_every_position(&source, &config)?;
                if failed == 0 {
                    Ok(ExitCode::SUCCESS)
                } else {
                    Ok(ExitCode::FAILURE)
                }
            }
        },
        Command::Fetch { voucher_no, output } => fetch(&voucher_no, output).await,
    }
}

/// Selective "all" mode: three independent single-slot sheets. Each slot's
/// production fails on its own; returns how many of the three failed.
fn compose_every_position(source: &Path, config: &ComposeConfig) -> Result<u32> {
    let voucher = load_voucher(source, config)?;
    let mut failed = 0u32;

    for (slot, outcome) in etikett_compose::compose_all_positions(&voucher, config) {
        let path = output_path(
            source,
            &format!("_sticker_{}", slot.file_suffix()),
            config.output_format,
        );
        let written = outcome.and_then(|sheet| {
            etikett_compose::encode::write_sheet(&sheet, config.output_format, &path)
        });
        match written {
            Ok(()) => println!("Wrote {} ({} position)", path.display(), slot),
            Err(err) => {
                eprintln!("error: slot {}: {} ({})", slot, err, path.display());
                failed += 1;
            }
        }
    }

    Ok(failed)
}

async fn fetch(voucher_no: &str, output: Option<PathBuf>) -> Result<ExitCode> {
    let client = CourierClient::new(CourierConfig::from_env()?)?;

    match client
        .fetch_voucher_document(voucher_no, PrintType::Laser)
        .await?
    {
        Some(document) => {
            let path =
                output.unwrap_or_else(|| PathBuf::from(format!("voucher_{}.pdf", voucher_no)));
            std::fs::write(&path, &document.bytes)?;
            println!("Wrote {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        None => Err(EtikettError::Api(format!(
            "no document available for voucher {} (not printed by the courier yet?)",
            voucher_no
        ))),
    }
}

/// Read and rasterize the source document's first page.
fn load_voucher(source: &Path, config: &ComposeConfig) -> Result<SourceVoucher> {
    let kind = source
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentKind::from_extension)
        .ok_or_else(|| {
            EtikettError::UnreadableDocument(format!(
                "unsupported source document type: {}",
                source.display()
            ))
        })?;
    let bytes = std::fs::read(source)?;
    etikett_compose::rasterize_first_page(&bytes, kind, config.dpi)
}

/// Derive an output path next to the source: `<stem><suffix>.<ext>`.
fn output_path(source: &Path, suffix: &str, format: OutputFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet");
    source.with_file_name(format!("{}{}.{}", stem, suffix, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names_follow_the_sticker_conventions() {
        let source = Path::new("/tmp/voucher_7401461340.pdf");
        assert_eq!(
            output_path(source, "_3stickers", OutputFormat::Pdf),
            Path::new("/tmp/voucher_7401461340_3stickers.pdf")
        );
        assert_eq!(
            output_path(source, "_sticker_middle", OutputFormat::Png),
            Path::new("/tmp/voucher_7401461340_sticker_middle.png")
        );
    }

    #[test]
    fn slot_arguments_map_to_slots() {
        assert_eq!(SlotArg::Top.slot(), Some(Slot::Top));
        assert_eq!(SlotArg::Middle.slot(), Some(Slot::Middle));
        assert_eq!(SlotArg::Bottom.slot(), Some(Slot::Bottom));
        assert_eq!(SlotArg::All.slot(), None);
    }

    #[test]
    fn cli_parses_compose_one_with_all() {
        let cli = Cli::try_parse_from(["etikett", "compose-one", "v.pdf", "all"]).unwrap();
        match cli.command {
            Command::ComposeOne { slot, .. } => assert_eq!(slot, SlotArg::All),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn cli_rejects_out_of_range_slots() {
        assert!(Cli::try_parse_from(["etikett", "compose-one", "v.pdf", "4"]).is_err());
        assert!(Cli::try_parse_from(["etikett", "compose-one", "v.pdf", "top"]).is_err());
    }

    #[test]
    fn whole_pipeline_writes_three_files_for_all_mode() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("v.png");

        // 2:1 landscape voucher, as courier A4 labels typically are.
        let img = image::RgbImage::from_pixel(400, 200, image::Rgb([30, 30, 30]));
        img.save(&source).unwrap();

        let config = ComposeConfig {
            dpi: 60,
            ..ComposeConfig::default()
        };
        let failed = compose_every_position(&source, &config).unwrap();
        assert_eq!(failed, 0);

        for name in ["v_sticker_top.pdf", "v_sticker_middle.pdf", "v_sticker_bottom.pdf"] {
            assert!(dir.path().join(name).exists(), "missing {}", name);
        }
    }
}
