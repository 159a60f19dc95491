use crate::report::{notice_line, TextReport};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use weedwise_core::{Notice, PipelineConfig, PipelineError, PipelineSession};
use weedwise_intake::{validate, DiskFile, ImageFile};
use weedwise_model::{GrowthStage, WeedSpecies};

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// The image was refused by the intake rules
    Rejected,
}

impl Status {
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::Rejected => ExitCode::FAILURE,
        }
    }
}

/// Config from `path`, or the defaults
pub fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

async fn open(path: &Path) -> Result<DiskFile> {
    DiskFile::open(path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))
}

fn is_rejection(err: &PipelineError) -> bool {
    matches!(err, PipelineError::Intake(inner) if inner.is_rejection())
}

/// Select the file and analyze it in a fresh session
pub async fn analyze<W: Write>(
    path: &Path,
    config: PipelineConfig,
    json: bool,
    out: &mut W,
) -> Result<Status> {
    let file = open(path).await?;
    let session = PipelineSession::new(config);
    tracing::info!(session = %session.id(), path = %path.display(), "analyzing image");

    match session.select_file(Some(file)).await {
        Ok(_) => {}
        Err(err) if is_rejection(&err) => {
            writeln!(out, "rejected: {}", notice_line(&Notice::from(&err)))?;
            return Ok(Status::Rejected);
        }
        Err(err) => return Err(err.into()),
    }

    let result = session
        .analyze()
        .await?
        .into_applied()
        .context("analysis was superseded")?;

    if json {
        serde_json::to_writer_pretty(&mut *out, result.as_ref())?;
        writeln!(out)?;
    } else {
        write!(out, "{}", TextReport::new(&result))?;
    }
    Ok(Status::Success)
}

/// Apply the intake rules only
pub async fn check<W: Write>(path: &Path, config: &PipelineConfig, out: &mut W) -> Result<Status> {
    let file = open(path).await?;
    let (name, media_type, size) = (
        file.name().to_string(),
        file.media_type().to_string(),
        file.byte_size(),
    );

    match validate(file, &config.intake_policy()) {
        Ok(_) => {
            writeln!(out, "accepted: {name} ({media_type}, {size} bytes)")?;
            Ok(Status::Success)
        }
        Err(err) => {
            let notice = Notice::from(&PipelineError::from(err));
            writeln!(out, "rejected: {}", notice_line(&notice))?;
            Ok(Status::Rejected)
        }
    }
}

/// List species and growth stages
pub fn species<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Species:")?;
    for species in WeedSpecies::ALL {
        writeln!(out, "  {species}")?;
    }

    writeln!(out)?;
    writeln!(out, "Growth stages:")?;
    for stage in GrowthStage::ALL {
        let timing = if stage.is_early() { "early" } else { "late" };
        writeln!(out, "  {stage} ({timing}): {}", stage.control_outlook().advice())?;
    }
    Ok(())
}
