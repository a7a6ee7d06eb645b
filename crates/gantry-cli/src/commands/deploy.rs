use std::path::PathBuf;

use gantry_core::GantryConfig;
use gantry_pipeline::{DeployTarget, Pipeline, PipelineOutcome};

/// Execute the full deploy pipeline from the current directory.
pub async fn deploy(image: bool) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = GantryConfig::load(&project_dir)?;

    let target = if image {
        DeployTarget::LocalImage
    } else {
        DeployTarget::Remote
    };

    let pipeline = Pipeline::new(&config);
    let outcome = pipeline.run(&project_dir, &config, target).await?;

    match outcome {
        PipelineOutcome::Uploaded { status, body } => {
            println!("{body}");
            if !(200..300).contains(&status) {
                anyhow::bail!("deployment service responded with status {status}");
            }
        }
        PipelineOutcome::ImageBuilt { tag } => {
            println!("Image built: {tag}");
        }
    }

    Ok(())
}
