//! One-shot capture printed as JSON.

use std::sync::Arc;

use anyhow::Result;
use sightline_core::memory::layout::timing;
use sightline_core::{
    CommandList, MemoryReader, SnapshotPipeline, draw_frame, load_offsets_or_default,
};
use tracing::info;

use crate::retry::discover_with_retry;
use crate::shutdown::ShutdownSignal;
use crate::{TargetArgs, ToggleArgs};

/// Attach, run a single cycle and print either the entities or the draw
/// commands they produce.
pub fn run(target: &TargetArgs, toggles: &ToggleArgs, draw: bool) -> Result<()> {
    let shutdown = Arc::new(ShutdownSignal::new());
    shutdown.install_ctrlc()?;

    let offsets = load_offsets_or_default(&target.offsets);
    let Some(process) = discover_with_retry(
        &target.process,
        &target.module,
        target.retry_delay(),
        &shutdown,
    )?
    else {
        return Ok(());
    };

    let reader = MemoryReader::new(&process);
    let viewport = target.viewport();
    let pipeline = SnapshotPipeline::for_target(&reader, &offsets, process.base_address, viewport);
    let settings = toggles.initial_settings(timing::DEFAULT_TARGET_FPS);

    let entities = pipeline.run_cycle(&settings);
    info!(
        "Captured {} entities ({}x{})",
        entities.len(),
        viewport.width,
        viewport.height
    );

    let json = if draw {
        let mut frame = CommandList::new();
        draw_frame(&mut frame, &entities, &settings);
        serde_json::to_string_pretty(&frame)?
    } else {
        serde_json::to_string_pretty(&entities)?
    };
    println!("{}", json);
    Ok(())
}
