//! Paced overlay loop.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use sightline_core::{
    CommandList, FrameScheduler, MemoryReader, OverlaySettings, ReadMemory, SnapshotPipeline,
    draw_frame, load_offsets_or_default,
};
use tracing::{debug, info, trace};

use crate::input;
use crate::retry::discover_with_retry;
use crate::shutdown::ShutdownSignal;
use crate::{RunArgs, TargetArgs};

/// Run the overlay until Ctrl+C, an exit key, or the target going away.
pub fn run(target: &TargetArgs, args: &RunArgs) -> Result<()> {
    let shutdown = Arc::new(ShutdownSignal::new());
    shutdown.install_ctrlc()?;

    info!("Sightline {}", env!("CARGO_PKG_VERSION"));

    let fps_range = args.min_fps.min(args.max_fps)..=args.max_fps.max(args.min_fps);
    let settings = Arc::new(OverlaySettings::new(
        args.toggles.initial_settings(args.fps),
        fps_range,
    ));
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

    let monitor = if args.no_menu {
        None
    } else {
        Some(input::spawn_control_monitor(
            Arc::clone(&settings),
            Arc::clone(&shutdown),
        ))
    };

    let reader = MemoryReader::new(&process);
    let viewport = target.viewport();
    debug!("Viewport: {}x{}", viewport.width, viewport.height);
    let pipeline = SnapshotPipeline::for_target(&reader, &offsets, process.base_address, viewport);

    let mut scheduler = FrameScheduler::new(settings.target_fps(), settings.fps_range());
    let mut frame = CommandList::new();
    let mut cycles: u64 = 0;

    while !shutdown.is_shutdown() {
        let snapshot = settings.snapshot();
        scheduler.set_target_rate(snapshot.target_fps);

        let delay = scheduler.begin_cycle_at(Instant::now());
        if !delay.is_zero() && shutdown.wait(delay) {
            break;
        }

        if reader.read_bytes(process.base_address, 1).is_err() {
            info!("Target process exited");
            break;
        }

        let entities = pipeline.run_cycle(&snapshot);
        frame.clear();
        draw_frame(&mut frame, &entities, &snapshot);

        cycles += 1;
        trace!(
            "Cycle {}: {} entities, {} draw commands",
            cycles,
            entities.len(),
            frame.len()
        );
    }

    shutdown.trigger();
    if let Some(handle) = monitor {
        input::join_control_monitor(handle);
    }
    info!("Stopped after {} cycles", cycles);
    Ok(())
}
