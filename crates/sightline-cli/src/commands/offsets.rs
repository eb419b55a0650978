//! Offset table inspection.

use anyhow::Result;
use sightline_core::load_offsets_or_default;

use crate::TargetArgs;

/// Print every offset as it will be used, flagging unset entries.
pub fn run(target: &TargetArgs) -> Result<()> {
    let offsets = load_offsets_or_default(&target.offsets);

    println!("Offsets from {}", target.offsets.display());
    for (name, value) in offsets.entries() {
        let marker = if value == 0 { "  (unset)" } else { "" };
        println!("  {:<28} {:#010X}{}", name, value, marker);
    }

    if offsets.is_complete() {
        println!("All {} offsets are set", offsets.entries().len());
    } else {
        println!(
            "{} of {} offsets are unset; affected reads will fail and entities will be dropped",
            offsets.zero_fields().len(),
            offsets.entries().len()
        );
    }
    Ok(())
}
