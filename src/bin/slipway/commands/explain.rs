//! `slipway explain` command

use anyhow::Result;

use crate::cli::InputArgs;
use slipway::ops;
use slipway::util::GlobalContext;

pub fn execute(args: InputArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let plan = ops::configure(&ctx, &args.to_options())?;

    println!(
        "`{}` resolved to {} linking ({} build)",
        plan.project, plan.link.mode, plan.build_type
    );
    println!("  reason: {}", plan.link.reason);
    println!(
        "  position-independent code: {}",
        if plan.pic { "enabled" } else { "disabled" }
    );
    if plan.coverage {
        println!("  coverage instrumentation: enabled");
    }
    if !plan.sanitizers.is_empty() {
        println!("  sanitizers: {}", plan.sanitizers.join(", "));
    }

    if !plan.link.notes.is_empty() {
        println!();
        println!("Resolution notes:");
        for note in &plan.link.notes {
            println!("  - {}", note);
        }
    }
    Ok(())
}
