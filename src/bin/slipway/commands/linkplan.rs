//! `slipway linkplan` command

use anyhow::Result;

use crate::cli::InputArgs;
use slipway::ops;
use slipway::util::GlobalContext;

pub fn execute(args: InputArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let plan = ops::configure(&ctx, &args.to_options())?;

    println!(
        "Link order for `{}` ({} linking):",
        plan.project, plan.link.mode
    );
    println!();

    if plan.link_line.is_empty() {
        println!("  (no third-party libraries)");
        return Ok(());
    }

    for (index, token) in plan.link_line.iter().enumerate() {
        println!("  {}. {}", index + 1, token);
    }
    Ok(())
}
