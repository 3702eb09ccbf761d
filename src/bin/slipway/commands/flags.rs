//! `slipway flags` command

use anyhow::Result;

use crate::cli::InputArgs;
use slipway::ops;
use slipway::util::GlobalContext;

pub fn execute(args: InputArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let plan = ops::configure(&ctx, &args.to_options())?;

    for token in plan.flags.tokens() {
        println!("{}", token);
    }
    Ok(())
}
