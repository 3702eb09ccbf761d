//! `slipway configure` command

use anyhow::Result;

use crate::cli::ConfigureArgs;
use slipway::ops;
use slipway::util::GlobalContext;

pub fn execute(args: ConfigureArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let plan = ops::configure(&ctx, &args.inputs.to_options())?;

    if args.print {
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    let manifest = ctx.load_manifest()?;
    let path = plan.write(&manifest.manifest_dir)?;
    println!("wrote {}", path.display());
    println!("fingerprint: {}", plan.fingerprint);
    Ok(())
}
