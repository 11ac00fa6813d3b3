use clap::Args;
use runmate_core::workout::format::format_clock;
use runmate_core::Config;
use serde::Serialize;

use super::PlanArgs;

#[derive(Args, Debug)]
pub struct PlanCmdArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PlanSummary {
    warm_up_ms: u64,
    high_intensity_ms: u64,
    low_intensity_ms: u64,
    intervals: u32,
    total_ms: u64,
    run_minutes: u64,
}

pub fn run(args: PlanCmdArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let plan = args.plan.resolve(&config)?;

    if args.json {
        let summary = PlanSummary {
            warm_up_ms: plan.warm_up_ms,
            high_intensity_ms: plan.high_intensity_ms,
            low_intensity_ms: plan.low_intensity_ms,
            intervals: plan.intervals,
            total_ms: plan.total_ms(),
            run_minutes: plan.run_minutes(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if plan.has_warm_up() {
        println!("Warm-up         {}", format_clock(plan.warm_up_ms));
    } else {
        println!("Warm-up         off");
    }
    println!("High intensity  {}", format_clock(plan.high_intensity_ms));
    println!("Low intensity   {}", format_clock(plan.low_intensity_ms));
    println!("Intervals       {}", plan.intervals);
    println!("Total           {}", format_clock(plan.total_ms()));
    println!("Your total run duration is {} minutes", plan.run_minutes());
    Ok(())
}
