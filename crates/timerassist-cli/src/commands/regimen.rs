use clap::Subcommand;
use timerassist_core::{
    format_time, JsonRegimenStore, Outbox, RegimenError, RegimenSequencer, RegimenStep,
};

#[derive(Subcommand)]
pub enum RegimenAction {
    /// List stored regimens
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the timers of one regimen
    Show {
        name: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Create or replace a regimen
    Add {
        name: String,
        /// Timers in order, as NAME=SECONDS (e.g. jog=60 rest=30)
        #[arg(required = true, value_parser = parse_step)]
        steps: Vec<RegimenStep>,
    },
    /// Delete a regimen
    Delete { name: String },
}

fn parse_step(raw: &str) -> Result<RegimenStep, String> {
    let (name, secs) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=SECONDS, got '{raw}'"))?;
    let secs: u64 = secs
        .trim()
        .parse()
        .map_err(|_| format!("'{secs}' is not a number of seconds"))?;
    Ok(RegimenStep::new(name.trim(), secs))
}

pub fn run(action: RegimenAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut sequencer = RegimenSequencer::new(Box::new(JsonRegimenStore::open()?));
    let mut out = Outbox::new();

    match action {
        RegimenAction::List { json: true } => {
            let regimens = sequencer.regimens()?;
            println!("{}", serde_json::to_string_pretty(&regimens)?);
        }
        RegimenAction::List { json: false } => sequencer.list_regimens(&mut out),
        RegimenAction::Show { name, json } => {
            let steps = sequencer
                .regimen(&name)?
                .ok_or_else(|| RegimenError::NotFound(name.clone()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&steps)?);
            } else {
                let total: u64 = steps.iter().map(|s| s.duration).sum();
                println!("{name} ({} total)", format_time(total));
                for (i, step) in steps.iter().enumerate() {
                    println!("  {}. {name}_{} ({}s)", i + 1, step.name, step.duration);
                }
            }
        }
        RegimenAction::Add { name, steps } => sequencer.create_regimen(&name, steps, &mut out)?,
        RegimenAction::Delete { name } => sequencer.delete_regimen(&name, &mut out)?,
    }

    for line in out.lines() {
        println!("{line}");
    }
    Ok(())
}
