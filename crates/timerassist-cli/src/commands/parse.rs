use timerassist_core::{format_time, Command, CommandInterpreter};

pub fn run(text: &[String], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = text.join(" ");
    let explained = CommandInterpreter::new().explain(&text);

    if json {
        let value = match &explained {
            Some((rule, command)) => serde_json::json!({ "rule": rule, "command": command }),
            None => serde_json::Value::Null,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match explained {
        Some((rule, command)) => {
            println!("rule: {rule}");
            println!("command: {}", describe(&command));
        }
        None => println!("no command"),
    }
    Ok(())
}

fn describe(command: &Command) -> String {
    match command {
        Command::Create {
            name,
            duration_secs,
        } => format!(
            "create '{name}' for {duration_secs}s ({})",
            format_time(*duration_secs)
        ),
        Command::Pause { name } => format!("pause '{name}'"),
        Command::Resume { name } => format!("resume '{name}'"),
        Command::Stop { name } => format!("stop '{name}'"),
        Command::Delete { name } => format!("delete '{name}'"),
        Command::List => "list timers".into(),
        Command::ClearAll => "clear all timers".into(),
        Command::RunRegimen { name } => format!("run regimen '{name}'"),
        Command::ListRegimens => "list regimens".into(),
    }
}
