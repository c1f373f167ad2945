use chrono::{NaiveDate, NaiveTime};
use revision_tool::{
    RevisionMethod, RevisionPlan, SchedulingWindowConfig, load_events_from_ics,
    load_plan_from_json, load_sessions_from_csv, save_plan_to_csv, save_plan_to_ics,
    save_plan_to_json,
};
use std::fs;
use std::io::{self, Write};

const TABLE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if len > widths[ci] {
                widths[ci] = len;
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in headers.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.chars().count();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row in rows {
        out.push('|');
        for (ci, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.chars().count());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_sessions(plan: &RevisionPlan) -> String {
    let sessions = match plan.sessions() {
        Ok(sessions) => sessions,
        Err(e) => return format!("Error reading sessions: {}\n", e),
    };
    let rows: Vec<Vec<String>> = sessions
        .iter()
        .map(|s| {
            vec![
                s.scheduled_at.format(TABLE_DATETIME_FORMAT).to_string(),
                s.source_title.clone(),
                s.method.display_name().to_string(),
                s.duration_minutes.to_string(),
            ]
        })
        .collect();
    render_text_table(&["Date", "Cours", "Méthode", "Durée (minutes)"], &rows)
}

fn render_events(plan: &RevisionPlan) -> String {
    let rows: Vec<Vec<String>> = plan
        .events()
        .iter()
        .map(|e| {
            vec![
                e.start.format(TABLE_DATETIME_FORMAT).to_string(),
                e.summary.clone(),
            ]
        })
        .collect();
    render_text_table(&["Début", "Cours"], &rows)
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the generated revision sessions\n  import <ics_path>                  Import source events from an ICS calendar\n  events                             List imported source events\n  window show                        Display the scheduling window\n  window dates <start> <end>         Set the date range (YYYY-MM-DD)\n  window hours <start> <end>         Set the daily hours (HH:MM)\n  window duration <minutes>          Set the session duration (10-120)\n  window default                     Reset the window to its defaults\n  window set <json_path>             Load window config from JSON file\n  window save <json_path>            Save current window config to JSON file\n  method show                        Display the active revision method\n  method list                        List available revision methods\n  method set <key>                   Select a revision method\n  generate                           Expand events into revision sessions\n  save <csv|ics|json> <path>         Persist the plan to disk\n  load <csv|json> <path>             Load sessions (csv) or a full plan (json)\n  quit|exit                          Exit"
    );
}

fn print_methods() {
    println!("Available revision methods:");
    for (key, display_name) in RevisionMethod::variants() {
        println!("  {:<16} {}", key, display_name);
    }
}

fn print_window(plan: &RevisionPlan) {
    let window = plan.window();
    println!("Date range       : {} to {}", window.range_start, window.range_end);
    println!("Daily hours      : {} to {}", window.day_start, window.day_end);
    println!("Session duration : {} minutes", window.session_duration_minutes);
}

fn print_method(plan: &RevisionPlan) {
    let method = plan.method();
    println!("Method : {} ({})", method.key(), method.display_name());
}

fn main() {
    let mut plan = RevisionPlan::new();

    println!("Revision Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "show" => {
                println!("{}", render_sessions(&plan));
            }
            "events" => {
                println!("{}", render_events(&plan));
            }
            "import" => {
                let path = parts.next();
                match path {
                    Some(path) => match load_events_from_ics(path) {
                        Ok(events) => {
                            let imported = events.len();
                            plan.set_events(events);
                            println!("Imported {} event(s) from {}.", imported, path);
                            println!("{}", render_events(&plan));
                        }
                        Err(e) => println!("Error importing {}: {}", path, e),
                    },
                    None => println!("Usage: import <ics_path>"),
                }
            }
            "window" => match parts.next() {
                Some("show") | None => print_window(&plan),
                Some("dates") => {
                    let start_s = parts.next();
                    let end_s = parts.next();
                    match (start_s, end_s) {
                        (Some(start_s), Some(end_s)) => {
                            let start = match NaiveDate::parse_from_str(start_s, "%Y-%m-%d") {
                                Ok(d) => d,
                                Err(_) => {
                                    println!("Invalid start date (YYYY-MM-DD)");
                                    continue;
                                }
                            };
                            let end = match NaiveDate::parse_from_str(end_s, "%Y-%m-%d") {
                                Ok(d) => d,
                                Err(_) => {
                                    println!("Invalid end date (YYYY-MM-DD)");
                                    continue;
                                }
                            };
                            match plan.set_date_range(start, end) {
                                Ok(_) => {
                                    println!("Date range updated.");
                                    print_window(&plan);
                                }
                                Err(e) => println!("Error: {}", e),
                            }
                        }
                        _ => println!("Usage: window dates <YYYY-MM-DD> <YYYY-MM-DD>"),
                    }
                }
                Some("hours") => {
                    let start_s = parts.next();
                    let end_s = parts.next();
                    match (start_s, end_s) {
                        (Some(start_s), Some(end_s)) => {
                            let start = match NaiveTime::parse_from_str(start_s, "%H:%M") {
                                Ok(t) => t,
                                Err(_) => {
                                    println!("Invalid start time (HH:MM)");
                                    continue;
                                }
                            };
                            let end = match NaiveTime::parse_from_str(end_s, "%H:%M") {
                                Ok(t) => t,
                                Err(_) => {
                                    println!("Invalid end time (HH:MM)");
                                    continue;
                                }
                            };
                            match plan.set_daily_hours(start, end) {
                                Ok(_) => {
                                    println!("Daily hours updated.");
                                    print_window(&plan);
                                }
                                Err(e) => println!("Error: {}", e),
                            }
                        }
                        _ => println!("Usage: window hours <HH:MM> <HH:MM>"),
                    }
                }
                Some("duration") => {
                    let minutes_s = parts.next();
                    match minutes_s {
                        Some(minutes_s) => {
                            let minutes: i64 = match minutes_s.parse() {
                                Ok(v) => v,
                                Err(_) => {
                                    println!("Invalid minutes");
                                    continue;
                                }
                            };
                            match plan.set_session_duration(minutes) {
                                Ok(_) => {
                                    println!("Session duration updated.");
                                    print_window(&plan);
                                }
                                Err(e) => println!("Error: {}", e),
                            }
                        }
                        None => println!("Usage: window duration <minutes>"),
                    }
                }
                Some("default") => {
                    plan.reset_window_to_default();
                    println!("Window reset to default.");
                    print_window(&plan);
                }
                Some("set") => {
                    let path = parts.next();
                    match path {
                        Some(path) => match fs::read_to_string(path) {
                            Ok(contents) => {
                                match serde_json::from_str::<SchedulingWindowConfig>(&contents) {
                                    Ok(config) => match plan.set_window_from_config(&config) {
                                        Ok(_) => {
                                            println!("Window updated from {}.", path);
                                            print_window(&plan);
                                        }
                                        Err(e) => println!("Error applying window: {}", e),
                                    },
                                    Err(e) => println!("Invalid window JSON: {}", e),
                                }
                            }
                            Err(e) => println!("Error reading {}: {}", path, e),
                        },
                        None => println!("Usage: window set <json_path>"),
                    }
                }
                Some("save") => {
                    let path = parts.next();
                    match path {
                        Some(path) => {
                            let config = plan.window_config();
                            match serde_json::to_string_pretty(&config) {
                                Ok(json) => match fs::write(path, json) {
                                    Ok(_) => println!("Window saved to {}.", path),
                                    Err(e) => println!("Error writing {}: {}", path, e),
                                },
                                Err(e) => println!("Error serializing window: {}", e),
                            }
                        }
                        None => println!("Usage: window save <json_path>"),
                    }
                }
                Some(other) => {
                    println!("Unknown window command '{}'.", other);
                    println!(
                        "Usage: window show|dates|hours|duration|default|set <json_path>|save <json_path>"
                    );
                }
            },
            "method" => match parts.next() {
                Some("show") | None => print_method(&plan),
                Some("list") => print_methods(),
                Some("set") => {
                    let key = parts.next();
                    match key {
                        Some(key) => match RevisionMethod::from_key(key) {
                            Some(method) => {
                                plan.set_method(method);
                                println!("Method set to '{}'.", method.key());
                            }
                            None => {
                                println!(
                                    "Unknown revision method '{}'. Use 'method list' to see options.",
                                    key
                                );
                            }
                        },
                        None => println!("Usage: method set <key>"),
                    }
                }
                Some(other) => {
                    println!("Unknown method command '{}'.", other);
                    println!("Usage: method show|list|set <key>");
                }
            },
            "generate" => match plan.generate() {
                Ok(summary) => {
                    println!(
                        "Generated ({})\n{}",
                        summary.to_cli_summary(),
                        render_sessions(&plan)
                    );
                }
                Err(e) => println!("Generation error: {}", e),
            },
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("csv"), Some(path)) => match save_plan_to_csv(&plan, path) {
                        Ok(_) => println!("Plan saved to {}.", path),
                        Err(e) => println!("Error saving plan: {}", e),
                    },
                    (Some("ics"), Some(path)) => match save_plan_to_ics(&plan, path) {
                        Ok(_) => println!("Plan saved to {}.", path),
                        Err(e) => println!("Error saving plan: {}", e),
                    },
                    (Some("json"), Some(path)) => match save_plan_to_json(&plan, path) {
                        Ok(_) => println!("Plan saved to {}.", path),
                        Err(e) => println!("Error saving plan: {}", e),
                    },
                    _ => println!("Usage: save <csv|ics|json> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("csv"), Some(path)) => match load_sessions_from_csv(path) {
                        Ok(sessions) => match plan.replace_sessions(&sessions) {
                            Ok(_) => {
                                println!("Sessions loaded from {}.", path);
                                println!("{}", render_sessions(&plan));
                            }
                            Err(e) => println!("Error applying sessions: {}", e),
                        },
                        Err(e) => println!("Error loading sessions: {}", e),
                    },
                    (Some("json"), Some(path)) => match load_plan_from_json(path) {
                        Ok(loaded) => {
                            plan = loaded;
                            println!("Plan loaded from {}.", path);
                            println!("{}", render_sessions(&plan));
                        }
                        Err(e) => println!("Error loading plan: {}", e),
                    },
                    _ => println!("Usage: load <csv|json> <path>"),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
