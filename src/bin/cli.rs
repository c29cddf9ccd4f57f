#![cfg(not(tarpaulin_include))]

use clap::Parser;
use sheetfix::cell::CellRef;
use sheetfix::config::CliConfig;
use sheetfix::display::format_file_size;
use sheetfix::session::ReviewSession;
use sheetfix::transfer::DirectoryTransfer;
use std::io::{self, Write};
use std::time::Instant;

fn print_help() {
    println!("Commands:");
    println!("  q: Quit");
    println!("  show: Display the active sheet (first 100 rows)");
    println!("  sheets: List sheets");
    println!("  sheet <name>: Switch sheet (unsaved edits are discarded)");
    println!("  <cell>=<value>: Set a cell, e.g. B3=1250.00");
    println!("  export: Write <name>_modified.<ext> to the output directory");
    println!("  clear: Close the document and quit");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = CliConfig::parse();
    let bytes = std::fs::read(&config.file)?;
    let filename = config
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("spreadsheet.xlsx")
        .to_string();

    let mut session = ReviewSession::new();
    if let Err(e) = session.open(&bytes, &filename) {
        eprintln!("Error: {}", e);
        return Ok(());
    }
    println!("Opened {} ({})", filename, format_file_size(bytes.len() as u64));

    let mut transfer = DirectoryTransfer::new(config.export_dir());
    let mut status = String::from("ok");
    let mut show = true;
    let mut start_time = Instant::now();

    loop {
        if show {
            if let Some(view) = session.view() {
                println!("[{}]", view.sheet);
                print!("{}", view.render_text());
            }
        }
        show = false;

        let marker = if session.is_dirty() { "*" } else { "" };
        print!(
            "[{:.1}] {}{} ({}) > ",
            start_time.elapsed().as_secs_f64(),
            session.active_sheet().unwrap_or("-"),
            marker,
            status
        );
        io::stdout().flush()?;

        let mut command = String::new();
        if io::stdin().read_line(&mut command)? == 0 {
            break;
        }
        let command = command.trim();
        start_time = Instant::now();

        match command {
            "" => status = String::from("invalid command"),
            "q" => break,
            "help" => {
                print_help();
                status = String::from("ok");
            }
            "show" => {
                show = true;
                status = String::from("ok");
            }
            "sheets" => {
                for name in session.sheet_names() {
                    println!("  {}", name);
                }
                status = String::from("ok");
            }
            "export" => {
                status = match session.export(&mut transfer) {
                    Ok(_) => session.status_message().unwrap_or("ok").to_string(),
                    Err(e) => e.to_string(),
                };
            }
            "clear" => {
                session.clear();
                break;
            }
            _ => {
                if let Some(name) = command.strip_prefix("sheet ") {
                    if session.is_dirty() {
                        println!("Unsaved edits to this sheet will be discarded.");
                    }
                    status = match session.select_sheet(name.trim()) {
                        Ok(()) => {
                            show = true;
                            String::from("ok")
                        }
                        Err(e) => e.to_string(),
                    };
                } else if let Some((cell, value)) = command.split_once('=') {
                    status = match CellRef::parse(cell) {
                        Some(target) => match session.write_cell(target.row, target.col, value) {
                            Ok(()) => String::from("ok"),
                            Err(e) => e.to_string(),
                        },
                        None => String::from("invalid cell"),
                    };
                } else {
                    status = String::from("invalid command");
                }
            }
        }
    }

    if session.is_dirty() {
        println!("Quit with unsaved changes.");
    }
    Ok(())
}
