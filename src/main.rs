mod error;
mod games;

use std::env;

fn main()
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String>
{
    let mut args = env::args().skip(1);
    let command = args.next();
    let rest: Vec<String> = args.collect();
    match command.as_deref() {
        None => interactive_menu(),
        Some("list") => {
            list_games();
            Ok(())
        }
        Some("digits") => run_game("digits", &rest),
        Some("fourdle") => run_game("fourdle", &rest),
        Some("-h") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(other) => Err(format!("Unknown command '{other}'. Run with --help.")),
    }
}

fn run_game(name: &str, args: &[String]) -> Result<(), String>
{
    let config = match name {
        "digits" => games::digits::DigitsConfig::from_args(args)?,
        "fourdle" => games::digits::DigitsConfig::fourdle_from_args(args)?,
        _ => return Err(format!("Unknown game '{name}'. Run with --help.")),
    };
    log::info!("Starting {name}");
    games::digits::run_with_config(config)
}

fn interactive_menu() -> Result<(), String>
{
    let registry = games::registry();
    println!("KB Games");
    println!();
    println!("Select a game:");
    for (idx, game) in registry.iter().enumerate() {
        println!("  {}. {} - {}", idx + 1, game.name, game.description);
    }
    println!();
    print!("Enter number or name (default 1, q to quit): ");
    std::io::Write::flush(&mut std::io::stdout())
        .map_err(|err| format!("Failed to flush stdout: {err}"))?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|err| format!("Failed to read input: {err}"))?;
    let choice = input.trim();

    if choice.is_empty() {
        return run_game(registry[0].name, &[]);
    }
    if choice.eq_ignore_ascii_case("q") {
        return Ok(());
    }
    if let Ok(index) = choice.parse::<usize>() {
        if index >= 1 && index <= registry.len() {
            return run_game(registry[index - 1].name, &[]);
        }
    }

    for game in &registry {
        if game.name.eq_ignore_ascii_case(choice) {
            return run_game(game.name, &[]);
        }
    }

    Err("Invalid selection.".to_string())
}

fn list_games()
{
    println!("Available games:");
    for game in games::registry() {
        println!("  {:<10} - {}", game.name, game.description);
    }
}

fn print_help()
{
    println!("digit-guess");
    println!("\nUsage:");
    println!("  digit-guess list");
    println!("  digit-guess digits [--digits=4] [--repeats] [--theme=cyber|classic] [--store=PATH]");
    println!("  digit-guess fourdle [--store=PATH]");
    println!("\nKeys:");
    println!("  0-9 type a digit, Backspace erases, Enter submits, N new round, Esc quits.");
    println!("  On the start screen Left/Right pick the digit count.");
    println!("\nNotes:");
    println!("  The best score is kept in $HOME/.digit-guess.json.");
    println!("  Set DIGIT_GUESS_STORE to use another file, RUST_LOG=debug to log the secret.");
}
