#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod backend;
mod client_main;
mod friends_main;
mod network;
mod stats_main;
mod tui;

use anyhow::bail;
use backend::Backend;
use clap::{ArgMatches, Command, arg};
use client_main::GameOutcome;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Shiritori")
        .version(clap::crate_version!())
        .about("Wake-up shiritori console client")
        .subcommand_required(true)
        .subcommand(account_args(
            Command::new("register")
                .about("Create an account, then go straight to the game screen"),
        ))
        .subcommand(account_args(Command::new("play").about("Log in and play today's game")))
        .subcommand(account_args(Command::new("stats").about("Show the results of the last week")))
        .subcommand(
            account_args(Command::new("invite").about("Invite a player to your group"))
                .arg(arg!(<player> "Player to look up and invite")),
        )
        .subcommand(account_args(
            Command::new("invitations").about("List invitations waiting for you"),
        ))
        .subcommand(
            account_args(Command::new("respond").about("Accept or decline an invitation"))
                .arg(arg!(<invitation_id> "Invitation ID (see `invitations`)")
                    .value_parser(clap::value_parser!(u64)))
                .arg(arg!(<action> "What to do with it").value_parser(["accept", "decline"])),
        )
        .subcommand(
            account_args(Command::new("set-alarm").about("Set the group's wake-up time"))
                .arg(arg!(<time> "Wake-up time as HH:MM, e.g. 07:30")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("register", sub_matches)) => {
            let backend = Backend::new(arg_str(sub_matches, "server_address"))?;
            let response = backend
                .register(arg_str(sub_matches, "user_name"), arg_str(sub_matches, "password"))?;
            if !response.success {
                bail!(response.reason.unwrap_or_else(|| "Registration failed".to_owned()));
            }
            run_game(&backend)
        }
        Some(("play", sub_matches)) => run_game(&login(sub_matches)?),
        Some(("stats", sub_matches)) => stats_main::run(&login(sub_matches)?),
        Some(("invite", sub_matches)) => {
            friends_main::run_invite(&login(sub_matches)?, arg_str(sub_matches, "player"))
        }
        Some(("invitations", sub_matches)) => friends_main::run_invitations(&login(sub_matches)?),
        Some(("respond", sub_matches)) => friends_main::run_respond(
            &login(sub_matches)?,
            *sub_matches.get_one::<u64>("invitation_id").unwrap(),
            arg_str(sub_matches, "action") == "accept",
        ),
        Some(("set-alarm", sub_matches)) => {
            friends_main::run_set_alarm(&login(sub_matches)?, arg_str(sub_matches, "time"))
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn account_args(command: Command) -> Command {
    command
        .arg(arg!(<server_address> "Server address, e.g. http://localhost:8000"))
        .arg(arg!(<user_name> "User name"))
        .arg(arg!(<password> "Password"))
}

fn arg_str<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches.get_one::<String>(name).unwrap()
}

fn login(sub_matches: &ArgMatches) -> anyhow::Result<Backend> {
    let backend = Backend::new(arg_str(sub_matches, "server_address"))?;
    backend.login(arg_str(sub_matches, "user_name"), arg_str(sub_matches, "password"))?;
    Ok(backend)
}

// The post-game navigation of the original client: the game screen hands off
// to the results view once the session finishes.
fn run_game(backend: &Backend) -> anyhow::Result<()> {
    match client_main::run(backend)? {
        GameOutcome::Finished => stats_main::run(backend),
        GameOutcome::Quit => Ok(()),
    }
}
