// The results view shown after a finished game (and behind the `stats`
// subcommand): the latest day as a headline, then the week's history.

use crossterm::style::Stylize;

use crate::backend::Backend;


pub fn run(backend: &Backend) -> anyhow::Result<()> {
    let user_info = backend.user_info()?;
    println!("{} — success rate {}%", user_info.user_name, user_info.success_rate);
    if user_info.joined_group {
        let group = &user_info.group_info;
        println!("Group wake-up time {} with {}", group.wake_up_time, group.members.join(", "));
    }
    println!();

    let days = backend.statistics()?;
    let Some((latest, history)) = days.split_first() else {
        println!("{}", "No results recorded yet.".dark_grey());
        return Ok(());
    };

    let headline = if latest.success { "You made it!".green() } else { "Better luck tomorrow.".red() };
    println!("{:04}-{:02}-{:02}  {}", latest.year, latest.month, latest.day, headline.bold());
    for day in history {
        let mark = if day.success { "〇".green() } else { "✘".red() };
        println!("{:04}-{:02}-{:02}  {}", day.year, day.month, day.day, mark);
    }
    Ok(())
}
