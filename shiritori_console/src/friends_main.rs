// Friend and group flows: look a player up before inviting them, list and
// answer pending invitations, set the group's wake-up time.

use anyhow::bail;

use crate::backend::Backend;


pub fn run_invite(backend: &Backend, player: &str) -> anyhow::Result<()> {
    if !backend.find_user(player)? {
        bail!("No player named '{player}' was found");
    }
    backend.invite(player)?;
    println!("Invitation sent to {player}.");
    Ok(())
}

pub fn run_invitations(backend: &Backend) -> anyhow::Result<()> {
    let invitations = backend.invitations()?;
    if invitations.is_empty() {
        println!("No pending invitations.");
        return Ok(());
    }
    for invitation in invitations {
        println!("#{:<6} from {}", invitation.invitation_id, invitation.inviter);
    }
    Ok(())
}

pub fn run_respond(backend: &Backend, invitation_id: u64, accept: bool) -> anyhow::Result<()> {
    if accept {
        backend.accept_invitation(invitation_id)?;
        println!("Joined the group.");
    } else {
        backend.decline_invitation(invitation_id)?;
        println!("Invitation declined.");
    }
    Ok(())
}

pub fn run_set_alarm(backend: &Backend, time: &str) -> anyhow::Result<()> {
    backend.set_wake_up_time(time)?;
    println!("Wake-up time set to {time}.");
    Ok(())
}
