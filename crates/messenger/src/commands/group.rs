//! Group command - manage group chats.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;

use super::{Context, print_payload};

/// Arguments for the group command.
#[derive(Args, Debug)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommand,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// List group members
    Members {
        /// Group chat ID
        id: String,

        /// The ID is in the auxiliary (external) namespace
        #[arg(long)]
        aux: bool,
    },

    /// Change the group subject
    Subject {
        /// Group chat ID
        id: String,

        /// New subject
        subject: String,

        /// The ID is in the auxiliary (external) namespace
        #[arg(long)]
        aux: bool,
    },

    /// Close a group chat
    Close {
        /// Group chat ID
        id: String,

        /// The ID is in the auxiliary (external) namespace
        #[arg(long)]
        aux: bool,

        /// Email members about the closure
        #[arg(long)]
        send_email: bool,
    },
}

/// Run the group command.
pub async fn run(args: GroupArgs, ctx: &Context) -> Result<()> {
    let groups = ctx.client.groups();

    match args.command {
        GroupCommand::Members { id, aux } => {
            let members = groups.members(&id, aux).await?;
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&members)?);
            } else if members.is_empty() {
                println!("{}", Style::new().dim().apply_to("No members"));
            } else {
                let dim = Style::new().dim();
                for member in &members {
                    println!("{} {}", dim.apply_to(format!("[{}]", member.id)), member.display_name());
                }
            }
        }
        GroupCommand::Subject { id, subject, aux } => {
            let payload = groups.change_subject(&id, aux, &subject).await?;
            print_payload(ctx, "Subject changed", &payload)?;
        }
        GroupCommand::Close {
            id,
            aux,
            send_email,
        } => {
            let payload = groups.close(&id, aux, send_email).await?;
            print_payload(ctx, "Group closed", &payload)?;
        }
    }

    Ok(())
}
