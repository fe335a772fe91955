//! User command - user lookups.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};

use super::{Context, print_payload};

/// Arguments for the user command.
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Show a user
    Get {
        /// User ID
        id: String,

        /// The ID is in the auxiliary (external) namespace
        #[arg(long)]
        aux: bool,
    },

    /// List a user's identity providers
    Providers {
        /// User ID
        id: String,
    },

    /// List a user's completed verifications
    Verifications {
        /// User ID
        id: String,
    },
}

/// Run the user command.
pub async fn run(args: UserArgs, ctx: &Context) -> Result<()> {
    let users = ctx.client.users();

    match args.command {
        UserCommand::Get { id, aux } => {
            let user = users.get(&id, aux).await?;
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                let dim = Style::new().dim();
                println!("{}", style(user.display_name()).bold());
                println!("  {} {}", dim.apply_to("ID:"), user.id);
                if let Some(company) = &user.company_id {
                    println!("  {} {}", dim.apply_to("Company:"), company);
                }
            }
        }
        UserCommand::Providers { id } => {
            let payload = users.providers(&id).await?;
            print_payload(ctx, "Providers retrieved", &payload)?;
        }
        UserCommand::Verifications { id } => {
            let payload = users.verifications(&id).await?;
            print_payload(ctx, "Verifications retrieved", &payload)?;
        }
    }

    Ok(())
}
